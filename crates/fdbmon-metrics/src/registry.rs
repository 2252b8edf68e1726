//! Gauge registry — fixed instrument set with atomic f64 cells.
//!
//! Registration is a build-phase operation (`&mut self`) that happens once
//! at process start; registering the same instrument name twice is a
//! configuration error the caller must treat as fatal. After registration
//! the registry is shared behind an `Arc`: the refresh loop overwrites cell
//! values through `&self`, and scrape handlers read them concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::debug;

/// Errors from registry configuration or lookups.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("instrument already registered: {0}")]
    DuplicateInstrument(String),

    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("unknown label value {value:?} for instrument {instrument}")]
    UnknownLabel { instrument: String, value: String },

    #[error("label mismatch for instrument {0}")]
    LabelMismatch(String),
}

/// An atomic f64 cell, bit-cast over `AtomicU64`.
struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    fn zero() -> Self {
        Self {
            bits: AtomicU64::new(0),
        }
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// One gauge value, optionally pinned to a label value.
struct GaugeCell {
    label_value: Option<String>,
    value: AtomicF64,
}

/// A named gauge instrument with a fixed label dimension.
///
/// An unlabeled gauge has exactly one cell; a labeled gauge has one cell per
/// label value declared at registration. The cell set never changes after
/// registration.
pub struct GaugeFamily {
    name: String,
    help: String,
    label_key: Option<&'static str>,
    cells: Vec<GaugeCell>,
}

impl GaugeFamily {
    /// Instrument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text for exposition.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The label dimension, if this gauge is labeled.
    pub fn label_key(&self) -> Option<&'static str> {
        self.label_key
    }

    /// Current samples for this family, in registration order.
    pub fn samples(&self) -> Vec<MetricSample> {
        self.cells
            .iter()
            .map(|cell| MetricSample {
                name: self.name.clone(),
                label: self
                    .label_key
                    .zip(cell.label_value.as_deref())
                    .map(|(k, v)| (k.to_string(), v.to_string())),
                value: cell.value.get(),
            })
            .collect()
    }
}

/// One (instrument, label, value) reading taken from the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub label: Option<(String, String)>,
    pub value: f64,
}

/// Fixed set of gauge instruments shared between the refresh loop and the
/// scrape handlers.
#[derive(Default)]
pub struct MetricRegistry {
    families: Vec<GaugeFamily>,
    index: HashMap<String, usize>,
}

impl MetricRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unlabeled gauge. Fails on a duplicate name.
    pub fn register_gauge(&mut self, name: &str, help: &str) -> Result<(), RegistryError> {
        self.register_family(GaugeFamily {
            name: name.to_string(),
            help: help.to_string(),
            label_key: None,
            cells: vec![GaugeCell {
                label_value: None,
                value: AtomicF64::zero(),
            }],
        })
    }

    /// Register a labeled gauge with its full, closed set of label values.
    /// Fails on a duplicate name.
    pub fn register_gauge_vec(
        &mut self,
        name: &str,
        help: &str,
        label_key: &'static str,
        label_values: &[&str],
    ) -> Result<(), RegistryError> {
        self.register_family(GaugeFamily {
            name: name.to_string(),
            help: help.to_string(),
            label_key: Some(label_key),
            cells: label_values
                .iter()
                .map(|v| GaugeCell {
                    label_value: Some(v.to_string()),
                    value: AtomicF64::zero(),
                })
                .collect(),
        })
    }

    fn register_family(&mut self, family: GaugeFamily) -> Result<(), RegistryError> {
        if self.index.contains_key(&family.name) {
            return Err(RegistryError::DuplicateInstrument(family.name));
        }
        debug!(instrument = %family.name, cells = family.cells.len(), "gauge registered");
        self.index.insert(family.name.clone(), self.families.len());
        self.families.push(family);
        Ok(())
    }

    /// Overwrite the value of an unlabeled gauge.
    pub fn set(&self, name: &str, value: f64) -> Result<(), RegistryError> {
        let family = self.family(name)?;
        if family.label_key.is_some() {
            return Err(RegistryError::LabelMismatch(name.to_string()));
        }
        family.cells[0].value.set(value);
        Ok(())
    }

    /// Overwrite one labeled cell of a gauge.
    pub fn set_labeled(
        &self,
        name: &str,
        label_value: &str,
        value: f64,
    ) -> Result<(), RegistryError> {
        let family = self.family(name)?;
        if family.label_key.is_none() {
            return Err(RegistryError::LabelMismatch(name.to_string()));
        }
        let cell = family
            .cells
            .iter()
            .find(|c| c.label_value.as_deref() == Some(label_value))
            .ok_or_else(|| RegistryError::UnknownLabel {
                instrument: name.to_string(),
                value: label_value.to_string(),
            })?;
        cell.value.set(value);
        Ok(())
    }

    /// All registered families, in registration order.
    pub fn families(&self) -> &[GaugeFamily] {
        &self.families
    }

    /// Take an ordered reading of every cell.
    ///
    /// Ordering is registration order, then cell order within a family.
    /// Each individual value is read atomically; cross-field consistency is
    /// the exporter's responsibility.
    pub fn snapshot_for_scrape(&self) -> Vec<MetricSample> {
        self.families.iter().flat_map(|f| f.samples()).collect()
    }

    fn family(&self, name: &str) -> Result<&GaugeFamily, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.families[i])
            .ok_or_else(|| RegistryError::UnknownInstrument(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> MetricRegistry {
        let mut registry = MetricRegistry::new();
        registry.register_gauge("up", "whether the target is up").unwrap();
        registry
            .register_gauge_vec("disk_bytes", "disk usage", "kind", &["data", "wal"])
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let mut registry = test_registry();
        let err = registry.register_gauge("up", "again").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateInstrument(name) if name == "up"));

        // The labels don't matter; the name is the identity.
        let err = registry
            .register_gauge_vec("disk_bytes", "again", "kind", &["x"])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateInstrument(_)));
    }

    #[test]
    fn unregistered_cells_read_zero() {
        let registry = test_registry();
        let samples = registry.snapshot_for_scrape();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn set_overwrites_in_place() {
        let registry = test_registry();
        registry.set("up", 1.0).unwrap();
        registry.set("up", 0.0).unwrap();
        registry.set("up", 1.0).unwrap();

        let samples = registry.snapshot_for_scrape();
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn set_labeled_targets_one_cell() {
        let registry = test_registry();
        registry.set_labeled("disk_bytes", "data", 100.0).unwrap();
        registry.set_labeled("disk_bytes", "wal", 7.0).unwrap();

        let samples = registry.snapshot_for_scrape();
        assert_eq!(
            samples[1],
            MetricSample {
                name: "disk_bytes".to_string(),
                label: Some(("kind".to_string(), "data".to_string())),
                value: 100.0,
            }
        );
        assert_eq!(samples[2].value, 7.0);
    }

    #[test]
    fn unknown_instrument_is_an_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.set("nope", 1.0),
            Err(RegistryError::UnknownInstrument(_))
        ));
        assert!(matches!(
            registry.set_labeled("nope", "data", 1.0),
            Err(RegistryError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn unknown_label_value_is_an_error() {
        let registry = test_registry();
        let err = registry.set_labeled("disk_bytes", "tmp", 1.0).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownLabel { instrument, value }
                if instrument == "disk_bytes" && value == "tmp"
        ));
    }

    #[test]
    fn label_shape_must_match_registration() {
        let registry = test_registry();
        assert!(matches!(
            registry.set("disk_bytes", 1.0),
            Err(RegistryError::LabelMismatch(_))
        ));
        assert!(matches!(
            registry.set_labeled("up", "data", 1.0),
            Err(RegistryError::LabelMismatch(_))
        ));
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut registry = MetricRegistry::new();
        registry.register_gauge("b_second", "").unwrap();
        registry.register_gauge("a_first", "").unwrap();

        let names: Vec<_> = registry
            .snapshot_for_scrape()
            .into_iter()
            .map(|s| s.name)
            .collect();
        // Registration order, not lexicographic.
        assert_eq!(names, vec!["b_second", "a_first"]);
    }

    #[test]
    fn concurrent_reads_never_observe_torn_values() {
        use std::sync::Arc;

        let registry = Arc::new(test_registry());
        registry.set("up", 1.0).unwrap();

        std::thread::scope(|scope| {
            let writer = Arc::clone(&registry);
            scope.spawn(move || {
                for i in 0..10_000u32 {
                    let v = if i % 2 == 0 { 1.0 } else { 2.0 };
                    writer.set("up", v).unwrap();
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&registry);
                scope.spawn(move || {
                    for _ in 0..10_000 {
                        let v = reader.snapshot_for_scrape()[0].value;
                        assert!(v == 1.0 || v == 2.0, "torn read: {v}");
                    }
                });
            }
        });
    }
}
