//! Refresh scheduler — the periodic fetch → decode → export pipeline.
//!
//! One scheduler owns one status source and is the only writer of the shared
//! gauge registry. Ticks are serialized: each pipeline runs to completion
//! before the next sleep starts, so a slow fetch stretches the effective
//! period instead of piling up overlapping reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use fdbmon_metrics::{MetricRegistry, RegistryError};

use crate::export::export_snapshot;
use crate::snapshot::{DecodeError, StatusSnapshot};
use crate::source::{FetchError, StatusSource};

// ── Errors ──────────────────────────────────────────────────────────────────

/// Why a refresh tick was abandoned.
///
/// A failed tick never publishes partial data: the registry keeps whatever
/// the last successful tick exported.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("status fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("status decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("gauge export failed: {0}")]
    Export(#[from] RegistryError),
}

// ── Scheduler ───────────────────────────────────────────────────────────────

/// Tick counters since the scheduler was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    pub completed: u64,
    pub failed: u64,
}

/// Drives the periodic refresh pipeline against a status source.
pub struct RefreshScheduler<S> {
    /// Where status documents come from.
    source: S,
    /// The shared registry this scheduler writes into.
    registry: Arc<MetricRegistry>,
    /// Sleep between ticks.
    interval: Duration,
    /// When false, fetch and decode still run but nothing is exported.
    export_enabled: bool,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl<S: StatusSource> RefreshScheduler<S> {
    /// Create a scheduler with export enabled.
    pub fn new(source: S, registry: Arc<MetricRegistry>, interval: Duration) -> Self {
        Self {
            source,
            registry,
            interval,
            export_enabled: true,
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Toggle the export step. Fetch and decode run either way, so a
    /// disabled exporter still validates the status pipeline every tick.
    pub fn with_export_enabled(mut self, enabled: bool) -> Self {
        self.export_enabled = enabled;
        self
    }

    /// Run one tick: fetch, decode, export.
    ///
    /// On failure the registry is left exactly as the previous tick left it.
    pub fn refresh_once(&self) -> Result<(), TickError> {
        let result = self.refresh_inner();
        match result {
            Ok(()) => self.completed.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    fn refresh_inner(&self) -> Result<(), TickError> {
        let blob = self.source.fetch_status()?;
        let snapshot = StatusSnapshot::decode(&blob)?;
        if self.export_enabled {
            export_snapshot(&snapshot, &self.registry)?;
        }
        debug!(
            bytes = blob.len(),
            exported = self.export_enabled,
            "status refreshed"
        );
        Ok(())
    }

    /// Tick counters so far.
    pub fn stats(&self) -> TickStats {
        TickStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Run the refresh loop until the shutdown signal fires.
    ///
    /// The first tick happens one full interval after start. Tick failures
    /// are logged and the loop keeps going; only shutdown stops it.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            export_enabled = self.export_enabled,
            "refresh scheduler started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    match self.refresh_once() {
                        Ok(()) => {}
                        // An export error means the registered schema and the
                        // mapping disagree, which no later tick will fix.
                        Err(e @ TickError::Export(_)) => {
                            error!(error = %e, "refresh tick failed");
                        }
                        Err(e) => {
                            warn!(error = %e, "refresh tick failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("refresh scheduler shutting down");
                    break;
                }
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
