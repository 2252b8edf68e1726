//! fdbmon-metrics — gauge registry for the fdbmon exporter.
//!
//! Holds a fixed set of named, labeled gauge instruments that are registered
//! once at startup and overwritten in place on every refresh. Values live in
//! atomic cells, so scrape reads never lock out the refresh loop and never
//! observe a torn value.
//!
//! # Architecture
//!
//! ```text
//! MetricRegistry
//!   ├── register_gauge() / register_gauge_vec() ← startup only
//!   ├── set() / set_labeled() ← refresh loop (single writer)
//!   └── snapshot_for_scrape() → ordered samples for readers
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod exposition;
pub mod registry;

pub use exposition::render_prometheus;
pub use registry::{MetricRegistry, MetricSample, RegistryError};
