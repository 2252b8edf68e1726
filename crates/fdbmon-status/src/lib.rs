//! fdbmon-status — the cluster status pipeline.
//!
//! Owns everything between the raw status blob and the published gauges:
//! the typed document model, the transactional fetch seam, the stable
//! gauge schema, and the periodic refresh loop that ties them together.
//!
//! # Architecture
//!
//! ```text
//! RefreshScheduler::run()           every interval:
//!   ├── StatusSource::fetch_status()  one read-only transaction → raw blob
//!   ├── StatusSnapshot::decode()      strict JSON decode, all-or-nothing
//!   └── export_snapshot()             14 gauge cells, booleans as 0/1
//!
//! register_status_schema()          once at startup, fixed cell set
//! ```

pub mod export;
pub mod refresh;
pub mod snapshot;
pub mod source;

pub use export::{export_snapshot, register_status_schema};
pub use refresh::{RefreshScheduler, TickError, TickStats};
pub use snapshot::{DecodeError, StatusSnapshot};
pub use source::{FetchError, StatusSource};
