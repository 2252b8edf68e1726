//! fdbmon-store — embedded status store for fdbmon.
//!
//! Backed by [redb](https://docs.rs/redb), holds the reserved-namespace
//! status document that the exporter republishes as gauges. The document
//! lives under a single well-known byte key (`\xff\xff/status/json`); the
//! read path is one read-only transaction, so a reader always sees a single
//! committed version of the document.
//!
//! The `StatusStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod version;

pub use error::{StoreError, StoreResult};
pub use store::StatusStore;
pub use version::ApiVersion;
