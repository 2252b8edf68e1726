//! Error types for the fdbmon status store.

use thiserror::Error;

/// Result type alias for status store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during status store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("unsupported store api version {0} (supported 510..=730)")]
    UnsupportedApiVersion(u32),
}
