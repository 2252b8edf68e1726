//! Transactional status fetch.
//!
//! [`StatusSource`] is the seam between the refresh pipeline and whatever
//! holds the status document. One call runs one read-only transaction and
//! returns the raw blob stored under the reserved status key, so every fetch
//! observes a single consistent version of the document. Retry policy lives
//! in the refresh loop, not here.

use thiserror::Error;

use fdbmon_store::StatusStore;

// ── Errors ──────────────────────────────────────────────────────────────────

/// Error fetching the status document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The reserved status key is absent, or holds an empty value.
    #[error("status document not found")]
    NotFound,

    /// The read transaction itself failed.
    #[error("status read transaction failed: {0}")]
    Transaction(String),
}

// ── Source trait ────────────────────────────────────────────────────────────

/// A provider of raw status documents.
pub trait StatusSource: Send + Sync {
    /// Fetch the current status document in one read-only transaction.
    fn fetch_status(&self) -> Result<Vec<u8>, FetchError>;
}

/// Sources shared behind an `Arc` fetch through the shared value.
impl<S: StatusSource + ?Sized> StatusSource for std::sync::Arc<S> {
    fn fetch_status(&self) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_status()
    }
}

/// The store-backed source reads the reserved status key from the local
/// status mirror. An empty value is treated the same as an absent key: the
/// writer has not published a document yet.
impl StatusSource for StatusStore {
    fn fetch_status(&self) -> Result<Vec<u8>, FetchError> {
        match self.read_status() {
            Ok(Some(blob)) if !blob.is_empty() => Ok(blob),
            Ok(_) => Err(FetchError::NotFound),
            Err(e) => Err(FetchError::Transaction(e.to_string())),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
