//! StatusStore — redb-backed storage for the reserved status document.
//!
//! The exporter side only ever calls [`StatusStore::read_status`], which runs
//! a single read-only transaction against the well-known key. The write half
//! ([`StatusStore::put_status`]) exists for the agent that publishes the
//! status document and for tests. Both on-disk and in-memory backends are
//! supported (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::tables::{STATUS, STATUS_KEY};

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Thread-safe status store backed by redb.
#[derive(Clone)]
pub struct StatusStore {
    db: Arc<Database>,
}

impl StatusStore {
    /// Open (or create) a persistent status store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "status store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory status store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory status store opened");
        Ok(store)
    }

    /// Create the status table if it doesn't exist yet.
    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(STATUS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Read the current status document in one read-only transaction.
    ///
    /// Returns `None` when the reserved key has never been written. The
    /// read transaction pins a single committed version of the document.
    pub fn read_status(&self) -> StoreResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(STATUS).map_err(map_err!(Table))?;
        match table.get(STATUS_KEY).map_err(map_err!(Read))? {
            Some(guard) => Ok(Some(guard.value().to_vec())),
            None => Ok(None),
        }
    }

    /// Write (replace) the status document under the reserved key.
    pub fn put_status(&self, blob: &[u8]) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(STATUS).map_err(map_err!(Table))?;
            table.insert(STATUS_KEY, blob).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(bytes = blob.len(), "status document stored");
        Ok(())
    }

    /// Remove the status document. Returns true if it existed.
    pub fn clear_status(&self) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(STATUS).map_err(map_err!(Table))?;
            existed = table.remove(STATUS_KEY).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(existed, "status document cleared");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_any_write_returns_none() {
        let store = StatusStore::open_in_memory().unwrap();
        assert!(store.read_status().unwrap().is_none());
    }

    #[test]
    fn put_and_read_roundtrip() {
        let store = StatusStore::open_in_memory().unwrap();
        store.put_status(b"{\"cluster\":{}}").unwrap();

        let blob = store.read_status().unwrap();
        assert_eq!(blob.as_deref(), Some(b"{\"cluster\":{}}".as_slice()));
    }

    #[test]
    fn put_overwrites_previous_document() {
        let store = StatusStore::open_in_memory().unwrap();
        store.put_status(b"first").unwrap();
        store.put_status(b"second").unwrap();

        let blob = store.read_status().unwrap();
        assert_eq!(blob.as_deref(), Some(b"second".as_slice()));
    }

    #[test]
    fn clear_removes_document() {
        let store = StatusStore::open_in_memory().unwrap();
        store.put_status(b"doc").unwrap();

        assert!(store.clear_status().unwrap());
        assert!(!store.clear_status().unwrap());
        assert!(store.read_status().unwrap().is_none());
    }

    #[test]
    fn empty_document_is_stored_as_is() {
        // The store itself does not police payloads; the fetch layer maps
        // empty blobs to NotFound.
        let store = StatusStore::open_in_memory().unwrap();
        store.put_status(b"").unwrap();

        let blob = store.read_status().unwrap();
        assert_eq!(blob.as_deref(), Some(b"".as_slice()));
    }

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("status.db");

        {
            let store = StatusStore::open(&db_path).unwrap();
            store.put_status(b"{\"database_locked\":false}").unwrap();
        }

        // Reopen the same database file.
        let store = StatusStore::open(&db_path).unwrap();
        let blob = store.read_status().unwrap().unwrap();
        assert_eq!(blob, b"{\"database_locked\":false}");
    }

    #[test]
    fn clone_shares_the_same_database() {
        let store = StatusStore::open_in_memory().unwrap();
        let clone = store.clone();

        store.put_status(b"shared").unwrap();
        assert_eq!(clone.read_status().unwrap().as_deref(), Some(b"shared".as_slice()));
    }
}
