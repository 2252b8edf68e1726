//! redb table definitions for the fdbmon status store.
//!
//! The store holds reserved-namespace documents under raw byte keys, so the
//! table uses `&[u8]` for both columns. Reserved keys start with `\xff\xff`,
//! outside the normal user key-space.

use redb::TableDefinition;

/// Reserved-namespace documents keyed by raw byte key.
pub const STATUS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("status");

/// Well-known key holding the JSON cluster status document.
pub const STATUS_KEY: &[u8] = b"\xff\xff/status/json";
