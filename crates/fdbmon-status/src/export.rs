//! The stable gauge schema and the snapshot-to-gauge mapping.
//!
//! Names, label keys, and label values below are a published contract:
//! dashboards and alerts key on them, so they only ever change additively.
//! The whole schema is registered once at startup, and every refresh maps a
//! decoded [`StatusSnapshot`] onto the same fixed set of cells. No cells are
//! created or dropped at export time.

use fdbmon_metrics::{MetricRegistry, RegistryError};

use crate::snapshot::StatusSnapshot;

// ── Gauge names ─────────────────────────────────────────────────────────────

/// Number of clients connected to the cluster.
pub const CLIENT_COUNT: &str = "fdb_client_count";

/// Data sizes in bytes, split by `usage_type`.
pub const DATA_SIZE_BYTES: &str = "fdb_database_data_size_bytes";

/// Probe transaction latencies in seconds, split by `probe`.
pub const LATENCY_PROBE: &str = "fdb_latency_probe";

/// Number of data partitions.
pub const PARTITION_COUNT: &str = "fdb_partition_count";

/// Boolean health flags as 0/1 gauges, split by `state`.
pub const DATABASE_STATUS: &str = "fdb_database_status";

// ── Label keys ──────────────────────────────────────────────────────────────

pub const LABEL_USAGE_TYPE: &str = "usage_type";
pub const LABEL_PROBE: &str = "probe";
pub const LABEL_STATE: &str = "state";

// ── Label values ────────────────────────────────────────────────────────────

pub const USAGE_TOTAL_DISK: &str = "totalDisk";
pub const USAGE_TOTAL_KV: &str = "totalKv";
pub const USAGE_SYSTEM_KV: &str = "systemKv";

pub const PROBE_BATCH_PRIORITY_START: &str = "batch_priority_transaction_start_seconds";
pub const PROBE_COMMIT: &str = "commit_seconds";
pub const PROBE_IMMEDIATE_PRIORITY_START: &str = "immediate_priority_transaction_start_seconds";
pub const PROBE_READ: &str = "read_seconds";
pub const PROBE_TRANSACTION_START: &str = "transaction_start_seconds";

pub const STATE_AVAILABLE: &str = "available";
pub const STATE_HEALTHY: &str = "healthy";
pub const STATE_QUORUM_REACHABLE: &str = "quorum_reachable";
pub const STATE_LOCKED: &str = "locked";

// ── Schema registration ─────────────────────────────────────────────────────

/// Register the full status gauge schema.
///
/// Called exactly once while the registry is still being built. All cells
/// start at zero and keep their registration order for exposition.
pub fn register_status_schema(registry: &mut MetricRegistry) -> Result<(), RegistryError> {
    registry.register_gauge(CLIENT_COUNT, "number of connected clients")?;
    registry.register_gauge_vec(
        DATA_SIZE_BYTES,
        "number of data bytes used",
        LABEL_USAGE_TYPE,
        &[USAGE_TOTAL_DISK, USAGE_TOTAL_KV, USAGE_SYSTEM_KV],
    )?;
    registry.register_gauge_vec(
        LATENCY_PROBE,
        "latency values based on running sample transactions",
        LABEL_PROBE,
        &[
            PROBE_BATCH_PRIORITY_START,
            PROBE_COMMIT,
            PROBE_IMMEDIATE_PRIORITY_START,
            PROBE_READ,
            PROBE_TRANSACTION_START,
        ],
    )?;
    registry.register_gauge(PARTITION_COUNT, "number of fdb partitions")?;
    registry.register_gauge_vec(
        DATABASE_STATUS,
        "state of the database",
        LABEL_STATE,
        &[
            STATE_AVAILABLE,
            STATE_HEALTHY,
            STATE_QUORUM_REACHABLE,
            STATE_LOCKED,
        ],
    )?;
    Ok(())
}

// ── Export ──────────────────────────────────────────────────────────────────

/// Export one decoded snapshot into the registry.
///
/// The mapping is total and deterministic: every snapshot field lands in
/// exactly one gauge cell, booleans as 1.0/0.0. All writes have completed
/// by the time this returns, so a scrape that follows sees the full
/// snapshot. An error means the registry schema does not match this module,
/// which is a wiring bug, not a runtime condition.
pub fn export_snapshot(
    snapshot: &StatusSnapshot,
    registry: &MetricRegistry,
) -> Result<(), RegistryError> {
    let cluster = &snapshot.cluster;
    let client = &snapshot.client;

    registry.set(CLIENT_COUNT, cluster.clients.count as f64)?;

    registry.set_labeled(
        DATA_SIZE_BYTES,
        USAGE_TOTAL_DISK,
        cluster.data.total_disk_used_bytes as f64,
    )?;
    registry.set_labeled(
        DATA_SIZE_BYTES,
        USAGE_TOTAL_KV,
        cluster.data.total_kv_size_bytes as f64,
    )?;
    registry.set_labeled(
        DATA_SIZE_BYTES,
        USAGE_SYSTEM_KV,
        cluster.data.system_kv_size_bytes as f64,
    )?;

    registry.set_labeled(
        LATENCY_PROBE,
        PROBE_BATCH_PRIORITY_START,
        cluster.latency_probe.batch_priority_transaction_start_seconds,
    )?;
    registry.set_labeled(LATENCY_PROBE, PROBE_COMMIT, cluster.latency_probe.commit_seconds)?;
    registry.set_labeled(
        LATENCY_PROBE,
        PROBE_IMMEDIATE_PRIORITY_START,
        cluster.latency_probe.immediate_priority_transaction_start_seconds,
    )?;
    registry.set_labeled(LATENCY_PROBE, PROBE_READ, cluster.latency_probe.read_seconds)?;
    registry.set_labeled(
        LATENCY_PROBE,
        PROBE_TRANSACTION_START,
        cluster.latency_probe.transaction_start_seconds,
    )?;

    registry.set(PARTITION_COUNT, cluster.data.partitions_count as f64)?;

    registry.set_labeled(
        DATABASE_STATUS,
        STATE_AVAILABLE,
        bool_gauge(client.database_status.available),
    )?;
    registry.set_labeled(
        DATABASE_STATUS,
        STATE_HEALTHY,
        bool_gauge(client.database_status.healthy),
    )?;
    registry.set_labeled(
        DATABASE_STATUS,
        STATE_QUORUM_REACHABLE,
        bool_gauge(client.coordinators.quorum_reachable),
    )?;
    registry.set_labeled(DATABASE_STATUS, STATE_LOCKED, bool_gauge(cluster.database_locked))?;

    Ok(())
}

fn bool_gauge(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// ── Tests ───────────────────────────────────────────────────────────────────
