//! The decoded status document model.
//!
//! The cluster publishes a single JSON document describing its health. This
//! module owns the typed shape of that document and the strict decode step
//! that turns raw bytes into a [`StatusSnapshot`]. Every field the exporter
//! maps is required; a document missing any of them is rejected whole, so a
//! half-written blob can never leak partial values into the gauges. Fields
//! the exporter does not map are ignored wherever they appear.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────────────

/// Error decoding a raw status document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed status document: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Document model ──────────────────────────────────────────────────────────

/// One decoded status document.
///
/// The document has two top-level sections: `cluster` is written by the
/// cluster itself, `client` reflects what the reporting client observed
/// while producing the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    pub cluster: ClusterStatus,
    pub client: ClientStatus,
}

/// The `cluster` section: workload, data distribution, and probe latencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterStatus {
    pub clients: ClientConnections,
    pub data: DataMetrics,
    /// Whether the database is administratively locked.
    pub database_locked: bool,
    pub latency_probe: LatencyProbe,
}

/// Connected-client workload counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConnections {
    pub count: u64,
}

/// Data distribution sizes and partition count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataMetrics {
    pub total_disk_used_bytes: u64,
    pub total_kv_size_bytes: u64,
    pub system_kv_size_bytes: u64,
    pub partitions_count: u64,
}

/// Latencies measured by sample transactions, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatencyProbe {
    pub read_seconds: f64,
    pub commit_seconds: f64,
    pub transaction_start_seconds: f64,
    pub batch_priority_transaction_start_seconds: f64,
    pub immediate_priority_transaction_start_seconds: f64,
}

/// The `client` section: reachability as seen by the reporting client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientStatus {
    pub database_status: DatabaseStatus,
    pub coordinators: Coordinators,
}

/// Availability and health flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseStatus {
    pub available: bool,
    pub healthy: bool,
}

/// Coordinator quorum reachability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinators {
    pub quorum_reachable: bool,
}

impl StatusSnapshot {
    /// Decode a raw status document.
    ///
    /// Decoding is strict: every mapped field must be present with the right
    /// type, and the whole document is rejected on the first mismatch.
    /// Decoding has no side effects, so a rejected blob leaves previously
    /// exported values untouched.
    pub fn decode(blob: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(blob)?)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn full_doc() -> serde_json::Value {
        serde_json::json!({
            "cluster": {
                "clients": { "count": 5 },
                "data": {
                    "total_disk_used_bytes": 1000,
                    "total_kv_size_bytes": 400,
                    "system_kv_size_bytes": 40,
                    "partitions_count": 3
                },
                "database_locked": false,
                "latency_probe": {
                    "read_seconds": 0.002,
                    "commit_seconds": 0.01,
                    "transaction_start_seconds": 0.001,
                    "batch_priority_transaction_start_seconds": 0.003,
                    "immediate_priority_transaction_start_seconds": 0.0005
                }
            },
            "client": {
                "database_status": { "available": true, "healthy": true },
                "coordinators": { "quorum_reachable": true }
            }
        })
    }

    #[test]
    fn decode_full_document() {
        let blob = serde_json::to_vec(&full_doc()).unwrap();
        let snapshot = StatusSnapshot::decode(&blob).unwrap();

        assert_eq!(snapshot.cluster.clients.count, 5);
        assert_eq!(snapshot.cluster.data.total_disk_used_bytes, 1000);
        assert_eq!(snapshot.cluster.data.total_kv_size_bytes, 400);
        assert_eq!(snapshot.cluster.data.system_kv_size_bytes, 40);
        assert_eq!(snapshot.cluster.data.partitions_count, 3);
        assert!(!snapshot.cluster.database_locked);
        assert_eq!(snapshot.cluster.latency_probe.read_seconds, 0.002);
        assert_eq!(snapshot.cluster.latency_probe.commit_seconds, 0.01);
        assert_eq!(
            snapshot
                .cluster
                .latency_probe
                .immediate_priority_transaction_start_seconds,
            0.0005
        );
        assert!(snapshot.client.database_status.available);
        assert!(snapshot.client.database_status.healthy);
        assert!(snapshot.client.coordinators.quorum_reachable);
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = StatusSnapshot::decode(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(StatusSnapshot::decode(b"").is_err());
    }

    #[test]
    fn decode_rejects_missing_field() {
        let mut doc = full_doc();
        doc["cluster"]["data"]
            .as_object_mut()
            .unwrap()
            .remove("partitions_count");
        let blob = serde_json::to_vec(&doc).unwrap();

        assert!(StatusSnapshot::decode(&blob).is_err());
    }

    #[test]
    fn decode_rejects_missing_section() {
        let mut doc = full_doc();
        doc.as_object_mut().unwrap().remove("client");
        let blob = serde_json::to_vec(&doc).unwrap();

        assert!(StatusSnapshot::decode(&blob).is_err());
    }

    #[test]
    fn decode_rejects_wrong_type() {
        let mut doc = full_doc();
        doc["cluster"]["clients"]["count"] = serde_json::json!("five");
        let blob = serde_json::to_vec(&doc).unwrap();

        assert!(StatusSnapshot::decode(&blob).is_err());
    }

    #[test]
    fn decode_rejects_negative_count() {
        let mut doc = full_doc();
        doc["cluster"]["clients"]["count"] = serde_json::json!(-1);
        let blob = serde_json::to_vec(&doc).unwrap();

        assert!(StatusSnapshot::decode(&blob).is_err());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let mut doc = full_doc();
        doc["cluster"]["messages"] = serde_json::json!([{"name": "unreachable_process"}]);
        doc["extra_section"] = serde_json::json!({"future": true});
        let blob = serde_json::to_vec(&doc).unwrap();

        let snapshot = StatusSnapshot::decode(&blob).unwrap();
        assert_eq!(snapshot.cluster.clients.count, 5);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let blob = serde_json::to_vec(&full_doc()).unwrap();
        let snapshot = StatusSnapshot::decode(&blob).unwrap();
        let re_encoded = serde_json::to_vec(&snapshot).unwrap();

        assert_eq!(StatusSnapshot::decode(&re_encoded).unwrap(), snapshot);
    }
}
