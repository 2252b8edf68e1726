//! fdbmond — the fdb metrics exporter daemon.
//!
//! Single binary that assembles the exporter:
//! - Status store (redb)
//! - Gauge registry with the fixed status schema
//! - Refresh scheduler
//! - Scrape endpoint
//!
//! # Usage
//!
//! ```text
//! FDB_STATUS_DB=/var/fdb/data/status.db FDB_METRICS_EVERY=10 fdbmond
//! ```

mod config;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use fdbmon_metrics::MetricRegistry;
use fdbmon_status::{RefreshScheduler, register_status_schema};
use fdbmon_store::{ApiVersion, StatusStore};

use config::ExporterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fdbmond=debug,fdbmon=debug".parse().unwrap()),
        )
        .init();

    let config = ExporterConfig::from_env()?;
    run(config).await
}

async fn run(config: ExporterConfig) -> anyhow::Result<()> {
    info!("fdb metrics exporter starting");

    let api_version = ApiVersion::select(config.api_version)?;
    info!(version = api_version.get(), "store api version selected");

    // ── Attach the status store ────────────────────────────────

    if let Some(parent) = config.status_db.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = StatusStore::open(&config.status_db)?;
    info!(path = ?config.status_db, "status store attached");

    // ── Register the gauge schema ──────────────────────────────

    let mut registry = MetricRegistry::default();
    register_status_schema(&mut registry)?;
    let registry = Arc::new(registry);
    info!(
        instruments = registry.families().len(),
        "gauge schema registered"
    );

    // ── Start the refresh loop ─────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = RefreshScheduler::new(store, registry.clone(), config.refresh_interval)
        .with_export_enabled(config.export_enabled);
    let refresh_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    // ── Start the scrape endpoint ──────────────────────────────

    let router = fdbmon_api::build_router(registry);

    info!(addr = %config.listen, "scrape endpoint starting");

    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    // Wait for the refresh loop to wind down.
    let _ = refresh_handle.await;

    info!("fdb metrics exporter stopped");
    Ok(())
}
