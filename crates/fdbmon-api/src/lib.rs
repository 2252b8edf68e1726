//! fdbmon-api — the exporter's HTTP surface.
//!
//! One pull-based endpoint: scrapers GET `/metrics` and receive the current
//! registry contents in Prometheus text exposition format. Scrapes never
//! touch the status store; they read whatever the refresh loop last
//! published, so a scrape during a store outage still answers with the
//! last good values.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use fdbmon_metrics::MetricRegistry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<MetricRegistry>,
}

/// Build the exporter router.
pub fn build_router(registry: Arc<MetricRegistry>) -> Router {
    let state = ApiState { registry };

    Router::new().route("/metrics", get(handlers::prometheus_metrics).with_state(state))
}
