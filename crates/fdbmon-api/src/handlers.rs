//! Scrape handler.
//!
//! Renders the shared registry on demand. Rendering reads each gauge cell
//! atomically, so a scrape racing the refresh loop sees a mix of old and
//! new values at worst, never a torn one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::trace;

use fdbmon_metrics::render_prometheus;

use crate::ApiState;

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = render_prometheus(&state.registry);
    trace!(bytes = body.len(), "metrics scraped");
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
