//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Probe response.
#[derive(Serialize)]
pub struct ProbeResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

const fn probe(status: &'static str) -> ProbeResponse {
    ProbeResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// Liveness: the process is up and serving requests.
async fn health_check() -> Json<ProbeResponse> {
    Json(probe("healthy"))
}

/// Readiness: the database answers a ping.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ProbeResponse>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(probe("ready"))),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, Json(probe("degraded"))),
    }
}

/// Creates the probe routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}
