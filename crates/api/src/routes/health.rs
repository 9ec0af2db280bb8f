use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use estoque_db::{Collection, Query};

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the record store is reachable.
    pub store_healthy: bool,
}

/// GET /health -- returns service and record-store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // A cheap read is the store liveness probe.
    let store_healthy = state
        .store
        .list(Collection::Empresas, &Query::default())
        .await
        .is_ok();

    let status = if store_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
