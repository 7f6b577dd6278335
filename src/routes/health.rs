// src/routes/health.rs
//! Liveness endpoint for the agro-health service.
//!
//! Used by container orchestrators and CI to verify that the process is up
//! and answering HTTP. It is a sibling module in the `routes` directory and
//! exports only a subrouter to the gateway (`mod.rs`), which merges it into
//! the top-level API router.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Handle `GET /health`.
///
/// Never touches the alert dispatcher, so it stays cheap under load.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it merges with the gateway router
/// regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
