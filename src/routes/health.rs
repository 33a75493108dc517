// src/routes/health.rs
//! Liveness endpoint for the analysis service.
//!
//! Container orchestrators and CI probe `/health` to confirm the process is
//! up and answering HTTP. The gateway (`mod.rs`) merges this subrouter into
//! the top-level router, so `main.rs` never sees individual endpoints.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Rule set the engine runs.
    engine: &'static str,
}

/// Handle `GET /health`. Does not run the engine.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        engine: "tier_a",
    })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it merges into the gateway router
/// whatever the state type is.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
