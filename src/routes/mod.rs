use axum::Router;

use crate::{Config, SoilEngine};

mod analysis;
mod health;

// ---

/// Build the service router with the engine and configuration as shared state.
pub fn router(engine: SoilEngine, config: Config) -> Router {
    // ---
    Router::new()
        .merge(analysis::router())
        .merge(health::router())
        .with_state((engine, config))
}
