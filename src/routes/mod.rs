//! Route gateway: merges every endpoint subrouter and attaches shared state.

use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use crate::{AlertDispatcher, Config};

mod health;
mod readings;
mod reports;

/// State shared by all handlers: the session's alert dispatcher and config.
pub type AppState = (Arc<AlertDispatcher>, Config);

/// JSON body of every `422` response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

// ---

pub fn router(config: Config) -> Router {
    // ---
    let dispatcher = Arc::new(AlertDispatcher::new(
        config.alert_cooldown,
        config.dispatch_mode,
    ));

    Router::new()
        .merge(readings::router())
        .merge(reports::router())
        .merge(health::router())
        .with_state((dispatcher, config))
}
