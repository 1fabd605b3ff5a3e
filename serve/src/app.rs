//! Axum app: shared state and router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use concierge::GraphRegistry;

use super::routes;

/// Default step limit for runs that do not set one, overridable with `SERVE_RECURSION_LIMIT`.
fn recursion_limit_from_env() -> usize {
    std::env::var("SERVE_RECURSION_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(concierge::memory::DEFAULT_RECURSION_LIMIT)
}

/// Shared state injected into every handler.
pub struct AppState {
    pub registry: Arc<GraphRegistry>,
    /// Step limit used when a run request does not set `recursion_limit`.
    pub recursion_limit: usize,
}

impl AppState {
    pub fn new(registry: Arc<GraphRegistry>) -> Self {
        Self {
            registry,
            recursion_limit: recursion_limit_from_env(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ok", get(routes::ok))
        .route("/assistants", get(routes::list_assistants))
        .route("/assistants/:assistant_id/tools", get(routes::assistant_tools))
        .route("/threads", post(routes::create_thread))
        .route("/threads/:thread_id/state", get(routes::thread_state))
        .route("/runs/wait", post(routes::run_wait))
        .with_state(state)
}
