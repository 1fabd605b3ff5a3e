//! Development HTTP server for concierge graphs (axum).
//!
//! Listens on http://127.0.0.1:2024 by default:
//!
//! - `GET /ok`
//! - `GET /assistants`, `GET /assistants/:assistant_id/tools`
//! - `POST /threads`, `GET /threads/:thread_id/state`
//! - `POST /runs/wait`
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`].

mod app;
mod request;
mod response;
mod routes;

use std::sync::Arc;

use concierge::GraphRegistry;
use tokio::net::TcpListener;
use tracing::info;

pub use app::{router, AppState};
pub use request::{InputMessage, RunInput, RunRequest};
pub use response::ApiError;

pub const DEFAULT_ADDR: &str = "127.0.0.1:2024";

/// Serves on an existing listener until Ctrl-C. Tests bind `127.0.0.1:0` and pass the listener.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("concierge server listening on http://{}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;
    Ok(())
}

/// Binds `addr` (default [`DEFAULT_ADDR`]) and serves the registry's graphs.
pub async fn run_serve(
    addr: Option<&str>,
    registry: Arc<GraphRegistry>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, Arc::new(AppState::new(registry))).await
}
