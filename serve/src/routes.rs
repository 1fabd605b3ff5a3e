//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use concierge::RunnableConfig;
use serde_json::{json, Value};

use super::app::AppState;
use super::request::RunRequest;
use super::ApiError;

pub(crate) async fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Configured graphs: `[{"assistant_id": ..., "graph": <builder>}]`.
pub(crate) async fn list_assistants(State(state): State<Arc<AppState>>) -> Json<Value> {
    let assistants: Vec<Value> = state
        .registry
        .entries()
        .map(|(name, builder)| json!({ "assistant_id": name, "graph": builder.as_str() }))
        .collect();
    Json(Value::Array(assistants))
}

pub(crate) async fn assistant_tools(
    State(state): State<Arc<AppState>>,
    Path(assistant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let graph = state.registry.get(&assistant_id)?;
    let tools = graph
        .list_tools()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(json!(tools)))
}

pub(crate) async fn create_thread() -> (StatusCode, Json<Value>) {
    let thread_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(thread_id = %thread_id, "thread created");
    (StatusCode::CREATED, Json(json!({ "thread_id": thread_id })))
}

pub(crate) async fn thread_state(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let saved = state
        .registry
        .thread_state(&thread_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("no state for thread {}", thread_id)))?;
    Ok(Json(json!({ "thread_id": thread_id, "values": saved })))
}

/// Runs one turn and waits for the final state.
pub(crate) async fn run_wait(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    let graph = state.registry.get(&request.assistant_id)?;
    let input = request.input.into_messages()?;
    let thread_id = request
        .thread_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let config = RunnableConfig {
        thread_id: Some(thread_id.clone()),
        customer_id: request.customer_id,
        recursion_limit: request.recursion_limit.unwrap_or(state.recursion_limit),
        ..RunnableConfig::default()
    };

    tracing::info!(assistant = %request.assistant_id, thread_id = %thread_id, "run started");
    let final_state = graph
        .run(input, config)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    tracing::info!(thread_id = %thread_id, messages = final_state.messages.len(), "run finished");

    Ok(Json(json!({
        "thread_id": thread_id,
        "reply": final_state.last_nonempty_reply(),
        "state": final_state,
    })))
}
