//! Shared by the runners: build the state for a new turn, continuing the saved thread
//! when a checkpoint exists.

use crate::memory::{CheckpointError, Checkpointer, RunnableConfig};
use crate::message::Message;
use crate::state::AgentState;

/// Loads the thread's last state and appends `input`; starts fresh when there is no
/// checkpointer, no `thread_id` or no saved checkpoint. The customer is left as saved.
pub async fn load_thread(
    checkpointer: Option<&dyn Checkpointer<AgentState>>,
    config: &RunnableConfig,
    input: Vec<Message>,
) -> Result<AgentState, CheckpointError> {
    let saved = match (checkpointer, config.thread_id.as_ref()) {
        (Some(cp), Some(_)) => cp.get(config).await?,
        _ => None,
    };
    let mut state = match saved {
        Some(checkpoint) => {
            tracing::debug!(checkpoint_id = %checkpoint.id, "continuing thread");
            checkpoint.state
        }
        None => AgentState::default(),
    };
    state.begin_turn(input);
    Ok(state)
}

/// [`load_thread`], then `config.customer_id` fills an unset customer. For loops that run
/// behind an already verified caller, such as delegated sub-agents.
pub async fn load_and_append(
    checkpointer: Option<&dyn Checkpointer<AgentState>>,
    config: &RunnableConfig,
    input: Vec<Message>,
) -> Result<AgentState, CheckpointError> {
    let mut state = load_thread(checkpointer, config, input).await?;
    if state.customer_id.is_none() {
        state.customer_id = config.customer_id.clone();
    }
    Ok(state)
}
