//! Checkpointer trait, Checkpoint and CheckpointError.

use async_trait::async_trait;

use super::config::RunnableConfig;

/// Error type for checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// `thread_id` missing from config.
    #[error("thread_id required")]
    ThreadIdRequired,

    /// Backend storage error.
    #[error("storage: {0}")]
    Storage(String),
}

/// Snapshot of graph state for one thread.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    /// Unique checkpoint id (uuid v4).
    pub id: String,
    /// Creation time, RFC 3339.
    pub ts: String,
    pub state: S,
}

impl<S> Checkpoint<S> {
    /// Wraps `state` with a fresh id and the current timestamp.
    pub fn from_state(state: S) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts: chrono::Utc::now().to_rfc3339(),
            state,
        }
    }
}

/// Persists the latest state per thread.
///
/// **Interaction**: Attached via `StateGraph::compile_with_checkpointer`; runners and the
/// HTTP server read the saved state back with `get` to continue a conversation.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Saves the checkpoint for `config.thread_id`; returns the checkpoint id.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError>;

    /// Latest checkpoint for `config.thread_id`.
    async fn get(&self, config: &RunnableConfig) -> Result<Option<Checkpoint<S>>, CheckpointError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_from_state_has_id_and_timestamp() {
        let cp = Checkpoint::from_state(7u32);
        assert!(!cp.id.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&cp.ts).is_ok());
        assert_eq!(cp.state, 7);
    }

    #[test]
    fn checkpoint_error_display() {
        assert!(CheckpointError::ThreadIdRequired
            .to_string()
            .contains("thread_id"));
    }
}
