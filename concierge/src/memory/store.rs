//! Store trait and StoreError.
//!
//! Long-term, cross-thread key-value memory. Values are JSON.

use async_trait::async_trait;

/// Namespace path, e.g. `["memory_profile", "42"]`.
pub type Namespace = Vec<String>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// JSON serialization/deserialization failed.
    #[error("serialization: {0}")]
    Serialization(String),

    /// Backend storage error.
    #[error("storage: {0}")]
    Storage(String),
}

/// Long-term memory store.
///
/// **Interaction**: Shared as `Arc<dyn Store>` by the memory nodes of the music-store graph.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts or replaces the value under `(namespace, key)`.
    async fn put(
        &self,
        namespace: &Namespace,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Reads the value under `(namespace, key)`.
    async fn get(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError>;

    /// Lists keys in exactly this namespace, sorted.
    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError>;
}
