//! In-memory Store. Not persistent.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::memory::store::{Namespace, Store, StoreError};

/// In-memory Store keyed by `(namespace, key)`.
///
/// ## Example
///
/// ```rust,ignore
/// use concierge::memory::{InMemoryStore, Store};
///
/// let store = InMemoryStore::new();
/// store.put(&vec!["memory_profile".into(), "1".into()], "user_memory", &json!({})).await?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<(Namespace, String), serde_json::Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn put(
        &self,
        namespace: &Namespace,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .insert((namespace.clone(), key.to_string()), value.clone());
        Ok(())
    }

    async fn get(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .get(&(namespace.clone(), key.to_string()))
            .cloned())
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, k)| k.clone())
            .collect())
    }
}
