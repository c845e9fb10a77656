use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::errors::AppResult;

/// String key/value storage holding JSON documents under the logical keys
/// the client has always used (`allUsers`, `userTasks`, ...).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Process-local store, used for `store.backend = "memory"` and in tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("allUsers").await.unwrap(), None);
        assert!(!store.exists("allUsers").await.unwrap());

        store.set("allUsers", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("allUsers").await.unwrap().as_deref(), Some("[]"));
        assert!(store.exists("allUsers").await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store.set("k", "v".into()).await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
