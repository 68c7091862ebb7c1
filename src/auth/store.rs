//! Pluggable token persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

/// Key-value persistence for session tokens.
///
/// Implemented by the host application over whatever storage the runtime
/// offers (keychain, local storage, a file). Keys are configured in
/// [`AuthConfig`](crate::config::AuthConfig).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);
    async fn remove(&self, key: &str);
}

/// In-memory store, the default for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    async fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get("authToken").await.is_none());

        store.set("authToken", "t1").await;
        assert_eq!(store.get("authToken").await.as_deref(), Some("t1"));

        store.remove("authToken").await;
        assert!(store.get("authToken").await.is_none());
    }
}
