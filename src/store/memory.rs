//! In-memory store for tests and development

use crate::error::CartResult;
use crate::store::CartStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// HashMap-backed store. Clone-friendly via `Arc`, never fails.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn get(&self, key: &str) -> CartResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> CartResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_absent_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart:products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        store.set("cart:products", b"[]".to_vec()).await.unwrap();
        assert_eq!(
            store.get("cart:products").await.unwrap(),
            Some(b"[]".to_vec())
        );
    }

    #[tokio::test]
    async fn set_replaces_previous_blob() {
        let store = MemoryStore::new();
        store.set("cart:products", b"old".to_vec()).await.unwrap();
        store.set("cart:products", b"new".to_vec()).await.unwrap();
        assert_eq!(
            store.get("cart:products").await.unwrap(),
            Some(b"new".to_vec())
        );
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("cart:products", b"[]".to_vec()).await.unwrap();
        assert!(other.get("cart:products").await.unwrap().is_some());
    }
}
