//! Item store seam: the four key-value operations the handler needs, plus an in-memory backend.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Partition key attribute of every item.
pub const PARTITION_KEY: &str = "pk";

/// Schemaless item: a JSON object carrying a string `pk`.
pub type Item = Map<String, Value>;

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, pk: &str) -> Result<Option<Item>, StoreError>;
    /// Every item in the table, following backend pagination to the end.
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;
    /// Upsert. Last write wins.
    async fn put(&self, item: Item) -> Result<(), StoreError>;
    /// Deleting an absent key is not an error.
    async fn delete(&self, pk: &str) -> Result<(), StoreError>;
}

pub(crate) fn partition_key(item: &Item) -> Result<&str, StoreError> {
    item.get(PARTITION_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Conversion(format!("item has no string '{}'", PARTITION_KEY)))
}

/// Process-local store, keyed by `pk`. Used by the local server and tests.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn get(&self, pk: &str) -> Result<Option<Item>, StoreError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(pk).cloned())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.values().cloned().collect())
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let pk = partition_key(&item)?.to_string();
        self.items.write().map_err(poisoned)?.insert(pk, item);
        Ok(())
    }

    async fn delete(&self, pk: &str) -> Result<(), StoreError> {
        self.items.write().map_err(poisoned)?.remove(pk);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn put_overwrites_whole_item() {
        let store = MemoryItemStore::new();
        store.put(item(json!({ "pk": "1", "a": 1, "b": 2 }))).await.unwrap();
        store.put(item(json!({ "pk": "1", "a": 3 }))).await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), Some(item(json!({ "pk": "1", "a": 3 }))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_is_ok() {
        let store = MemoryItemStore::new();
        store.delete("nope").await.unwrap();
        assert!(store.is_empty());
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_without_pk_is_rejected() {
        let store = MemoryItemStore::new();
        let err = store.put(item(json!({ "name": "x" }))).await.unwrap_err();
        assert!(matches!(err, StoreError::Conversion(_)));
    }
}
