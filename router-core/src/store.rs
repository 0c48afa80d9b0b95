//! The three datastore abstractions, grounded on the original's
//! `core/repositories/datastore.py`. The in-memory implementations here
//! are the mandatory baseline every test in this workspace runs against;
//! external backends (Redis, Postgres) implement the same traits from
//! outside this crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RouterResult;

/// High-speed key-based storage. Used for dimensioned performance records
/// and for pre-calculated routes keyed by subscription id.
#[async_trait]
pub trait KeyValueStore<T>: Send + Sync
where
    T: Send + Sync,
{
    async fn set(&self, key: String, value: T) -> RouterResult<()>;
    async fn get(&self, key: &str) -> RouterResult<Option<T>>;
    async fn delete(&self, key: &str) -> RouterResult<bool>;
    async fn values(&self) -> RouterResult<Vec<T>>;

    /// Read-modify-write a single key as one critical section: `f` sees
    /// the current value (`None` if absent) and its return value becomes
    /// the new one. Callers whose update depends on the prior value must
    /// use this instead of a separate `get` then `set`, since two
    /// concurrent `get`-then-`set` pairs on the same key can both read the
    /// same starting value and then each overwrite the other's write.
    async fn update_with(
        &self,
        key: String,
        f: Box<dyn FnOnce(Option<T>) -> T + Send>,
    ) -> RouterResult<()>;
}

/// Consistent, queryable storage for entities addressed by a stable id.
#[async_trait]
pub trait RelationalStore<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Upsert semantics: replaces any existing row with the same id.
    async fn save(&self, id: String, entity: T) -> RouterResult<T>;
    async fn find_by_id(&self, id: &str) -> RouterResult<Option<T>>;
    async fn query(&self, predicate: &(dyn Fn(&T) -> bool + Send + Sync)) -> RouterResult<Vec<T>>;
    async fn list_all(&self) -> RouterResult<Vec<T>>;
}

/// Write-heavy append-only storage for ingestion-style logs.
#[async_trait]
pub trait LogAppendStore<T>: Send + Sync
where
    T: Send + Sync,
{
    async fn append(&self, record: T) -> RouterResult<()>;
    async fn batch_append(&self, records: Vec<T>) -> RouterResult<()>;
    /// The `count` most recently appended records, newest first.
    async fn fetch_recent(&self, count: usize) -> RouterResult<Vec<T>>;
}

/// In-memory `KeyValueStore`. Writes to a given key are serialized by the
/// lock; reads of different keys never contend on iteration because
/// `values()` takes its own snapshot under a single read lock.
#[derive(Debug)]
pub struct InMemoryKeyValueStore<T> {
    data: RwLock<HashMap<String, T>>,
}

impl<T> Default for InMemoryKeyValueStore<T> {
    fn default() -> Self {
        InMemoryKeyValueStore {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> InMemoryKeyValueStore<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl<T> KeyValueStore<T> for InMemoryKeyValueStore<T>
where
    T: Clone + Send + Sync,
{
    async fn set(&self, key: String, value: T) -> RouterResult<()> {
        self.data.write().await.insert(key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> RouterResult<Option<T>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> RouterResult<bool> {
        Ok(self.data.write().await.remove(key).is_some())
    }

    async fn values(&self) -> RouterResult<Vec<T>> {
        Ok(self.data.read().await.values().cloned().collect())
    }

    async fn update_with(
        &self,
        key: String,
        f: Box<dyn FnOnce(Option<T>) -> T + Send>,
    ) -> RouterResult<()> {
        let mut guard = self.data.write().await;
        let current = guard.remove(&key);
        guard.insert(key, f(current));
        Ok(())
    }
}

/// In-memory `RelationalStore`.
#[derive(Debug)]
pub struct InMemoryRelationalStore<T> {
    data: RwLock<HashMap<String, T>>,
}

impl<T> Default for InMemoryRelationalStore<T> {
    fn default() -> Self {
        InMemoryRelationalStore {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> InMemoryRelationalStore<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl<T> RelationalStore<T> for InMemoryRelationalStore<T>
where
    T: Clone + Send + Sync,
{
    async fn save(&self, id: String, entity: T) -> RouterResult<T> {
        self.data.write().await.insert(id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: &str) -> RouterResult<Option<T>> {
        Ok(self.data.read().await.get(id).cloned())
    }

    async fn query(&self, predicate: &(dyn Fn(&T) -> bool + Send + Sync)) -> RouterResult<Vec<T>> {
        Ok(self
            .data
            .read()
            .await
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> RouterResult<Vec<T>> {
        Ok(self.data.read().await.values().cloned().collect())
    }
}

/// In-memory `LogAppendStore`.
#[derive(Debug)]
pub struct InMemoryLogAppendStore<T> {
    data: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryLogAppendStore<T> {
    fn default() -> Self {
        InMemoryLogAppendStore {
            data: RwLock::new(Vec::new()),
        }
    }
}

impl<T> InMemoryLogAppendStore<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl<T> LogAppendStore<T> for InMemoryLogAppendStore<T>
where
    T: Clone + Send + Sync,
{
    async fn append(&self, record: T) -> RouterResult<()> {
        self.data.write().await.push(record);
        Ok(())
    }

    async fn batch_append(&self, records: Vec<T>) -> RouterResult<()> {
        self.data.write().await.extend(records);
        Ok(())
    }

    async fn fetch_recent(&self, count: usize) -> RouterResult<Vec<T>> {
        let data = self.data.read().await;
        Ok(data.iter().rev().take(count).cloned().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn key_value_store_set_get_delete_round_trips() {
        let store: Arc<InMemoryKeyValueStore<u32>> = InMemoryKeyValueStore::new();
        store.set("a".to_string(), 1).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(1));
        assert!(store.delete("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn key_value_store_update_with_sees_the_prior_value() {
        let store: Arc<InMemoryKeyValueStore<Vec<u32>>> = InMemoryKeyValueStore::new();
        store
            .update_with("a".to_string(), Box::new(|current| {
                let mut bucket = current.unwrap_or_default();
                bucket.push(1);
                bucket
            }))
            .await
            .unwrap();
        store
            .update_with("a".to_string(), Box::new(|current| {
                let mut bucket = current.unwrap_or_default();
                bucket.push(2);
                bucket
            }))
            .await
            .unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn relational_store_save_upserts() {
        let store: Arc<InMemoryRelationalStore<&'static str>> = InMemoryRelationalStore::new();
        store.save("id1".to_string(), "first").await.unwrap();
        store.save("id1".to_string(), "second").await.unwrap();
        assert_eq!(store.find_by_id("id1").await.unwrap(), Some("second"));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn log_append_store_fetch_recent_is_newest_first() {
        let store: Arc<InMemoryLogAppendStore<u32>> = InMemoryLogAppendStore::new();
        store.batch_append(vec![1, 2, 3]).await.unwrap();
        assert_eq!(store.fetch_recent(2).await.unwrap(), vec![3, 2]);
    }
}
