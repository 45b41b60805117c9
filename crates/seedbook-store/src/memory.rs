//! In-process document store.
//!
//! `MemoryStore` behaves like the hosted backend as far as seedbook can tell:
//! ids are assigned on create, lists honour filters and ordering, and
//! subscribers see a fresh result list after every write. It can be switched
//! offline to exercise the error paths of the layers above it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::document::{Document, Query};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Subscription};

/// Length of generated document ids
const ID_LEN: usize = 20;

struct Entry {
    seq: u64,
    body: Value,
}

struct Watcher {
    query: Query,
    sender: watch::Sender<Vec<Document>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, HashMap<String, Entry>>,
    watchers: Vec<Watcher>,
}

impl Inner {
    fn run_query(&self, query: &Query) -> Vec<Document> {
        let Some(collection) = self.collections.get(&query.collection) else {
            return Vec::new();
        };

        let mut entries: Vec<(&String, &Entry)> = collection.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);

        let mut docs: Vec<Document> = entries
            .into_iter()
            .map(|(id, entry)| Document::new(id.clone(), entry.body.clone()))
            .filter(|doc| query.matches(doc))
            .collect();
        query.sort(&mut docs);
        docs
    }

    fn notify(&mut self, collection: &str) {
        self.watchers.retain(|w| !w.sender.is_closed());

        let updates: Vec<(usize, Vec<Document>)> = self
            .watchers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.query.collection == collection)
            .map(|(i, w)| (i, self.run_query(&w.query)))
            .collect();

        for (i, docs) in updates {
            self.watchers[i].sender.send_replace(docs);
        }
    }
}

/// A [`DocumentStore`] kept entirely in memory.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    online: AtomicBool,
    seq: AtomicU64,
    latency: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            online: AtomicBool::new(true),
            seq: AtomicU64::new(1),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`, like a round trip to a remote backend
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Simulate losing (or regaining) the connection
    pub fn set_online(&self, online: bool) {
        tracing::info!(online, "memory store connectivity changed");
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .await
            .collections
            .get(collection)
            .map_or(0, HashMap::len)
    }

    async fn round_trip(&self) -> StoreResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.is_online() {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store is offline".into()))
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

fn require_object(collection: &str, body: &Value) -> StoreResult<()> {
    if body.is_object() {
        Ok(())
    } else {
        Err(StoreError::Rejected(format!(
            "{collection}: document body must be an object"
        )))
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, body: Value) -> StoreResult<String> {
        self.round_trip().await?;
        require_object(collection, &body)?;

        let id = generate_id();
        let seq = self.next_seq();
        let mut inner = self.inner.lock().await;
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), Entry { seq, body });
        inner.notify(collection);

        tracing::debug!(collection, id = %id, "created document");
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, body: Value) -> StoreResult<()> {
        self.round_trip().await?;
        require_object(collection, &body)?;

        let mut inner = self.inner.lock().await;
        let entry = inner
            .collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        entry.body = body;
        inner.notify(collection);

        tracing::debug!(collection, id, "updated document");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.round_trip().await?;

        let mut inner = self.inner.lock().await;
        let removed = inner
            .collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();
        if removed {
            inner.notify(collection);
            tracing::debug!(collection, id, "deleted document");
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.round_trip().await?;

        let inner = self.inner.lock().await;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|entry| Document::new(id, entry.body.clone())))
    }

    async fn list(&self, query: &Query) -> StoreResult<Vec<Document>> {
        self.round_trip().await?;
        Ok(self.inner.lock().await.run_query(query))
    }

    async fn subscribe(&self, query: &Query) -> StoreResult<Subscription> {
        self.round_trip().await?;

        let mut inner = self.inner.lock().await;
        let (sender, receiver) = watch::channel(inner.run_query(query));
        inner.watchers.push(Watcher {
            query: query.clone(),
            sender,
        });

        tracing::debug!(collection = %query.collection, "subscribed");
        Ok(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let store = MemoryStore::new();

        let id = store.create("plants", json!({"name": "fern"})).await.unwrap();
        assert_eq!(id.len(), ID_LEN);

        let doc = store.get("plants", &id).await.unwrap().unwrap();
        assert_eq!(doc.body, json!({"name": "fern"}));

        store
            .update("plants", &id, json!({"name": "moss"}))
            .await
            .unwrap();
        let doc = store.get("plants", &id).await.unwrap().unwrap();
        assert_eq!(doc.field("name"), Some(&json!("moss")));

        store.delete("plants", &id).await.unwrap();
        assert!(store.get("plants", &id).await.unwrap().is_none());
        // Deleting again is fine
        store.delete("plants", &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update("plants", "nope", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_non_object_body_rejected() {
        let store = MemoryStore::new();
        let err = store.create("plants", json!([1])).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_without_ordering() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.create("plants", json!({"name": name})).await.unwrap();
        }
        let names: Vec<_> = store
            .list(&Query::collection("plants"))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.body["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("a"), json!("b"), json!("c")]);
        assert_eq!(store.len("plants").await, 3);
    }

    #[tokio::test]
    async fn test_offline() {
        let store = MemoryStore::new();
        store.set_online(false);
        let err = store.create("plants", json!({})).await.unwrap_err();
        assert!(err.is_retryable());

        store.set_online(true);
        assert!(store.create("plants", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_subscription_sees_writes() {
        let store = MemoryStore::new();
        let query = Query::collection("plants").where_eq("owner", "x");
        let mut sub = store.subscribe(&query).await.unwrap();
        assert!(sub.borrow_and_update().is_empty());

        store
            .create("plants", json!({"owner": "y"}))
            .await
            .unwrap();
        let id = store
            .create("plants", json!({"owner": "x"}))
            .await
            .unwrap();

        sub.changed().await.unwrap();
        let docs = sub.borrow_and_update().clone();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);

        store.delete("plants", &id).await.unwrap();
        sub.changed().await.unwrap();
        assert!(sub.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let store = MemoryStore::new();
        let sub = store.subscribe(&Query::collection("plants")).await.unwrap();
        drop(sub);
        store.create("plants", json!({})).await.unwrap();
        assert!(store.inner.lock().await.watchers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency() {
        let store = MemoryStore::new().with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        store.create("plants", json!({})).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
