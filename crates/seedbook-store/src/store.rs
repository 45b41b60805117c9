//! The document store interface.

use std::future::Future;

use serde_json::Value;
use tokio::sync::watch;

use crate::document::{Document, Query};
use crate::error::StoreResult;

/// Live results of a [`Query`]; a new list is published after every change
/// that touches the queried collection.
pub type Subscription = watch::Receiver<Vec<Document>>;

/// The operations seedbook needs from a document database.
///
/// Writes are last-write-wins: `update` replaces the whole body and there is
/// no version check. Every call can fail with
/// [`StoreError::Unavailable`](crate::StoreError::Unavailable) when the
/// backend cannot be reached.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return the id the store assigned to it.
    fn create(
        &self,
        collection: &str,
        body: Value,
    ) -> impl Future<Output = StoreResult<String>> + Send;

    /// Replace the body of an existing document.
    fn update(
        &self,
        collection: &str,
        id: &str,
        body: Value,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Remove a document. Removing a missing document is not an error.
    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Fetch one document.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<Document>>> + Send;

    /// Run a list query once.
    fn list(&self, query: &Query) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    /// Run a list query and keep its results current.
    fn subscribe(&self, query: &Query) -> impl Future<Output = StoreResult<Subscription>> + Send;
}
