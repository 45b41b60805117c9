//! Typed views over store subscriptions.

use seedbook_core::{Customer, CustomerSheet};
use seedbook_record::RecordResult;
use serde_json::Value;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::store::Subscription;

type Decoder<T> = fn(Option<&str>, &Value) -> RecordResult<T>;

/// A subscription whose documents are decoded into `T`.
///
/// Each published list replaces the previous one wholesale. Documents that
/// cannot be decoded are skipped with a warning.
pub struct RecordStream<T> {
    receiver: Subscription,
    decode: Decoder<T>,
}

pub type SheetStream = RecordStream<CustomerSheet>;
pub type CustomerStream = RecordStream<Customer>;

impl<T> RecordStream<T> {
    pub(crate) fn new(receiver: Subscription, decode: Decoder<T>) -> Self {
        Self { receiver, decode }
    }

    /// The latest list, marking it as seen
    pub fn current(&mut self) -> Vec<T> {
        let docs = self.receiver.borrow_and_update().clone();
        decode_all(&docs, self.decode)
    }

    /// Wait for the next change and return the new list
    pub async fn next(&mut self) -> StoreResult<Vec<T>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::SubscriptionClosed)?;
        Ok(self.current())
    }

    /// Whether a change arrived that [`RecordStream::current`] has not returned yet
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}

pub(crate) fn decode_all<T>(docs: &[Document], decode: Decoder<T>) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match decode(Some(&doc.id), &doc.body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}
