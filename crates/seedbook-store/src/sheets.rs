//! Sheet repository.

use std::sync::Arc;

use seedbook_core::CustomerSheet;
use seedbook_record::{decode_sheet, encode_sheet_document, fields};

use crate::document::Query;
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use crate::stream::{decode_all, SheetStream};
use crate::SHEETS_COLLECTION;

/// Typed access to sheet documents.
pub struct SheetRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for SheetRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> SheetRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn owner_query(customer_id: &str) -> Query {
        Query::collection(SHEETS_COLLECTION)
            .where_eq(fields::CUSTOMER_ID, customer_id)
            .order_by(fields::UPDATED_AT, true)
    }

    /// Persist a new sheet and return it with its assigned id.
    ///
    /// Sheets with an invalid title are rejected before anything is written.
    pub async fn create(&self, sheet: &CustomerSheet) -> StoreResult<CustomerSheet> {
        sheet.validate()?;
        let body = encode_sheet_document(sheet)?;
        let id = self.store.create(SHEETS_COLLECTION, body).await?;
        tracing::info!(id = %id, customer = sheet.customer_id(), "created sheet");
        Ok(sheet.with_id(id))
    }

    /// Overwrite the stored copy of `sheet`.
    pub async fn update(&self, sheet: &CustomerSheet) -> StoreResult<()> {
        let id = sheet.id().ok_or(StoreError::MissingId)?;
        sheet.validate()?;
        let body = encode_sheet_document(sheet)?;
        self.store.update(SHEETS_COLLECTION, id, body).await?;
        tracing::debug!(id, "saved sheet");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(SHEETS_COLLECTION, id).await?;
        tracing::info!(id, "deleted sheet");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<CustomerSheet>> {
        match self.store.get(SHEETS_COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode_sheet(Some(&doc.id), &doc.body)?)),
            None => Ok(None),
        }
    }

    /// Sheets owned by a customer, most recently edited first
    pub async fn list_for_customer(&self, customer_id: &str) -> StoreResult<Vec<CustomerSheet>> {
        let docs = self.store.list(&Self::owner_query(customer_id)).await?;
        Ok(decode_all(&docs, decode_sheet))
    }

    /// Live list of a customer's sheets
    pub async fn watch_customer(&self, customer_id: &str) -> StoreResult<SheetStream> {
        let receiver = self.store.subscribe(&Self::owner_query(customer_id)).await?;
        Ok(SheetStream::new(receiver, decode_sheet))
    }

    /// Delete every sheet a customer owns, returning how many were removed
    pub async fn delete_for_customer(&self, customer_id: &str) -> StoreResult<usize> {
        let docs = self.store.list(&Self::owner_query(customer_id)).await?;
        for doc in &docs {
            self.store.delete(SHEETS_COLLECTION, &doc.id).await?;
        }
        tracing::info!(customer = customer_id, count = docs.len(), "deleted customer sheets");
        Ok(docs.len())
    }
}
