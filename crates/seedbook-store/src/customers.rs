//! Customer repository.

use std::sync::Arc;

use seedbook_core::Customer;
use seedbook_record::{decode_customer, encode_customer, fields};

use crate::document::Query;
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use crate::stream::{decode_all, CustomerStream};
use crate::CUSTOMERS_COLLECTION;

/// Typed access to customer documents.
pub struct CustomerRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for CustomerRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> CustomerRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn all_query() -> Query {
        Query::collection(CUSTOMERS_COLLECTION).order_by(fields::NAME, false)
    }

    /// Persist a new customer; invalid customers are rejected before writing
    pub async fn create(&self, customer: &Customer) -> StoreResult<Customer> {
        customer.validate()?;
        let body = encode_customer(customer).to_document()?;
        let id = self.store.create(CUSTOMERS_COLLECTION, body).await?;
        tracing::info!(id = %id, "created customer");
        Ok(customer.with_id(id))
    }

    pub async fn update(&self, customer: &Customer) -> StoreResult<()> {
        let id = customer.id().ok_or(StoreError::MissingId)?;
        customer.validate()?;
        let body = encode_customer(customer).to_document()?;
        self.store.update(CUSTOMERS_COLLECTION, id, body).await?;
        tracing::debug!(id, "saved customer");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(CUSTOMERS_COLLECTION, id).await?;
        tracing::info!(id, "deleted customer");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Customer>> {
        match self.store.get(CUSTOMERS_COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode_customer(Some(&doc.id), &doc.body)?)),
            None => Ok(None),
        }
    }

    /// Every customer, sorted by name
    pub async fn list(&self) -> StoreResult<Vec<Customer>> {
        let docs = self.store.list(&Self::all_query()).await?;
        Ok(decode_all(&docs, decode_customer))
    }

    pub async fn watch_all(&self) -> StoreResult<CustomerStream> {
        let receiver = self.store.subscribe(&Self::all_query()).await?;
        Ok(CustomerStream::new(receiver, decode_customer))
    }
}
