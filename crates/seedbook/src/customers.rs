//! Customer list state.

use std::sync::Arc;

use seedbook_core::Customer;
use seedbook_store::{
    CustomerRepository, CustomerStream, DocumentStore, SheetRepository, StoreResult,
};
use tokio::sync::watch;

use crate::error::user_message;
use crate::loading::{Loading, LoadingGuard};

/// Everything the customers screen renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomersView {
    /// All customers, ordered by name
    pub customers: Vec<Customer>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
}

impl CustomersView {
    /// Customers whose name, phone or notes contain the search term
    pub fn filtered(&self) -> Vec<Customer> {
        let term = self.search.trim();
        self.customers
            .iter()
            .filter(|c| c.matches(term))
            .cloned()
            .collect()
    }
}

impl Loading for CustomersView {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }
}

/// State container for the customers screen
pub struct CustomersState<S> {
    customers: CustomerRepository<S>,
    sheets: SheetRepository<S>,
    view: watch::Sender<CustomersView>,
}

impl<S: DocumentStore + 'static> CustomersState<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (view, _) = watch::channel(CustomersView::default());
        Self {
            customers: CustomerRepository::new(Arc::clone(&store)),
            sheets: SheetRepository::new(store),
            view,
        }
    }

    pub fn view(&self) -> CustomersView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomersView> {
        self.view.subscribe()
    }

    pub fn filtered_customers(&self) -> Vec<Customer> {
        self.view.borrow().filtered()
    }

    /// Fetch every customer; does nothing if a load is already running
    pub async fn load(&self) -> StoreResult<()> {
        let Some(guard) = LoadingGuard::acquire(&self.view, |view| view.error = None) else {
            return Ok(());
        };

        let result = self.customers.list().await;
        drop(guard);
        let customers = self.record_failure(result)?;
        tracing::info!(count = customers.len(), "loaded customers");
        self.view.send_modify(|view| view.customers = customers);
        Ok(())
    }

    /// Validate and persist a new customer
    pub async fn create(&self, name: &str, phone: &str, notes: &str) -> StoreResult<Customer> {
        let draft = Customer::new(name, phone, notes);
        let created = self.record_failure(self.customers.create(&draft).await)?;
        self.view.send_modify(|view| {
            view.error = None;
            view.customers.push(created.clone());
            sort_by_name(&mut view.customers);
        });
        Ok(created)
    }

    /// Persist edits to an existing customer
    pub async fn update(&self, customer: &Customer) -> StoreResult<()> {
        self.record_failure(self.customers.update(customer).await)?;
        self.view.send_modify(|view| {
            view.error = None;
            if let Some(slot) = view.customers.iter_mut().find(|c| c.id() == customer.id()) {
                *slot = customer.clone();
            }
            sort_by_name(&mut view.customers);
        });
        Ok(())
    }

    /// Delete a customer together with every sheet they own
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self.record_failure(self.sheets.delete_for_customer(id).await)?;
        self.record_failure(self.customers.delete(id).await)?;
        tracing::info!(id, sheets = removed, "deleted customer");
        self.view.send_modify(|view| {
            view.error = None;
            view.customers.retain(|c| c.id() != Some(id));
        });
        Ok(())
    }

    pub fn set_search(&self, term: &str) {
        self.view.send_if_modified(|view| {
            if view.search == term {
                return false;
            }
            view.search = term.to_string();
            true
        });
    }

    /// Replace the list with what the server reported
    pub fn apply_remote(&self, customers: Vec<Customer>) {
        self.view.send_modify(|view| view.customers = customers);
    }

    pub async fn watch(&self) -> StoreResult<CustomerStream> {
        self.customers.watch_all().await
    }

    /// Feed a subscription into [`CustomersState::apply_remote`] until it closes
    pub async fn follow(&self, mut stream: CustomerStream) {
        while let Ok(customers) = stream.next().await {
            self.apply_remote(customers);
        }
    }

    /// Reload after a failure
    pub async fn retry(&self) -> StoreResult<()> {
        self.load().await
    }

    pub fn clear_error(&self) {
        self.view.send_if_modified(|view| view.error.take().is_some());
    }

    fn record_failure<T>(&self, result: StoreResult<T>) -> StoreResult<T> {
        result.map_err(|e| {
            tracing::warn!(error = %e, "customer command failed");
            let message = user_message(&e);
            self.view.send_modify(|view| view.error = Some(message));
            e
        })
    }
}

fn sort_by_name(customers: &mut [Customer]) {
    customers.sort_by_key(|c| c.name().to_lowercase());
}
