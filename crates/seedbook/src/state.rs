//! Sheet list and editor state.
//!
//! [`SheetsState`] is the single owner of the sheets screen: the list for the
//! selected customer, the sheet open in the editor, and the loading and error
//! flags the UI renders. Views read snapshots through [`SheetsState::subscribe`]
//! and report what the user did through the command methods.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use seedbook_core::{CustomerSheet, SheetEdit, SheetShape};
use seedbook_store::{DocumentStore, SheetRepository, SheetStream, StoreError, StoreResult};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::autosave::{Autosave, AutosaveOptions, SaveStatus};
use crate::error::user_message;
use crate::loading::{Loading, LoadingGuard};

/// Everything the sheets screen renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetsView {
    /// Customer whose sheets are listed
    pub customer_id: Option<String>,
    /// Sheets for that customer, most recently edited first
    pub sheets: Vec<CustomerSheet>,
    /// Sheet open in the editor
    pub current: Option<CustomerSheet>,
    pub loading: bool,
    /// Last failure, phrased for the user
    pub error: Option<String>,
    pub search: String,
}

impl SheetsView {
    /// Sheets matching the search term; all of them when the term is blank
    pub fn filtered(&self) -> Vec<CustomerSheet> {
        let term = self.search.trim();
        self.sheets
            .iter()
            .filter(|sheet| sheet.contains_search_term(term))
            .cloned()
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.id() == Some(id))
    }
}

impl Loading for SheetsView {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }
}

/// A command that failed and can be run again
#[derive(Debug, Clone, PartialEq, Eq)]
enum Retry {
    Load(String),
    Save,
    Delete(String),
}

/// State container for the sheets screen.
///
/// Commands take `&self`, so one instance can be shared behind an [`Arc`]
/// between the UI and a subscription task.
///
/// Autosave timers are spawned on the tokio runtime that was current when the
/// state was built, or on the one given to [`SheetsState::with_runtime`].
/// [`SheetsState::edit`] can then be called from threads outside the runtime.
/// Built with no runtime at all, edits stay in memory and the save status
/// turns failed until [`SheetsState::save_now`] writes them.
pub struct SheetsState<S> {
    repo: SheetRepository<S>,
    autosave: Autosave<S>,
    view: watch::Sender<SheetsView>,
    last_failed: Mutex<Option<Retry>>,
}

impl<S: DocumentStore + 'static> SheetsState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_options(store, AutosaveOptions::default())
    }

    pub fn with_options(store: Arc<S>, options: AutosaveOptions) -> Self {
        let repo = SheetRepository::new(store);
        Self::build(Autosave::new(repo.clone(), options), repo)
    }

    /// Build a state whose autosave runs on `runtime`
    pub fn with_runtime(store: Arc<S>, options: AutosaveOptions, runtime: Handle) -> Self {
        let repo = SheetRepository::new(store);
        Self::build(Autosave::with_runtime(repo.clone(), options, runtime), repo)
    }

    fn build(autosave: Autosave<S>, repo: SheetRepository<S>) -> Self {
        let (view, _) = watch::channel(SheetsView::default());
        Self {
            autosave,
            repo,
            view,
            last_failed: Mutex::new(None),
        }
    }

    // === Read surface ===

    /// Snapshot of the current state
    pub fn view(&self) -> SheetsView {
        self.view.borrow().clone()
    }

    /// Receive a new snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<SheetsView> {
        self.view.subscribe()
    }

    pub fn filtered_sheets(&self) -> Vec<CustomerSheet> {
        self.view.borrow().filtered()
    }

    pub fn current(&self) -> Option<CustomerSheet> {
        self.view.borrow().current.clone()
    }

    pub fn save_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.status()
    }

    // === Commands ===

    /// Fetch the sheets of `customer_id`
    ///
    /// Does nothing if a load is already running.
    pub async fn load(&self, customer_id: &str) -> StoreResult<()> {
        let guard = LoadingGuard::acquire(&self.view, |view| {
            view.error = None;
            if view.customer_id.as_deref() != Some(customer_id) {
                view.customer_id = Some(customer_id.to_string());
                view.current = None;
            }
        });
        let Some(guard) = guard else {
            tracing::debug!(customer = customer_id, "load already in progress");
            return Ok(());
        };

        let result = self.repo.list_for_customer(customer_id).await;
        match result {
            Ok(sheets) => {
                tracing::info!(customer = customer_id, count = sheets.len(), "loaded sheets");
                self.clear_retry();
                guard.release_with(|view| {
                    sync_current(view, &sheets);
                    view.sheets = sheets;
                });
                Ok(())
            }
            Err(e) => {
                drop(guard);
                Err(self.fail(Retry::Load(customer_id.to_string()), e))
            }
        }
    }

    /// Create a sheet for the loaded customer and open it
    pub async fn create_sheet(&self, title: &str, shape: SheetShape) -> StoreResult<CustomerSheet> {
        let customer_id = self
            .view
            .borrow()
            .customer_id
            .clone()
            .ok_or_else(|| StoreError::Rejected("no customer selected".into()))?;

        let draft = CustomerSheet::with_shape(customer_id, title, shape);
        match self.repo.create(&draft).await {
            Ok(sheet) => {
                self.view.send_modify(|view| {
                    view.error = None;
                    view.sheets.insert(0, sheet.clone());
                    view.current = Some(sheet.clone());
                });
                Ok(sheet)
            }
            Err(e) => {
                let message = user_message(&e);
                self.view.send_modify(|view| view.error = Some(message));
                Err(e)
            }
        }
    }

    /// Delete a sheet, closing it if it is open
    ///
    /// Unsaved edits to the sheet are dropped only once the delete went
    /// through; if it fails they are still written.
    pub async fn delete_sheet(&self, id: &str) -> StoreResult<()> {
        match self.repo.delete(id).await {
            Ok(()) => {
                self.autosave.cancel_sheet(id);
                self.autosave.discard_failed(id);
                self.clear_retry();
                self.view.send_modify(|view| {
                    view.sheets.retain(|s| s.id() != Some(id));
                    if view.current.as_ref().and_then(|s| s.id()) == Some(id) {
                        view.current = None;
                    }
                });
                Ok(())
            }
            Err(e) => Err(self.fail(Retry::Delete(id.to_string()), e)),
        }
    }

    /// Open a listed sheet in the editor; `false` if no such sheet is listed
    pub fn open(&self, id: &str) -> bool {
        self.view.send_if_modified(|view| match view.position(id) {
            Some(i) => {
                view.current = Some(view.sheets[i].clone());
                true
            }
            None => false,
        })
    }

    /// Leave the editor; a write already scheduled still goes through
    pub fn close(&self) {
        self.view.send_if_modified(|view| view.current.take().is_some());
    }

    /// Apply a user edit to the open sheet and schedule a save
    ///
    /// Returns `false` when no sheet is open or the edit changed nothing.
    pub fn edit(&self, edit: SheetEdit) -> bool {
        let mut edited = None;
        self.view.send_if_modified(|view| {
            let Some(current) = view.current.as_ref() else {
                return false;
            };
            let next = edit.apply(current);
            if next.shares_cells_with(current) && next.title() == current.title() {
                return false;
            }
            if let Some(i) = next.id().and_then(|id| view.position(id)) {
                view.sheets[i] = next.clone();
            }
            view.current = Some(next.clone());
            edited = Some(next);
            true
        });

        match edited {
            Some(sheet) => {
                tracing::debug!(id = ?sheet.id(), ?edit, "applied edit");
                self.autosave.schedule(sheet);
                true
            }
            None => false,
        }
    }

    /// Write the open sheet now instead of waiting for autosave
    ///
    /// A snapshot whose autosave failed is written too, even if its sheet has
    /// been closed since, unless the open sheet is a newer copy of it.
    pub async fn save_now(&self) -> StoreResult<()> {
        let current = self.current();
        let unsaved = self
            .autosave
            .failed_snapshot()
            .filter(|failed| current.as_ref().map_or(true, |c| c.id() != failed.id()));

        let mut outcome = Ok(());
        for sheet in unsaved.iter().chain(current.iter()) {
            if let Err(e) = self.autosave.flush(sheet).await {
                outcome = Err(e);
            }
        }
        match outcome {
            Ok(()) => {
                self.clear_retry();
                self.view.send_if_modified(|view| view.error.take().is_some());
                Ok(())
            }
            Err(e) => Err(self.fail(Retry::Save, e)),
        }
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
    ///
    /// The open sheet follows its server copy unless a local edit is still
    /// waiting to be saved.
    pub fn apply_remote(&self, sheets: Vec<CustomerSheet>) {
        let keep_local = self.autosave.is_pending();
        self.view.send_modify(|view| {
            if keep_local {
                if let Some(current) = view.current.clone() {
                    let mut sheets = sheets;
                    if let Some(slot) = sheets.iter_mut().find(|s| s.id() == current.id()) {
                        *slot = current;
                    }
                    view.sheets = sheets;
                    return;
                }
            }
            sync_current(view, &sheets);
            view.sheets = sheets;
        });
    }

    /// Subscribe to server-side changes for the loaded customer
    pub async fn watch(&self) -> StoreResult<SheetStream> {
        let customer_id = self
            .view
            .borrow()
            .customer_id
            .clone()
            .ok_or_else(|| StoreError::Rejected("no customer selected".into()))?;
        self.repo.watch_customer(&customer_id).await
    }

    /// Feed a subscription into [`SheetsState::apply_remote`] until it closes
    pub async fn follow(&self, mut stream: SheetStream) {
        while let Ok(sheets) = stream.next().await {
            self.apply_remote(sheets);
        }
        tracing::debug!("sheet subscription closed");
    }

    /// Run the last failed command again
    ///
    /// A failed autosave counts as a failed save.
    pub async fn retry(&self) -> StoreResult<()> {
        let retry = self.lock_retry().take().or_else(|| {
            self.autosave
                .current_status()
                .is_failed()
                .then_some(Retry::Save)
        });

        match retry {
            Some(Retry::Load(customer_id)) => self.load(&customer_id).await,
            Some(Retry::Save) => self.save_now().await,
            Some(Retry::Delete(id)) => self.delete_sheet(&id).await,
            None => Ok(()),
        }
    }

    pub fn clear_error(&self) {
        self.view.send_if_modified(|view| view.error.take().is_some());
    }

    fn fail(&self, retry: Retry, err: StoreError) -> StoreError {
        tracing::warn!(?retry, error = %err, "sheet command failed");
        *self.lock_retry() = Some(retry);
        let message = user_message(&err);
        self.view.send_modify(|view| view.error = Some(message));
        err
    }

    fn clear_retry(&self) {
        self.lock_retry().take();
    }

    fn lock_retry(&self) -> MutexGuard<'_, Option<Retry>> {
        self.last_failed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point the open sheet at its copy in `sheets`, closing it if it is gone
fn sync_current(view: &mut SheetsView, sheets: &[CustomerSheet]) {
    if let Some(id) = view.current.as_ref().and_then(|s| s.id()) {
        view.current = sheets.iter().find(|s| s.id() == Some(id)).cloned();
    }
}
