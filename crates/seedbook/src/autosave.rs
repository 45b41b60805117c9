//! Debounced sheet persistence.
//!
//! Every edit reschedules a single timer. When the user stops typing for
//! [`AutosaveOptions::delay`], the latest snapshot is written to the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use seedbook_core::CustomerSheet;
use seedbook_store::{DocumentStore, SheetRepository, StoreResult};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period before an edit is written
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(800);

/// Autosave configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutosaveOptions {
    /// How long to wait after the last edit before writing
    pub delay: Duration,
}

impl Default for AutosaveOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

impl AutosaveOptions {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Where the most recent save stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Nothing has been scheduled yet
    #[default]
    Idle,
    /// A write is scheduled or in flight
    Pending,
    /// The last write succeeded
    Saved(DateTime<Utc>),
    /// The last write failed; the message is meant for the user
    Failed(String),
}

impl SaveStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SaveStatus::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SaveStatus::Failed(_))
    }
}

/// Debounced writer for one sheet editor.
///
/// Timers run on the tokio runtime that was current when the `Autosave` was
/// built (or the one passed to [`Autosave::with_runtime`]), so
/// [`Autosave::schedule`] may be called from any thread. Dropping an
/// `Autosave` does not cancel a write that is already scheduled; it still runs
/// to completion in the background.
pub struct Autosave<S> {
    repo: SheetRepository<S>,
    options: AutosaveOptions,
    runtime: Option<Handle>,
    pending: Mutex<Option<Scheduled>>,
    shared: Arc<Shared>,
}

struct Scheduled {
    sheet_id: Option<String>,
    handle: JoinHandle<()>,
}

/// State written by the background task
struct Shared {
    status: watch::Sender<SaveStatus>,
    /// Last snapshot whose write failed, kept until it is saved or discarded
    failed: Mutex<Option<CustomerSheet>>,
}

impl Shared {
    fn saved(&self, sheet: &CustomerSheet) {
        let mut failed = lock(&self.failed);
        if failed.as_ref().is_some_and(|f| f.id() == sheet.id()) {
            failed.take();
        }
        drop(failed);
        self.status.send_replace(SaveStatus::Saved(Utc::now()));
    }

    fn failed(&self, sheet: &CustomerSheet, message: String) {
        *lock(&self.failed) = Some(sheet.clone());
        self.status.send_replace(SaveStatus::Failed(message));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: DocumentStore + 'static> Autosave<S> {
    /// Build an autosave that spawns on the current runtime, if there is one
    pub fn new(repo: SheetRepository<S>, options: AutosaveOptions) -> Self {
        Self::build(repo, options, Handle::try_current().ok())
    }

    /// Build an autosave that spawns its timers on `runtime`
    pub fn with_runtime(repo: SheetRepository<S>, options: AutosaveOptions, runtime: Handle) -> Self {
        Self::build(repo, options, Some(runtime))
    }

    fn build(repo: SheetRepository<S>, options: AutosaveOptions, runtime: Option<Handle>) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            repo,
            options,
            runtime,
            pending: Mutex::new(None),
            shared: Arc::new(Shared {
                status,
                failed: Mutex::new(None),
            }),
        }
    }

    pub fn options(&self) -> &AutosaveOptions {
        &self.options
    }

    /// Subscribe to save status changes
    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    /// The current save status
    pub fn current_status(&self) -> SaveStatus {
        self.shared.status.borrow().clone()
    }

    /// The snapshot whose last write failed, if it has not been saved since
    pub fn failed_snapshot(&self) -> Option<CustomerSheet> {
        lock(&self.shared.failed).clone()
    }

    /// Forget a failed snapshot of sheet `id`, e.g. after the sheet was deleted
    pub fn discard_failed(&self, id: &str) {
        let mut failed = lock(&self.shared.failed);
        if failed.as_ref().is_some_and(|f| f.id() == Some(id)) {
            failed.take();
        }
    }

    /// Write `sheet` once the quiet period has passed, replacing any earlier schedule
    ///
    /// Without a runtime to run the timer on, the snapshot is kept as failed so
    /// a later [`Autosave::flush`] or retry can still write it.
    pub fn schedule(&self, sheet: CustomerSheet) {
        let mut pending = lock(&self.pending);
        if let Some(scheduled) = pending.take() {
            scheduled.handle.abort();
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::warn!(id = ?sheet.id(), "no tokio runtime to run autosave on");
            self.shared.failed(
                &sheet,
                "Changes could not be saved in the background. Save again to keep them.".to_string(),
            );
            return;
        };

        self.shared.status.send_replace(SaveStatus::Pending);
        tracing::debug!(id = ?sheet.id(), delay = ?self.options.delay, "autosave scheduled");

        let repo = self.repo.clone();
        let shared = Arc::clone(&self.shared);
        let delay = self.options.delay;
        let sheet_id = sheet.id().map(str::to_string);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // A failure is already reported through the status channel
            let _ = persist(&repo, &shared, &sheet).await;
        });
        *pending = Some(Scheduled { sheet_id, handle });
    }

    /// Persist `sheet` immediately, replacing its scheduled write if any
    pub async fn flush(&self, sheet: &CustomerSheet) -> StoreResult<()> {
        if let Some(id) = sheet.id() {
            self.cancel_sheet(id);
        }
        self.shared.status.send_replace(SaveStatus::Pending);
        persist(&self.repo, &self.shared, sheet).await
    }

    /// Drop the scheduled write, if its timer has not fired yet
    ///
    /// Returns whether there was anything to cancel. Cancelling resets the
    /// status to [`SaveStatus::Idle`].
    pub fn cancel(&self) -> bool {
        let scheduled = lock(&self.pending).take();
        self.abort(scheduled)
    }

    /// Like [`Autosave::cancel`], but only if the scheduled write is for sheet `id`
    pub fn cancel_sheet(&self, id: &str) -> bool {
        let scheduled = {
            let mut pending = lock(&self.pending);
            if pending.as_ref().is_some_and(|s| s.sheet_id.as_deref() == Some(id)) {
                pending.take()
            } else {
                None
            }
        };
        self.abort(scheduled)
    }

    fn abort(&self, scheduled: Option<Scheduled>) -> bool {
        match scheduled {
            Some(scheduled) if !scheduled.handle.is_finished() => {
                scheduled.handle.abort();
                self.shared.status.send_replace(SaveStatus::Idle);
                tracing::debug!(id = ?scheduled.sheet_id, "autosave cancelled");
                true
            }
            _ => false,
        }
    }

    /// Whether a scheduled write has not finished yet
    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }
}

async fn persist<S: DocumentStore>(
    repo: &SheetRepository<S>,
    shared: &Shared,
    sheet: &CustomerSheet,
) -> StoreResult<()> {
    match repo.update(sheet).await {
        Ok(()) => {
            shared.saved(sheet);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(id = ?sheet.id(), error = %e, "autosave failed");
            shared.failed(sheet, crate::user_message(&e));
            Err(e)
        }
    }
}
