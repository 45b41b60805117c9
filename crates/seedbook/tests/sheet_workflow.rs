//! End-to-end tests for the sheets screen (customer -> sheet -> edits -> storage)

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use seedbook::prelude::*;
use seedbook::SHEETS_COLLECTION;

async fn customer_with_sheet(
    store: &Arc<MemoryStore>,
) -> (Customer, Arc<SheetsState<MemoryStore>>, CustomerSheet) {
    let customers = CustomersState::new(Arc::clone(store));
    let customer = customers
        .create("Green Acres", "+1 (555) 123-4567", "Spring order")
        .await
        .unwrap();

    let state = Arc::new(SheetsState::new(Arc::clone(store)));
    state.load(customer.id().unwrap()).await.unwrap();
    let sheet = state
        .create_sheet("Seedlings", SheetShape::default())
        .await
        .unwrap();
    (customer, state, sheet)
}

fn set(row: usize, col: usize, value: &str) -> SheetEdit {
    SheetEdit::SetCell {
        row,
        col,
        value: value.to_string(),
    }
}

/// Edits typed in quick succession reach the store once the user pauses
#[tokio::test(start_paused = true)]
async fn test_edits_autosave_and_reload() {
    let store = Arc::new(MemoryStore::new());
    let (customer, state, _) = customer_with_sheet(&store).await;

    assert!(state.edit(set(0, 0, "Variety")));
    assert!(state.edit(set(0, 1, "Trays")));
    assert!(state.edit(set(1, 0, "Roma")));
    assert!(state.edit(set(1, 1, "12")));
    assert!(state.edit(SheetEdit::AddRow));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(matches!(*state.save_status().borrow(), SaveStatus::Saved(_)));

    // A fresh screen sees the saved sheet
    let reopened = SheetsState::new(Arc::clone(&store));
    reopened.load(customer.id().unwrap()).await.unwrap();
    let sheets = reopened.view().sheets;
    assert_eq!(sheets.len(), 1);
    assert_eq!(Some(&sheets[0]), state.current().as_ref());
    assert_eq!(sheets[0].row_count(), 11);
    assert_eq!(sheets[0].column_sum(1), Some(12.0));
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_loads_are_skipped() {
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(200)));
    let state = Arc::new(SheetsState::new(Arc::clone(&store)));

    let first = tokio::spawn({
        let state = Arc::clone(&state);
        async move { state.load("c1").await }
    });
    tokio::task::yield_now().await;
    assert!(state.view().loading);

    // Returns at once without starting a second fetch
    state.load("c1").await.unwrap();
    assert!(state.view().loading);

    first.await.unwrap().unwrap();
    assert!(!state.view().loading);
}

#[tokio::test(start_paused = true)]
async fn test_failed_autosave_then_retry() {
    let store = Arc::new(MemoryStore::new());
    let (_, state, sheet) = customer_with_sheet(&store).await;

    store.set_online(false);
    state.edit(set(2, 2, "Basil"));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(state.save_status().borrow().is_failed());

    store.set_online(true);
    state.retry().await.unwrap();

    let repo = SheetRepository::new(Arc::clone(&store));
    let stored = repo.get(sheet.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.cell(2, 2).unwrap().value(), "Basil");
    assert_eq!(state.view().error, None);
}

#[tokio::test]
async fn test_remote_changes_replace_list() {
    let store = Arc::new(MemoryStore::new());
    let (customer, state, sheet) = customer_with_sheet(&store).await;

    let stream = state.watch().await.unwrap();
    let follower = tokio::spawn({
        let state = Arc::clone(&state);
        async move { state.follow(stream).await }
    });

    // Another device edits the open sheet and adds one
    let repo = SheetRepository::new(Arc::clone(&store));
    repo.update(&sheet.set_cell(0, 0, "From tablet".into()))
        .await
        .unwrap();
    repo.create(&CustomerSheet::new(customer.id().unwrap(), "Payments"))
        .await
        .unwrap();

    let mut views = state.subscribe();
    let view = views
        .wait_for(|view| view.sheets.len() == 2)
        .await
        .unwrap()
        .clone();
    let current = view.current.unwrap();
    assert_eq!(current.cell(0, 0).unwrap().value(), "From tablet");

    follower.abort();
}

#[tokio::test(start_paused = true)]
async fn test_remote_update_keeps_unsaved_edit() {
    let store = Arc::new(MemoryStore::new());
    let (customer, state, sheet) = customer_with_sheet(&store).await;

    state.edit(set(0, 0, "local"));

    let repo = SheetRepository::new(Arc::clone(&store));
    repo.update(&sheet.rename("Renamed elsewhere")).await.unwrap();
    let remote = repo.list_for_customer(customer.id().unwrap()).await.unwrap();
    state.apply_remote(remote);

    let view = state.view();
    assert_eq!(view.current.as_ref().unwrap().cell(0, 0).unwrap().value(), "local");
    assert_eq!(view.sheets[0].cell(0, 0).unwrap().value(), "local");

    // Last write wins once the autosave fires
    tokio::time::sleep(Duration::from_secs(1)).await;
    let stored = repo.get(sheet.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.title(), "Seedlings");
    assert_eq!(stored.cell(0, 0).unwrap().value(), "local");
}

#[tokio::test(start_paused = true)]
async fn test_remote_delete_closes_editor() {
    let store = Arc::new(MemoryStore::new());
    let (_, state, _) = customer_with_sheet(&store).await;

    state.apply_remote(Vec::new());
    let view = state.view();
    assert!(view.sheets.is_empty());
    assert_eq!(view.current, None);
}

#[tokio::test(start_paused = true)]
async fn test_delete_open_sheet() {
    let store = Arc::new(MemoryStore::new());
    let (_, state, sheet) = customer_with_sheet(&store).await;

    state.edit(set(0, 0, "doomed"));
    state.delete_sheet(sheet.id().unwrap()).await.unwrap();

    let view = state.view();
    assert_eq!(view.current, None);
    assert!(view.sheets.is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.len(SHEETS_COLLECTION).await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_closing_editor_keeps_scheduled_write() {
    let store = Arc::new(MemoryStore::new());
    let (_, state, sheet) = customer_with_sheet(&store).await;

    state.edit(SheetEdit::Rename("Seedlings 2024".into()));
    state.close();
    drop(state);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let repo = SheetRepository::new(Arc::clone(&store));
    let stored = repo.get(sheet.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.title(), "Seedlings 2024");
}
