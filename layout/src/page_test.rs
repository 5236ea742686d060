use async_trait::async_trait;
use uuid::Uuid;

use super::*;
use crate::doc::{ElementDraft, ElementKind};
use crate::field::FieldName;
use crate::storage::MemoryStorage;

fn template(layout: &str) -> StoredTemplate {
    StoredTemplate { id: Uuid::new_v4(), name: "Standard".into(), description: "monthly".into(), layout: layout.into() }
}

fn ready_page_with_element() -> EditorPage {
    let mut page = EditorPage::new();
    page.open_new();
    page.name = "Standard".into();
    page.editor.add_element(ElementDraft::toolbar_default(ElementKind::text("Invoice")));
    page
}

/// Storage whose saves always fail.
struct BrokenStorage;

#[async_trait]
impl TemplateStorage for BrokenStorage {
    async fn load(&self, id: TemplateId) -> Result<StoredTemplate, StorageError> {
        Err(StorageError::NotFound(id))
    }

    async fn save(&self, _id: Option<TemplateId>, _request: &SaveRequest) -> Result<TemplateId, StorageError> {
        Err(StorageError::Unavailable("503".into()))
    }
}

// =============================================================
// Loading
// =============================================================

#[test]
fn new_page_is_idle() {
    let page = EditorPage::new();
    assert_eq!(page.state(), PageState::Idle);
    assert!(page.template_id().is_none());
    assert!(page.error().is_none());
}

#[test]
fn open_new_is_ready_and_empty() {
    let mut page = EditorPage::new();
    page.open_new();
    assert_eq!(page.state(), PageState::Ready);
    assert!(page.editor.elements().is_empty());
}

#[test]
fn load_applies_template() {
    let mut page = EditorPage::new();
    let stored = template(r#"{"version":"1.0","elements":[
        {"id":"elem-1-a","type":"text","content":"Invoice","position":{"x":1,"y":2},"size":{"width":3,"height":4}}
    ]}"#);
    let ticket = page.begin_load(stored.id);
    assert_eq!(page.state(), PageState::Loading);

    assert!(page.finish_load(ticket, Ok(stored.clone())));
    assert_eq!(page.state(), PageState::Ready);
    assert_eq!(page.name, "Standard");
    assert_eq!(page.description, "monthly");
    assert_eq!(page.template_id(), Some(stored.id));
    assert_eq!(page.editor.elements().len(), 1);
    assert!(page.editor.selected_element().is_none());
    assert!(page.error().is_none());
}

#[test]
fn stale_ticket_is_ignored() {
    let mut page = EditorPage::new();
    let first = template(r#"{"elements":[]}"#);
    let second = template(r#"{"elements":[]}"#);
    let old = page.begin_load(first.id);
    let new = page.begin_load(second.id);

    assert!(!page.finish_load(old, Ok(first)));
    assert_eq!(page.state(), PageState::Loading);
    assert!(page.finish_load(new, Ok(second.clone())));
    assert_eq!(page.template_id(), Some(second.id));
}

#[test]
fn cancelled_load_is_ignored() {
    let mut page = EditorPage::new();
    let stored = template(r#"{"elements":[]}"#);
    let ticket = page.begin_load(stored.id);
    page.cancel_load();
    assert_eq!(page.state(), PageState::Idle);

    assert!(!page.finish_load(ticket, Ok(stored)));
    assert_eq!(page.state(), PageState::Idle);
    assert!(page.name.is_empty());
}

#[test]
fn load_failure_surfaces_error_and_starts_empty() {
    let mut page = EditorPage::new();
    let id = Uuid::new_v4();
    let ticket = page.begin_load(id);
    page.finish_load(ticket, Err(StorageError::NotFound(id)));

    assert_eq!(page.state(), PageState::Ready);
    assert!(page.error().is_some_and(|e| e.contains("not found")));
    assert!(page.editor.elements().is_empty());
    assert!(page.template_id().is_none());
}

#[test]
fn damaged_layout_surfaces_error_and_starts_empty() {
    let mut page = EditorPage::new();
    let stored = template("not json");
    let ticket = page.begin_load(stored.id);
    page.finish_load(ticket, Ok(stored));

    assert_eq!(page.state(), PageState::Ready);
    assert!(page.error().is_some());
    assert!(page.editor.elements().is_empty());
}

#[test]
fn damaged_element_keeps_the_rest() {
    let mut page = EditorPage::new();
    let stored = template(r#"{"elements":[
        {"id":"a","type":"text","content":"ok","position":{"x":0,"y":0},"size":{"width":10,"height":10}},
        {"id":"b","type":"hologram","position":{"x":0,"y":0},"size":{"width":10,"height":10}}
    ]}"#);
    let ticket = page.begin_load(stored.id);
    page.finish_load(ticket, Ok(stored));

    assert!(page.error().is_some());
    assert_eq!(page.editor.elements().len(), 1);
    assert_eq!(page.editor.elements()[0].id.as_str(), "a");
}

// =============================================================
// Validation
// =============================================================

#[test]
fn validate_requires_name() {
    let mut page = ready_page_with_element();
    page.name = "   ".into();
    assert_eq!(page.validate(), Err(ValidationError::EmptyName));
}

#[test]
fn validate_requires_elements() {
    let mut page = EditorPage::new();
    page.open_new();
    page.name = "Standard".into();
    assert_eq!(page.validate(), Err(ValidationError::NoElements));
}

#[test]
fn validation_failure_does_not_enter_saving() {
    let mut page = EditorPage::new();
    page.open_new();
    let result = page.begin_save();
    assert!(matches!(result, Err(PageError::Validation(ValidationError::EmptyName))));
    assert_eq!(page.state(), PageState::Ready);
}

// =============================================================
// Saving
// =============================================================

#[test]
fn begin_save_serializes_and_enters_saving() {
    let mut page = ready_page_with_element();
    page.name = "  Standard  ".into();
    let job = page.begin_save().unwrap();

    assert_eq!(page.state(), PageState::Saving);
    assert!(job.id.is_none());
    assert_eq!(job.request.name, "Standard");
    assert_eq!(serial::import(&job.request.layout).unwrap().len(), 1);
}

#[test]
fn cannot_save_twice_at_once() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();
    assert!(matches!(page.begin_save(), Err(PageError::Busy(PageState::Saving))));
}

#[test]
fn cannot_save_while_loading() {
    let mut page = ready_page_with_element();
    page.begin_load(Uuid::new_v4());
    assert!(matches!(page.begin_save(), Err(PageError::Busy(PageState::Loading))));
}

#[test]
fn successful_save_adopts_id() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();
    let id = Uuid::new_v4();
    assert_eq!(page.finish_save(Ok(id)).unwrap(), id);
    assert_eq!(page.state(), PageState::Ready);
    assert_eq!(page.template_id(), Some(id));
}

#[test]
fn failed_save_keeps_elements_and_can_retry() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();
    let result = page.finish_save(Err(StorageError::Unavailable("503".into())));

    assert!(matches!(result, Err(PageError::Storage(_))));
    assert_eq!(page.state(), PageState::SaveFailed);
    assert!(page.error().is_some());
    assert_eq!(page.editor.elements().len(), 1);

    // Retry straight from SaveFailed.
    assert!(page.begin_save().is_ok());
    assert_eq!(page.state(), PageState::Saving);
}

#[test]
fn save_finishing_after_navigation_is_ignored() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();

    let other = template(r#"{"elements":[
        {"id":"b","type":"text","content":"B","position":{"x":0,"y":0},"size":{"width":10,"height":10}}
    ]}"#);
    let ticket = page.begin_load(other.id);
    let result = page.finish_save(Ok(Uuid::new_v4()));
    assert!(matches!(result, Err(PageError::Superseded)));
    assert_eq!(page.state(), PageState::Loading);

    assert!(page.finish_load(ticket, Ok(other.clone())));
    assert_eq!(page.template_id(), Some(other.id));
    assert_eq!(page.editor.elements()[0].id.as_str(), "b");
}

#[test]
fn failed_save_after_navigation_leaves_page_alone() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();
    page.open_new();

    let result = page.finish_save(Err(StorageError::Unavailable("503".into())));
    assert!(matches!(result, Err(PageError::Superseded)));
    assert_eq!(page.state(), PageState::Ready);
    assert!(page.error().is_none());
}

#[test]
fn finish_save_without_begin_is_ignored() {
    let mut page = ready_page_with_element();
    assert!(matches!(page.finish_save(Ok(Uuid::new_v4())), Err(PageError::Superseded)));
    assert!(page.template_id().is_none());
}

#[test]
fn acknowledge_error_returns_to_ready() {
    let mut page = ready_page_with_element();
    page.begin_save().unwrap();
    let _ = page.finish_save(Err(StorageError::Unavailable("503".into())));
    page.acknowledge_error();
    assert_eq!(page.state(), PageState::Ready);
    assert!(page.error().is_none());
}

// =============================================================
// Against storage
// =============================================================

#[tokio::test]
async fn save_then_reload_through_memory_storage() {
    let storage = MemoryStorage::new();
    let mut page = ready_page_with_element();
    page.editor.add_element(ElementDraft::toolbar_default(ElementKind::field(FieldName::TotalAmount)));
    let id = page.save_to(&storage).await.unwrap();

    let mut reopened = EditorPage::new();
    reopened.load_from(&storage, id).await;
    assert_eq!(reopened.state(), PageState::Ready);
    assert_eq!(reopened.name, "Standard");
    assert_eq!(reopened.editor.elements(), page.editor.elements());
}

#[tokio::test]
async fn second_save_replaces_first() {
    let storage = MemoryStorage::new();
    let mut page = ready_page_with_element();
    let id = page.save_to(&storage).await.unwrap();

    page.name = "Renamed".into();
    assert_eq!(page.save_to(&storage).await.unwrap(), id);
    assert_eq!(storage.len().await, 1);
    assert_eq!(storage.load(id).await.unwrap().name, "Renamed");
}

#[tokio::test]
async fn save_to_broken_storage_fails() {
    let mut page = ready_page_with_element();
    assert!(page.save_to(&BrokenStorage).await.is_err());
    assert_eq!(page.state(), PageState::SaveFailed);
}

#[tokio::test]
async fn load_from_missing_template() {
    let mut page = EditorPage::new();
    page.load_from(&BrokenStorage, Uuid::new_v4()).await;
    assert_eq!(page.state(), PageState::Ready);
    assert!(page.error().is_some());
}
