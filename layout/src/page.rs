//! Editor page lifecycle: loading, editing, validating and saving a template.
//!
//! ```text
//!   Idle ──begin_load──▶ Loading ──finish_load──▶ Ready ──begin_save──▶ Saving
//!    │                                              ▲                     │
//!    └──────────────open_new────────────────────────┤◀──────ok────────────┤
//!                                                   │                     │
//!                                      acknowledge_error ◀── SaveFailed ◀─┘ err
//! ```
//!
//! Loads are ticketed. A caller that navigates away calls [`EditorPage::cancel_load`]
//! (or simply starts another load); a late `finish_load` for an old ticket is
//! dropped without touching the editor.
//!
//! A failed load still ends in `Ready`: the error is kept for display and the
//! editor starts from whatever could be salvaged, usually nothing. A failed
//! save leaves the elements untouched so the user can retry.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::fmt;

use tracing::{debug, info, warn};

use crate::engine::EditorCore;
use crate::serial::{self, LayoutError};
use crate::storage::{SaveRequest, StorageError, StoredTemplate, TemplateId, TemplateStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Ready,
    Saving,
    SaveFailed,
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::SaveFailed => "save failed",
        };
        f.write_str(name)
    }
}

/// Reasons a template cannot be saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("template name is required")]
    EmptyName,
    #[error("template must contain at least one element")]
    NoElements,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot save while {0}")]
    Busy(PageState),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("save result arrived after the page moved on")]
    Superseded,
}

/// Handle for an in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A save that has passed validation and is waiting on storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveJob {
    pub id: Option<TemplateId>,
    pub request: SaveRequest,
}

#[derive(Debug)]
pub struct EditorPage {
    pub editor: EditorCore,
    pub name: String,
    pub description: String,
    template_id: Option<TemplateId>,
    state: PageState,
    load_seq: u64,
    pending_load: Option<u64>,
    error: Option<String>,
}

impl Default for EditorPage {
    fn default() -> Self {
        Self {
            editor: EditorCore::new(),
            name: String::new(),
            description: String::new(),
            template_id: None,
            state: PageState::Idle,
            load_seq: 0,
            pending_load: None,
            error: None,
        }
    }
}

impl EditorPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Id of the template being edited; `None` until the first save of a new one.
    #[must_use]
    pub fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    /// Last load or save error, for display.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a blank template.
    pub fn open_new(&mut self) {
        self.pending_load = None;
        self.template_id = None;
        self.name.clear();
        self.description.clear();
        self.error = None;
        self.editor.clear_all_elements();
        self.state = PageState::Ready;
    }

    // --- Loading ---

    /// Enter `Loading` for `id`. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self, id: TemplateId) -> LoadTicket {
        self.load_seq += 1;
        self.pending_load = Some(self.load_seq);
        self.template_id = Some(id);
        self.error = None;
        self.state = PageState::Loading;
        debug!(%id, ticket = self.load_seq, "template load started");
        LoadTicket(self.load_seq)
    }

    /// Abandon the in-flight load, if any.
    pub fn cancel_load(&mut self) {
        if self.pending_load.take().is_some() {
            debug!("template load cancelled");
            self.template_id = None;
            self.state = PageState::Idle;
        }
    }

    /// Apply a load result. Returns `false` if the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<StoredTemplate, StorageError>) -> bool {
        if self.pending_load != Some(ticket.0) {
            debug!(ticket = ticket.0, "stale template load ignored");
            return false;
        }
        self.pending_load = None;

        match result {
            Ok(template) => {
                let elements = match serial::import(&template.layout) {
                    Ok(elements) => elements,
                    Err(e) => {
                        warn!(id = %template.id, error = %e, "stored layout is damaged");
                        self.error = Some(format!("layout could not be read fully: {e}"));
                        serial::import_lenient(&template.layout)
                    }
                };
                info!(id = %template.id, count = elements.len(), "template loaded");
                self.name = template.name;
                self.description = template.description;
                self.editor.load_elements(elements);
            }
            Err(e) => {
                warn!(error = %e, "template load failed");
                self.error = Some(e.to_string());
                // Saving from here creates a new template.
                self.template_id = None;
                self.editor.clear_all_elements();
            }
        }
        self.state = PageState::Ready;
        true
    }

    /// Load `id` from `storage` and apply it.
    pub async fn load_from(&mut self, storage: &dyn TemplateStorage, id: TemplateId) {
        let ticket = self.begin_load(id);
        let result = storage.load(id).await;
        self.finish_load(ticket, result);
    }

    // --- Saving ---

    /// Check that the template can be saved.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyName`] for a blank name, then
    /// [`ValidationError::NoElements`] for an empty canvas.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.editor.elements().is_empty() {
            return Err(ValidationError::NoElements);
        }
        Ok(())
    }

    /// Validate, serialize and enter `Saving`.
    ///
    /// # Errors
    ///
    /// [`PageError::Busy`] outside `Ready`/`SaveFailed`, a validation error,
    /// or a serialization error. On error the state is unchanged and nothing
    /// should be sent.
    pub fn begin_save(&mut self) -> Result<SaveJob, PageError> {
        if !matches!(self.state, PageState::Ready | PageState::SaveFailed) {
            return Err(PageError::Busy(self.state));
        }
        self.validate()?;
        let layout = serial::to_json(self.editor.elements())?;

        self.state = PageState::Saving;
        self.error = None;
        Ok(SaveJob {
            id: self.template_id,
            request: SaveRequest {
                name: self.name.trim().to_owned(),
                description: self.description.clone(),
                layout,
            },
        })
    }

    /// Apply a save result. A new template takes the id storage assigned.
    ///
    /// # Errors
    ///
    /// Passes a storage failure through after moving to `SaveFailed`.
    /// [`PageError::Superseded`] if the page is no longer `Saving` (a load
    /// started meanwhile); the page is left untouched.
    pub fn finish_save(&mut self, result: Result<TemplateId, StorageError>) -> Result<TemplateId, PageError> {
        if self.state != PageState::Saving {
            debug!(state = %self.state, ok = result.is_ok(), "late save result ignored");
            return Err(PageError::Superseded);
        }
        match result {
            Ok(id) => {
                info!(%id, "template saved");
                self.template_id = Some(id);
                self.state = PageState::Ready;
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "template save failed");
                self.error = Some(e.to_string());
                self.state = PageState::SaveFailed;
                Err(e.into())
            }
        }
    }

    /// Validate and save through `storage`.
    ///
    /// # Errors
    ///
    /// See [`EditorPage::begin_save`] and [`EditorPage::finish_save`].
    pub async fn save_to(&mut self, storage: &dyn TemplateStorage) -> Result<TemplateId, PageError> {
        let job = self.begin_save()?;
        let result = storage.save(job.id, &job.request).await;
        self.finish_save(result)
    }

    /// Dismiss a save error and return to editing.
    pub fn acknowledge_error(&mut self) {
        self.error = None;
        if self.state == PageState::SaveFailed {
            self.state = PageState::Ready;
        }
    }
}
