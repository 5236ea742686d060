//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the template store behind a trait object so the same router runs on
//! Postgres in production and in memory in tests or without `DATABASE_URL`.

use std::sync::Arc;

use crate::services::template::TemplateStore;

/// Shared application state. Clone is required by Axum; the store is
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateStore>,
}

impl AppState {
    #[must_use]
    pub fn new(templates: Arc<dyn TemplateStore>) -> Self {
        Self { templates }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::services::template::MemoryTemplateStore;

    /// App state over an empty in-memory store.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Arc::new(MemoryTemplateStore::new()))
    }
}
