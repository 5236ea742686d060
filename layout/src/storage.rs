//! Template storage: where layout documents are loaded from and saved to.
//!
//! The editor only depends on the [`TemplateStorage`] trait. [`HttpStorage`]
//! talks to the template service's REST API; [`MemoryStorage`] keeps
//! templates in process for tests and offline use.
//!
//! Saving replaces the stored document wholesale. There is no version check,
//! so concurrent editors of one template get last-write-wins.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier assigned by the storage backend.
pub type TemplateId = Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("template not found: {0}")]
    NotFound(TemplateId),
    #[error("template rejected: {0}")]
    Rejected(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A template as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Serialized layout document.
    pub layout: String,
}

/// Body of a create or replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub layout: String,
}

#[async_trait]
pub trait TemplateStorage: Send + Sync {
    /// Fetch a template by id.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] for an unknown id, or a backend failure.
    async fn load(&self, id: TemplateId) -> Result<StoredTemplate, StorageError>;

    /// Create a template (`id == None`) or replace an existing one.
    /// Returns the template's id.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when replacing an unknown id,
    /// [`StorageError::Rejected`] when the backend refuses the document.
    async fn save(&self, id: Option<TemplateId>, request: &SaveRequest) -> Result<TemplateId, StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    templates: RwLock<HashMap<TemplateId, StoredTemplate>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored templates.
    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.templates.read().await.is_empty()
    }
}

#[async_trait]
impl TemplateStorage for MemoryStorage {
    async fn load(&self, id: TemplateId) -> Result<StoredTemplate, StorageError> {
        self.templates
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn save(&self, id: Option<TemplateId>, request: &SaveRequest) -> Result<TemplateId, StorageError> {
        let mut templates = self.templates.write().await;
        let id = match id {
            Some(id) if !templates.contains_key(&id) => return Err(StorageError::NotFound(id)),
            Some(id) => id,
            None => Uuid::new_v4(),
        };
        templates.insert(
            id,
            StoredTemplate {
                id,
                name: request.name.clone(),
                description: request.description.clone(),
                layout: request.layout.clone(),
            },
        );
        Ok(id)
    }
}

// =============================================================================
// HTTP
// =============================================================================

#[derive(Deserialize)]
struct SavedResponse {
    id: TemplateId,
}

/// Client for the template service (`/api/templates`).
#[derive(Debug, Clone)]
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStorage {
    /// `base_url` is the service root, e.g. `http://localhost:3000`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn templates_url(&self) -> String {
        format!("{}/api/templates", self.base_url)
    }

    fn template_url(&self, id: TemplateId) -> String {
        format!("{}/api/templates/{id}", self.base_url)
    }
}

/// Map a non-success response to a storage error.
async fn status_error(id: Option<TemplateId>, response: reqwest::Response) -> StorageError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StorageError::NotFound(id),
        (s, _) if s.is_client_error() => StorageError::Rejected(format!("{s}: {body}")),
        (s, _) => {
            warn!(status = %s, "template service error");
            StorageError::Unavailable(format!("{s}: {body}"))
        }
    }
}

#[async_trait]
impl TemplateStorage for HttpStorage {
    async fn load(&self, id: TemplateId) -> Result<StoredTemplate, StorageError> {
        let response = self.client.get(self.template_url(id)).send().await?;
        if !response.status().is_success() {
            return Err(status_error(Some(id), response).await);
        }
        debug!(%id, "template loaded");
        Ok(response.json::<StoredTemplate>().await?)
    }

    async fn save(&self, id: Option<TemplateId>, request: &SaveRequest) -> Result<TemplateId, StorageError> {
        let builder = match id {
            Some(id) => self.client.put(self.template_url(id)),
            None => self.client.post(self.templates_url()),
        };
        let response = builder.json(request).send().await?;
        if !response.status().is_success() {
            return Err(status_error(id, response).await);
        }
        let saved = response.json::<SavedResponse>().await?;
        debug!(id = %saved.id, "template saved");
        Ok(saved.id)
    }
}
