//! Template service: validation and storage of invoice templates.
//!
//! DESIGN
//! ======
//! A template row carries its layout as the serialized document string
//! produced by `layout::serial`. Every write is validated with the strict
//! importer and re-exported, so stored layouts are always readable and in
//! the current format version. Replace is wholesale with no version check:
//! the last writer wins.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures are client errors and never reach storage. Database
//! errors are passed through for the route layer to map to 500.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::collections::HashMap;

use async_trait::async_trait;
use layout::field::FieldValues;
use layout::render::{RenderMode, Scene, render};
use layout::serial::{self, LayoutError};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(Uuid),
    #[error("template name is required")]
    EmptyName,
    #[error("template must contain at least one element")]
    NoElements,
    #[error("invalid layout: {0}")]
    InvalidLayout(#[from] LayoutError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create/replace body as sent by the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub layout: String,
}

/// A validated write, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTemplate {
    pub name: String,
    pub description: String,
    /// Canonical re-export of the submitted layout.
    pub layout: String,
    pub element_count: i32,
}

/// Full template row.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub layout: String,
    pub element_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// List entry; omits the layout.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub element_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&TemplateRow> for TemplateSummary {
    fn from(row: &TemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            element_count: row.element_count,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check a create/replace body and canonicalize its layout.
///
/// # Errors
///
/// [`TemplateError::EmptyName`], [`TemplateError::InvalidLayout`] or
/// [`TemplateError::NoElements`], checked in that order.
pub fn validate(input: &TemplateInput) -> Result<ValidTemplate, TemplateError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyName);
    }
    let elements = serial::import(&input.layout)?;
    if elements.is_empty() {
        return Err(TemplateError::NoElements);
    }
    Ok(ValidTemplate {
        name: name.to_owned(),
        description: input.description.trim().to_owned(),
        layout: serial::to_json(&elements)?,
        element_count: i32::try_from(elements.len()).unwrap_or(i32::MAX),
    })
}

/// Render a stored template for final output with real field values.
///
/// # Errors
///
/// [`TemplateError::InvalidLayout`] if the stored layout no longer parses.
pub fn resolve_scene(row: &TemplateRow, values: &FieldValues) -> Result<Scene, TemplateError> {
    let elements = serial::import(&row.layout)?;
    Ok(render(&elements, None, RenderMode::Final(values)))
}

// =============================================================================
// STORE
// =============================================================================

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates, most recently updated first.
    async fn list(&self) -> Result<Vec<TemplateSummary>, TemplateError>;

    async fn get(&self, id: Uuid) -> Result<TemplateRow, TemplateError>;

    async fn create(&self, template: ValidTemplate) -> Result<TemplateRow, TemplateError>;

    /// Replace name, description and layout of an existing template.
    async fn replace(&self, id: Uuid, template: ValidTemplate) -> Result<TemplateRow, TemplateError>;

    async fn delete(&self, id: Uuid) -> Result<(), TemplateError>;
}

/// In-process store used when no database is configured.
#[derive(Default)]
pub struct MemoryTemplateStore {
    rows: RwLock<HashMap<Uuid, TemplateRow>>,
}

impl MemoryTemplateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateSummary>, TemplateError> {
        let rows = self.rows.read().await;
        let mut summaries: Vec<TemplateSummary> = rows.values().map(TemplateSummary::from).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    async fn get(&self, id: Uuid) -> Result<TemplateRow, TemplateError> {
        self.rows.read().await.get(&id).cloned().ok_or(TemplateError::NotFound(id))
    }

    async fn create(&self, template: ValidTemplate) -> Result<TemplateRow, TemplateError> {
        let now = OffsetDateTime::now_utc();
        let row = TemplateRow {
            id: Uuid::new_v4(),
            name: template.name,
            description: template.description,
            layout: template.layout,
            element_count: template.element_count,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.insert(row.id, row.clone());
        info!(id = %row.id, elements = row.element_count, "template created");
        Ok(row)
    }

    async fn replace(&self, id: Uuid, template: ValidTemplate) -> Result<TemplateRow, TemplateError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(TemplateError::NotFound(id))?;
        row.name = template.name;
        row.description = template.description;
        row.layout = template.layout;
        row.element_count = template.element_count;
        row.updated_at = OffsetDateTime::now_utc();
        info!(%id, elements = row.element_count, "template replaced");
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), TemplateError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => {
                info!(%id, "template deleted");
                Ok(())
            }
            None => Err(TemplateError::NotFound(id)),
        }
    }
}

/// Postgres-backed store.
pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type RowTuple = (Uuid, String, String, String, i32, OffsetDateTime, OffsetDateTime);

fn row_from_tuple(t: RowTuple) -> TemplateRow {
    TemplateRow {
        id: t.0,
        name: t.1,
        description: t.2,
        layout: t.3,
        element_count: t.4,
        created_at: t.5,
        updated_at: t.6,
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateSummary>, TemplateError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, i32, OffsetDateTime)>(
            "SELECT id, name, description, element_count, updated_at \
             FROM invoice_templates ORDER BY updated_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, description, element_count, updated_at)| TemplateSummary {
                id,
                name,
                description,
                element_count,
                updated_at,
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<TemplateRow, TemplateError> {
        sqlx::query_as::<_, RowTuple>(
            "SELECT id, name, description, layout, element_count, created_at, updated_at \
             FROM invoice_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(row_from_tuple)
        .ok_or(TemplateError::NotFound(id))
    }

    async fn create(&self, template: ValidTemplate) -> Result<TemplateRow, TemplateError> {
        let row = sqlx::query_as::<_, RowTuple>(
            "INSERT INTO invoice_templates (id, name, description, layout, element_count) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, description, layout, element_count, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.layout)
        .bind(template.element_count)
        .fetch_one(&self.pool)
        .await?;

        let row = row_from_tuple(row);
        info!(id = %row.id, elements = row.element_count, "template created");
        Ok(row)
    }

    async fn replace(&self, id: Uuid, template: ValidTemplate) -> Result<TemplateRow, TemplateError> {
        let row = sqlx::query_as::<_, RowTuple>(
            "UPDATE invoice_templates \
             SET name = $2, description = $3, layout = $4, element_count = $5, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, name, description, layout, element_count, created_at, updated_at",
        )
        .bind(id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.layout)
        .bind(template.element_count)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TemplateError::NotFound(id))?;

        info!(%id, elements = row.4, "template replaced");
        Ok(row_from_tuple(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), TemplateError> {
        let result = sqlx::query("DELETE FROM invoice_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TemplateError::NotFound(id));
        }
        info!(%id, "template deleted");
        Ok(())
    }
}
