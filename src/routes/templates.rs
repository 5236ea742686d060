//! Invoice template routes.

#[cfg(test)]
#[path = "templates_test.rs"]
mod templates_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use layout::field::FieldValues;
use layout::render::Scene;
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::template::{self, TemplateError, TemplateInput, TemplateRow, TemplateSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn template_error_to_status(err: &TemplateError) -> StatusCode {
    match err {
        TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
        TemplateError::EmptyName | TemplateError::NoElements => StatusCode::BAD_REQUEST,
        TemplateError::InvalidLayout(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TemplateError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: TemplateError) -> ApiError {
    let status = template_error_to_status(&err);
    if status.is_server_error() {
        error!(error = %err, "template request failed");
    } else {
        debug!(%status, error = %err, "template request rejected");
    }
    (status, Json(ErrorBody { error: err.to_string() }))
}

/// `GET /api/templates`: list template summaries.
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<TemplateSummary>>, ApiError> {
    let list = state.templates.list().await.map_err(api_error)?;
    Ok(Json(list))
}

/// `POST /api/templates`: validate and create.
pub async fn create_template(
    State(state): State<AppState>,
    Json(body): Json<TemplateInput>,
) -> Result<(StatusCode, Json<TemplateRow>), ApiError> {
    let valid = template::validate(&body).map_err(api_error)?;
    let row = state.templates.create(valid).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/templates/:id`: fetch one template with its layout.
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateRow>, ApiError> {
    let row = state.templates.get(id).await.map_err(api_error)?;
    Ok(Json(row))
}

/// `PUT /api/templates/:id`: replace wholesale; last write wins.
pub async fn replace_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TemplateInput>,
) -> Result<Json<TemplateRow>, ApiError> {
    let valid = template::validate(&body).map_err(api_error)?;
    let row = state.templates.replace(id, valid).await.map_err(api_error)?;
    Ok(Json(row))
}

/// `DELETE /api/templates/:id`
pub async fn delete_template(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.templates.delete(id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/templates/:id/resolve`: render for final output with the
/// posted field values.
pub async fn resolve_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(values): Json<FieldValues>,
) -> Result<Json<Scene>, ApiError> {
    let row = state.templates.get(id).await.map_err(api_error)?;
    let scene = template::resolve_scene(&row, &values).map_err(api_error)?;
    debug!(%id, fields = values.len(), items = scene.items.len(), "template resolved");
    Ok(Json(scene))
}
