//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the template REST API and the health check under a single Axum
//! router. Request tracing wraps every route; CORS is opened only when the
//! editor is served from another origin (`CORS_ALLOW_ANY`).

pub mod templates;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::state::AppState;

/// Build the service router.
pub fn app(state: AppState, config: &ServiceConfig) -> Router {
    let mut router = Router::new()
        .route("/api/templates", get(templates::list_templates).post(templates::create_template))
        .route(
            "/api/templates/{id}",
            get(templates::get_template)
                .put(templates::replace_template)
                .delete(templates::delete_template),
        )
        .route("/api/templates/{id}/resolve", post(templates::resolve_template))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(config.max_layout_bytes))
        .layer(TraceLayer::new_for_http());

    if config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
