mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::services::template::{MemoryTemplateStore, PgTemplateStore, TemplateStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }
    let config = ServiceConfig::from_env()?;

    let templates: Arc<dyn TemplateStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            tracing::info!("template store: postgres");
            Arc::new(PgTemplateStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; templates are kept in memory only");
            Arc::new(MemoryTemplateStore::new())
        }
    };

    let state = state::AppState::new(templates);
    let app = routes::app(state, &config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!(port = config.port, "prm-templates listening");
    axum::serve(listener, app).await?;
    Ok(())
}
