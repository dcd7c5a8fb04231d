//! HTTP server for the recommender page and API.

pub mod page;
pub mod routes;

use crate::config::AppConfig;
use crate::recommend::Recommendation;
use std::sync::Arc;
use tracing::info;

/// Shared, read-only application state. Artifacts are not held here; each
/// request loads what it needs from disk.
pub struct AppState {
    pub config: AppConfig,
    pub recommendation: Recommendation,
}

impl AppState {
    pub fn new(config: AppConfig) -> crate::Result<Self> {
        let recommendation = Recommendation::new(&config)?;
        Ok(Self {
            config,
            recommendation,
        })
    }
}

/// Start the HTTP server on `config.bind_addr`.
pub async fn start(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
