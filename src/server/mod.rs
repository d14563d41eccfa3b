//! HTTP Surface
//!
//! Exposes the three generation endpoints over axum. Every response carries
//! permissive CORS headers; successful generations (live or offline) are 200.

mod error;
mod handlers;
mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::ai::Generator;
use crate::config::Config;
use crate::types::{BizError, Result};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
}

impl AppState {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

/// Build the generator from `config` and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let generator = Generator::from_config(config)?;
    let app = create_router(AppState::new(generator));

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|e| BizError::Server(format!("Failed to bind {}: {}", config.server.bind, e)))?;
    info!(bind = %config.server.bind, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BizError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
