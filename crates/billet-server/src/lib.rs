//! Billet Server
//!
//! HTTP binding of the assignment service. Suggestions and cohort
//! optimization are read-only; applying rooms, creating supervisor
//! assignments and rating them go through a single writer lock.

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod handlers;

use billet_service::AssignmentService;
use billet_store::{SqliteStore, StoreError};
use config::ServerConfig;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the configured database and build the handler state
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let store = SqliteStore::new(&config.database_path)?;
    let service = AssignmentService::new(store, config.service.clone());
    Ok(AppState::new(service))
}

/// Start the HTTP server
///
/// Opens the database, builds the router and serves until the process
/// is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Billet server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_in_memory() {
        let config = ServerConfig::default_test_config();
        assert!(build_state(&config).is_ok());
    }

    #[test]
    fn test_build_state_bad_path() {
        let mut config = ServerConfig::default_test_config();
        config.database_path = "/nonexistent-dir/billet.db".to_string();
        assert!(matches!(build_state(&config), Err(ServerError::Store(_))));
    }
}
