use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use rusty_todo::config::ServerConfig;
use rusty_todo::core::AppState;
use rusty_todo::handlers::routes;
use rusty_todo::storage::{MemoryStorage, StorageProvider};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorage::new());
    info!("Using {} storage backend", storage.provider_name());
    match storage.health_check().await {
        Ok(true) => {}
        Ok(false) => warn!("Storage backend reported unhealthy at startup"),
        Err(e) => {
            error!("Storage health check failed: {}", e);
            std::process::exit(1);
        }
    }

    let state = match AppState::from_config(&config, storage) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Rusty Todo server on {}", addr);

    let (_, server) = warp::serve(routes(state)).bind_with_graceful_shutdown(addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    });

    server.await;
}
