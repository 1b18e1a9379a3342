pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod oracle;
pub mod seed;
pub mod store;

#[cfg(test)]
mod test_support;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{CombineError, OracleError};
pub use logic::{canonicalize, CombinationCache, ResultValidator};
pub use model::*;
pub use oracle::{GeminiOracle, Oracle, PromptTemplate};
pub use store::{CombinationStore, MemoryStore, PostgresStore, Store};

use anyhow::Result;
use log::info;
use std::sync::Arc;

/// Initialize logging: info by default, sqlx capped at warn, `RUST_LOG` wins.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,sqlx=warn"),
    )
    .try_init();
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Load configuration, connect the store and oracle, and serve until Ctrl-C.
pub async fn run_server() -> Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();
    init_logging();

    let config = crate::config::AppConfig::load()?;
    info!("Configuration loaded: server={}", config.server_address());

    info!("Connecting to PostgreSQL...");
    let postgres_store = PostgresStore::new(
        &config.database_url(),
        config.database.max_connections.unwrap_or(10),
    )
    .await?;
    postgres_store.migrate().await?;
    let store = Arc::new(postgres_store);

    let oracle = Arc::new(GeminiOracle::from_config(&config.oracle)?);
    info!("Using Gemini model {}", oracle.model());

    let cache = Arc::new(CombinationCache::from_config(store, oracle, &config)?);

    if config.warm_cache {
        seed::warm_cache(&cache).await;
    }

    let app = routes::build_app(cache, &config.cors)?;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Chemcraft server running on http://{}", bind_address);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
