//! Account API Server Binary
//!
//! Starts the HTTP API that opens accounts after checking the client against
//! the client directory, product parameter and card registries.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin account-api
//!
//! # Run with environment variables
//! API_PORT=8085 API_DATABASE__URL=postgres://... cargo run --bin account-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_DATABASE__URL` - PostgreSQL connection string (`DATABASE_URL` also accepted)
//! * `API_CLIENT_DIRECTORY__BASE_URL` - Client directory (default: http://localhost:9050/v1/client)
//! * `API_PRODUCT_PARAMETERS__BASE_URL` - Product parameters (default: http://localhost:9054/v1/productParameter)
//! * `API_CARD_REGISTRY__BASE_URL` - Card registry (default: http://localhost:9056/v1/card)
//! * `API_<REGISTRY>__TIMEOUT_SECS` - Per-registry request timeout (default: 5)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::HealthCheckable;
use domain_account::{AccountService, CardRegistryClient, ClientDirectoryClient, ProductParameterClient};
use infra_db::{create_pool, run_migrations, PostgresAccountStore};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - A registry base URL is invalid
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        client_directory = %config.client_directory.base_url,
        product_parameters = %config.product_parameters.base_url,
        card_registry = %config.card_registry.base_url,
        "Starting Account API Server"
    );

    let pool = create_pool(&config.database)
        .await
        .context("connecting to the account store")?;
    run_migrations(&pool).await.context("running migrations")?;

    let store = Arc::new(PostgresAccountStore::new(pool));
    let clients = Arc::new(ClientDirectoryClient::new(config.client_directory.clone())?);
    let products = Arc::new(ProductParameterClient::new(config.product_parameters.clone())?);
    let cards = Arc::new(CardRegistryClient::new(config.card_registry.clone())?);

    let health: Vec<Arc<dyn HealthCheckable>> = vec![
        store.clone() as Arc<dyn HealthCheckable>,
        clients.clone() as Arc<dyn HealthCheckable>,
        products.clone() as Arc<dyn HealthCheckable>,
        cards.clone() as Arc<dyn HealthCheckable>,
    ];
    let service = AccountService::new(store, clients, products, cards);

    let app = create_router(AppState::new(service, health));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to individual variables and defaults when the structured load
/// fails.
fn load_config() -> ApiConfig {
    let mut config = ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host.clone()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("API_LOG_LEVEL").unwrap_or(defaults.log_level.clone()),
            ..defaults
        }
    });

    if std::env::var("API_DATABASE__URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
    }

    config
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
