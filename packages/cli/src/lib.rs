// ABOUTME: Server bootstrap for the Folio HTTP API
// ABOUTME: Wires configuration, database state, middleware layers, and graceful shutdown

use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;


use config::Config;
use error::AppError;
use folio_api::DbState;

/// Apply pending migrations and exit
pub async fn run_migrations(config: &Config) -> Result<(), AppError> {
    let pool = folio_storage::connect(&config.database_config()).await?;
    folio_storage::run_migrations(&pool).await?;
    pool.close().await;

    info!("Migrations applied to {}", config.database_path.display());
    Ok(())
}

/// Start the HTTP server and run until Ctrl+C
pub async fn run_server(config: Config) -> Result<(), AppError> {
    let state = DbState::init(&config.database_config()).await?;

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| AppError::InvalidCorsOrigin(config.cors_origin.clone()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = folio_api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
