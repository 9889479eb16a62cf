//! handbook_server: REST server for the building / company / rubric directory.
//!
//! Configuration comes from flags or env vars (see `handbook::config`):
//!   DATABASE_URL        - Postgres connection string (optional, overrides parts)
//!   HANDBOOK_BIND_ADDR  - listen address (default: 0.0.0.0:8080)

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use handbook::api::build_router;
use handbook::config::ServerConfig;
use handbook::database::DatabaseManager;
use handbook::services::DirectoryService;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,handbook=debug,tower_http=debug".into()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    let db = DatabaseManager::new(config.database_config()?)
        .await
        .context("failed to connect to database")?;
    db.test_connection()
        .await
        .context("database did not answer a test query")?;
    if !db.verify_schema().await? {
        tracing::warn!("handbook schema incomplete; requests will fail until it is applied");
    }
    tracing::info!("Connected to database ({})", db.connection_stats());

    let options = config.service_options();
    let service = Arc::new(DirectoryService::new(
        Arc::new(db.directory_store()),
        options,
    ));
    tracing::info!(
        "Directory service ready (max_rubric_depth={}, serialize_access={})",
        options.closure.max_depth,
        options.serialize_access
    );

    let app = build_router(service);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("handbook_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    db.close().await;
    Ok(())
}
