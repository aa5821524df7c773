use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use union_portal_api::app::{self, AppState, Repositories};
use union_portal_api::config::{Config, StorageBackend};
use union_portal_api::jobs;
use union_portal_api::middleware;
use union_portal_api::services::bootstrap_admin;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Union Portal API v{}", env!("CARGO_PKG_VERSION"));

    let repositories = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = persistence::db::DatabaseConfig::from(&config.database);
            let pool = persistence::db::create_pool(&db_config).await?;

            info!("Running database migrations...");
            sqlx::migrate!("../persistence/src/migrations")
                .run(&pool)
                .await?;
            info!("Migrations completed");

            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Repositories::in_memory(domain::repositories::InMemoryStore::new())
        }
    };

    let addr = config.socket_addr();
    let bootstrap = config.bootstrap.clone();
    let state = AppState::new(config, repositories)?;

    bootstrap_admin(&state.identity, &bootstrap).await?;

    let mut scheduler = jobs::maintenance_jobs(&state);
    scheduler.start();

    let app = app::create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown(Duration::from_secs(5)).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
