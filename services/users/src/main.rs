use anyhow::Result;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod service;
mod state;
mod validation;

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    schema,
};

use crate::{
    config::ServerConfig,
    repositories::{USER_TABLE, UserRepository},
    service::UserService,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real deployments set the variables directly
    dotenvy::dotenv().ok();

    let server_config = ServerConfig::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server_config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting users service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if db_config.synchronize {
        schema::synchronize(&pool, &USER_TABLE).await?;
    }

    let user_repository = UserRepository::new(pool);
    let user_service = UserService::new(Arc::new(user_repository));
    let app = routes::create_router(AppState { user_service });

    let listener = TcpListener::bind(server_config.address()).await?;
    info!("Users service listening on {}", server_config.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Users service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
