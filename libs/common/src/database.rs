//! Database module for handling PostgreSQL connections and operations
//!
//! This module provides connection pooling, configuration, and health checks
//! for the PostgreSQL database.

use crate::error::{DatabaseError, DatabaseResult};
use serde::Deserialize;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::time::Duration;
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database server host
    pub host: String,
    /// Database server port
    pub port: u16,
    /// Role used to connect
    pub user: String,
    /// Password for `user`
    pub password: String,
    /// Name of the database
    pub database: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
    /// Create missing tables and columns at start-up
    pub synchronize: bool,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `POSTGRES_HOST` (default: "localhost")
    /// - `POSTGRES_PORT` (default: 5432)
    /// - `POSTGRES_USER` (default: "postgres")
    /// - `POSTGRES_PASSWORD` (default: empty)
    /// - `POSTGRES_DATABASE` (default: "postgres")
    /// - `POSTGRES_MAX_CONNECTIONS` (default: 10)
    /// - `POSTGRES_MIN_CONNECTIONS` (default: 1)
    /// - `POSTGRES_CONNECTION_TIMEOUT`: seconds (default: 30)
    /// - `POSTGRES_SYNCHRONIZE` (default: true)
    pub fn from_env() -> DatabaseResult<Self> {
        let settings = config::Config::builder()
            .set_default("host", "localhost")?
            .set_default("port", 5432)?
            .set_default("user", "postgres")?
            .set_default("password", "")?
            .set_default("database", "postgres")?
            .set_default("max_connections", 10)?
            .set_default("min_connections", 1)?
            .set_default("connection_timeout", 30)?
            .set_default("synchronize", true)?
            .add_source(config::Environment::with_prefix("POSTGRES"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Connection options for sqlx, built field by field so credentials
    /// never need URL escaping
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Initialize a PostgreSQL connection pool
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<PgPool>` - PostgreSQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    info!(
        "Initializing database connection pool for {}:{}/{}",
        config.host, config.port, config.database
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(config.connect_options())
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// Returns `false` instead of an error when the database does not answer,
/// so callers can report a degraded state.
pub async fn health_check(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    }
}
