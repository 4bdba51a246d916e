//! Common library for the user management services
//!
//! This crate provides shared PostgreSQL functionality: connection
//! configuration and pooling, explicit table schemas with start-up
//! synchronization, and the database error type.

pub mod database;
pub mod error;
pub mod schema;

/// Example usage of the database module
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, init_pool, health_check};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = init_pool(&config).await?;
///     let is_healthy = health_check(&pool).await;
///     println!("Database health check: {}", is_healthy);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
