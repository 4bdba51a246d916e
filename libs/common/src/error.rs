//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred while synchronizing the schema
    #[error("Database schema synchronization error on table {table}: {source}")]
    Synchronize {
        table: &'static str,
        #[source]
        source: SqlxError,
    },

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<config::ConfigError> for DatabaseError {
    fn from(err: config::ConfigError) -> Self {
        DatabaseError::Configuration(err.to_string())
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
