//! Error types for the shared infrastructure

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors raised while talking to PostgreSQL
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Could not open a pool connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A statement failed
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Applying the embedded migrations failed
    #[error("Database migration error: {0}")]
    Migration(String),

    /// The connection settings could not be used
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
