//! Common error types for the gear tracker

use thiserror::Error;

/// Common result type for gear tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the gear tracker crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or stored value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Update or delete affected no row (record vanished underneath us)
    #[error("Concurrency conflict: {0}")]
    Concurrency(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error is an optimistic-concurrency conflict
    pub fn is_concurrency(&self) -> bool {
        matches!(self, Error::Concurrency(_))
    }
}
