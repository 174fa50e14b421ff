//! Error handling for fundfolio
//!
//! Defines the error types raised by the outer layers (store, ingestion,
//! configuration) and a unified Result type using anyhow for context chaining.
//! The analytics core has no error type: empty ranges and degenerate
//! baselines are ordinary outcomes there.

use thiserror::Error;

/// Errors raised outside the analytics core
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("database error: {0}")]
    DbError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fundfolio operations
pub type Result<T> = anyhow::Result<T>;
