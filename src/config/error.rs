//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Turnaround days must be between 1 and 365")]
    InvalidTurnaround,

    #[error("Display horizon must not be negative")]
    InvalidDisplayHorizon,

    #[error("Agreed fee ceiling must be greater than 0")]
    InvalidFeeCeiling,

    #[error("Max unit quantity must be greater than 0")]
    InvalidMaxUnitQty,

    #[error("Invalid project id: {0}")]
    InvalidProjectId(String),
}
