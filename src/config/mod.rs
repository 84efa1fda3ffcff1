//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `REVIEW_CYCLES` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use review_cycles::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Refreshing {} projects", config.job.project_ids().unwrap().len());
//! ```

mod database;
mod error;
mod job;
mod scheduling;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use job::JobConfig;
pub use scheduling::SchedulingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Generation and validation tunables
    #[serde(default)]
    pub scheduling: SchedulingConfig,

    /// Refresh job settings
    #[serde(default)]
    pub job: JobConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REVIEW_CYCLES` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REVIEW_CYCLES__DATABASE__URL=...` -> `database.url = ...`
    /// - `REVIEW_CYCLES__JOB__PROJECT_IDS=a,b` -> `job.project_ids = "a,b"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REVIEW_CYCLES")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.scheduling.validate()?;
        self.job.validate()?;
        Ok(())
    }
}
