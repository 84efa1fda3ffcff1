//! Refresh job configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::ProjectId;

/// Settings for the `review-cycles-refresh` binary
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Comma-separated project UUIDs to refresh
    #[serde(default)]
    pub project_ids: String,

    /// Leave manually pinned statuses alone
    #[serde(default = "default_respect_overrides")]
    pub respect_overrides: bool,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl JobConfig {
    /// Parses `project_ids`. Blank entries are ignored.
    pub fn project_ids(&self) -> Result<Vec<ProjectId>, ValidationError> {
        self.project_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ProjectId>()
                    .map_err(|_| ValidationError::InvalidProjectId(s.to_string()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_ids()?.is_empty() {
            return Err(ValidationError::MissingRequired("JOB__PROJECT_IDS"));
        }
        Ok(())
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            project_ids: String::new(),
            respect_overrides: default_respect_overrides(),
            json_logs: false,
            log_level: default_log_level(),
        }
    }
}

fn default_respect_overrides() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
