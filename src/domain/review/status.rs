//! ReviewStatus enum and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    ReportIssued,
    Closed,
    Cancelled,
}

impl ReviewStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ReviewStatus; 6] = [
        ReviewStatus::Planned,
        ReviewStatus::InProgress,
        ReviewStatus::Completed,
        ReviewStatus::ReportIssued,
        ReviewStatus::Closed,
        ReviewStatus::Cancelled,
    ];

    /// Accepted spellings, for error messages.
    pub const NAMES: &'static [&'static str] = &[
        "planned",
        "in_progress",
        "completed",
        "report_issued",
        "closed",
        "cancelled",
    ];

    /// Returns the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Planned => "planned",
            ReviewStatus::InProgress => "in_progress",
            ReviewStatus::Completed => "completed",
            ReviewStatus::ReportIssued => "report_issued",
            ReviewStatus::Closed => "closed",
            ReviewStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for ReviewStatus {
    fn valid_transitions(&self) -> &'static [Self] {
        use ReviewStatus::*;
        match self {
            Planned => &[InProgress, Cancelled],
            InProgress => &[Completed, Cancelled, Planned],
            Completed => &[ReportIssued, InProgress],
            ReportIssued => &[Closed, Completed],
            Closed => &[ReportIssued],
            Cancelled => &[Planned, InProgress],
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown review status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReviewStatus {
    type Err = UnknownStatus;

    /// Parses a status key; case and `-`/space separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        ReviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
