//! Cadence - recurrence pattern governing cycle spacing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between fixed-interval weekly cycles.
pub const WEEKLY_DAYS: i64 = 7;
/// Days between fixed-interval fortnightly cycles.
pub const FORTNIGHTLY_DAYS: i64 = 14;
/// Days between fixed-interval monthly cycles (30-day approximation).
pub const MONTHLY_DAYS: i64 = 30;

/// How a service's cycles recur.
///
/// Anything that is not a recognised fixed interval or one-off is `Custom`,
/// which spreads cycles evenly over the service window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Fortnightly,
    Monthly,
    OneOff,
    /// Carries the normalized key it was parsed from.
    Custom(String),
}

impl Cadence {
    /// Parses a free-text frequency.
    ///
    /// Keys are trimmed, lower-cased, and `_`/space become `-`, so
    /// `"Bi_Weekly"` and `"bi weekly"` both mean fortnightly. Never fails.
    pub fn parse(raw: &str) -> Self {
        let key = normalize_key(raw);
        match key.as_str() {
            "weekly" => Cadence::Weekly,
            "bi-weekly" | "biweekly" | "fortnightly" => Cadence::Fortnightly,
            "monthly" => Cadence::Monthly,
            "one-off" | "oneoff" | "once" => Cadence::OneOff,
            _ => Cadence::Custom(key),
        }
    }

    /// Fixed spacing between consecutive cycles, if this cadence has one.
    pub fn interval_days(&self) -> Option<i64> {
        match self {
            Cadence::Weekly => Some(WEEKLY_DAYS),
            Cadence::Fortnightly => Some(FORTNIGHTLY_DAYS),
            Cadence::Monthly => Some(MONTHLY_DAYS),
            Cadence::OneOff | Cadence::Custom(_) => None,
        }
    }

    /// Returns true for the one-off cadence.
    pub fn is_one_off(&self) -> bool {
        matches!(self, Cadence::OneOff)
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::Custom(String::new())
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Weekly => write!(f, "weekly"),
            Cadence::Fortnightly => write!(f, "fortnightly"),
            Cadence::Monthly => write!(f, "monthly"),
            Cadence::OneOff => write!(f, "one-off"),
            Cadence::Custom(key) if key.is_empty() => write!(f, "custom"),
            Cadence::Custom(key) => write!(f, "{}", key),
        }
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}
