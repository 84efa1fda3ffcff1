//! Scheduling configuration
//!
//! Consumed by library callers that build the scheduling handlers, via
//! `GenerateReviewCyclesHandler::with_generator` / `with_limits` and
//! `GenerateStageScheduleHandler::with_limits`. The refresh binary does not
//! generate cycles and ignores this section.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::scheduling::{ScheduleSettings, DEFAULT_DISPLAY_HORIZON_DAYS, DEFAULT_TURNAROUND_DAYS};
use crate::domain::validation::{ValidationLimits, MAX_UNIT_QTY};

/// Tunables for cycle generation and input validation
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Planned-to-due gap for cadences without a fixed interval
    #[serde(default = "default_turnaround_days")]
    pub default_turnaround_days: i64,

    /// How far past `schedule_end` a display date may run
    #[serde(default = "default_display_horizon_days")]
    pub display_horizon_days: i64,

    /// Cap on a derived agreed fee, in whole currency units
    #[serde(default = "default_agreed_fee_ceiling")]
    pub agreed_fee_ceiling: u64,

    /// Largest accepted `unit_qty`
    #[serde(default = "default_max_unit_qty")]
    pub max_unit_qty: i64,
}

impl SchedulingConfig {
    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            default_turnaround_days: self.default_turnaround_days,
            display_horizon_days: self.display_horizon_days,
        }
    }

    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_unit_qty: self.max_unit_qty,
            agreed_fee_ceiling: Decimal::from(self.agreed_fee_ceiling),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=365).contains(&self.default_turnaround_days) {
            return Err(ValidationError::InvalidTurnaround);
        }
        if self.display_horizon_days < 0 {
            return Err(ValidationError::InvalidDisplayHorizon);
        }
        if self.agreed_fee_ceiling == 0 {
            return Err(ValidationError::InvalidFeeCeiling);
        }
        if self.max_unit_qty <= 0 {
            return Err(ValidationError::InvalidMaxUnitQty);
        }
        Ok(())
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_turnaround_days: default_turnaround_days(),
            display_horizon_days: default_display_horizon_days(),
            agreed_fee_ceiling: default_agreed_fee_ceiling(),
            max_unit_qty: default_max_unit_qty(),
        }
    }
}

fn default_turnaround_days() -> i64 {
    DEFAULT_TURNAROUND_DAYS
}

fn default_display_horizon_days() -> i64 {
    DEFAULT_DISPLAY_HORIZON_DAYS
}

fn default_agreed_fee_ceiling() -> u64 {
    10_000_000
}

fn default_max_unit_qty() -> i64 {
    MAX_UNIT_QTY
}
