//! CycleGenerator - turns a service definition into dated review cycles.

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::review::{FeeAllocator, NewReviewCycle, ReviewCycle};
use crate::domain::service::{Cadence, ServiceDefinition};

use super::distribution::{distribute_inclusive, fixed_interval};

/// Turnaround used when the cadence has no fixed interval.
pub const DEFAULT_TURNAROUND_DAYS: i64 = 7;
/// How far past `schedule_end` a display date may run.
pub const DEFAULT_DISPLAY_HORIZON_DAYS: i64 = 365;

/// Tunables for schedule generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub default_turnaround_days: i64,
    pub display_horizon_days: i64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            default_turnaround_days: DEFAULT_TURNAROUND_DAYS,
            display_horizon_days: DEFAULT_DISPLAY_HORIZON_DAYS,
        }
    }
}

/// Generates the cycle set for one service.
///
/// Stateless apart from its settings; "now" is passed in explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleGenerator {
    settings: ScheduleSettings,
}

impl CycleGenerator {
    pub fn new(settings: ScheduleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Produces exactly `unit_qty` cycles numbered `1..=unit_qty`.
    ///
    /// Fixed-interval dates are never capped at `schedule_end`: a weekly
    /// service of 10 units gets 10 cycles even if the window only fits 3.
    /// The one-off cadence always yields a single cycle on `schedule_start`,
    /// whatever `unit_qty` says.
    ///
    /// `unit_qty <= 0` yields an empty list. A positive quantity without a
    /// `schedule_start` is rejected.
    pub fn generate(
        &self,
        service: &ServiceDefinition,
        now: Timestamp,
    ) -> Result<Vec<ReviewCycle>, ValidationError> {
        let Ok(qty) = usize::try_from(service.unit_qty) else {
            return Ok(Vec::new());
        };
        if qty == 0 {
            return Ok(Vec::new());
        }
        let start = service
            .schedule_start
            .ok_or_else(|| ValidationError::required("schedule_start"))?;

        let cadence = &service.schedule_frequency;
        let dates = self.planned_dates(cadence, start, service.schedule_end, qty);

        if cadence.is_one_off() && qty > 1 {
            warn!(
                service_id = %service.service_id,
                unit_qty = qty,
                "one-off cadence generates a single cycle; remaining units are not scheduled"
            );
        }

        let turnaround = Duration::days(self.turnaround_days(cadence));
        let agreed_fee = service.effective_agreed_fee();
        let planned_count = u32::try_from(dates.len()).unwrap_or(u32::MAX);

        let cycles = dates
            .into_iter()
            .zip(1u32..)
            .map(|(planned_date, cycle_no)| {
                ReviewCycle::planned(
                    NewReviewCycle {
                        service_id: service.service_id,
                        cycle_no,
                        planned_date,
                        due_date: planned_date + turnaround,
                        disciplines: service.disciplines.clone(),
                        deliverables: service.deliverables.clone(),
                        phase: service.phase.clone(),
                        fee: FeeAllocator::calculate_fee(None, None, agreed_fee, planned_count),
                    },
                    now,
                )
            })
            .collect();

        Ok(cycles)
    }

    /// Planned dates for `qty` cycles under `cadence`.
    pub fn planned_dates(
        &self,
        cadence: &Cadence,
        start: NaiveDate,
        end: Option<NaiveDate>,
        qty: usize,
    ) -> Vec<NaiveDate> {
        if qty == 0 {
            return Vec::new();
        }
        match cadence {
            Cadence::OneOff => vec![start],
            other => match other.interval_days() {
                Some(interval) => fixed_interval(start, interval, qty),
                None => distribute_inclusive(start, end, qty),
            },
        }
    }

    /// Days between a cycle's planned and due dates.
    pub fn turnaround_days(&self, cadence: &Cadence) -> i64 {
        cadence
            .interval_days()
            .unwrap_or(self.settings.default_turnaround_days)
    }

    /// Presentation-only date, clamped to `schedule_end + horizon`.
    ///
    /// Never used for persistence; the stored planned date is untouched.
    pub fn display_date(&self, cycle: &ReviewCycle, schedule_end: Option<NaiveDate>) -> NaiveDate {
        match schedule_end {
            Some(end) => cycle
                .planned_date()
                .min(end + Duration::days(self.settings.display_horizon_days)),
            None => cycle.planned_date(),
        }
    }
}
