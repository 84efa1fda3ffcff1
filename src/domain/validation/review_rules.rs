//! Review input rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    InvalidTransitionError, StateMachine, ValidationError, ValidationErrors,
};
use crate::domain::review::{ReviewStatus, WeightFactor};

/// Unvalidated review fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub planned_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub weight_factor: Option<Decimal>,
}

/// Review fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub planned_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: ReviewStatus,
    pub weight_factor: WeightFactor,
}

/// Checks every review rule, collecting all violations.
///
/// A missing weight factor defaults to 1.
pub fn validate_review(input: &ReviewInput) -> Result<ReviewFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.planned_date.is_none() {
        errors.push(ValidationError::required("planned_date"));
    }

    let status = match input.status.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ValidationError::required("status"));
            None
        }
        Some(raw) => match raw.parse::<ReviewStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push(ValidationError::not_one_of("status", raw, ReviewStatus::NAMES));
                None
            }
        },
    };

    let weight_factor = match input.weight_factor {
        None => Some(WeightFactor::ONE),
        Some(value) => match WeightFactor::try_new(value) {
            Ok(w) => Some(w),
            Err(e) => {
                errors.push(e);
                None
            }
        },
    };

    if let (Some(planned), Some(due)) = (input.planned_date, input.due_date) {
        if due < planned {
            errors.push(
                ValidationError::new("due_date", "must not be before planned_date").with_value(due),
            );
        }
    }

    match (input.planned_date, status, weight_factor) {
        (Some(planned_date), Some(status), Some(weight_factor)) if errors.is_empty() => {
            Ok(ReviewFields {
                planned_date,
                due_date: input.due_date,
                status,
                weight_factor,
            })
        }
        _ => Err(errors),
    }
}

/// Checks a requested status change against the lifecycle table.
pub fn validate_status_transition(
    from: ReviewStatus,
    to: ReviewStatus,
) -> Result<(), InvalidTransitionError<ReviewStatus>> {
    from.transition_to(to).map(|_| ())
}
