//! Resequencer - shifts downstream reviews after one review's date moves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, ReviewId, ServiceId, Timestamp};
use crate::domain::review::ReviewCycle;

/// Set of reviews that move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CycleGroup {
    /// Siblings generated for one service.
    Service(ServiceId),
    /// Every review in a project, across services.
    Project(ProjectId),
}

/// What a resequencing pass changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResequenceOutcome {
    pub delta_days: i64,
    /// The moved review followed by every shifted sibling.
    pub changed: Vec<ReviewId>,
}

impl ResequenceOutcome {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

pub struct Resequencer;

impl Resequencer {
    /// Moves `changed_review` to `new_date` and shifts later siblings.
    ///
    /// `snapshot` must hold every review of the group as read before any
    /// write. Siblings whose original planned date is strictly after the
    /// moved review's original date shift by the same delta; earlier and
    /// same-day siblings stay put. Due dates shift with planned dates.
    /// Cycle numbers and statuses are never touched.
    pub fn adjust_future_tasks(
        snapshot: &mut [ReviewCycle],
        changed_review: ReviewId,
        new_date: NaiveDate,
        now: Timestamp,
    ) -> Result<ResequenceOutcome, DomainError> {
        let original_date = snapshot
            .iter()
            .find(|r| r.id() == changed_review)
            .map(ReviewCycle::planned_date)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ReviewNotFound,
                    format!("Review not found in cycle group: {}", changed_review),
                )
            })?;

        let delta_days = (new_date - original_date).num_days();
        if delta_days == 0 {
            return Ok(ResequenceOutcome::default());
        }

        // Decide membership from original dates before shifting anything.
        let later: Vec<ReviewId> = snapshot
            .iter()
            .filter(|r| r.id() != changed_review && r.planned_date() > original_date)
            .map(ReviewCycle::id)
            .collect();

        let mut changed = Vec::with_capacity(later.len() + 1);
        changed.push(changed_review);
        changed.extend(later);

        for review in snapshot.iter_mut().filter(|r| changed.contains(&r.id())) {
            review.shift_dates(delta_days, now);
        }

        Ok(ResequenceOutcome { delta_days, changed })
    }
}
