//! StatusEngine - manual status changes, overrides, and date-driven refresh.
//!
//! Human decisions are sticky: a manual change pins the status, and the
//! nightly refresh leaves pinned reviews alone until someone clears the pin.
//! Calendar inference only ever moves `planned` to `completed`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, InvalidTransitionError, ReviewId, Timestamp};
use crate::domain::review::{ReviewCycle, ReviewStatus};
use crate::domain::validation::validate_status_transition;

/// Counts reported by a bulk refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshCounts {
    pub updated_count: usize,
    pub skipped_count: usize,
}

/// Result of a bulk refresh over a set of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshOutcome {
    pub counts: RefreshCounts,
    /// Reviews whose status changed and must be written back.
    pub updated: Vec<ReviewId>,
}

/// What an automated (non-manual) status set did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatedChange {
    Applied,
    /// Review already had the requested status.
    Unchanged,
    /// Review is pinned by a manual override.
    SkippedOverride,
}

pub struct StatusEngine;

impl StatusEngine {
    /// Applies a manual status change and pins it.
    ///
    /// The target must be reachable from the current status in the
    /// transition table. On success the override flag, actor, and time are
    /// recorded; later automated refreshes skip this review.
    pub fn set_status_manual(
        review: &mut ReviewCycle,
        new_status: ReviewStatus,
        actor: Actor,
        now: Timestamp,
    ) -> Result<(), InvalidTransitionError<ReviewStatus>> {
        validate_status_transition(review.status(), new_status)?;
        review.pin_status(new_status, actor, now);
        Ok(())
    }

    /// Applies a status change on behalf of the system.
    ///
    /// Same transition rules as a manual change, but pinned reviews are left
    /// alone and the override fields are never written.
    pub fn set_status_automated(
        review: &mut ReviewCycle,
        new_status: ReviewStatus,
        now: Timestamp,
    ) -> Result<AutomatedChange, InvalidTransitionError<ReviewStatus>> {
        if review.is_status_overridden() {
            return Ok(AutomatedChange::SkippedOverride);
        }
        if review.status() == new_status {
            return Ok(AutomatedChange::Unchanged);
        }
        validate_status_transition(review.status(), new_status)?;
        review.set_status(new_status, now);
        Ok(AutomatedChange::Applied)
    }

    /// Removes the pin. Status is not recomputed.
    ///
    /// Returns false if the review was not pinned.
    pub fn clear_override(review: &mut ReviewCycle, now: Timestamp) -> bool {
        if !review.is_status_overridden()
            && review.status_override_by().is_none()
            && review.status_override_at().is_none()
        {
            return false;
        }
        review.unpin_status(now);
        true
    }

    /// Status a review should have on `now`'s date, if the rule applies.
    ///
    /// Only `planned` reviews whose due date has passed move, to `completed`.
    pub fn status_by_date(review: &ReviewCycle, now: Timestamp) -> Option<ReviewStatus> {
        let past_due = review.effective_due_date() < now.date();
        (review.status() == ReviewStatus::Planned && past_due).then_some(ReviewStatus::Completed)
    }

    /// Refreshes statuses from the calendar.
    ///
    /// With `respect_overrides`, pinned reviews are counted as skipped and not
    /// touched. Without it they are refreshed too, but their override fields
    /// still are not written. Running twice with the same `now` updates
    /// nothing the second time.
    pub fn auto_refresh_by_date(
        reviews: &mut [ReviewCycle],
        now: Timestamp,
        respect_overrides: bool,
    ) -> RefreshOutcome {
        let mut outcome = RefreshOutcome::default();

        for review in reviews.iter_mut() {
            if respect_overrides && review.is_status_overridden() {
                outcome.counts.skipped_count += 1;
                continue;
            }
            if let Some(status) = Self::status_by_date(review, now) {
                review.set_status(status, now);
                outcome.counts.updated_count += 1;
                outcome.updated.push(review.id());
            }
        }

        outcome
    }
}
