//! SetReviewStatusHandler - manual or system status change on one review.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{Actor, DomainError, InvalidTransitionError, ReviewId};
use crate::domain::lifecycle::{AutomatedChange, StatusEngine};
use crate::domain::review::{ReviewCycle, ReviewStatus};
use crate::ports::{Clock, ReviewRepository};

/// Command to change a review's status.
#[derive(Debug, Clone)]
pub struct SetReviewStatusCommand {
    pub review_id: ReviewId,
    pub status: ReviewStatus,
    /// Manual changes pin the status against date-driven refreshes.
    pub is_manual_override: bool,
    /// Who asked for the change. Recorded only on manual changes.
    pub actor: Actor,
}

#[derive(Debug, Clone)]
pub struct SetReviewStatusResult {
    /// False when a system change was skipped or already in effect.
    pub changed: bool,
    pub review: ReviewCycle,
}

#[derive(Debug, Error)]
pub enum SetReviewStatusError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    InvalidTransition(#[from] InvalidTransitionError<ReviewStatus>),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct SetReviewStatusHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl SetReviewStatusHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetReviewStatusCommand,
    ) -> Result<SetReviewStatusResult, SetReviewStatusError> {
        let mut review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(SetReviewStatusError::ReviewNotFound(cmd.review_id))?;
        let from = review.status();
        let now = self.clock.now();

        let changed = if cmd.is_manual_override {
            StatusEngine::set_status_manual(&mut review, cmd.status, cmd.actor.clone(), now)?;
            true
        } else {
            match StatusEngine::set_status_automated(&mut review, cmd.status, now)? {
                AutomatedChange::Applied => true,
                AutomatedChange::Unchanged | AutomatedChange::SkippedOverride => false,
            }
        };

        if !changed {
            debug!(
                review_id = %cmd.review_id,
                status = %cmd.status,
                overridden = review.is_status_overridden(),
                "status change not applied"
            );
            return Ok(SetReviewStatusResult { changed, review });
        }

        self.review_repository.update(&review).await?;

        info!(
            review_id = %cmd.review_id,
            from = %from,
            to = %cmd.status,
            manual = cmd.is_manual_override,
            actor = %cmd.actor,
            "review status changed"
        );

        Ok(SetReviewStatusResult { changed, review })
    }
}
