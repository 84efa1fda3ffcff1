//! ClearStatusOverrideHandler - hands a pinned review back to the refresh job.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, ReviewId};
use crate::domain::lifecycle::StatusEngine;
use crate::domain::review::ReviewCycle;
use crate::ports::{Clock, ReviewRepository};

#[derive(Debug, Clone, Copy)]
pub struct ClearStatusOverrideCommand {
    pub review_id: ReviewId,
}

#[derive(Debug, Clone)]
pub struct ClearStatusOverrideResult {
    /// False when the review was not pinned.
    pub cleared: bool,
    pub review: ReviewCycle,
}

#[derive(Debug, Error)]
pub enum ClearStatusOverrideError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct ClearStatusOverrideHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl ClearStatusOverrideHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    /// Clears the pin. The status itself is kept until the next refresh.
    pub async fn handle(
        &self,
        cmd: ClearStatusOverrideCommand,
    ) -> Result<ClearStatusOverrideResult, ClearStatusOverrideError> {
        let mut review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(ClearStatusOverrideError::ReviewNotFound(cmd.review_id))?;

        let cleared = StatusEngine::clear_override(&mut review, self.clock.now());
        if cleared {
            self.review_repository.update(&review).await?;
            info!(review_id = %cmd.review_id, status = %review.status(), "status override cleared");
        }

        Ok(ClearStatusOverrideResult { cleared, review })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::application::handlers::test_support::MockReviewRepository;
    use crate::domain::foundation::{Actor, ServiceId, Timestamp};
    use crate::domain::review::fixtures::planned_cycle;
    use crate::domain::review::ReviewStatus;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn handler(repo: Arc<MockReviewRepository>) -> ClearStatusOverrideHandler {
        ClearStatusOverrideHandler::new(
            repo,
            Arc::new(FixedClock::new(Timestamp::start_of(date(2024, 1, 10)))),
        )
    }

    #[tokio::test]
    async fn clears_pin_and_keeps_status() {
        let mut review = planned_cycle(ServiceId::new(), 1, date(2024, 1, 1));
        StatusEngine::set_status_manual(
            &mut review,
            ReviewStatus::InProgress,
            Actor::new("pm").unwrap(),
            Timestamp::start_of(date(2024, 1, 2)),
        )
        .unwrap();
        let repo = Arc::new(MockReviewRepository::with_reviews(vec![review.clone()]));

        let result = handler(repo.clone())
            .handle(ClearStatusOverrideCommand { review_id: review.id() })
            .await
            .unwrap();

        assert!(result.cleared);
        let stored = repo.stored_by_id(review.id()).unwrap();
        assert!(!stored.is_status_overridden());
        assert!(stored.status_override_by().is_none());
        assert!(stored.status_override_at().is_none());
        assert_eq!(stored.status(), ReviewStatus::InProgress);
    }

    #[tokio::test]
    async fn unpinned_review_is_left_alone() {
        let review = planned_cycle(ServiceId::new(), 1, date(2024, 1, 1));
        let repo = Arc::new(MockReviewRepository::with_reviews(vec![review.clone()]));

        let result = handler(repo.clone())
            .handle(ClearStatusOverrideCommand { review_id: review.id() })
            .await
            .unwrap();

        assert!(!result.cleared);
        assert!(repo.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let repo = Arc::new(MockReviewRepository::new());

        let err = handler(repo)
            .handle(ClearStatusOverrideCommand { review_id: ReviewId::new() })
            .await
            .unwrap_err();

        assert!(matches!(err, ClearStatusOverrideError::ReviewNotFound(_)));
    }
}
