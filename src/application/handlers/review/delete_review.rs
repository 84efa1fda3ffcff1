//! DeleteReviewHandler - removes one review without renumbering its siblings.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, ReviewId};
use crate::ports::ReviewRepository;

#[derive(Debug, Clone, Copy)]
pub struct DeleteReviewCommand {
    pub review_id: ReviewId,
}

#[derive(Debug, Error)]
pub enum DeleteReviewError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct DeleteReviewHandler {
    review_repository: Arc<dyn ReviewRepository>,
}

impl DeleteReviewHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>) -> Self {
        Self { review_repository }
    }

    /// Deletes the review. Gaps in `cycle_no` are left as they are.
    pub async fn handle(&self, cmd: DeleteReviewCommand) -> Result<(), DeleteReviewError> {
        let review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(DeleteReviewError::ReviewNotFound(cmd.review_id))?;

        self.review_repository.delete(&cmd.review_id).await?;

        info!(
            review_id = %cmd.review_id,
            service_id = %review.service_id(),
            cycle_no = review.cycle_no(),
            "review deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::MockReviewRepository;
    use crate::domain::foundation::ServiceId;
    use crate::domain::review::fixtures::planned_cycle;
    use crate::domain::review::ReviewCycle;
    use chrono::{Duration, NaiveDate};

    #[tokio::test]
    async fn deleting_leaves_a_gap_in_numbering() {
        let service_id = ServiceId::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let reviews: Vec<_> = (0..3)
            .map(|i| planned_cycle(service_id, i + 1, start + Duration::days(7 * i64::from(i))))
            .collect();
        let repo = Arc::new(MockReviewRepository::with_reviews(reviews.clone()));

        DeleteReviewHandler::new(repo.clone())
            .handle(DeleteReviewCommand { review_id: reviews[1].id() })
            .await
            .unwrap();

        let remaining = repo.find_by_service(&service_id).await.unwrap();
        let numbers: Vec<_> = remaining.iter().map(ReviewCycle::cycle_no).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(remaining[1].planned_date(), reviews[2].planned_date());
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let repo = Arc::new(MockReviewRepository::new());

        let err = DeleteReviewHandler::new(repo)
            .handle(DeleteReviewCommand { review_id: ReviewId::new() })
            .await
            .unwrap_err();

        assert!(matches!(err, DeleteReviewError::ReviewNotFound(_)));
    }
}
