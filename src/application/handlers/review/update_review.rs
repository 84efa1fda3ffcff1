//! UpdateReviewHandler - edits a review's due date, weight, and fee override.
//!
//! Input goes through the review validation rules before anything is
//! applied. Planned dates move through `AdjustFutureTasksHandler` and
//! statuses through `SetReviewStatusHandler`; neither is editable here.
//! Fee changes take effect at the next `RecalculateServiceFeesHandler` run.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{DomainError, ReviewId, ValidationErrors};
use crate::domain::review::ReviewCycle;
use crate::domain::validation::{validate_review, ReviewInput};
use crate::ports::{Clock, ReviewRepository};

/// Command to edit a review. `None` fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewCommand {
    pub review_id: ReviewId,
    pub due_date: Option<NaiveDate>,
    pub weight_factor: Option<Decimal>,
    /// `Some(None)` removes an existing override.
    pub fee_amount_override: Option<Option<Decimal>>,
}

impl UpdateReviewCommand {
    pub fn new(review_id: ReviewId) -> Self {
        Self {
            review_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateReviewResult {
    /// False when every requested value was already stored.
    pub changed: bool,
    pub review: ReviewCycle,
}

#[derive(Debug, Error)]
pub enum UpdateReviewError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct UpdateReviewHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateReviewHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    pub async fn handle(&self, cmd: UpdateReviewCommand) -> Result<UpdateReviewResult, UpdateReviewError> {
        let mut review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(UpdateReviewError::ReviewNotFound(cmd.review_id))?;

        // Validate the review as it would look after the edit.
        let fields = validate_review(&ReviewInput {
            planned_date: Some(review.planned_date()),
            due_date: cmd.due_date.or(review.due_date()),
            status: Some(review.status().as_str().to_string()),
            weight_factor: Some(cmd.weight_factor.unwrap_or(review.weight_factor().value())),
        })?;

        let now = self.clock.now();
        let mut changed = false;

        if fields.due_date != review.due_date() {
            review.set_due_date(fields.due_date, now);
            changed = true;
        }
        if fields.weight_factor != review.weight_factor() {
            review.set_weight_factor(fields.weight_factor, now);
            changed = true;
        }
        if let Some(fee_override) = cmd.fee_amount_override {
            if fee_override != review.fee_amount_override() {
                review.set_fee_amount_override(fee_override, now);
                changed = true;
            }
        }

        if !changed {
            debug!(review_id = %cmd.review_id, "review already up to date");
            return Ok(UpdateReviewResult { changed, review });
        }

        self.review_repository.update(&review).await?;

        info!(
            review_id = %cmd.review_id,
            due_date = ?review.due_date(),
            weight_factor = %review.weight_factor().value(),
            fee_amount_override = ?review.fee_amount_override(),
            "review updated"
        );

        Ok(UpdateReviewResult { changed, review })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::application::handlers::test_support::MockReviewRepository;
    use crate::domain::foundation::{ServiceId, Timestamp};
    use crate::domain::review::fixtures::planned_cycle;
    use crate::domain::review::WeightFactor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn handler(repo: Arc<MockReviewRepository>) -> UpdateReviewHandler {
        UpdateReviewHandler::new(
            repo,
            Arc::new(FixedClock::new(Timestamp::start_of(date(2024, 1, 3)))),
        )
    }

    fn stored_review() -> (ReviewCycle, Arc<MockReviewRepository>) {
        let review = planned_cycle(ServiceId::new(), 1, date(2024, 1, 1));
        let repo = Arc::new(MockReviewRepository::with_reviews(vec![review.clone()]));
        (review, repo)
    }

    #[tokio::test]
    async fn applies_every_requested_field() {
        let (review, repo) = stored_review();

        let result = handler(repo.clone())
            .handle(UpdateReviewCommand {
                due_date: Some(date(2024, 1, 12)),
                weight_factor: Some(Decimal::new(25, 1)),
                fee_amount_override: Some(Some(Decimal::from(750))),
                ..UpdateReviewCommand::new(review.id())
            })
            .await
            .unwrap();

        assert!(result.changed);
        let stored = repo.stored_by_id(review.id()).unwrap();
        assert_eq!(stored.due_date(), Some(date(2024, 1, 12)));
        assert_eq!(stored.weight_factor().value(), Decimal::new(25, 1));
        assert_eq!(stored.fee_amount_override(), Some(Decimal::from(750)));
        assert_eq!(stored.planned_date(), date(2024, 1, 1));
        assert_eq!(stored.updated_at(), Timestamp::start_of(date(2024, 1, 3)));
    }

    #[tokio::test]
    async fn invalid_input_is_collected_and_nothing_is_written() {
        let (review, repo) = stored_review();

        let err = handler(repo.clone())
            .handle(UpdateReviewCommand {
                due_date: Some(date(2023, 12, 31)),
                weight_factor: Some(Decimal::new(51, 1)),
                fee_amount_override: Some(Some(Decimal::from(750))),
                ..UpdateReviewCommand::new(review.id())
            })
            .await
            .unwrap_err();

        match err {
            UpdateReviewError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.has_field("weight_factor"));
                assert!(errors.has_field("due_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(repo.batch_sizes().is_empty());
        let stored = repo.stored_by_id(review.id()).unwrap();
        assert_eq!(stored.weight_factor(), WeightFactor::ONE);
        assert_eq!(stored.fee_amount_override(), None);
    }

    #[tokio::test]
    async fn removing_an_override() {
        let (mut review, _) = stored_review();
        review.set_fee_amount_override(Some(Decimal::from(100)), Timestamp::start_of(date(2024, 1, 2)));
        let repo = Arc::new(MockReviewRepository::with_reviews(vec![review.clone()]));

        let result = handler(repo.clone())
            .handle(UpdateReviewCommand {
                fee_amount_override: Some(None),
                ..UpdateReviewCommand::new(review.id())
            })
            .await
            .unwrap();

        assert!(result.changed);
        assert_eq!(repo.stored_by_id(review.id()).unwrap().fee_amount_override(), None);
    }

    #[tokio::test]
    async fn unchanged_values_write_nothing() {
        let (review, repo) = stored_review();

        let result = handler(repo.clone())
            .handle(UpdateReviewCommand {
                due_date: review.due_date(),
                weight_factor: Some(Decimal::ONE),
                ..UpdateReviewCommand::new(review.id())
            })
            .await
            .unwrap();

        assert!(!result.changed);
        assert!(repo.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let repo = Arc::new(MockReviewRepository::new());

        let err = handler(repo)
            .handle(UpdateReviewCommand::new(ReviewId::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateReviewError::ReviewNotFound(_)));
    }
}
