//! AdjustFutureTasksHandler - moves a review and carries later siblings along.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{DomainError, ReviewId};
use crate::domain::lifecycle::{CycleGroup, Resequencer};
use crate::domain::review::ReviewCycle;
use crate::ports::{Clock, ReviewRepository};

/// Command to re-date a review.
#[derive(Debug, Clone, Copy)]
pub struct AdjustFutureTasksCommand {
    pub review_id: ReviewId,
    pub new_date: NaiveDate,
    /// Reviews that move together. Defaults to the review's own service.
    pub cycle_group: Option<CycleGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustFutureTasksResult {
    pub delta_days: i64,
    /// The moved review followed by every shifted sibling.
    pub shifted: Vec<ReviewId>,
}

#[derive(Debug, Error)]
pub enum AdjustFutureTasksError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct AdjustFutureTasksHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl AdjustFutureTasksHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdjustFutureTasksCommand,
    ) -> Result<AdjustFutureTasksResult, AdjustFutureTasksError> {
        let review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(AdjustFutureTasksError::ReviewNotFound(cmd.review_id))?;
        let group = cmd
            .cycle_group
            .unwrap_or(CycleGroup::Service(review.service_id()));

        // Read the whole group before any write.
        let mut snapshot = self.load_group(group).await?;

        let outcome =
            Resequencer::adjust_future_tasks(&mut snapshot, cmd.review_id, cmd.new_date, self.clock.now())?;

        if outcome.is_noop() {
            debug!(review_id = %cmd.review_id, "review already on requested date");
            return Ok(AdjustFutureTasksResult {
                delta_days: 0,
                shifted: Vec::new(),
            });
        }

        let changed: Vec<ReviewCycle> = snapshot
            .into_iter()
            .filter(|r| outcome.changed.contains(&r.id()))
            .collect();
        self.review_repository.update_batch(&changed).await?;

        info!(
            review_id = %cmd.review_id,
            group = ?group,
            delta_days = outcome.delta_days,
            shifted = outcome.changed.len(),
            "review resequenced"
        );

        Ok(AdjustFutureTasksResult {
            delta_days: outcome.delta_days,
            shifted: outcome.changed,
        })
    }

    async fn load_group(&self, group: CycleGroup) -> Result<Vec<ReviewCycle>, DomainError> {
        match group {
            CycleGroup::Service(service_id) => self.review_repository.find_by_service(&service_id).await,
            CycleGroup::Project(project_id) => self.review_repository.find_by_project(&project_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::application::handlers::test_support::MockReviewRepository;
    use crate::domain::foundation::{ErrorCode, ProjectId, ServiceId, Timestamp};
    use crate::domain::review::fixtures::planned_cycle;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(service_id: ServiceId, count: u32) -> Vec<ReviewCycle> {
        (0..count)
            .map(|i| planned_cycle(service_id, i + 1, date(2024, 1, 1) + Duration::days(7 * i64::from(i))))
            .collect()
    }

    fn handler(repo: Arc<MockReviewRepository>) -> AdjustFutureTasksHandler {
        AdjustFutureTasksHandler::new(repo, Arc::new(FixedClock::new(Timestamp::start_of(date(2024, 1, 1)))))
    }

    #[tokio::test]
    async fn shifts_later_siblings_of_the_same_service() {
        let service_id = ServiceId::new();
        let reviews = weekly(service_id, 4);
        let other_service = weekly(ServiceId::new(), 2);
        let moved = reviews[1].id();
        let repo = Arc::new(MockReviewRepository::with_reviews(
            reviews.iter().chain(&other_service).cloned().collect(),
        ));

        let result = handler(repo.clone())
            .handle(AdjustFutureTasksCommand {
                review_id: moved,
                new_date: date(2024, 1, 12),
                cycle_group: None,
            })
            .await
            .unwrap();

        assert_eq!(result.delta_days, 4);
        assert_eq!(result.shifted.len(), 3);
        let dates: Vec<_> = repo
            .find_by_service(&service_id)
            .await
            .unwrap()
            .iter()
            .map(ReviewCycle::planned_date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 12), date(2024, 1, 19), date(2024, 1, 26)]
        );
        for untouched in &other_service {
            assert_eq!(repo.stored_by_id(untouched.id()).unwrap(), *untouched);
        }
        assert_eq!(repo.batch_sizes(), vec![3]);
    }

    #[tokio::test]
    async fn project_group_spans_services() {
        let project_id = ProjectId::new();
        let (a, b) = (ServiceId::new(), ServiceId::new());
        let first = weekly(a, 2);
        let second = weekly(b, 2);
        let repo = Arc::new(
            MockReviewRepository::with_reviews(first.iter().chain(&second).cloned().collect())
                .assign(a, project_id)
                .assign(b, project_id),
        );

        let result = handler(repo.clone())
            .handle(AdjustFutureTasksCommand {
                review_id: first[0].id(),
                new_date: date(2024, 1, 3),
                cycle_group: Some(CycleGroup::Project(project_id)),
            })
            .await
            .unwrap();

        // Both services' 2024-01-08 reviews move; b's 2024-01-01 review does not.
        assert_eq!(result.shifted.len(), 3);
        assert_eq!(repo.stored_by_id(second[0].id()).unwrap().planned_date(), date(2024, 1, 1));
        assert_eq!(repo.stored_by_id(second[1].id()).unwrap().planned_date(), date(2024, 1, 10));
    }

    #[tokio::test]
    async fn same_date_writes_nothing() {
        let reviews = weekly(ServiceId::new(), 3);
        let repo = Arc::new(MockReviewRepository::with_reviews(reviews.clone()));

        let result = handler(repo.clone())
            .handle(AdjustFutureTasksCommand {
                review_id: reviews[0].id(),
                new_date: date(2024, 1, 1),
                cycle_group: None,
            })
            .await
            .unwrap();

        assert_eq!(result.delta_days, 0);
        assert!(repo.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn review_outside_given_group_is_an_error() {
        let reviews = weekly(ServiceId::new(), 2);
        let repo = Arc::new(MockReviewRepository::with_reviews(reviews.clone()));

        let err = handler(repo)
            .handle(AdjustFutureTasksCommand {
                review_id: reviews[0].id(),
                new_date: date(2024, 1, 5),
                cycle_group: Some(CycleGroup::Service(ServiceId::new())),
            })
            .await
            .unwrap_err();

        match err {
            AdjustFutureTasksError::Domain(e) => assert_eq!(e.code, ErrorCode::ReviewNotFound),
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let repo = Arc::new(MockReviewRepository::new());

        let err = handler(repo)
            .handle(AdjustFutureTasksCommand {
                review_id: ReviewId::new(),
                new_date: date(2024, 1, 5),
                cycle_group: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AdjustFutureTasksError::ReviewNotFound(_)));
    }
}
