//! RecalculateServiceFeesHandler - re-prices every cycle of a service.
//!
//! Run after an agreed fee, a weight factor, or a per-cycle override
//! changes. Weighted allocation applies once any weight differs from 1.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DomainError, ServiceId};
use crate::domain::review::{FeeAllocator, ReviewCycle};
use crate::ports::{Clock, ReviewRepository, ServiceReader};

#[derive(Debug, Clone)]
pub struct RecalculateServiceFeesCommand {
    pub service_id: ServiceId,
}

#[derive(Debug, Clone)]
pub struct RecalculateServiceFeesResult {
    /// Every cycle of the service with its new fee, ordered by cycle number.
    pub cycles: Vec<ReviewCycle>,
    pub agreed_fee: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum RecalculateServiceFeesError {
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct RecalculateServiceFeesHandler {
    service_reader: Arc<dyn ServiceReader>,
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl RecalculateServiceFeesHandler {
    pub fn new(
        service_reader: Arc<dyn ServiceReader>,
        review_repository: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service_reader,
            review_repository,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecalculateServiceFeesCommand,
    ) -> Result<RecalculateServiceFeesResult, RecalculateServiceFeesError> {
        let service = self
            .service_reader
            .find_by_id(&cmd.service_id)
            .await?
            .ok_or(RecalculateServiceFeesError::ServiceNotFound(cmd.service_id))?;

        let mut cycles = self
            .review_repository
            .find_by_service(&cmd.service_id)
            .await?;
        let agreed_fee = service.effective_agreed_fee();

        if cycles.is_empty() {
            return Ok(RecalculateServiceFeesResult { cycles, agreed_fee });
        }

        let inputs: Vec<_> = cycles
            .iter()
            .map(|c| (c.weight_factor().value(), c.fee_amount_override()))
            .collect();
        let allocations = FeeAllocator::allocate_service_fees(agreed_fee, &inputs);

        let now = self.clock.now();
        for (cycle, allocation) in cycles.iter_mut().zip(allocations) {
            cycle.apply_fee(allocation, now);
        }

        self.review_repository.update_batch(&cycles).await?;

        info!(
            service_id = %cmd.service_id,
            cycles = cycles.len(),
            agreed_fee = ?agreed_fee,
            "service fees recalculated"
        );

        Ok(RecalculateServiceFeesResult { cycles, agreed_fee })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::application::handlers::test_support::{MockReviewRepository, MockServiceReader};
    use crate::domain::foundation::Timestamp;
    use crate::domain::review::fixtures::planned_cycle;
    use crate::domain::review::{FeeSource, WeightFactor};
    use crate::domain::service::fixtures::weekly_service;
    use crate::domain::service::ServiceDefinition;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycles_for(service: &ServiceDefinition, count: u32) -> Vec<ReviewCycle> {
        (0..count)
            .map(|i| {
                planned_cycle(
                    service.service_id,
                    i + 1,
                    date(2024, 1, 1) + Duration::days(7 * i64::from(i)),
                )
            })
            .collect()
    }

    fn handler(service: ServiceDefinition, repo: Arc<MockReviewRepository>) -> RecalculateServiceFeesHandler {
        RecalculateServiceFeesHandler::new(
            Arc::new(MockServiceReader::with_service(service)),
            repo,
            Arc::new(FixedClock::new(Timestamp::start_of(date(2024, 1, 1)))),
        )
    }

    #[tokio::test]
    async fn unweighted_cycles_get_equal_split() {
        let service = ServiceDefinition {
            agreed_fee: Some(Decimal::from(2400)),
            ..weekly_service()
        };
        let repo = Arc::new(MockReviewRepository::with_reviews(cycles_for(&service, 12)));

        let result = handler(service.clone(), repo.clone())
            .handle(RecalculateServiceFeesCommand { service_id: service.service_id })
            .await
            .unwrap();

        assert_eq!(result.cycles.len(), 12);
        for cycle in repo.stored() {
            assert_eq!(cycle.fee(), Some(Decimal::from(200)));
            assert_eq!(cycle.fee_source(), FeeSource::EqualSplit);
        }
        assert_eq!(repo.batch_sizes(), vec![12]);
    }

    #[tokio::test]
    async fn weights_and_overrides_take_priority() {
        let service = ServiceDefinition {
            agreed_fee: Some(Decimal::from(1000)),
            ..weekly_service()
        };
        let now = Timestamp::start_of(date(2024, 1, 1));
        let mut cycles = cycles_for(&service, 3);
        cycles[0].set_weight_factor(WeightFactor::try_new(Decimal::from(2)).unwrap(), now);
        cycles[2].set_fee_amount_override(Some(Decimal::ZERO), now);
        let repo = Arc::new(MockReviewRepository::with_reviews(cycles));

        let result = handler(service.clone(), repo)
            .handle(RecalculateServiceFeesCommand { service_id: service.service_id })
            .await
            .unwrap();

        // weights 2,1,1 → 500, 250, (override 0)
        assert_eq!(result.cycles[0].fee(), Some(Decimal::from(500)));
        assert_eq!(result.cycles[0].fee_source(), FeeSource::Weighted);
        assert_eq!(result.cycles[1].fee(), Some(Decimal::from(250)));
        assert_eq!(result.cycles[2].fee(), Some(Decimal::ZERO));
        assert_eq!(result.cycles[2].fee_source(), FeeSource::Override);
    }

    #[tokio::test]
    async fn service_without_cycles_writes_nothing() {
        let service = weekly_service();
        let repo = Arc::new(MockReviewRepository::new());

        let result = handler(service.clone(), repo.clone())
            .handle(RecalculateServiceFeesCommand { service_id: service.service_id })
            .await
            .unwrap();

        assert!(result.cycles.is_empty());
        assert!(repo.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let repo = Arc::new(MockReviewRepository::new());
        let err = handler(weekly_service(), repo)
            .handle(RecalculateServiceFeesCommand { service_id: ServiceId::new() })
            .await
            .unwrap_err();

        assert!(matches!(err, RecalculateServiceFeesError::ServiceNotFound(_)));
    }
}
