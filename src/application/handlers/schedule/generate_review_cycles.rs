//! GenerateReviewCyclesHandler - creates the dated review cycles of a service.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{DomainError, ServiceId, ValidationErrors};
use crate::domain::review::ReviewCycle;
use crate::domain::scheduling::CycleGenerator;
use crate::domain::validation::{validate_service, ServiceInput, ValidationLimits};
use crate::ports::{Clock, ReviewRepository, ServiceReader};

/// Command to generate a service's review cycles.
///
/// Every `Some` field overrides the stored service before validation.
#[derive(Debug, Clone)]
pub struct GenerateReviewCyclesCommand {
    pub service_id: ServiceId,
    pub unit_qty: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cadence: Option<String>,
    pub disciplines: Option<String>,
}

impl GenerateReviewCyclesCommand {
    /// Generates from the stored service as-is.
    pub fn for_service(service_id: ServiceId) -> Self {
        Self {
            service_id,
            unit_qty: None,
            start_date: None,
            end_date: None,
            cadence: None,
            disciplines: None,
        }
    }
}

/// Result of cycle generation.
#[derive(Debug, Clone)]
pub struct GenerateReviewCyclesResult {
    /// The persisted cycles, numbered from 1. Empty when there was nothing to generate.
    pub cycles: Vec<ReviewCycle>,
}

/// Error type for cycle generation.
#[derive(Debug, Error)]
pub enum GenerateReviewCyclesError {
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceId),

    #[error("Service {service_id} already has {existing} review cycles")]
    AlreadyGenerated { service_id: ServiceId, existing: u32 },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

/// Handler for generating review cycles.
pub struct GenerateReviewCyclesHandler {
    service_reader: Arc<dyn ServiceReader>,
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
    generator: CycleGenerator,
    limits: ValidationLimits,
}

impl GenerateReviewCyclesHandler {
    pub fn new(
        service_reader: Arc<dyn ServiceReader>,
        review_repository: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service_reader,
            review_repository,
            clock,
            generator: CycleGenerator::default(),
            limits: ValidationLimits::default(),
        }
    }

    pub fn with_generator(mut self, generator: CycleGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub async fn handle(
        &self,
        cmd: GenerateReviewCyclesCommand,
    ) -> Result<GenerateReviewCyclesResult, GenerateReviewCyclesError> {
        // 1. Load the service
        let stored = self
            .service_reader
            .find_by_id(&cmd.service_id)
            .await?
            .ok_or(GenerateReviewCyclesError::ServiceNotFound(cmd.service_id))?;

        // 2. Overlay request parameters
        let mut input = ServiceInput::from(&stored);
        if let Some(qty) = cmd.unit_qty {
            input.unit_qty = Some(qty);
        }
        if cmd.start_date.is_some() {
            input.schedule_start = cmd.start_date;
        }
        if cmd.end_date.is_some() {
            input.schedule_end = cmd.end_date;
        }
        if cmd.cadence.is_some() {
            input.schedule_frequency = cmd.cadence;
        }
        if cmd.disciplines.is_some() {
            input.disciplines = cmd.disciplines;
        }

        if input.unit_qty.map_or(true, |qty| qty <= 0) {
            debug!(service_id = %cmd.service_id, "no units to schedule");
            return Ok(GenerateReviewCyclesResult { cycles: Vec::new() });
        }

        // 3. Validate
        let service = validate_service(&input, &self.limits)?;

        // 4. Refuse to stack a second cycle set on the first
        let existing = self
            .review_repository
            .count_by_service(&service.service_id)
            .await?;
        if existing > 0 {
            return Err(GenerateReviewCyclesError::AlreadyGenerated {
                service_id: service.service_id,
                existing,
            });
        }

        // 5. Generate and persist atomically
        let cycles = self
            .generator
            .generate(&service, self.clock.now())
            .map_err(ValidationErrors::from)?;

        self.review_repository.save_batch(&cycles).await?;

        info!(
            service_id = %service.service_id,
            cadence = %service.schedule_frequency,
            count = cycles.len(),
            "generated review cycles"
        );

        Ok(GenerateReviewCyclesResult { cycles })
    }
}
