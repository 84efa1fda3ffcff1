//! GenerateStageScheduleHandler - replaces a project's stage-based schedule.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{DomainError, ProjectId, ValidationErrors};
use crate::domain::scheduling::{build_stage_schedule, StageSpec};
use crate::domain::validation::ValidationLimits;
use crate::ports::{Clock, StageScheduleRepository};

/// Command to schedule reviews by design stage.
#[derive(Debug, Clone)]
pub struct GenerateStageScheduleCommand {
    pub project_id: ProjectId,
    pub stages: Vec<StageSpec>,
}

/// Result of stage scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateStageScheduleResult {
    /// False when no stage asked for any review; nothing was written.
    pub scheduled: bool,
    pub entry_count: usize,
}

#[derive(Debug, Error)]
pub enum GenerateStageScheduleError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct GenerateStageScheduleHandler {
    stage_repository: Arc<dyn StageScheduleRepository>,
    clock: Arc<dyn Clock>,
    limits: ValidationLimits,
}

impl GenerateStageScheduleHandler {
    pub fn new(stage_repository: Arc<dyn StageScheduleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            stage_repository,
            clock,
            limits: ValidationLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub async fn handle(
        &self,
        cmd: GenerateStageScheduleCommand,
    ) -> Result<GenerateStageScheduleResult, GenerateStageScheduleError> {
        let entries = build_stage_schedule(cmd.project_id, &cmd.stages, &self.limits, self.clock.now())?;

        if entries.is_empty() {
            debug!(project_id = %cmd.project_id, "no stage reviews to schedule");
            return Ok(GenerateStageScheduleResult {
                scheduled: false,
                entry_count: 0,
            });
        }

        self.stage_repository
            .replace_for_project(&cmd.project_id, &entries)
            .await?;

        info!(
            project_id = %cmd.project_id,
            stages = cmd.stages.len(),
            entries = entries.len(),
            "stage schedule replaced"
        );

        Ok(GenerateStageScheduleResult {
            scheduled: true,
            entry_count: entries.len(),
        })
    }
}
