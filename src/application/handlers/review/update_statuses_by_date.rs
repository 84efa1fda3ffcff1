//! UpdateStatusesByDateHandler - the date-driven status refresh of a project.
//!
//! Safe to run on a schedule: a second run with the same clock changes
//! nothing, and manually pinned reviews are left alone by default.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::lifecycle::{RefreshCounts, StatusEngine};
use crate::domain::review::ReviewCycle;
use crate::ports::{Clock, ReviewRepository};

#[derive(Debug, Clone, Copy)]
pub struct UpdateStatusesByDateCommand {
    pub project_id: ProjectId,
    /// Skip reviews whose status was set manually.
    pub respect_overrides: bool,
}

impl UpdateStatusesByDateCommand {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            respect_overrides: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateStatusesByDateError {
    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct UpdateStatusesByDateHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateStatusesByDateHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateStatusesByDateCommand,
    ) -> Result<RefreshCounts, UpdateStatusesByDateError> {
        let mut reviews = self
            .review_repository
            .find_by_project(&cmd.project_id)
            .await?;

        let outcome =
            StatusEngine::auto_refresh_by_date(&mut reviews, self.clock.now(), cmd.respect_overrides);

        if outcome.updated.is_empty() {
            debug!(
                project_id = %cmd.project_id,
                skipped = outcome.counts.skipped_count,
                "no review statuses changed"
            );
            return Ok(outcome.counts);
        }

        let changed: Vec<ReviewCycle> = reviews
            .into_iter()
            .filter(|r| outcome.updated.contains(&r.id()))
            .collect();
        self.review_repository.update_batch(&changed).await?;

        info!(
            project_id = %cmd.project_id,
            updated = outcome.counts.updated_count,
            skipped = outcome.counts.skipped_count,
            "review statuses refreshed by date"
        );

        Ok(outcome.counts)
    }
}
