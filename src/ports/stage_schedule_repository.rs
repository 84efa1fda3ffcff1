//! Stage schedule repository port.

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::scheduling::StageScheduleEntry;
use async_trait::async_trait;

/// Persists a project's stage-based review schedule.
#[async_trait]
pub trait StageScheduleRepository: Send + Sync {
    /// Replace the project's schedule with `entries` in one transaction.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; the old schedule is kept
    async fn replace_for_project(
        &self,
        project_id: &ProjectId,
        entries: &[StageScheduleEntry],
    ) -> Result<(), DomainError>;

    /// The project's current schedule, ordered by planned date.
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<StageScheduleEntry>, DomainError>;
}
