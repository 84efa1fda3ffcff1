//! Review repository port.
//!
//! Persists review cycles. Batch operations are all-or-nothing: an
//! implementation either writes every row of the batch or none of them.

use crate::domain::foundation::{DomainError, ProjectId, ReviewId, ServiceId};
use crate::domain::review::ReviewCycle;
use async_trait::async_trait;

/// Repository port for review cycles.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert every cycle in one transaction.
    ///
    /// # Errors
    ///
    /// - `DuplicateReview` if a `(service_id, cycle_no)` pair already exists
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn save_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError>;

    /// Update an existing cycle.
    ///
    /// # Errors
    ///
    /// - `ReviewNotFound` if the cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, cycle: &ReviewCycle) -> Result<(), DomainError>;

    /// Update every cycle in one transaction.
    ///
    /// # Errors
    ///
    /// - `ReviewNotFound` if any cycle doesn't exist; nothing is written
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn update_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError>;

    /// Find a cycle by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewCycle>, DomainError>;

    /// All cycles of a service, ordered by `cycle_no`.
    async fn find_by_service(&self, service_id: &ServiceId) -> Result<Vec<ReviewCycle>, DomainError>;

    /// All cycles of every service in a project, ordered by planned date.
    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<ReviewCycle>, DomainError>;

    /// Number of cycles a service currently has.
    async fn count_by_service(&self, service_id: &ServiceId) -> Result<u32, DomainError>;

    /// Delete a cycle.
    ///
    /// # Errors
    ///
    /// - `ReviewNotFound` if the cycle doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError>;
}
