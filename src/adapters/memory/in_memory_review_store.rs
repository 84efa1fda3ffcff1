//! In-Memory Review Store
//!
//! Implements every persistence port over process memory. Batch writes are
//! checked in full before anything is applied, so a rejected batch leaves
//! the store unchanged. Useful for testing and development.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, ReviewId, ServiceId};
use crate::domain::review::ReviewCycle;
use crate::domain::scheduling::StageScheduleEntry;
use crate::domain::service::ServiceDefinition;
use crate::ports::{ReviewRepository, ServiceReader, StageScheduleRepository};

#[derive(Debug, Default)]
struct State {
    services: HashMap<ServiceId, ServiceDefinition>,
    reviews: HashMap<ReviewId, ReviewCycle>,
    stages: HashMap<ProjectId, Vec<StageScheduleEntry>>,
}

/// In-memory storage for services, reviews, and stage schedules.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryReviewStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a service definition
    pub async fn upsert_service(&self, service: ServiceDefinition) {
        self.state
            .write()
            .await
            .services
            .insert(service.service_id, service);
    }

    /// Number of stored reviews across all services
    pub async fn review_count(&self) -> usize {
        self.state.read().await.reviews.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.services.clear();
        state.reviews.clear();
        state.stages.clear();
    }
}

fn not_found(id: &ReviewId) -> DomainError {
    DomainError::new(ErrorCode::ReviewNotFound, format!("Review not found: {}", id))
}

#[async_trait]
impl ServiceReader for InMemoryReviewStore {
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<ServiceDefinition>, DomainError> {
        Ok(self.state.read().await.services.get(id).cloned())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewStore {
    async fn save_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let mut taken: HashSet<(ServiceId, u32)> = state
            .reviews
            .values()
            .map(|r| (r.service_id(), r.cycle_no()))
            .collect();
        for cycle in cycles {
            if state.reviews.contains_key(&cycle.id())
                || !taken.insert((cycle.service_id(), cycle.cycle_no()))
            {
                return Err(DomainError::new(
                    ErrorCode::DuplicateReview,
                    format!(
                        "Review {} already exists for service {}",
                        cycle.cycle_no(),
                        cycle.service_id()
                    ),
                ));
            }
        }

        for cycle in cycles {
            state.reviews.insert(cycle.id(), cycle.clone());
        }
        Ok(())
    }

    async fn update(&self, cycle: &ReviewCycle) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let slot = state.reviews.get_mut(&cycle.id()).ok_or_else(|| not_found(&cycle.id()))?;
        *slot = cycle.clone();
        Ok(())
    }

    async fn update_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if let Some(missing) = cycles.iter().find(|c| !state.reviews.contains_key(&c.id())) {
            return Err(not_found(&missing.id()));
        }
        for cycle in cycles {
            state.reviews.insert(cycle.id(), cycle.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewCycle>, DomainError> {
        Ok(self.state.read().await.reviews.get(id).cloned())
    }

    async fn find_by_service(&self, service_id: &ServiceId) -> Result<Vec<ReviewCycle>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<_> = state
            .reviews
            .values()
            .filter(|r| r.service_id() == *service_id)
            .cloned()
            .collect();
        found.sort_by_key(ReviewCycle::cycle_no);
        Ok(found)
    }

    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<ReviewCycle>, DomainError> {
        let state = self.state.read().await;
        let mut found: Vec<_> = state
            .reviews
            .values()
            .filter(|r| {
                state
                    .services
                    .get(&r.service_id())
                    .map_or(false, |s| s.project_id == *project_id)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (a.planned_date(), a.cycle_no()).cmp(&(b.planned_date(), b.cycle_no()))
        });
        Ok(found)
    }

    async fn count_by_service(&self, service_id: &ServiceId) -> Result<u32, DomainError> {
        let state = self.state.read().await;
        let count = state
            .reviews
            .values()
            .filter(|r| r.service_id() == *service_id)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .reviews
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl StageScheduleRepository for InMemoryReviewStore {
    async fn replace_for_project(
        &self,
        project_id: &ProjectId,
        entries: &[StageScheduleEntry],
    ) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .stages
            .insert(*project_id, entries.to_vec());
        Ok(())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<StageScheduleEntry>, DomainError> {
        let state = self.state.read().await;
        let mut entries = state.stages.get(project_id).cloned().unwrap_or_default();
        entries.sort_by_key(|e| e.planned_date);
        Ok(entries)
    }
}
