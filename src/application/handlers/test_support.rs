//! Hand-written port mocks shared by handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, ReviewId, ServiceId};
use crate::domain::review::ReviewCycle;
use crate::domain::scheduling::StageScheduleEntry;
use crate::domain::service::ServiceDefinition;
use crate::ports::{ReviewRepository, ServiceReader, StageScheduleRepository};

// ─────────────────────────────────────────────────────────────────────
// ServiceReader
// ─────────────────────────────────────────────────────────────────────

pub struct MockServiceReader {
    services: Mutex<Vec<ServiceDefinition>>,
}

impl MockServiceReader {
    pub fn empty() -> Self {
        Self {
            services: Mutex::new(Vec::new()),
        }
    }

    pub fn with_service(service: ServiceDefinition) -> Self {
        Self {
            services: Mutex::new(vec![service]),
        }
    }
}

#[async_trait]
impl ServiceReader for MockServiceReader {
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<ServiceDefinition>, DomainError> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.service_id == *id)
            .cloned())
    }
}

// ─────────────────────────────────────────────────────────────────────
// ReviewRepository
// ─────────────────────────────────────────────────────────────────────

pub struct MockReviewRepository {
    reviews: Mutex<Vec<ReviewCycle>>,
    projects: Mutex<HashMap<ServiceId, ProjectId>>,
    fail_writes: bool,
    batch_sizes: Mutex<Vec<usize>>,
}

impl MockReviewRepository {
    pub fn new() -> Self {
        Self {
            reviews: Mutex::new(Vec::new()),
            projects: Mutex::new(HashMap::new()),
            fail_writes: false,
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn with_reviews(reviews: Vec<ReviewCycle>) -> Self {
        let repo = Self::new();
        *repo.reviews.lock().unwrap() = reviews;
        repo
    }

    pub fn failing_with_reviews(reviews: Vec<ReviewCycle>) -> Self {
        let repo = Self::failing();
        *repo.reviews.lock().unwrap() = reviews;
        repo
    }

    /// Declares which project a service belongs to.
    pub fn assign(self, service_id: ServiceId, project_id: ProjectId) -> Self {
        self.projects.lock().unwrap().insert(service_id, project_id);
        self
    }

    pub fn stored(&self) -> Vec<ReviewCycle> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn stored_by_id(&self, id: ReviewId) -> Option<ReviewCycle> {
        self.reviews.lock().unwrap().iter().find(|r| r.id() == id).cloned()
    }

    /// Sizes of every batch write, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::database("Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for MockReviewRepository {
    async fn save_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        self.check_writable()?;
        self.batch_sizes.lock().unwrap().push(cycles.len());
        self.reviews.lock().unwrap().extend_from_slice(cycles);
        Ok(())
    }

    async fn update(&self, cycle: &ReviewCycle) -> Result<(), DomainError> {
        self.update_batch(std::slice::from_ref(cycle)).await
    }

    async fn update_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut reviews = self.reviews.lock().unwrap();
        for cycle in cycles {
            if !reviews.iter().any(|r| r.id() == cycle.id()) {
                return Err(DomainError::new(
                    ErrorCode::ReviewNotFound,
                    format!("Review not found: {}", cycle.id()),
                ));
            }
        }
        for cycle in cycles {
            if let Some(slot) = reviews.iter_mut().find(|r| r.id() == cycle.id()) {
                *slot = cycle.clone();
            }
        }
        self.batch_sizes.lock().unwrap().push(cycles.len());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewCycle>, DomainError> {
        Ok(self.stored_by_id(*id))
    }

    async fn find_by_service(&self, service_id: &ServiceId) -> Result<Vec<ReviewCycle>, DomainError> {
        let mut found: Vec<_> = self
            .stored()
            .into_iter()
            .filter(|r| r.service_id() == *service_id)
            .collect();
        found.sort_by_key(ReviewCycle::cycle_no);
        Ok(found)
    }

    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<ReviewCycle>, DomainError> {
        let projects = self.projects.lock().unwrap().clone();
        let mut found: Vec<_> = self
            .stored()
            .into_iter()
            .filter(|r| projects.get(&r.service_id()) == Some(project_id))
            .collect();
        found.sort_by_key(ReviewCycle::planned_date);
        Ok(found)
    }

    async fn count_by_service(&self, service_id: &ServiceId) -> Result<u32, DomainError> {
        let count = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.service_id() == *service_id)
            .count();
        Ok(count as u32)
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id() != *id);
        if reviews.len() == before {
            return Err(DomainError::new(
                ErrorCode::ReviewNotFound,
                format!("Review not found: {}", id),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────
// StageScheduleRepository
// ─────────────────────────────────────────────────────────────────────

pub struct MockStageScheduleRepository {
    entries: Mutex<HashMap<ProjectId, Vec<StageScheduleEntry>>>,
    replace_calls: Mutex<u32>,
    fail_writes: bool,
}

impl MockStageScheduleRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            replace_calls: Mutex::new(0),
            fail_writes: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn replace_calls(&self) -> u32 {
        *self.replace_calls.lock().unwrap()
    }
}

#[async_trait]
impl StageScheduleRepository for MockStageScheduleRepository {
    async fn replace_for_project(
        &self,
        project_id: &ProjectId,
        entries: &[StageScheduleEntry],
    ) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::database("Simulated write failure"));
        }
        *self.replace_calls.lock().unwrap() += 1;
        self.entries
            .lock()
            .unwrap()
            .insert(*project_id, entries.to_vec());
        Ok(())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<StageScheduleEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }
}
