//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresServiceReader` - Reads `project_services`
//! - `PostgresReviewRepository` - Persists `service_reviews`, batches in one transaction
//! - `PostgresStageScheduleRepository` - Replaces `stage_review_schedule` per project

mod review_repository;
mod service_reader;
mod stage_schedule_repository;

pub use review_repository::PostgresReviewRepository;
pub use service_reader::PostgresServiceReader;
pub use stage_schedule_repository::PostgresStageScheduleRepository;
