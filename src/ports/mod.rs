//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ServiceReader` - Read access to contracted services
//! - `ReviewRepository` - Review cycle persistence with atomic batches
//! - `StageScheduleRepository` - Stage-based schedule persistence
//!
//! ## Time
//!
//! - `Clock` - Current time for handlers

mod clock;
mod review_repository;
mod service_reader;
mod stage_schedule_repository;

pub use clock::Clock;
pub use review_repository::ReviewRepository;
pub use service_reader::ServiceReader;
pub use stage_schedule_repository::StageScheduleRepository;
