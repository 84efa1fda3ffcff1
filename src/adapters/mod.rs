//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed repositories
//! - `memory` - In-memory store implementing every persistence port
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod memory;
pub mod postgres;

pub use clock::{FixedClock, SystemClock};
pub use memory::InMemoryReviewStore;
pub use postgres::{
    PostgresReviewRepository, PostgresServiceReader, PostgresStageScheduleRepository,
};
