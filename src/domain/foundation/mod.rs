//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the review-cycle domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{
    DomainError, ErrorCode, InvalidTransitionError, ValidationError, ValidationErrors,
};
pub use ids::{Actor, ProjectId, ReviewId, ServiceId, StageEntryId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
