//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `service` - Contracted services and their schedule parameters
//! - `review` - Review cycles, status lifecycle, and fee allocation
//! - `scheduling` - Date distribution, cycle generation, stage schedules
//! - `lifecycle` - Status engine and resequencing of existing reviews
//! - `validation` - Input validation gate for services and reviews

pub mod foundation;
pub mod lifecycle;
pub mod review;
pub mod scheduling;
pub mod service;
pub mod validation;
