//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers take their ports as `Arc<dyn ...>` and read the time from `Clock`.

pub mod handlers;

pub use handlers::*;
