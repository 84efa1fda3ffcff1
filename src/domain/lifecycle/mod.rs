//! Lifecycle module - status changes and date resequencing of existing reviews.

mod resequencer;
mod status_engine;

pub use resequencer::{CycleGroup, ResequenceOutcome, Resequencer};
pub use status_engine::{AutomatedChange, RefreshCounts, RefreshOutcome, StatusEngine};
