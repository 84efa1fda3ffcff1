//! Scheduling module - dating review cycles and stage reviews.

mod distribution;
mod generator;
mod stage;

pub use distribution::{distribute_inclusive, distribute_stage, fixed_interval};
pub use generator::{
    CycleGenerator, ScheduleSettings, DEFAULT_DISPLAY_HORIZON_DAYS, DEFAULT_TURNAROUND_DAYS,
};
pub use stage::{build_stage_schedule, StageScheduleEntry, StageSpec};
