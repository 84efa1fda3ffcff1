//! Schedule handlers.
//!
//! Creating review cycles and stage schedules, and pricing them.

mod generate_review_cycles;
mod generate_stage_schedule;
mod recalculate_service_fees;

pub use generate_review_cycles::{
    GenerateReviewCyclesCommand, GenerateReviewCyclesError, GenerateReviewCyclesHandler,
    GenerateReviewCyclesResult,
};
pub use generate_stage_schedule::{
    GenerateStageScheduleCommand, GenerateStageScheduleError, GenerateStageScheduleHandler,
    GenerateStageScheduleResult,
};
pub use recalculate_service_fees::{
    RecalculateServiceFeesCommand, RecalculateServiceFeesError, RecalculateServiceFeesHandler,
    RecalculateServiceFeesResult,
};
