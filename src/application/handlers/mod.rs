//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod review;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use review::{
    AdjustFutureTasksCommand, AdjustFutureTasksError, AdjustFutureTasksHandler,
    AdjustFutureTasksResult, ClearStatusOverrideCommand, ClearStatusOverrideError,
    ClearStatusOverrideHandler, ClearStatusOverrideResult, DeleteReviewCommand, DeleteReviewError,
    DeleteReviewHandler, RecordInvoiceCommand, RecordInvoiceError, RecordInvoiceHandler,
    SetReviewStatusCommand, SetReviewStatusError, SetReviewStatusHandler, SetReviewStatusResult,
    UpdateReviewCommand, UpdateReviewError, UpdateReviewHandler, UpdateReviewResult,
    UpdateStatusesByDateCommand, UpdateStatusesByDateError, UpdateStatusesByDateHandler,
};
pub use schedule::{
    GenerateReviewCyclesCommand, GenerateReviewCyclesError, GenerateReviewCyclesHandler,
    GenerateReviewCyclesResult, GenerateStageScheduleCommand, GenerateStageScheduleError,
    GenerateStageScheduleHandler, GenerateStageScheduleResult, RecalculateServiceFeesCommand,
    RecalculateServiceFeesError, RecalculateServiceFeesHandler, RecalculateServiceFeesResult,
};
