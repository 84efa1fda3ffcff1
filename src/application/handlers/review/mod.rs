//! Review handlers.
//!
//! Edits, status changes, date refreshes, resequencing, and billing of existing reviews.

mod adjust_future_tasks;
mod clear_status_override;
mod delete_review;
mod record_invoice;
mod set_review_status;
mod update_review;
mod update_statuses_by_date;

pub use adjust_future_tasks::{
    AdjustFutureTasksCommand, AdjustFutureTasksError, AdjustFutureTasksHandler,
    AdjustFutureTasksResult,
};
pub use clear_status_override::{
    ClearStatusOverrideCommand, ClearStatusOverrideError, ClearStatusOverrideHandler,
    ClearStatusOverrideResult,
};
pub use delete_review::{DeleteReviewCommand, DeleteReviewError, DeleteReviewHandler};
pub use record_invoice::{RecordInvoiceCommand, RecordInvoiceError, RecordInvoiceHandler};
pub use set_review_status::{
    SetReviewStatusCommand, SetReviewStatusError, SetReviewStatusHandler, SetReviewStatusResult,
};
pub use update_review::{
    UpdateReviewCommand, UpdateReviewError, UpdateReviewHandler, UpdateReviewResult,
};
pub use update_statuses_by_date::{
    UpdateStatusesByDateCommand, UpdateStatusesByDateError, UpdateStatusesByDateHandler,
};
