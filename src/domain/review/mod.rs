//! Review module - review cycles, their status lifecycle, and fees.

mod cycle;
mod fee;
mod status;

pub use cycle::{
    InvoiceInfo, NewReviewCycle, ReviewCycle, WeightFactor, MAX_WEIGHT_FACTOR, MIN_WEIGHT_FACTOR,
};
pub use fee::{FeeAllocation, FeeAllocator, FeeSource, FEE_SCALE};
pub use status::{ReviewStatus, UnknownStatus};

#[cfg(test)]
pub(crate) use cycle::fixtures;
