//! Service module - contracted services and their schedule parameters.

mod cadence;
mod definition;

pub use cadence::{Cadence, FORTNIGHTLY_DAYS, MONTHLY_DAYS, WEEKLY_DAYS};
pub use definition::{
    derive_agreed_fee, BillRule, ServiceDefinition, UnitType, AGREED_FEE_CEILING,
};

#[cfg(test)]
pub(crate) use definition::fixtures;
