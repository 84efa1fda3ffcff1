//! Validation gate - rejects malformed service and review input.
//!
//! Rules are collected rather than fail-fast so a caller can fix every
//! problem in one round trip. Status transitions are checked against
//! [`ReviewStatus`](crate::domain::review::ReviewStatus)'s own table.

mod review_rules;
mod service_rules;

use rust_decimal::Decimal;

use crate::domain::service::AGREED_FEE_CEILING;

pub use review_rules::{validate_review, validate_status_transition, ReviewFields, ReviewInput};
pub use service_rules::{validate_service, ServiceInput};

/// Largest accepted `unit_qty`.
pub const MAX_UNIT_QTY: i64 = 1000;

/// Numeric bounds enforced by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_unit_qty: i64,
    pub agreed_fee_ceiling: Decimal,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_unit_qty: MAX_UNIT_QTY,
            agreed_fee_ceiling: AGREED_FEE_CEILING,
        }
    }
}
