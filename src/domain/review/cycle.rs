//! ReviewCycle - one scheduled occurrence of a service's recurring review.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Actor, ReviewId, ServiceId, Timestamp, ValidationError,
};

use super::{FeeAllocation, FeeSource, ReviewStatus};

/// Lowest accepted weight factor.
pub const MIN_WEIGHT_FACTOR: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Highest accepted weight factor.
pub const MAX_WEIGHT_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Relative effort of a cycle, used for weighted fee allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightFactor(Decimal);

impl WeightFactor {
    /// Neutral weight.
    pub const ONE: WeightFactor = WeightFactor(Decimal::ONE);

    /// Creates a weight factor, rejecting values outside `[0.1, 5.0]`.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value < MIN_WEIGHT_FACTOR || value > MAX_WEIGHT_FACTOR {
            return Err(ValidationError::out_of_range(
                "weight_factor",
                MIN_WEIGHT_FACTOR,
                MAX_WEIGHT_FACTOR,
                value,
            ));
        }
        Ok(Self(value))
    }

    /// Returns the value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for WeightFactor {
    fn default() -> Self {
        Self::ONE
    }
}

/// Invoice details recorded once a cycle has been billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvoiceInfo {
    pub invoice_date: Option<NaiveDate>,
    pub invoice_reference: Option<String>,
    pub is_billed: bool,
}

/// A single dated review belonging to a service.
///
/// Rows are created once by the cycle generator and afterwards only changed
/// through the status engine, the resequencer, fee reallocation, or invoice
/// recording. Each of those touches a disjoint set of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCycle {
    id: ReviewId,
    service_id: ServiceId,
    cycle_no: u32,
    planned_date: NaiveDate,
    due_date: Option<NaiveDate>,
    status: ReviewStatus,
    status_override: bool,
    status_override_by: Option<Actor>,
    status_override_at: Option<Timestamp>,
    disciplines: Option<String>,
    deliverables: Option<String>,
    phase: Option<String>,
    weight_factor: WeightFactor,
    fee: Option<Decimal>,
    fee_source: FeeSource,
    fee_amount_override: Option<Decimal>,
    invoice: InvoiceInfo,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Values a freshly generated cycle starts from.
#[derive(Debug, Clone)]
pub struct NewReviewCycle {
    pub service_id: ServiceId,
    pub cycle_no: u32,
    pub planned_date: NaiveDate,
    pub due_date: NaiveDate,
    pub disciplines: Option<String>,
    pub deliverables: Option<String>,
    pub phase: Option<String>,
    pub fee: FeeAllocation,
}

impl ReviewCycle {
    /// Creates a new planned cycle with no override and neutral weight.
    pub fn planned(new: NewReviewCycle, now: Timestamp) -> Self {
        Self {
            id: ReviewId::new(),
            service_id: new.service_id,
            cycle_no: new.cycle_no,
            planned_date: new.planned_date,
            due_date: Some(new.due_date.max(new.planned_date)),
            status: ReviewStatus::Planned,
            status_override: false,
            status_override_by: None,
            status_override_at: None,
            disciplines: new.disciplines,
            deliverables: new.deliverables,
            phase: new.phase,
            weight_factor: WeightFactor::ONE,
            fee: new.fee.fee,
            fee_source: new.fee.source,
            fee_amount_override: None,
            invoice: InvoiceInfo::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a cycle from persisted data.
    ///
    /// Used by repository implementations; performs no validation.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ReviewId,
        service_id: ServiceId,
        cycle_no: u32,
        planned_date: NaiveDate,
        due_date: Option<NaiveDate>,
        status: ReviewStatus,
        status_override: bool,
        status_override_by: Option<Actor>,
        status_override_at: Option<Timestamp>,
        disciplines: Option<String>,
        deliverables: Option<String>,
        phase: Option<String>,
        weight_factor: WeightFactor,
        fee: Option<Decimal>,
        fee_source: FeeSource,
        fee_amount_override: Option<Decimal>,
        invoice: InvoiceInfo,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            service_id,
            cycle_no,
            planned_date,
            due_date,
            status,
            status_override,
            status_override_by,
            status_override_at,
            disciplines,
            deliverables,
            phase,
            weight_factor,
            fee,
            fee_source,
            fee_amount_override,
            invoice,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> ReviewId {
        self.id
    }

    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    pub fn cycle_no(&self) -> u32 {
        self.cycle_no
    }

    pub fn planned_date(&self) -> NaiveDate {
        self.planned_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Date the status engine treats as the deadline.
    ///
    /// Rows without a due date fall back to their planned date.
    pub fn effective_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.planned_date)
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Returns true if a person pinned the current status.
    pub fn is_status_overridden(&self) -> bool {
        self.status_override
    }

    pub fn status_override_by(&self) -> Option<&Actor> {
        self.status_override_by.as_ref()
    }

    pub fn status_override_at(&self) -> Option<Timestamp> {
        self.status_override_at
    }

    pub fn disciplines(&self) -> Option<&str> {
        self.disciplines.as_deref()
    }

    pub fn deliverables(&self) -> Option<&str> {
        self.deliverables.as_deref()
    }

    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    pub fn weight_factor(&self) -> WeightFactor {
        self.weight_factor
    }

    pub fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    pub fn fee_source(&self) -> FeeSource {
        self.fee_source
    }

    pub fn fee_amount_override(&self) -> Option<Decimal> {
        self.fee_amount_override
    }

    pub fn invoice(&self) -> &InvoiceInfo {
        &self.invoice
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations (each touches only its own fields)
    // ───────────────────────────────────────────────────────────────

    /// Sets the status and pins it with override metadata.
    pub(crate) fn pin_status(&mut self, status: ReviewStatus, actor: Actor, now: Timestamp) {
        self.status = status;
        self.status_override = true;
        self.status_override_by = Some(actor);
        self.status_override_at = Some(now);
        self.updated_at = now;
    }

    /// Sets the status without touching override metadata.
    pub(crate) fn set_status(&mut self, status: ReviewStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
    }

    /// Clears the override flag and its metadata; status is kept.
    pub(crate) fn unpin_status(&mut self, now: Timestamp) {
        self.status_override = false;
        self.status_override_by = None;
        self.status_override_at = None;
        self.updated_at = now;
    }

    /// Shifts planned and due dates by `days`.
    pub(crate) fn shift_dates(&mut self, days: i64, now: Timestamp) {
        let delta = chrono::Duration::days(days);
        self.planned_date += delta;
        self.due_date = self.due_date.map(|d| d + delta);
        self.updated_at = now;
    }

    /// Replaces the computed fee and its provenance.
    pub(crate) fn apply_fee(&mut self, allocation: FeeAllocation, now: Timestamp) {
        self.fee = allocation.fee;
        self.fee_source = allocation.source;
        self.updated_at = now;
    }

    /// Sets a per-cycle fee override; takes effect at the next allocation.
    pub(crate) fn set_fee_amount_override(&mut self, fee: Option<Decimal>, now: Timestamp) {
        self.fee_amount_override = fee;
        self.updated_at = now;
    }

    /// Sets the weight used by weighted allocation.
    pub(crate) fn set_weight_factor(&mut self, weight: WeightFactor, now: Timestamp) {
        self.weight_factor = weight;
        self.updated_at = now;
    }

    /// Moves the due date; the planned date is left alone.
    pub(crate) fn set_due_date(&mut self, due_date: Option<NaiveDate>, now: Timestamp) {
        self.due_date = due_date;
        self.updated_at = now;
    }

    /// Marks the cycle as billed.
    pub(crate) fn record_invoice(
        &mut self,
        invoice_date: NaiveDate,
        invoice_reference: Option<String>,
        now: Timestamp,
    ) {
        self.invoice = InvoiceInfo {
            invoice_date: Some(invoice_date),
            invoice_reference,
            is_billed: true,
        };
        self.updated_at = now;
    }
}
