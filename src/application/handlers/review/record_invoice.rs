//! RecordInvoiceHandler - marks a review as billed.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::{DomainError, ReviewId};
use crate::domain::review::ReviewCycle;
use crate::ports::{Clock, ReviewRepository};

#[derive(Debug, Clone)]
pub struct RecordInvoiceCommand {
    pub review_id: ReviewId,
    pub invoice_date: NaiveDate,
    pub invoice_reference: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecordInvoiceError {
    #[error("Review not found: {0}")]
    ReviewNotFound(ReviewId),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

pub struct RecordInvoiceHandler {
    review_repository: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl RecordInvoiceHandler {
    pub fn new(review_repository: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            review_repository,
            clock,
        }
    }

    /// Records the invoice. A second call replaces the earlier details.
    pub async fn handle(&self, cmd: RecordInvoiceCommand) -> Result<ReviewCycle, RecordInvoiceError> {
        let mut review = self
            .review_repository
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or(RecordInvoiceError::ReviewNotFound(cmd.review_id))?;

        if review.invoice().is_billed {
            warn!(
                review_id = %cmd.review_id,
                previous = ?review.invoice().invoice_reference,
                "replacing existing invoice details"
            );
        }

        let reference = cmd
            .invoice_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        review.record_invoice(cmd.invoice_date, reference, self.clock.now());
        self.review_repository.update(&review).await?;

        info!(
            review_id = %cmd.review_id,
            invoice_date = %cmd.invoice_date,
            fee = ?review.fee(),
            "invoice recorded"
        );
        Ok(review)
    }
}
