//! PostgreSQL implementation of ReviewRepository.
//!
//! Batches run in a single transaction; a failure on any row rolls back
//! the whole batch.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, ProjectId, ReviewId, ServiceId, Timestamp,
};
use crate::domain::review::{FeeSource, InvoiceInfo, ReviewCycle, ReviewStatus, WeightFactor};
use crate::ports::ReviewRepository;

const REVIEW_COLUMNS: &str = r#"
    r.review_id, r.service_id, r.cycle_no, r.planned_date, r.due_date, r.status,
    r.status_override, r.status_override_by, r.status_override_at,
    r.disciplines, r.deliverables, r.phase, r.weight_factor,
    r.fee, r.fee_source, r.fee_amount_override,
    r.invoice_date, r.invoice_reference, r.is_billed,
    r.created_at, r.updated_at
"#;

/// PostgreSQL implementation of ReviewRepository.
#[derive(Clone)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn save_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        if cycles.is_empty() {
            return Ok(());
        }
        let mut tx = self.begin().await?;

        for cycle in cycles {
            insert_review(&mut tx, cycle).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(count = cycles.len(), "review batch inserted");
        Ok(())
    }

    async fn update(&self, cycle: &ReviewCycle) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        update_review(&mut tx, cycle).await?;
        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit transaction: {}", e)))
    }

    async fn update_batch(&self, cycles: &[ReviewCycle]) -> Result<(), DomainError> {
        if cycles.is_empty() {
            return Ok(());
        }
        let mut tx = self.begin().await?;

        for cycle in cycles {
            update_review(&mut tx, cycle).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(count = cycles.len(), "review batch updated");
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewCycle>, DomainError> {
        let sql = format!("SELECT {} FROM service_reviews r WHERE r.review_id = $1", REVIEW_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch review: {}", e)))?;

        row.map(row_to_review).transpose()
    }

    async fn find_by_service(&self, service_id: &ServiceId) -> Result<Vec<ReviewCycle>, DomainError> {
        let sql = format!(
            "SELECT {} FROM service_reviews r WHERE r.service_id = $1 ORDER BY r.cycle_no",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(service_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch reviews: {}", e)))?;

        rows.into_iter().map(row_to_review).collect()
    }

    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<ReviewCycle>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM service_reviews r
            JOIN project_services s ON s.service_id = r.service_id
            WHERE s.project_id = $1
            ORDER BY r.planned_date, r.service_id, r.cycle_no
            "#,
            REVIEW_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(project_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch project reviews: {}", e)))?;

        rows.into_iter().map(row_to_review).collect()
    }

    async fn count_by_service(&self, service_id: &ServiceId) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM service_reviews WHERE service_id = $1")
            .bind(service_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count reviews: {}", e)))?;

        Ok(u32::try_from(result.0).unwrap_or(u32::MAX))
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM service_reviews WHERE review_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete review: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ReviewNotFound,
                format!("Review not found: {}", id),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Statements
// ════════════════════════════════════════════════════════════════════════════════

async fn insert_review(
    tx: &mut Transaction<'static, Postgres>,
    cycle: &ReviewCycle,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        INSERT INTO service_reviews (
            review_id, service_id, cycle_no, planned_date, due_date, status,
            status_override, status_override_by, status_override_at,
            disciplines, deliverables, phase, weight_factor,
            fee, fee_source, fee_amount_override,
            invoice_date, invoice_reference, is_billed,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                  $14, $15, $16, $17, $18, $19, $20, $21)
        "#,
    )
    .bind(cycle.id().as_uuid())
    .bind(cycle.service_id().as_uuid())
    .bind(cycle_no_to_db(cycle.cycle_no())?)
    .bind(cycle.planned_date())
    .bind(cycle.due_date())
    .bind(cycle.status().as_str())
    .bind(cycle.is_status_overridden())
    .bind(cycle.status_override_by().map(Actor::as_str))
    .bind(cycle.status_override_at().map(|t| *t.as_datetime()))
    .bind(cycle.disciplines())
    .bind(cycle.deliverables())
    .bind(cycle.phase())
    .bind(cycle.weight_factor().value())
    .bind(cycle.fee())
    .bind(cycle.fee_source().as_str())
    .bind(cycle.fee_amount_override())
    .bind(cycle.invoice().invoice_date)
    .bind(cycle.invoice().invoice_reference.as_deref())
    .bind(cycle.invoice().is_billed)
    .bind(cycle.created_at().as_datetime())
    .bind(cycle.updated_at().as_datetime())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(DomainError::new(
            ErrorCode::DuplicateReview,
            format!(
                "Review {} already exists for service {}",
                cycle.cycle_no(),
                cycle.service_id()
            ),
        )),
        Err(e) => Err(DomainError::database(format!("Failed to insert review: {}", e))),
    }
}

async fn update_review(
    tx: &mut Transaction<'static, Postgres>,
    cycle: &ReviewCycle,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE service_reviews SET
            planned_date = $2,
            due_date = $3,
            status = $4,
            status_override = $5,
            status_override_by = $6,
            status_override_at = $7,
            weight_factor = $8,
            fee = $9,
            fee_source = $10,
            fee_amount_override = $11,
            invoice_date = $12,
            invoice_reference = $13,
            is_billed = $14,
            updated_at = $15
        WHERE review_id = $1
        "#,
    )
    .bind(cycle.id().as_uuid())
    .bind(cycle.planned_date())
    .bind(cycle.due_date())
    .bind(cycle.status().as_str())
    .bind(cycle.is_status_overridden())
    .bind(cycle.status_override_by().map(Actor::as_str))
    .bind(cycle.status_override_at().map(|t| *t.as_datetime()))
    .bind(cycle.weight_factor().value())
    .bind(cycle.fee())
    .bind(cycle.fee_source().as_str())
    .bind(cycle.fee_amount_override())
    .bind(cycle.invoice().invoice_date)
    .bind(cycle.invoice().invoice_reference.as_deref())
    .bind(cycle.invoice().is_billed)
    .bind(cycle.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database(format!("Failed to update review: {}", e)))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::ReviewNotFound,
            format!("Review not found: {}", cycle.id()),
        ));
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// Row Mapping
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_review(row: sqlx::postgres::PgRow) -> Result<ReviewCycle, DomainError> {
    let id: Uuid = row.get("review_id");
    let service_id: Uuid = row.get("service_id");
    let cycle_no: i32 = row.get("cycle_no");
    let status: String = row.get("status");
    let override_by: Option<String> = row.get("status_override_by");
    let override_at: Option<chrono::DateTime<chrono::Utc>> = row.get("status_override_at");
    let weight: Decimal = row.get("weight_factor");
    let fee_source: String = row.get("fee_source");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(ReviewCycle::reconstitute(
        ReviewId::from_uuid(id),
        ServiceId::from_uuid(service_id),
        u32::try_from(cycle_no).map_err(|_| corrupt("cycle_no", cycle_no))?,
        row.get("planned_date"),
        row.get("due_date"),
        status
            .parse::<ReviewStatus>()
            .map_err(|_| corrupt("status", &status))?,
        row.get("status_override"),
        override_actor(override_by)?,
        override_at.map(Timestamp::from_datetime),
        row.get("disciplines"),
        row.get("deliverables"),
        row.get("phase"),
        WeightFactor::try_new(weight).map_err(|_| corrupt("weight_factor", weight))?,
        row.get("fee"),
        fee_source
            .parse::<FeeSource>()
            .map_err(|_| corrupt("fee_source", &fee_source))?,
        row.get("fee_amount_override"),
        InvoiceInfo {
            invoice_date: row.get("invoice_date"),
            invoice_reference: row.get("invoice_reference"),
            is_billed: row.get("is_billed"),
        },
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn override_actor(raw: Option<String>) -> Result<Option<Actor>, DomainError> {
    raw.map(|name| {
        Actor::new(name.as_str()).map_err(|_| corrupt("status_override_by", format!("{:?}", name)))
    })
    .transpose()
}

fn cycle_no_to_db(cycle_no: u32) -> Result<i32, DomainError> {
    i32::try_from(cycle_no).map_err(|_| {
        DomainError::new(ErrorCode::ValidationFailed, format!("cycle_no out of range: {}", cycle_no))
    })
}

fn corrupt(column: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Invalid {} in service_reviews: {}", column, value),
    )
    .with_detail("column", column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_actor_is_loaded() {
        let actor = override_actor(Some("j.smith@example.com".to_string())).unwrap();
        assert_eq!(actor.as_ref().map(Actor::as_str), Some("j.smith@example.com"));
        assert_eq!(override_actor(None).unwrap(), None);
    }

    #[test]
    fn blank_stored_actor_is_corrupt_row() {
        let err = override_actor(Some("   ".to_string())).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.details.get("column").map(String::as_str), Some("status_override_by"));
    }

    #[test]
    fn cycle_no_beyond_column_range_is_rejected() {
        assert_eq!(cycle_no_to_db(12).unwrap(), 12);
        assert!(cycle_no_to_db(u32::MAX).is_err());
    }
}
