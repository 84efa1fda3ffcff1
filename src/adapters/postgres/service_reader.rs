//! PostgreSQL implementation of ServiceReader.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, ServiceId};
use crate::domain::service::{BillRule, Cadence, ServiceDefinition, UnitType};
use crate::ports::ServiceReader;

/// Reads services from the `project_services` table.
#[derive(Clone)]
pub struct PostgresServiceReader {
    pool: PgPool,
}

impl PostgresServiceReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceReader for PostgresServiceReader {
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<ServiceDefinition>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT service_id, project_id, unit_type, unit_qty, unit_rate, lump_sum_fee,
                   agreed_fee, bill_rule, schedule_start, schedule_end, schedule_frequency,
                   disciplines, deliverables, phase
            FROM project_services WHERE service_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch service: {}", e)))?;

        row.map(row_to_service).transpose()
    }
}

fn row_to_service(row: sqlx::postgres::PgRow) -> Result<ServiceDefinition, DomainError> {
    let service_id: Uuid = row.get("service_id");
    let project_id: Uuid = row.get("project_id");
    let unit_type: String = row.get("unit_type");
    let bill_rule: String = row.get("bill_rule");
    let frequency: String = row.get("schedule_frequency");

    Ok(ServiceDefinition {
        service_id: ServiceId::from_uuid(service_id),
        project_id: ProjectId::from_uuid(project_id),
        unit_type: unit_type.parse::<UnitType>().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, format!("Invalid unit_type: {}", unit_type))
        })?,
        unit_qty: row.get("unit_qty"),
        unit_rate: row.get::<Option<Decimal>, _>("unit_rate"),
        lump_sum_fee: row.get::<Option<Decimal>, _>("lump_sum_fee"),
        agreed_fee: row.get::<Option<Decimal>, _>("agreed_fee"),
        bill_rule: bill_rule.parse::<BillRule>().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, format!("Invalid bill_rule: {}", bill_rule))
        })?,
        schedule_start: row.get("schedule_start"),
        schedule_end: row.get("schedule_end"),
        schedule_frequency: Cadence::parse(&frequency),
        disciplines: row.get("disciplines"),
        deliverables: row.get("deliverables"),
        phase: row.get("phase"),
    })
}
