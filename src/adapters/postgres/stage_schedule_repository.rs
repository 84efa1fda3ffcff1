//! PostgreSQL implementation of StageScheduleRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, StageEntryId, Timestamp};
use crate::domain::scheduling::StageScheduleEntry;
use crate::ports::StageScheduleRepository;

#[derive(Clone)]
pub struct PostgresStageScheduleRepository {
    pool: PgPool,
}

impl PostgresStageScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StageScheduleRepository for PostgresStageScheduleRepository {
    async fn replace_for_project(
        &self,
        project_id: &ProjectId,
        entries: &[StageScheduleEntry],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM stage_review_schedule WHERE project_id = $1")
            .bind(project_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to clear stage schedule: {}", e)))?;

        for entry in entries {
            let review_no = i32::try_from(entry.review_no).map_err(|_| {
                DomainError::new(
                    ErrorCode::ValidationFailed,
                    format!("review_no out of range: {}", entry.review_no),
                )
            })?;
            sqlx::query(
                r#"
                INSERT INTO stage_review_schedule (
                    id, project_id, stage_name, review_no, planned_date, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(entry.id.as_uuid())
            .bind(entry.project_id.as_uuid())
            .bind(&entry.stage_name)
            .bind(review_no)
            .bind(entry.planned_date)
            .bind(entry.created_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to insert stage review: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit transaction: {}", e)))
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<StageScheduleEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, stage_name, review_no, planned_date, created_at
            FROM stage_review_schedule
            WHERE project_id = $1
            ORDER BY planned_date, stage_name, review_no
            "#,
        )
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch stage schedule: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                let project_id: Uuid = row.get("project_id");
                let review_no: i32 = row.get("review_no");
                let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
                Ok(StageScheduleEntry {
                    id: StageEntryId::from_uuid(id),
                    project_id: ProjectId::from_uuid(project_id),
                    stage_name: row.get("stage_name"),
                    review_no: u32::try_from(review_no).map_err(|_| {
                        DomainError::new(
                            ErrorCode::InternalError,
                            format!("Invalid review_no in stage_review_schedule: {}", review_no),
                        )
                    })?,
                    planned_date: row.get("planned_date"),
                    created_at: Timestamp::from_datetime(created_at),
                })
            })
            .collect()
    }
}
