//! Stage-based review schedules.
//!
//! A project can be scheduled by design stage instead of by service: each
//! stage declares a window and a review count, and reviews are spread with
//! [`distribute_stage`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ProjectId, StageEntryId, Timestamp, ValidationError, ValidationErrors,
};
use crate::domain::validation::ValidationLimits;

use super::distribution::distribute_stage;

/// One stage of a project schedule as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    pub stage_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_reviews: u32,
}

/// A dated review inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageScheduleEntry {
    pub id: StageEntryId,
    pub project_id: ProjectId,
    pub stage_name: String,
    /// 1-based position within its stage.
    pub review_no: u32,
    pub planned_date: NaiveDate,
    pub created_at: Timestamp,
}

/// Builds the dated entries for every stage.
///
/// Every malformed stage is reported, indexed as `stages[i].field`. Stages
/// asking for zero reviews contribute nothing; a stage may ask for at most
/// `limits.max_unit_qty`.
pub fn build_stage_schedule(
    project_id: ProjectId,
    stages: &[StageSpec],
    limits: &ValidationLimits,
    now: Timestamp,
) -> Result<Vec<StageScheduleEntry>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (i, stage) in stages.iter().enumerate() {
        if stage.stage_name.trim().is_empty() {
            errors.push(ValidationError::required(format!("stages[{}].stage_name", i)));
        }
        if stage.end_date < stage.start_date {
            errors.push(
                ValidationError::new(
                    format!("stages[{}].end_date", i),
                    "must not be before start_date",
                )
                .with_value(stage.end_date),
            );
        }
        if i64::from(stage.num_reviews) > limits.max_unit_qty {
            errors.push(ValidationError::out_of_range(
                format!("stages[{}].num_reviews", i),
                0,
                limits.max_unit_qty,
                stage.num_reviews,
            ));
        }
    }
    errors.into_result(())?;

    let entries = stages
        .iter()
        .flat_map(|stage| {
            distribute_stage(stage.start_date, stage.end_date, stage.num_reviews as usize)
                .into_iter()
                .zip(1u32..)
                .map(move |(planned_date, review_no)| StageScheduleEntry {
                    id: StageEntryId::new(),
                    project_id,
                    stage_name: stage.stage_name.trim().to_string(),
                    review_no,
                    planned_date,
                    created_at: now,
                })
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stage(name: &str, start: NaiveDate, end: NaiveDate, n: u32) -> StageSpec {
        StageSpec {
            stage_name: name.to_string(),
            start_date: start,
            end_date: end,
            num_reviews: n,
        }
    }

    fn build(
        project_id: ProjectId,
        stages: &[StageSpec],
    ) -> Result<Vec<StageScheduleEntry>, ValidationErrors> {
        build_stage_schedule(project_id, stages, &ValidationLimits::default(), Timestamp::now())
    }

    #[test]
    fn spaces_each_stage_independently() {
        let stages = [
            stage("Concept", date(2024, 4, 1), date(2024, 5, 1), 3),
            stage("Detailed Design", date(2024, 6, 1), date(2024, 6, 21), 2),
        ];
        let entries = build(ProjectId::new(), &stages).unwrap();

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.stage_name.as_str(), e.review_no, e.planned_date))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Concept", 1, date(2024, 4, 1)),
                ("Concept", 2, date(2024, 4, 11)),
                ("Concept", 3, date(2024, 4, 21)),
                ("Detailed Design", 1, date(2024, 6, 1)),
                ("Detailed Design", 2, date(2024, 6, 11)),
            ]
        );
    }

    #[test]
    fn zero_review_stage_contributes_nothing() {
        let stages = [stage("Handover", date(2024, 1, 1), date(2024, 2, 1), 0)];
        let entries = build(ProjectId::new(), &stages).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn reports_every_malformed_stage() {
        let stages = [
            stage(" ", date(2024, 1, 1), date(2024, 2, 1), 2),
            stage("Construction", date(2024, 3, 1), date(2024, 2, 1), 2),
        ];
        let errors = build(ProjectId::new(), &stages).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("stages[0].stage_name"));
        assert!(errors.has_field("stages[1].end_date"));
    }

    #[test]
    fn review_count_is_capped_at_max_unit_qty() {
        let at_cap = [stage("Construction", date(2024, 1, 1), date(2024, 12, 31), 1000)];
        let entries = build(ProjectId::new(), &at_cap).unwrap();
        assert_eq!(entries.len(), 1000);

        let over_cap = [
            stage("Concept", date(2024, 1, 1), date(2024, 1, 31), 2),
            stage("Construction", date(2024, 1, 1), date(2024, 12, 31), 1001),
        ];
        let errors = build(ProjectId::new(), &over_cap).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("stages[1].num_reviews"));
        assert_eq!(errors.errors()[0].value.as_deref(), Some("1001"));
    }

    #[test]
    fn huge_review_count_is_rejected_before_allocating() {
        let stages = [stage("Concept", date(2024, 1, 1), date(2024, 1, 31), u32::MAX)];
        let errors = build(ProjectId::new(), &stages).unwrap_err();
        assert!(errors.has_field("stages[0].num_reviews"));
    }

    #[test]
    fn entries_carry_project() {
        let project_id = ProjectId::new();
        let stages = [stage("Concept", date(2024, 1, 1), date(2024, 1, 1), 2)];
        let entries = build(project_id, &stages).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.project_id == project_id));
        assert!(entries.iter().all(|e| e.planned_date == date(2024, 1, 1)));
    }
}
