//! Service input rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProjectId, ServiceId, ValidationError, ValidationErrors};
use crate::domain::service::{
    derive_agreed_fee, BillRule, Cadence, ServiceDefinition, UnitType,
};

use super::ValidationLimits;

/// Unvalidated service fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInput {
    pub service_id: Option<ServiceId>,
    pub project_id: Option<ProjectId>,
    pub unit_type: Option<String>,
    pub unit_qty: Option<i64>,
    pub unit_rate: Option<Decimal>,
    pub lump_sum_fee: Option<Decimal>,
    pub agreed_fee: Option<Decimal>,
    pub bill_rule: Option<String>,
    pub schedule_start: Option<NaiveDate>,
    pub schedule_end: Option<NaiveDate>,
    pub schedule_frequency: Option<String>,
    pub disciplines: Option<String>,
    pub deliverables: Option<String>,
    pub phase: Option<String>,
}

impl From<&ServiceDefinition> for ServiceInput {
    fn from(service: &ServiceDefinition) -> Self {
        Self {
            service_id: Some(service.service_id),
            project_id: Some(service.project_id),
            unit_type: Some(service.unit_type.as_str().to_string()),
            unit_qty: Some(service.unit_qty),
            unit_rate: service.unit_rate,
            lump_sum_fee: service.lump_sum_fee,
            agreed_fee: service.agreed_fee,
            bill_rule: Some(service.bill_rule.as_str().to_string()),
            schedule_start: service.schedule_start,
            schedule_end: service.schedule_end,
            schedule_frequency: Some(service.schedule_frequency.to_string()),
            disciplines: service.disciplines.clone(),
            deliverables: service.deliverables.clone(),
            phase: service.phase.clone(),
        }
    }
}

/// Checks every service rule and returns a typed definition.
///
/// All violations are collected before returning. On success the agreed
/// fee is normalized: non-lump-sum services get `unit_qty * unit_rate`
/// capped at the ceiling, lump-sum services default to `lump_sum_fee`.
pub fn validate_service(
    input: &ServiceInput,
    limits: &ValidationLimits,
) -> Result<ServiceDefinition, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.service_id.is_none() {
        errors.push(ValidationError::required("service_id"));
    }
    if input.project_id.is_none() {
        errors.push(ValidationError::required("project_id"));
    }

    let unit_type = match input.unit_type.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ValidationError::required("unit_type"));
            None
        }
        Some(raw) => match raw.parse::<UnitType>() {
            Ok(t) => Some(t),
            Err(()) => {
                errors.push(ValidationError::not_one_of("unit_type", raw, UnitType::NAMES));
                None
            }
        },
    };

    match input.unit_qty {
        None => errors.push(ValidationError::required("unit_qty")),
        Some(qty) if qty < 0 || qty > limits.max_unit_qty => {
            errors.push(ValidationError::out_of_range("unit_qty", 0, limits.max_unit_qty, qty));
        }
        Some(_) => {}
    }

    match unit_type {
        Some(UnitType::LumpSum) => {
            if !is_positive(input.lump_sum_fee) {
                errors.push(
                    ValidationError::new("lump_sum_fee", "must be greater than 0 for lump_sum services")
                        .with_value(display_opt(input.lump_sum_fee)),
                );
            }
        }
        Some(_) => {
            if !is_positive(input.unit_rate) {
                errors.push(
                    ValidationError::new("unit_rate", "must be greater than 0")
                        .with_value(display_opt(input.unit_rate)),
                );
            }
            if matches!(input.unit_qty, Some(qty) if qty == 0) {
                errors.push(
                    ValidationError::new("unit_qty", "must be greater than 0 for unit-priced services")
                        .with_value(0),
                );
            }
        }
        None => {}
    }

    let bill_rule = match input.bill_rule.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ValidationError::required("bill_rule"));
            None
        }
        Some(raw) => match raw.parse::<BillRule>() {
            Ok(rule) => Some(rule),
            Err(()) => {
                errors.push(ValidationError::not_one_of("bill_rule", raw, BillRule::NAMES));
                None
            }
        },
    };

    if let (Some(start), Some(end)) = (input.schedule_start, input.schedule_end) {
        if end < start {
            errors.push(
                ValidationError::new("schedule_end", "must not be before schedule_start")
                    .with_value(end),
            );
        }
    }

    match (input.service_id, input.project_id, unit_type, input.unit_qty, bill_rule) {
        (Some(service_id), Some(project_id), Some(unit_type), Some(unit_qty), Some(bill_rule))
            if errors.is_empty() =>
        {
            let agreed_fee = normalized_agreed_fee(input, unit_type, unit_qty, limits);
            Ok(ServiceDefinition {
                service_id,
                project_id,
                unit_type,
                unit_qty,
                unit_rate: input.unit_rate,
                lump_sum_fee: input.lump_sum_fee,
                agreed_fee,
                bill_rule,
                schedule_start: input.schedule_start,
                schedule_end: input.schedule_end,
                schedule_frequency: input
                    .schedule_frequency
                    .as_deref()
                    .map(Cadence::parse)
                    .unwrap_or_default(),
                disciplines: input.disciplines.clone(),
                deliverables: input.deliverables.clone(),
                phase: input.phase.clone(),
            })
        }
        _ => Err(errors),
    }
}

fn normalized_agreed_fee(
    input: &ServiceInput,
    unit_type: UnitType,
    unit_qty: i64,
    limits: &ValidationLimits,
) -> Option<Decimal> {
    if unit_type.is_lump_sum() {
        return input.agreed_fee.or(input.lump_sum_fee);
    }
    input
        .unit_rate
        .map(|rate| derive_agreed_fee(unit_qty, rate, limits.agreed_fee_ceiling))
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.map_or(false, |v| v > Decimal::ZERO)
}

fn display_opt(value: Option<Decimal>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ServiceInput {
        ServiceInput {
            service_id: Some(ServiceId::new()),
            project_id: Some(ProjectId::new()),
            unit_type: Some("review".to_string()),
            unit_qty: Some(12),
            unit_rate: Some(Decimal::from(200)),
            bill_rule: Some("per_unit_complete".to_string()),
            schedule_start: NaiveDate::from_ymd_opt(2024, 1, 1),
            schedule_end: NaiveDate::from_ymd_opt(2024, 12, 31),
            schedule_frequency: Some("Monthly".to_string()),
            ..ServiceInput::default()
        }
    }

    fn validate(input: &ServiceInput) -> Result<ServiceDefinition, ValidationErrors> {
        validate_service(input, &ValidationLimits::default())
    }

    #[test]
    fn valid_input_becomes_definition_with_derived_agreed_fee() {
        let service = validate(&valid_input()).unwrap();
        assert_eq!(service.unit_type, UnitType::Review);
        assert_eq!(service.schedule_frequency, Cadence::Monthly);
        assert_eq!(service.agreed_fee, Some(Decimal::from(2400)));
    }

    #[test]
    fn agreed_fee_is_recomputed_for_unit_priced_services() {
        let input = ServiceInput {
            agreed_fee: Some(Decimal::from(99)),
            ..valid_input()
        };
        assert_eq!(validate(&input).unwrap().agreed_fee, Some(Decimal::from(2400)));
    }

    #[test]
    fn agreed_fee_is_capped_at_ceiling() {
        let input = ServiceInput {
            unit_qty: Some(1000),
            unit_rate: Some(Decimal::from(25_000)),
            ..valid_input()
        };
        assert_eq!(validate(&input).unwrap().agreed_fee, Some(Decimal::from(10_000_000)));
    }

    #[test]
    fn empty_input_reports_every_required_field() {
        let errors = validate(&ServiceInput::default()).unwrap_err();
        for field in ["service_id", "project_id", "unit_type", "unit_qty", "bill_rule"] {
            assert!(errors.has_field(field), "missing violation for {}", field);
        }
    }

    #[test]
    fn unknown_enums_are_reported_with_value() {
        let input = ServiceInput {
            unit_type: Some("daily".to_string()),
            bill_rule: Some("whenever".to_string()),
            ..valid_input()
        };
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        let unit_type = errors.errors().iter().find(|e| e.field == "unit_type").unwrap();
        assert_eq!(unit_type.value.as_deref(), Some("daily"));
    }

    #[test]
    fn unit_qty_bounds() {
        let too_many = ServiceInput { unit_qty: Some(1001), ..valid_input() };
        assert!(validate(&too_many).unwrap_err().has_field("unit_qty"));

        let negative = ServiceInput { unit_qty: Some(-1), ..valid_input() };
        assert!(validate(&negative).unwrap_err().has_field("unit_qty"));

        let max = ServiceInput { unit_qty: Some(1000), ..valid_input() };
        assert!(validate(&max).is_ok());
    }

    #[test]
    fn unit_priced_service_needs_rate_and_quantity() {
        let input = ServiceInput {
            unit_qty: Some(0),
            unit_rate: Some(Decimal::ZERO),
            ..valid_input()
        };
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("unit_rate"));
        assert!(errors.has_field("unit_qty"));
    }

    #[test]
    fn lump_sum_needs_positive_fee_but_not_rate() {
        let input = ServiceInput {
            unit_type: Some("lump_sum".to_string()),
            unit_qty: Some(0),
            unit_rate: None,
            lump_sum_fee: None,
            ..valid_input()
        };
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("lump_sum_fee"));

        let fixed = ServiceInput {
            lump_sum_fee: Some(Decimal::from(15_000)),
            ..input
        };
        let service = validate(&fixed).unwrap();
        assert_eq!(service.agreed_fee, Some(Decimal::from(15_000)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let input = ServiceInput {
            schedule_end: NaiveDate::from_ymd_opt(2023, 12, 1),
            ..valid_input()
        };
        assert!(validate(&input).unwrap_err().has_field("schedule_end"));
    }

    #[test]
    fn missing_frequency_means_custom() {
        let input = ServiceInput {
            schedule_frequency: None,
            ..valid_input()
        };
        assert_eq!(validate(&input).unwrap().schedule_frequency, Cadence::default());
    }
}
