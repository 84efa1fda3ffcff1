//! ServiceDefinition - the contracted service a schedule is generated from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ProjectId, ServiceId};

use super::Cadence;

/// Absolute ceiling for a derived agreed fee.
pub const AGREED_FEE_CEILING: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// How a service is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    LumpSum,
    Review,
    Audit,
    Hourly,
}

impl UnitType {
    /// Accepted spellings, for error messages.
    pub const NAMES: &'static [&'static str] = &["lump_sum", "review", "audit", "hourly"];

    /// Returns the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::LumpSum => "lump_sum",
            UnitType::Review => "review",
            UnitType::Audit => "audit",
            UnitType::Hourly => "hourly",
        }
    }

    /// Returns true for fixed-price services.
    pub fn is_lump_sum(&self) -> bool {
        matches!(self, UnitType::LumpSum)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_key(s).as_str() {
            "lump_sum" | "lumpsum" => Ok(UnitType::LumpSum),
            "review" => Ok(UnitType::Review),
            "audit" => Ok(UnitType::Audit),
            "hourly" => Ok(UnitType::Hourly),
            _ => Err(()),
        }
    }
}

/// When a service's fee becomes billable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillRule {
    OnSetup,
    PerUnitComplete,
    OnReportIssued,
    OnCompletion,
    Monthly,
}

impl BillRule {
    /// Accepted spellings, for error messages.
    pub const NAMES: &'static [&'static str] = &[
        "on_setup",
        "per_unit_complete",
        "on_report_issued",
        "on_completion",
        "monthly",
    ];

    /// Returns the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillRule::OnSetup => "on_setup",
            BillRule::PerUnitComplete => "per_unit_complete",
            BillRule::OnReportIssued => "on_report_issued",
            BillRule::OnCompletion => "on_completion",
            BillRule::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillRule {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_enum_key(s).as_str() {
            "on_setup" => Ok(BillRule::OnSetup),
            "per_unit_complete" => Ok(BillRule::PerUnitComplete),
            "on_report_issued" => Ok(BillRule::OnReportIssued),
            "on_completion" => Ok(BillRule::OnCompletion),
            "monthly" => Ok(BillRule::Monthly),
            _ => Err(()),
        }
    }
}

/// A contracted unit of recurring work.
///
/// Read-only to the engine: created and edited by the surrounding
/// application, consumed here to generate and price review cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub service_id: ServiceId,
    pub project_id: ProjectId,
    pub unit_type: UnitType,
    pub unit_qty: i64,
    pub unit_rate: Option<Decimal>,
    pub lump_sum_fee: Option<Decimal>,
    pub agreed_fee: Option<Decimal>,
    pub bill_rule: BillRule,
    pub schedule_start: Option<NaiveDate>,
    pub schedule_end: Option<NaiveDate>,
    pub schedule_frequency: Cadence,
    pub disciplines: Option<String>,
    pub deliverables: Option<String>,
    pub phase: Option<String>,
}

impl ServiceDefinition {
    /// Agreed fee as stored, or derived from the pricing fields when absent.
    ///
    /// Non-lump-sum services derive `unit_qty * unit_rate` capped at
    /// [`AGREED_FEE_CEILING`]; lump-sum services fall back to `lump_sum_fee`.
    pub fn effective_agreed_fee(&self) -> Option<Decimal> {
        self.agreed_fee.or_else(|| self.derived_agreed_fee())
    }

    /// Agreed fee implied by the pricing fields alone.
    pub fn derived_agreed_fee(&self) -> Option<Decimal> {
        if self.unit_type.is_lump_sum() {
            return self.lump_sum_fee;
        }
        self.unit_rate
            .map(|rate| derive_agreed_fee(self.unit_qty, rate, AGREED_FEE_CEILING))
    }
}

/// `unit_qty * unit_rate`, never above `ceiling`.
pub fn derive_agreed_fee(unit_qty: i64, unit_rate: Decimal, ceiling: Decimal) -> Decimal {
    let total = Decimal::from(unit_qty)
        .checked_mul(unit_rate)
        .unwrap_or(ceiling);
    total.min(ceiling)
}

fn normalize_enum_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Weekly review service, 4 units at 250, starting 2024-01-01.
    pub fn weekly_service() -> ServiceDefinition {
        ServiceDefinition {
            service_id: ServiceId::new(),
            project_id: ProjectId::new(),
            unit_type: UnitType::Review,
            unit_qty: 4,
            unit_rate: Some(Decimal::from(250)),
            lump_sum_fee: None,
            agreed_fee: None,
            bill_rule: BillRule::PerUnitComplete,
            schedule_start: NaiveDate::from_ymd_opt(2024, 1, 1),
            schedule_end: NaiveDate::from_ymd_opt(2024, 1, 31),
            schedule_frequency: Cadence::Weekly,
            disciplines: Some("Architecture, Structure".to_string()),
            deliverables: Some("Coordination report".to_string()),
            phase: Some("Design Development".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::weekly_service;
    use super::*;

    #[test]
    fn unit_type_parses_loosely() {
        assert_eq!("Lump-Sum".parse::<UnitType>(), Ok(UnitType::LumpSum));
        assert_eq!(" review ".parse::<UnitType>(), Ok(UnitType::Review));
        assert!("daily".parse::<UnitType>().is_err());
    }

    #[test]
    fn bill_rule_parses_loosely() {
        assert_eq!("on report issued".parse::<BillRule>(), Ok(BillRule::OnReportIssued));
        assert_eq!("MONTHLY".parse::<BillRule>(), Ok(BillRule::Monthly));
        assert!("whenever".parse::<BillRule>().is_err());
    }

    #[test]
    fn derived_agreed_fee_multiplies_quantity_and_rate() {
        let service = weekly_service();
        assert_eq!(service.effective_agreed_fee(), Some(Decimal::from(1000)));
    }

    #[test]
    fn stored_agreed_fee_wins_over_derived() {
        let service = ServiceDefinition {
            agreed_fee: Some(Decimal::from(900)),
            ..weekly_service()
        };
        assert_eq!(service.effective_agreed_fee(), Some(Decimal::from(900)));
    }

    #[test]
    fn derived_agreed_fee_is_capped() {
        let fee = derive_agreed_fee(1000, Decimal::from(50_000), AGREED_FEE_CEILING);
        assert_eq!(fee, Decimal::from(10_000_000));
    }

    #[test]
    fn lump_sum_falls_back_to_lump_sum_fee() {
        let service = ServiceDefinition {
            unit_type: UnitType::LumpSum,
            unit_rate: None,
            lump_sum_fee: Some(Decimal::from(12_000)),
            ..weekly_service()
        };
        assert_eq!(service.effective_agreed_fee(), Some(Decimal::from(12_000)));
    }
}
