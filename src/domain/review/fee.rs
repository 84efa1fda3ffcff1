//! Fee allocation - derives a cycle's fee and records where it came from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places fees are stored with.
pub const FEE_SCALE: u32 = 2;

/// Provenance of a cycle's fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeeSource {
    /// Explicit per-cycle override.
    Override,
    /// Share of the agreed fee by weight factor.
    Weighted,
    /// Agreed fee divided evenly across planned cycles.
    EqualSplit,
    #[default]
    None,
}

impl FeeSource {
    /// Returns the storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeSource::Override => "override",
            FeeSource::Weighted => "weighted",
            FeeSource::EqualSplit => "equal_split",
            FeeSource::None => "none",
        }
    }
}

impl fmt::Display for FeeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "override" => Ok(FeeSource::Override),
            "weighted" => Ok(FeeSource::Weighted),
            "equal_split" => Ok(FeeSource::EqualSplit),
            "none" => Ok(FeeSource::None),
            other => Err(format!("unknown fee source '{}'", other)),
        }
    }
}

/// A computed fee and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAllocation {
    pub fee: Option<Decimal>,
    pub source: FeeSource,
}

impl FeeAllocation {
    /// No fee information available.
    pub const NONE: FeeAllocation = FeeAllocation {
        fee: None,
        source: FeeSource::None,
    };
}

/// Fee priority chain.
///
/// Pure and infallible: missing inputs resolve to a weaker source rather
/// than an error, because early funding stages legitimately lack them.
pub struct FeeAllocator;

impl FeeAllocator {
    /// Derives the fee for one cycle. First match wins:
    ///
    /// 1. `fee_amount_override` present (zero included) → `Override`
    /// 2. `billing_amount` present and non-zero → `Weighted`
    /// 3. `agreed_fee` present and `review_count_planned > 0` → `EqualSplit`
    /// 4. otherwise → no fee
    ///
    /// Negative amounts pass through unchanged (credits, adjustments).
    pub fn calculate_fee(
        billing_amount: Option<Decimal>,
        fee_amount_override: Option<Decimal>,
        agreed_fee: Option<Decimal>,
        review_count_planned: u32,
    ) -> FeeAllocation {
        if let Some(fee) = fee_amount_override {
            return FeeAllocation {
                fee: Some(fee),
                source: FeeSource::Override,
            };
        }

        if let Some(amount) = billing_amount.filter(|a| !a.is_zero()) {
            return FeeAllocation {
                fee: Some(amount),
                source: FeeSource::Weighted,
            };
        }

        match agreed_fee {
            Some(agreed) if review_count_planned > 0 => FeeAllocation {
                fee: Some((agreed / Decimal::from(review_count_planned)).round_dp(FEE_SCALE)),
                source: FeeSource::EqualSplit,
            },
            _ => FeeAllocation::NONE,
        }
    }

    /// Splits `agreed_fee` across cycles in proportion to their weights.
    ///
    /// Returns one entry per weight. All entries are `None` when there is no
    /// agreed fee, no weights, a non-positive weight total, or every weight is
    /// exactly 1 (no weighting in effect, so equal split applies).
    ///
    /// Each share is rounded to cents on its own and no remainder is carried,
    /// so the shares may total a few cents off `agreed_fee`: weights 1, 1, 1, 3
    /// over 800 give 3 × 133.33 + 400 = 799.99.
    pub fn weighted_billing_amounts(
        agreed_fee: Option<Decimal>,
        weights: &[Decimal],
    ) -> Vec<Option<Decimal>> {
        let total: Decimal = weights.iter().copied().sum();
        let unweighted = weights.iter().all(|w| *w == Decimal::ONE);

        match agreed_fee {
            Some(agreed) if !weights.is_empty() && !unweighted && total > Decimal::ZERO => weights
                .iter()
                .map(|w| Some((agreed * *w / total).round_dp(FEE_SCALE)))
                .collect(),
            _ => vec![None; weights.len()],
        }
    }

    /// Allocates fees for every cycle of one service.
    ///
    /// `cycles` pairs each cycle's weight factor with its own fee override.
    /// The planned count is the number of cycles supplied.
    pub fn allocate_service_fees(
        agreed_fee: Option<Decimal>,
        cycles: &[(Decimal, Option<Decimal>)],
    ) -> Vec<FeeAllocation> {
        let weights: Vec<Decimal> = cycles.iter().map(|(w, _)| *w).collect();
        let billing = Self::weighted_billing_amounts(agreed_fee, &weights);
        let count = u32::try_from(cycles.len()).unwrap_or(u32::MAX);

        cycles
            .iter()
            .zip(billing)
            .map(|((_, fee_override), billing_amount)| {
                Self::calculate_fee(billing_amount, *fee_override, agreed_fee, count)
            })
            .collect()
    }
}
