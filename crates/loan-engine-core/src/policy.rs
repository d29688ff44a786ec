//! Lending policy configuration.
//!
//! All rate adjustments are expressed in rate points (0.03 = 3 points) and
//! all percentages as decimals. The defaults are the production constants
//! of the origination platform; tests and callers can override any field
//! without touching the engine itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::types::{Money, Rate};
use crate::LoanEngineResult;

/// Commercial lending policy: rate tiers, rate band, and financed charges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    /// Base annual nominal rate (TNA) before tier adjustments.
    pub base_annual_rate: Rate,
    /// First amount tier; the discount applies at and above this amount.
    pub tier_one_amount: Money,
    pub tier_one_discount: Rate,
    /// Second amount tier; its discount stacks on top of the first.
    pub tier_two_amount: Money,
    pub tier_two_discount: Rate,
    /// Terms at or below this many months get the short-term discount.
    pub short_term_months: u32,
    pub short_term_discount: Rate,
    /// Terms at or above this many months get the long-term surcharge.
    pub long_term_months: u32,
    pub long_term_surcharge: Rate,
    /// Annual rate band. Raw tier math is clamped into [min, max].
    pub min_annual_rate: Rate,
    pub max_annual_rate: Rate,
    /// Origination fee percentage, capitalized into the principal.
    pub origination_pct: Rate,
    /// Fixed monthly servicing fee.
    pub monthly_fee: Money,
    /// Monthly insurance percentage of the outstanding balance.
    pub insurance_monthly_pct: Rate,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            base_annual_rate: dec!(0.22),
            tier_one_amount: dec!(5_000_000),
            tier_one_discount: dec!(0.03),
            tier_two_amount: dec!(10_000_000),
            tier_two_discount: dec!(0.05),
            short_term_months: 12,
            short_term_discount: dec!(0.02),
            long_term_months: 48,
            long_term_surcharge: dec!(0.02),
            min_annual_rate: dec!(0.10),
            max_annual_rate: dec!(0.35),
            origination_pct: dec!(0.012),
            monthly_fee: dec!(1500),
            insurance_monthly_pct: dec!(0.00035),
        }
    }
}

impl LendingPolicy {
    /// Check a policy once at the boundary, before any pricing runs with it.
    pub fn validate(&self) -> LoanEngineResult<()> {
        if self.min_annual_rate > self.max_annual_rate {
            return Err(LoanEngineError::InvalidPolicy(format!(
                "Rate band is inverted: min {} > max {}.",
                self.min_annual_rate, self.max_annual_rate
            )));
        }
        if self.min_annual_rate < Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "Minimum annual rate is negative.".into(),
            ));
        }
        if self.origination_pct < Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "Origination percentage is negative.".into(),
            ));
        }
        if self.monthly_fee < Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "Monthly fee is negative.".into(),
            ));
        }
        if self.insurance_monthly_pct < Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "Insurance percentage is negative.".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(LendingPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_reject_inverted_band() {
        let policy = LendingPolicy {
            min_annual_rate: dec!(0.40),
            max_annual_rate: dec!(0.35),
            ..LendingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_reject_negative_fee() {
        let policy = LendingPolicy {
            monthly_fee: dec!(-1),
            ..LendingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_reject_negative_insurance_pct() {
        let policy = LendingPolicy {
            insurance_monthly_pct: dec!(-0.0001),
            ..LendingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let policy: LendingPolicy = serde_json::from_str(r#"{"base_annual_rate": "0.25"}"#).unwrap();
        assert_eq!(policy.base_annual_rate, dec!(0.25));
        assert_eq!(policy.monthly_fee, dec!(1500));
    }
}
