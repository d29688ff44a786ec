//! Tiered rate selection for loan offers.
//!
//! Derives the annual nominal rate (TNA) from loan amount and term, clamps
//! it into the policy band, and converts it to an effective monthly rate.
//! The origination fee is financed: added to the principal, not deducted
//! from the disbursement. All arithmetic uses `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::LendingPolicy;
use crate::types::{Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Priced offer for a requested amount and term. Derived solely from the
/// inputs and the policy; no hidden state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOffer {
    /// Annual nominal rate after tier adjustments and band clamping.
    pub annual_nominal_rate: Rate,
    /// Effective monthly periodic rate.
    pub monthly_rate: Rate,
    /// Origination fee financed into the loan.
    pub financed_fee: Money,
    /// Amount actually amortized: requested amount plus financed fee.
    pub financed_principal: Money,
}

/// Annual nominal rate for an amount/term combination.
///
/// Amount-tier discounts stack; terms between the short and long thresholds
/// get no term adjustment. The result is clamped into the policy band,
/// never rejected. Inputs are assumed validated positive upstream.
pub fn annual_rate_for(policy: &LendingPolicy, amount: Money, term_months: u32) -> Rate {
    let mut tna = policy.base_annual_rate;
    if amount >= policy.tier_one_amount {
        tna -= policy.tier_one_discount;
    }
    if amount >= policy.tier_two_amount {
        tna -= policy.tier_two_discount;
    }
    if term_months <= policy.short_term_months {
        tna -= policy.short_term_discount;
    } else if term_months >= policy.long_term_months {
        tna += policy.long_term_surcharge;
    }
    tna.clamp(policy.min_annual_rate, policy.max_annual_rate)
}

/// Effective monthly rate from an effective annual rate: (1 + a)^(1/12) − 1.
///
/// Compound conversion. `annual / 12` overstates the periodic rate and must
/// not be substituted.
pub fn monthly_from_annual_effective(annual: Rate) -> Rate {
    (Decimal::ONE + annual).powd(Decimal::ONE / MONTHS_PER_YEAR) - Decimal::ONE
}

/// Price an offer: tiered TNA, monthly rate, and financed origination fee.
pub fn select_rate(policy: &LendingPolicy, amount: Money, term_months: u32) -> RateOffer {
    let annual = annual_rate_for(policy, amount, term_months);
    let financed_fee = amount * policy.origination_pct;
    RateOffer {
        annual_nominal_rate: annual,
        monthly_rate: monthly_from_annual_effective(annual),
        financed_fee,
        financed_principal: amount + financed_fee,
    }
}
