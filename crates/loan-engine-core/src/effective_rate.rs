//! Effective cost-of-credit estimation.
//!
//! The simulator reports an approximate CAE: the internal rate of return of
//! the loan cash flows, annualized. The IRR is found by bisection on the
//! monthly rate with geometric bracket expansion; a series whose flows never
//! change sign has no root and yields `None`, never a sentinel number.
//!
//! Cash-flow convention: index 0 is the amount disbursed to the borrower
//! (positive), each subsequent index a period's total payment (negative).

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::types::{Money, Rate};
use crate::LoanEngineResult;

const MONTHS_PER_YEAR: i64 = 12;

/// Root-finding knobs.
///
/// The defaults fix the last-digit precision of the reported rate;
/// overriding tolerance or iteration caps changes reported values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrConfig {
    /// Initial high bound of the monthly-rate bracket; the low bound is zero.
    pub initial_high: Rate,
    /// Growth factor applied to the high bound while searching for a bracket.
    pub bracket_growth: Decimal,
    /// Maximum bracket expansion attempts.
    pub max_expansions: u32,
    /// Absolute ceiling for the high bound.
    pub high_ceiling: Rate,
    /// Maximum bisection iterations.
    pub max_iterations: u32,
    /// Absolute NPV tolerance for early convergence.
    pub npv_tolerance: Decimal,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_high: Decimal::ONE,
            bracket_growth: dec!(1.5),
            max_expansions: 20,
            high_ceiling: dec!(5),
            max_iterations: 80,
            npv_tolerance: dec!(0.000001),
        }
    }
}

/// Net present value of period-indexed cash flows at a periodic rate.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> LoanEngineResult<Money> {
    if rate <= dec!(-1) {
        return Err(LoanEngineError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(npv_unchecked(rate, cash_flows))
}

// Horner evaluation from the last flow backwards: only divisions by
// (1 + rate), so large rate/term combinations stay inside Decimal range.
fn npv_unchecked(rate: Rate, cash_flows: &[Money]) -> Money {
    let one_plus_r = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    for cf in cash_flows.iter().rev() {
        value = value / one_plus_r + cf;
    }
    value
}

/// Monthly internal rate of return via bisection.
///
/// Starts from the bracket [0, initial_high]; while NPV carries the same
/// sign at both bounds, the high bound grows geometrically up to the
/// expansion cap and absolute ceiling. `None` when no sign change can be
/// bracketed (degenerate series) rather than a guessed rate.
pub fn irr_bisect(cash_flows: &[Money], config: &IrrConfig) -> Option<Rate> {
    if cash_flows.len() < 2 {
        return None;
    }

    let mut low = Decimal::ZERO;
    let mut high = config.initial_high;
    let mut f_low = npv_unchecked(low, cash_flows);
    let mut f_high = npv_unchecked(high, cash_flows);

    let mut expansions = 0;
    while f_low * f_high > Decimal::ZERO
        && high < config.high_ceiling
        && expansions < config.max_expansions
    {
        high *= config.bracket_growth;
        f_high = npv_unchecked(high, cash_flows);
        expansions += 1;
    }
    if f_low * f_high > Decimal::ZERO {
        return None;
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / dec!(2);
        let f_mid = npv_unchecked(mid, cash_flows);
        if f_mid.abs() < config.npv_tolerance {
            return Some(mid);
        }
        if f_low * f_mid < Decimal::ZERO {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }

    Some((low + high) / dec!(2))
}

/// Effective annual rate from a monthly rate: (1 + r)^12 − 1.
pub fn effective_annual(monthly_rate: Rate) -> Rate {
    (Decimal::ONE + monthly_rate).powi(MONTHS_PER_YEAR) - Decimal::ONE
}
