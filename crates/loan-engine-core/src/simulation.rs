//! Client-facing loan simulation.
//!
//! Composes the rate selector, schedule builder, and effective-rate
//! estimator into the quote the presentation layer renders: headline monthly
//! payment, full amortization table, totals, and approximate CAE.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::effective_rate::{self, IrrConfig};
use crate::policy::LendingPolicy;
use crate::pricing::{self, RateOffer};
use crate::schedule::{self, Installment, ScheduleParams, ScheduleSummary};
use crate::types::{Money, Rate};

/// A user-chosen amount/term combination to quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub amount: Money,
    pub term_months: u32,
    /// Anchors the due dates of the quoted schedule.
    pub start_date: NaiveDate,
}

/// Everything the presentation layer needs to render an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    pub offer: RateOffer,
    /// Level installment excluding insurance and fee.
    pub base_installment: Money,
    /// Month-1 total, the headline payment figure.
    pub first_payment: Money,
    pub schedule: Vec<Installment>,
    pub totals: ScheduleSummary,
    /// Monthly IRR of the quote cash flows, when one is bracketed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr_monthly: Option<Rate>,
    /// Annualized true cost (CAE); `None` when the IRR has no root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_annual_cost: Option<Rate>,
}

/// Quote an amount/term combination under a policy.
///
/// A degenerate request (zero amount or term) quotes an empty schedule with
/// zero totals and no effective rate.
pub fn simulate(
    policy: &LendingPolicy,
    irr_config: &IrrConfig,
    request: &SimulationRequest,
) -> LoanQuote {
    let offer = pricing::select_rate(policy, request.amount, request.term_months);
    let schedule = schedule::build_schedule(&ScheduleParams {
        principal: offer.financed_principal,
        term_months: request.term_months,
        monthly_rate: offer.monthly_rate,
        origination_date: request.start_date,
        monthly_fee: policy.monthly_fee,
        insurance_monthly_pct: policy.insurance_monthly_pct,
    });
    let totals = schedule::summarize(&schedule);
    let base_installment = schedule::base_installment(
        offer.financed_principal,
        request.term_months,
        offer.monthly_rate,
    );
    let first_payment = schedule
        .first()
        .map(|row| row.total_payment)
        .unwrap_or(Decimal::ZERO);

    // The borrower receives the requested amount at t=0 and pays each
    // period's total; the financed fee appears as extra principal, not as
    // an upfront outflow.
    let irr_monthly = if schedule.is_empty() {
        None
    } else {
        let mut cash_flows = Vec::with_capacity(schedule.len() + 1);
        cash_flows.push(request.amount);
        cash_flows.extend(schedule.iter().map(|row| -row.total_payment));
        effective_rate::irr_bisect(&cash_flows, irr_config)
    };
    let effective_annual_cost = irr_monthly.map(effective_rate::effective_annual);

    LoanQuote {
        offer,
        base_installment,
        first_payment,
        schedule,
        totals,
        irr_monthly,
        effective_annual_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal, term_months: u32) -> SimulationRequest {
        SimulationRequest {
            amount,
            term_months,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        }
    }

    #[test]
    fn test_quote_composition() {
        let policy = LendingPolicy::default();
        let quote = simulate(&policy, &IrrConfig::default(), &request(dec!(2_000_000), 24));

        assert_eq!(quote.schedule.len(), 24);
        assert_eq!(quote.offer.annual_nominal_rate, dec!(0.22));
        assert_eq!(quote.first_payment, quote.schedule[0].total_payment);
        assert_eq!(
            quote.totals.total_fees,
            policy.monthly_fee * Decimal::from(24)
        );
    }

    #[test]
    fn test_effective_cost_above_nominal_rate() {
        // Financed fee, insurance, and monthly fee all raise the true cost
        let policy = LendingPolicy::default();
        let quote = simulate(&policy, &IrrConfig::default(), &request(dec!(2_000_000), 24));

        let cae = quote.effective_annual_cost.unwrap();
        assert!(cae > quote.offer.annual_nominal_rate);
        // Sanity band: the extra charges are small relative to the loan
        assert!(cae < dec!(0.40));
    }

    #[test]
    fn test_degenerate_request_quotes_empty() {
        let policy = LendingPolicy::default();
        let quote = simulate(&policy, &IrrConfig::default(), &request(Decimal::ZERO, 24));

        assert!(quote.schedule.is_empty());
        assert_eq!(quote.totals.total_paid, Decimal::ZERO);
        assert_eq!(quote.first_payment, Decimal::ZERO);
        assert!(quote.irr_monthly.is_none());
        assert!(quote.effective_annual_cost.is_none());

        let zero_term = simulate(&policy, &IrrConfig::default(), &request(dec!(1_000_000), 0));
        assert!(zero_term.schedule.is_empty());
        assert!(zero_term.effective_annual_cost.is_none());
    }

    #[test]
    fn test_simulator_and_loan_path_agree() {
        // The persisted-loan path must reproduce the simulator's rows when
        // fed the stored fields
        let policy = LendingPolicy::default();
        let quote = simulate(&policy, &IrrConfig::default(), &request(dec!(2_000_000), 24));

        let loan = crate::schedule::LoanRecord {
            amount: dec!(2_000_000),
            term_months: 24,
            monthly_rate: quote.offer.monthly_rate,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        };
        let stored = crate::schedule::schedule_for_loan(&policy, &loan);

        assert_eq!(stored.len(), quote.schedule.len());
        for (a, b) in stored.iter().zip(quote.schedule.iter()) {
            assert_eq!(a.total_payment, b.total_payment);
            assert_eq!(a.remaining_balance, b.remaining_balance);
            assert_eq!(a.due_date, b.due_date);
        }
    }

    #[test]
    fn test_serialization_roundtrip() {
        let policy = LendingPolicy::default();
        let quote = simulate(&policy, &IrrConfig::default(), &request(dec!(800_000), 12));
        let json = serde_json::to_string(&quote).unwrap();
        let back: LoanQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(back.first_payment, quote.first_payment);
        assert_eq!(back.schedule.len(), quote.schedule.len());
    }
}
