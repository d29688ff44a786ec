//! Installment schedule construction.
//!
//! One engine serves both the client-facing simulator and the persisted-loan
//! path (status display, payment orchestration), so identical inputs always
//! produce identical rows regardless of caller. Covers:
//! 1. **Base installment** -- level payment from the amortization formula.
//! 2. **Schedule builder** -- period-by-period interest, amortization,
//!    insurance, fee, and remaining balance.
//! 3. **Summary** -- totals folded over the rows.
//! 4. **Next-unpaid lookup** -- the payment-orchestration boundary.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::policy::LendingPolicy;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Inputs for one schedule computation. Constructed fresh per call, never
/// mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// Principal actually amortized (amount plus any financed fee).
    pub principal: Money,
    pub term_months: u32,
    /// Effective monthly periodic rate.
    pub monthly_rate: Rate,
    /// Anchors due dates: period i falls i calendar months later.
    pub origination_date: NaiveDate,
    pub monthly_fee: Money,
    /// Monthly insurance percentage of the outstanding balance.
    pub insurance_monthly_pct: Rate,
}

/// One period of the amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based period index, contiguous across the schedule.
    pub period: u32,
    pub due_date: NaiveDate,
    pub interest: Money,
    pub amortization: Money,
    pub insurance: Money,
    pub fee: Money,
    /// Base installment + insurance + fee.
    pub total_payment: Money,
    /// Balance after this period's amortization, floored at zero.
    pub remaining_balance: Money,
}

/// Aggregate totals across a schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_insurance: Money,
    pub total_fees: Money,
}

/// Fields read from a persisted loan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub amount: Money,
    pub term_months: u32,
    pub monthly_rate: Rate,
    pub created_at: NaiveDate,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Level base installment, excluding insurance and fee.
///
/// Zero rate degrades to straight-line principal / n. Zero principal or
/// term yields zero.
pub fn base_installment(principal: Money, term_months: u32, monthly_rate: Rate) -> Money {
    if term_months == 0 || principal.is_zero() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(term_months);
    if monthly_rate.is_zero() {
        return principal / n;
    }
    let factor = (Decimal::ONE + monthly_rate).powd(n);
    principal * monthly_rate / (Decimal::ONE - Decimal::ONE / factor)
}

/// Build the full amortization table.
///
/// Zero principal or term yields an empty schedule: nothing to compute,
/// not an error. Deterministic; the only date involved is the explicit
/// origination date.
pub fn build_schedule(params: &ScheduleParams) -> Vec<Installment> {
    if params.term_months == 0 || params.principal.is_zero() {
        return Vec::new();
    }

    let base = base_installment(params.principal, params.term_months, params.monthly_rate);
    let mut balance = params.principal;
    let mut schedule = Vec::with_capacity(params.term_months as usize);

    for period in 1..=params.term_months {
        let interest = balance * params.monthly_rate;
        // Under pathological rates interest can exceed the base installment;
        // amortization never goes negative.
        let amortization = (base - interest).max(Decimal::ZERO);
        // Insurance is charged on the balance before this period's
        // amortization is applied.
        let insurance = balance * params.insurance_monthly_pct;
        let total_payment = base + insurance + params.monthly_fee;
        balance = (balance - amortization).max(Decimal::ZERO);

        schedule.push(Installment {
            period,
            due_date: due_date_for(params.origination_date, period),
            interest,
            amortization,
            insurance,
            fee: params.monthly_fee,
            total_payment,
            remaining_balance: balance,
        });
    }

    schedule
}

/// Totals across all rows; all-zero for an empty schedule.
pub fn summarize(schedule: &[Installment]) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    for row in schedule {
        summary.total_paid += row.total_payment;
        summary.total_interest += row.interest;
        summary.total_insurance += row.insurance;
        summary.total_fees += row.fee;
    }
    summary
}

/// Schedule for a persisted loan request.
///
/// Capitalizes the origination fee into the recorded amount and applies the
/// policy's recurring charges, matching what the simulator quoted.
pub fn schedule_for_loan(policy: &LendingPolicy, loan: &LoanRecord) -> Vec<Installment> {
    let financed_fee = loan.amount * policy.origination_pct;
    build_schedule(&ScheduleParams {
        principal: loan.amount + financed_fee,
        term_months: loan.term_months,
        monthly_rate: loan.monthly_rate,
        origination_date: loan.created_at,
        monthly_fee: policy.monthly_fee,
        insurance_monthly_pct: policy.insurance_monthly_pct,
    })
}

/// Next unpaid installment for payment orchestration.
///
/// Rows whose period is in `paid_periods` are excluded. Prefers the first
/// installment (by due date) falling on or after `today`; when every unpaid
/// row is already overdue, returns the earliest one. `None` once the loan
/// is fully paid or the schedule is empty.
pub fn next_unpaid<'a>(
    schedule: &'a [Installment],
    paid_periods: &[u32],
    today: NaiveDate,
) -> Option<&'a Installment> {
    let mut candidates: Vec<&Installment> = schedule
        .iter()
        .filter(|row| !paid_periods.contains(&row.period))
        .collect();
    candidates.sort_by_key(|row| row.due_date);
    candidates
        .iter()
        .find(|row| row.due_date >= today)
        .copied()
        .or_else(|| candidates.first().copied())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Due date for a period: origination date plus `period` calendar months.
/// Day-of-month overflow clamps to the end of the shorter month, so a loan
/// originated Jan 31 is due Feb 28 (29 in leap years), not in March.
fn due_date_for(origination: NaiveDate, period: u32) -> NaiveDate {
    origination
        .checked_add_months(Months::new(period))
        .unwrap_or(NaiveDate::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
