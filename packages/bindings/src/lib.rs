use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use loan_engine_core::effective_rate::{self, IrrConfig};
use loan_engine_core::policy::LendingPolicy;
use loan_engine_core::pricing;
use loan_engine_core::schedule::{self, LoanRecord};
use loan_engine_core::simulation::{self, SimulationRequest};
use loan_engine_core::{Money, Rate};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RateRequest {
    amount: Money,
    term_months: u32,
}

#[napi]
pub fn select_rate(input_json: String) -> NapiResult<String> {
    let input: RateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let offer = pricing::select_rate(&LendingPolicy::default(), input.amount, input.term_months);
    serde_json::to_string(&offer).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn build_installment_schedule(input_json: String) -> NapiResult<String> {
    let loan: LoanRecord = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = schedule::schedule_for_loan(&LendingPolicy::default(), &loan);
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn summarize_schedule(input_json: String) -> NapiResult<String> {
    let loan: LoanRecord = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = schedule::schedule_for_loan(&LendingPolicy::default(), &loan);
    serde_json::to_string(&schedule::summarize(&rows)).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct NextUnpaidInput {
    loan: LoanRecord,
    paid_periods: Vec<u32>,
    today: NaiveDate,
}

#[napi]
pub fn next_unpaid_installment(input_json: String) -> NapiResult<String> {
    let input: NextUnpaidInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = schedule::schedule_for_loan(&LendingPolicy::default(), &input.loan);
    let next = schedule::next_unpaid(&rows, &input.paid_periods, input.today);
    serde_json::to_string(&next).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_loan(input_json: String) -> NapiResult<String> {
    let request: SimulationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let quote = simulation::simulate(&LendingPolicy::default(), &IrrConfig::default(), &request);
    serde_json::to_string(&quote).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Effective rate
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EffectiveRateOutput {
    irr_monthly: Option<Rate>,
    effective_annual: Option<Rate>,
}

#[napi]
pub fn estimate_irr(input_json: String) -> NapiResult<String> {
    let cash_flows: Vec<Money> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let irr_monthly = effective_rate::irr_bisect(&cash_flows, &IrrConfig::default());
    let output = EffectiveRateOutput {
        irr_monthly,
        effective_annual: irr_monthly.map(effective_rate::effective_annual),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}
