use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loan_engine_core::effective_rate::IrrConfig;
use loan_engine_core::policy::LendingPolicy;
use loan_engine_core::simulation::{self, SimulationRequest};

use crate::input;

/// Arguments for a full loan simulation
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested loan amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Schedule start date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct QuoteRequest {
    amount: Decimal,
    term_months: u32,
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

pub fn run_quote(
    args: QuoteArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: QuoteRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        QuoteRequest {
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            start_date: args.start_date,
        }
    };

    if request.amount <= Decimal::ZERO {
        return Err("amount must be positive".into());
    }
    if request.term_months == 0 {
        return Err("term_months must be at least 1".into());
    }

    let quote = simulation::simulate(
        policy,
        &IrrConfig::default(),
        &SimulationRequest {
            amount: request.amount,
            term_months: request.term_months,
            start_date: request.start_date.unwrap_or_else(|| Local::now().date_naive()),
        },
    );
    Ok(serde_json::to_value(quote)?)
}
