use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use loan_engine_core::policy::LendingPolicy;
use loan_engine_core::pricing;

use crate::input;

/// Arguments for offer pricing
#[derive(Args)]
pub struct RateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested loan amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,
}

#[derive(Deserialize)]
struct RateRequest {
    amount: Decimal,
    term_months: u32,
}

pub fn run_rate(
    args: RateArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RateRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RateRequest {
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
        }
    };

    if request.amount <= Decimal::ZERO {
        return Err("amount must be positive".into());
    }
    if request.term_months == 0 {
        return Err("term_months must be at least 1".into());
    }

    let offer = pricing::select_rate(policy, request.amount, request.term_months);
    Ok(serde_json::to_value(offer)?)
}
