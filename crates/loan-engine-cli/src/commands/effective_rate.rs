use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_engine_core::effective_rate::{self, IrrConfig};

use crate::input;

/// Arguments for IRR estimation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IrrArgs {
    /// Path to a JSON file holding the cash-flow array
    #[arg(long)]
    pub input: Option<String>,

    /// Cash flows, comma separated; index 0 is the disbursement (positive),
    /// later entries the payments (negative)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<Decimal>>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cash_flows: Vec<Decimal> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.cash_flows
            .ok_or("--cash-flows is required (or provide --input)")?
    };

    match effective_rate::irr_bisect(&cash_flows, &IrrConfig::default()) {
        Some(monthly) => Ok(json!({
            "irr_monthly": monthly,
            "effective_annual": effective_rate::effective_annual(monthly),
        })),
        None => Err("cash flows do not bracket an IRR root; rate unavailable".into()),
    }
}
