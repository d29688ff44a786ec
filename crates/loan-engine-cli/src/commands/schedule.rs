use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_engine_core::policy::LendingPolicy;
use loan_engine_core::schedule::{self, LoanRecord};

use crate::input;

/// Loan fields shared by the schedule-based commands. They mirror what the
/// persistence store records for a loan request.
#[derive(Args)]
pub struct LoanFlags {
    /// Path to JSON input file with the loan fields (overrides flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount as persisted
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Effective monthly periodic rate (e.g. 0.016709)
    #[arg(long)]
    pub monthly_rate: Option<Decimal>,

    /// Origination date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl LoanFlags {
    fn resolve(&self) -> Result<LoanRecord, Box<dyn std::error::Error>> {
        let loan: LoanRecord = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            LoanRecord {
                amount: self
                    .amount
                    .ok_or("--amount is required (or provide --input)")?,
                term_months: self
                    .term_months
                    .ok_or("--term-months is required (or provide --input)")?,
                monthly_rate: self
                    .monthly_rate
                    .ok_or("--monthly-rate is required (or provide --input)")?,
                created_at: self.start_date.unwrap_or_else(today),
            }
        };

        if loan.amount < Decimal::ZERO {
            return Err("amount must not be negative".into());
        }
        if loan.monthly_rate < Decimal::ZERO {
            return Err("monthly_rate must not be negative".into());
        }
        Ok(loan)
    }
}

/// Arguments for schedule construction
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanFlags,
}

/// Arguments for schedule totals
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub loan: LoanFlags,
}

/// Arguments for next-unpaid lookup
#[derive(Args)]
pub struct NextDueArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Installment numbers already paid or authorized
    #[arg(long, value_delimiter = ',')]
    pub paid: Vec<u32>,

    /// Reference date for "upcoming" (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

pub fn run_schedule(
    args: ScheduleArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.resolve()?;
    let rows = schedule::schedule_for_loan(policy, &loan);
    Ok(serde_json::to_value(rows)?)
}

pub fn run_summary(
    args: SummaryArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.resolve()?;
    let rows = schedule::schedule_for_loan(policy, &loan);
    let summary = schedule::summarize(&rows);
    Ok(serde_json::to_value(summary)?)
}

pub fn run_next_due(
    args: NextDueArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.resolve()?;
    let rows = schedule::schedule_for_loan(policy, &loan);
    let reference = args.today.unwrap_or_else(today);

    match schedule::next_unpaid(&rows, &args.paid, reference) {
        Some(installment) => Ok(serde_json::to_value(installment)?),
        None => Err("loan has no unpaid installments".into()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
