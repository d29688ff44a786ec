mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::effective_rate::IrrArgs;
use commands::pricing::RateArgs;
use commands::schedule::{NextDueArgs, ScheduleArgs, SummaryArgs};
use commands::simulation::QuoteArgs;

/// Loan origination pricing and amortization calculations
#[derive(Parser)]
#[command(
    name = "loan",
    version,
    about = "Loan origination pricing and amortization calculations",
    long_about = "A CLI for pricing consumer loan offers with decimal precision. \
                  Supports tiered rate selection, installment schedules, payment \
                  totals, next-due lookup, and effective annual cost (CAE) \
                  estimation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a lending policy file (JSON or YAML); defaults apply otherwise
    #[arg(long, global = true)]
    policy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an offer: tiered TNA, monthly rate, financed fee
    Rate(RateArgs),
    /// Build the installment schedule for a loan
    Schedule(ScheduleArgs),
    /// Aggregate payment totals over a loan's schedule
    Summary(SummaryArgs),
    /// Full simulation: offer, schedule, totals, effective annual cost
    Quote(QuoteArgs),
    /// Find the next unpaid installment
    NextDue(NextDueArgs),
    /// Estimate monthly IRR and effective annual rate from cash flows
    Irr(IrrArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let policy = match input::policy::load(cli.policy.as_deref()) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rate(args) => commands::pricing::run_rate(args, &policy),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, &policy),
        Commands::Summary(args) => commands::schedule::run_summary(args, &policy),
        Commands::Quote(args) => commands::simulation::run_quote(args, &policy),
        Commands::NextDue(args) => commands::schedule::run_next_due(args, &policy),
        Commands::Irr(args) => commands::effective_rate::run_irr(args),
        Commands::Version => {
            println!("loan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
