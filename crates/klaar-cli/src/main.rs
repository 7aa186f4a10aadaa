//! # klaar CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use klaar_cli::advice::{run_advice, AdviceArgs};
use klaar_cli::company::{run_company, CompanyArgs};
use klaar_cli::contract::{run_contract, ContractArgs};
use klaar_cli::payroll::{run_payroll, PayrollArgs};
use klaar_cli::receipt::{run_receipt, ReceiptArgs};
use klaar_cli::search::{run_search, SearchArgs};
use klaar_cli::sign::{run_sign, SignArgs};

/// Klaar onboarding toolkit.
///
/// Looks up Estonian companies, renders and e-signs the accounting-service
/// agreement, reads receipts, and runs payroll estimates.
#[derive(Parser, Debug)]
#[command(name = "klaar", version, about, long_about = None)]
struct Cli {
    /// Verbose logging. Repeat for more (-v, -vv). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the business registry by name or code.
    Search(SearchArgs),

    /// Show a company's registry record and signing representatives.
    Company(CompanyArgs),

    /// Render the accounting-service agreement.
    Contract(ContractArgs),

    /// Sign the agreement with Smart-ID or Mobile-ID.
    Sign(SignArgs),

    /// Read a receipt image.
    Receipt(ReceiptArgs),

    /// Get one sentence of financial advice.
    Advice(AdviceArgs),

    /// Estimate payroll cost from a target net salary.
    Payroll(PayrollArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Search(args) => run_search(&args).await,
        Commands::Company(args) => run_company(&args).await,
        Commands::Contract(args) => run_contract(&args),
        Commands::Sign(args) => run_sign(&args).await,
        Commands::Receipt(args) => run_receipt(&args).await,
        Commands::Advice(args) => run_advice(&args).await,
        Commands::Payroll(args) => run_payroll(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
