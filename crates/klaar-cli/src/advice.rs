//! # Advice Subcommand
//!
//! One sentence of financial advice for the company's cash position.
//! Model failures print a fixed apology instead of failing the command.

use anyhow::Result;
use clap::Args;

use klaar_client::vision::ADVICE_UNAVAILABLE;

use crate::output::{print_json, OutputFormat};

/// Arguments for the advice subcommand.
#[derive(Args, Debug)]
pub struct AdviceArgs {
    /// Money on the company's accounts, in euros.
    #[arg(long)]
    pub cash: f64,

    /// Monthly expenses, in euros.
    #[arg(long)]
    pub expenses: f64,

    /// Share of owner payouts taken as dividends (0.0 to 1.0).
    #[arg(long, default_value_t = 0.0)]
    pub dividend_ratio: f64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the advice subcommand.
pub async fn run_advice(args: &AdviceArgs) -> Result<u8> {
    let client = crate::client()?;
    let (advice, source) = match client
        .vision()
        .financial_advice(args.cash, args.expenses, args.dividend_ratio)
        .await
    {
        Ok(output) => (output.value, Some(output.source)),
        Err(e) => {
            tracing::warn!(error = %e, "advice generation failed");
            (ADVICE_UNAVAILABLE.to_string(), None)
        }
    };

    match args.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "advice": advice,
            "source": source,
        }))?,
        OutputFormat::Text => println!("{advice}"),
    }
    Ok(if source.is_some() { 0 } else { 1 })
}
