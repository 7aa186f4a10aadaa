//! # Search Subcommand
//!
//! Company autocomplete against the business registry.

use anyhow::{Context, Result};
use clap::Args;

use klaar_client::CompanySuggestion;

use crate::output::{print_json, OutputFormat};

/// Arguments for the search subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Company name or registry code, at least two characters.
    pub query: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the search subcommand.
pub async fn run_search(args: &SearchArgs) -> Result<u8> {
    let client = crate::client()?;
    let hits = client
        .registry()
        .autocomplete(&args.query)
        .await
        .context("company search failed")?;

    match args.format {
        OutputFormat::Json => print_json(&hits)?,
        OutputFormat::Text => print!("{}", render(&hits)),
    }
    Ok(0)
}

fn render(hits: &[CompanySuggestion]) -> String {
    if hits.is_empty() {
        return "Ettevõtteid ei leitud.\n".to_string();
    }
    let mut out = String::new();
    for hit in hits {
        out.push_str(&format!("{:<10} {}", hit.reg_code, hit.name));
        if let Some(status) = &hit.status {
            out.push_str(&format!(" ({status})"));
        }
        if let Some(address) = &hit.legal_address {
            out.push_str(&format!(", {address}"));
        }
        out.push('\n');
    }
    out
}
