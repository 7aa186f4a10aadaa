//! # Payroll Subcommand
//!
//! Reverse payroll calculation: what a target net salary costs the
//! company under each contract type. With `--contract` it also drafts the
//! matching agreement for the computed gross salary.

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use klaar_core::{ContractType, PayrollBreakdown};
use klaar_signing::employment_contract_text;

use crate::output::{euros, print_json, OutputFormat};

/// Arguments for the payroll subcommand.
#[derive(Args, Debug)]
pub struct PayrollArgs {
    /// Target monthly net salary, in euros.
    #[arg(long)]
    pub net: f64,

    /// `board_member` or `employee`.
    #[arg(long, default_value = "board_member")]
    pub contract_type: ContractType,

    /// Show both contract types side by side.
    #[arg(long)]
    pub compare: bool,

    /// Also print the draft agreement for the computed gross salary.
    #[arg(long, conflicts_with = "compare")]
    pub contract: bool,

    /// Name of the person the agreement is drafted for.
    #[arg(long, default_value = "Mari Maasikas")]
    pub name: String,

    /// Agreement date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the payroll subcommand.
pub fn run_payroll(args: &PayrollArgs) -> Result<u8> {
    let types = if args.compare {
        vec![ContractType::BoardMember, ContractType::Employee]
    } else {
        vec![args.contract_type]
    };
    let results = types
        .into_iter()
        .map(|t| PayrollBreakdown::simulate(t, args.net))
        .collect::<Result<Vec<_>, _>>()?;

    if args.contract {
        let [breakdown] = results.as_slice() else {
            bail!("--contract needs a single contract type");
        };
        let text = draft_contract(args, breakdown);
        match args.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "payroll": breakdown,
                "contract": text,
            }))?,
            OutputFormat::Text => print!("{}\n{text}", render(breakdown)),
        }
        return Ok(0);
    }

    match args.format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Text => {
            let blocks: Vec<String> = results.iter().map(render).collect();
            print!("{}", blocks.join("\n"));
            println!("\nArvutus on ligikaudne.");
        }
    }
    Ok(0)
}

fn draft_contract(args: &PayrollArgs, breakdown: &PayrollBreakdown) -> String {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    employment_contract_text(breakdown.contract_type, &args.name, breakdown.gross, date)
}

fn render(b: &PayrollBreakdown) -> String {
    let mut rows = vec![
        (b.contract_type.title().to_string(), String::new()),
        ("Netopalk".to_string(), euros(b.net)),
        ("Brutopalk".to_string(), euros(b.gross)),
        ("Tulumaks".to_string(), euros(b.income_tax)),
        ("Kogumispension".to_string(), euros(b.pension)),
    ];
    if b.contract_type == ContractType::Employee {
        rows.push(("Töötuskindlustus (töötaja)".to_string(), euros(b.unemployment_worker)));
        rows.push(("Töötuskindlustus (tööandja)".to_string(), euros(b.unemployment_employer)));
    }
    rows.push(("Sotsiaalmaks".to_string(), euros(b.social_tax)));
    rows.push(("Tööandja kulu kokku".to_string(), euros(b.total_cost)));
    rows.push((
        "Ravikindlustus".to_string(),
        if b.has_health_insurance { "jah" } else { "ei" }.to_string(),
    ));
    if b.savings_from_optimization > 0 {
        rows.push(("Sääst".to_string(), euros(b.savings_from_optimization)));
    }

    let mut out = String::new();
    for (label, value) in rows {
        if value.is_empty() {
            out.push_str(&format!("{label}\n"));
        } else {
            out.push_str(&format!("  {label:<28} {value:>10}\n"));
        }
    }
    out
}
