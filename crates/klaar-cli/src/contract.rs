//! # Contract Subcommand
//!
//! Renders the accounting-service agreement exactly as it is sent for
//! signing.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;

use klaar_core::{RegistryCode, Timestamp};
use klaar_signing::{contract_terms, ServiceContract};

use crate::output::{print_json, OutputFormat};

/// Arguments for the contract subcommand.
#[derive(Args, Debug)]
pub struct ContractArgs {
    /// Client company name.
    #[arg(long)]
    pub company: String,

    /// Client registry code.
    #[arg(long)]
    pub reg_code: String,

    /// Contract date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the summary of terms instead of the full text.
    #[arg(long)]
    pub terms: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the contract subcommand.
pub fn run_contract(args: &ContractArgs) -> Result<u8> {
    if args.terms {
        match args.format {
            OutputFormat::Json => print_json(contract_terms())?,
            OutputFormat::Text => {
                for term in contract_terms() {
                    println!("• {term}");
                }
            }
        }
        return Ok(0);
    }

    let contract = build_contract(args)?;
    match args.format {
        OutputFormat::Json => print_json(&contract.document())?,
        OutputFormat::Text => print!("{}", contract.text()),
    }
    Ok(0)
}

/// Pending contract for the arguments, dated `--date` or now.
pub fn build_contract(args: &ContractArgs) -> Result<ServiceContract> {
    let reg_code = RegistryCode::new(args.reg_code.as_str())
        .with_context(|| format!("invalid registry code {:?}", args.reg_code))?;
    let created_at = match args.date {
        Some(date) => Timestamp::from_utc(date.and_time(NaiveTime::MIN).and_utc()),
        None => Timestamp::now(),
    };
    Ok(ServiceContract::created_at(args.company.as_str(), reg_code, created_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(reg_code: &str) -> ContractArgs {
        ContractArgs {
            company: "Näidis OÜ".into(),
            reg_code: reg_code.into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5),
            terms: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn contract_is_dated_from_argument() {
        let contract = build_contract(&args("12345678")).unwrap();
        assert!(contract.text().contains("5.3.2026"));
        assert_eq!(contract.file_name(), "leping_12345678.txt");
    }

    #[test]
    fn invalid_registry_code_is_rejected() {
        let err = build_contract(&args("1234")).unwrap_err();
        assert!(err.to_string().contains("invalid registry code"));
    }
}
