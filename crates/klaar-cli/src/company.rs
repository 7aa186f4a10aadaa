//! # Company Subcommand
//!
//! Full registry record for one company, including who may sign for it.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use klaar_client::{CompanyDetails, DetailOptions};
use klaar_signing::Representative;

use crate::output::{print_json, OutputFormat};

/// Arguments for the company subcommand.
#[derive(Args, Debug)]
pub struct CompanyArgs {
    /// 8-digit registry code.
    pub reg_code: String,

    /// Also request contact data from the registry.
    #[arg(long)]
    pub contacts: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the company subcommand.
pub async fn run_company(args: &CompanyArgs) -> Result<u8> {
    let client = crate::client()?;
    let today = Utc::now().date_naive();
    let options = DetailOptions {
        contacts: args.contacts,
        ..DetailOptions::default()
    };
    let details = client
        .registry()
        .company_details_with(&args.reg_code, options, today)
        .await
        .with_context(|| format!("registry lookup for {} failed", args.reg_code))?;
    let signers = details.signing_representatives(today);

    match args.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "company": details,
            "active": details.is_active(),
            "signing_representatives": signers,
        }))?,
        OutputFormat::Text => print!("{}", render(&details, &signers)),
    }
    Ok(if details.is_active() { 0 } else { 3 })
}

fn render(details: &CompanyDetails, signers: &[Representative]) -> String {
    let mut lines = vec![
        format!("{} ({})", details.name, details.reg_code),
        format!(
            "Õiguslik vorm: {}",
            details.legal_form_text.as_deref().unwrap_or(&details.legal_form)
        ),
        format!(
            "Staatus: {}{}",
            details.status_text.as_deref().unwrap_or(&details.status),
            if details.is_active() { "" } else { " (mitteaktiivne)" }
        ),
    ];
    let optional = [
        ("KMKR", &details.vat_number),
        ("Aadress", &details.address),
        ("E-post", &details.email),
        ("Telefon", &details.phone),
        ("Veebileht", &details.website),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    if let Some(date) = details.first_registered {
        lines.push(format!("Registreeritud: {}", klaar_core::temporal::estonian_date(date)));
    }
    if signers.is_empty() {
        lines.push("Allkirjaõiguslikke isikuid ei leitud.".to_string());
    } else {
        lines.push("Allkirjaõiguslikud isikud:".to_string());
        for (i, person) in signers.iter().enumerate() {
            lines.push(format!(
                "  [{i}] {} ({})",
                person.display_name(),
                person.role_text.as_deref().unwrap_or(&person.role_code)
            ));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Today's signing representatives of a company, for `klaar sign`.
pub async fn fetch_representatives(
    reg_code: &str,
    today: NaiveDate,
) -> Result<Vec<Representative>> {
    let client = crate::client()?;
    let details = client
        .registry()
        .company_details_with(reg_code, DetailOptions::default(), today)
        .await
        .with_context(|| format!("registry lookup for {reg_code} failed"))?;
    Ok(details.signing_representatives(today))
}
