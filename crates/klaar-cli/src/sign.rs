//! # Sign Subcommand
//!
//! Runs the full signing workflow in the terminal: method selection,
//! identity input, session start, then status polling until the signer
//! confirms on their device. Ctrl-C resets the workflow, which stops the
//! polling loop at its next wake-up.
//!
//! Exit codes: `0` signed, `2` signing failed or input rejected, `130`
//! interrupted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use klaar_core::RegistryCode;
use klaar_signing::{
    MockSigningProvider, PollPolicy, ServiceContract, SigningDriver, SigningEvent, SigningHandle,
    SigningMethod, SigningProvider, SigningWorkflow, StateKind,
};

use crate::output::{print_json, OutputFormat};

/// Arguments for the sign subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Client company name.
    #[arg(long)]
    pub company: String,

    /// Client registry code.
    #[arg(long)]
    pub reg_code: String,

    /// Signing method: `smartid` or `mobileid`.
    #[arg(long, default_value = "smartid")]
    pub method: SigningMethod,

    /// Signer's 11-digit personal ID code.
    #[arg(long)]
    pub personal_code: Option<String>,

    /// Signer's phone number (+372...), required for Mobile-ID.
    #[arg(long)]
    pub phone: Option<String>,

    /// Load signing representatives from the business registry.
    #[arg(long)]
    pub from_registry: bool,

    /// Index of the representative to sign as (see `klaar company`).
    #[arg(long)]
    pub representative: Option<usize>,

    /// Use the scripted offline provider instead of Dokobit.
    #[arg(long)]
    pub mock: bool,

    /// Pending status checks the offline provider answers before approving.
    #[arg(long, default_value_t = 2)]
    pub mock_pending: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the sign subcommand.
pub async fn run_sign(args: &SignArgs) -> Result<u8> {
    let reg_code = RegistryCode::new(args.reg_code.as_str())
        .with_context(|| format!("invalid registry code {:?}", args.reg_code))?;
    let contract = ServiceContract::new(args.company.as_str(), reg_code);
    let policy = PollPolicy::from_env().context("invalid polling configuration")?;

    let representatives = if args.from_registry {
        crate::company::fetch_representatives(&args.reg_code, Utc::now().date_naive()).await?
    } else {
        Vec::new()
    };
    let workflow = SigningWorkflow::new(contract, representatives, policy);

    if args.mock {
        tracing::info!("using offline signing provider");
        return drive(MockSigningProvider::approving_after(args.mock_pending), workflow, args).await;
    }

    let config = klaar_client::ClientConfig::from_env().context("invalid client configuration")?;
    config.require_dokobit_token()?;
    let client = klaar_client::KlaarClient::new(config).context("failed to build HTTP client")?;
    drive(client.dokobit().clone(), workflow, args).await
}

async fn drive<P: SigningProvider>(
    provider: P,
    workflow: SigningWorkflow,
    args: &SignArgs,
) -> Result<u8> {
    let handle = SigningHandle::new(workflow);
    let announced = Arc::new(AtomicU64::new(0));
    let driver = SigningDriver::new(provider, handle.clone()).observe(move |wf| {
        if let Some(code) = wf.control_code() {
            if announced.swap(wf.generation(), Ordering::SeqCst) != wf.generation() {
                eprintln!("Kontrollkood: {code}. Kinnita allkiri oma seadmes.");
            }
        }
    });

    let interrupt = tokio::spawn({
        let handle = handle.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                // Fails only once the workflow has already succeeded.
                let _ = handle.apply(SigningEvent::Reset);
            }
        }
    });

    if let Some(index) = args.representative {
        driver.dispatch(SigningEvent::SelectRepresentative(index)).await?;
    }
    driver.dispatch(SigningEvent::SelectMethod(args.method)).await?;
    if handle.with(|wf| wf.state().kind()) == StateKind::Input {
        if let Some(code) = &args.personal_code {
            driver.dispatch(SigningEvent::EditPersonalCode(code.clone())).await?;
        }
        if let Some(phone) = &args.phone {
            driver.dispatch(SigningEvent::EditPhoneNumber(phone.clone())).await?;
        }
    }
    if let Some(signer) = handle.with(|wf| wf.selected_representative().map(|r| r.display_name())) {
        eprintln!("Allkirjastaja: {signer}");
    }
    eprintln!("Allkirjastamine: {}", args.method.label());

    let outcome = driver.dispatch(SigningEvent::Submit).await?;
    interrupt.abort();

    match outcome {
        Some(contract) => {
            match args.format {
                OutputFormat::Json => print_json(&contract)?,
                OutputFormat::Text => println!(
                    "Leping allkirjastatud: {} ({})",
                    contract.file_name(),
                    contract.signer_name.as_deref().unwrap_or("allkirjastaja")
                ),
            }
            Ok(0)
        }
        None => {
            let snapshot = handle.snapshot();
            match snapshot.error_message() {
                Some(message) => {
                    eprintln!("{message}");
                    Ok(2)
                }
                None => {
                    eprintln!("Allkirjastamine katkestati.");
                    Ok(130)
                }
            }
        }
    }
}
