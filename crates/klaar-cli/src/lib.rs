//! # klaar-cli: Klaar Onboarding Command-Line Interface
//!
//! Provides the `klaar` binary, a terminal front end to the onboarding
//! services.
//!
//! ## Subcommands
//!
//! - `klaar search`: Business registry autocomplete.
//! - `klaar company`: Registry detail lookup and signing representatives.
//! - `klaar contract`: Render the accounting-service agreement.
//! - `klaar sign`: Sign the agreement with Smart-ID or Mobile-ID.
//! - `klaar receipt`: Read a receipt image with the vision model.
//! - `klaar advice`: One-sentence financial advice.
//! - `klaar payroll`: Reverse payroll calculation from a net salary, with an
//!   optional draft employment agreement.
//!
//! ```bash
//! klaar search "Näidis"
//! klaar sign --company "Näidis OÜ" --reg-code 12345678 --personal-code 38001011234 --mock
//! klaar payroll --net 1400 --compare
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the domain crates. No business logic here.
//! - Data goes to stdout, diagnostics and prompts to stderr.

pub mod advice;
pub mod company;
pub mod contract;
pub mod output;
pub mod payroll;
pub mod receipt;
pub mod search;
pub mod sign;

use anyhow::Context;
use klaar_client::{ClientConfig, KlaarClient};

/// Build the service client from environment configuration.
pub fn client() -> anyhow::Result<KlaarClient> {
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    KlaarClient::new(config).context("failed to build HTTP client")
}
