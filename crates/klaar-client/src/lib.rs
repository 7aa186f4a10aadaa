//! # klaar-client -- Typed clients for the services behind Klaar onboarding
//!
//! - **Signing** via the Dokobit WS API ([`dokobit::DokobitClient`]
//!   implements [`klaar_signing::SigningProvider`])
//! - **Company lookup** via the Estonian business registry: public
//!   autocomplete plus the authenticated SOAP detail service
//! - **Receipts and advice** via the Gemini `generateContent` API, with
//!   offline placeholders when no key is configured
//!
//! ## Architecture
//!
//! Each service gets its own sub-client sharing one `reqwest::Client`.
//! Registry and model calls retry transport failures and gateway errors
//! under a [`RetryPolicy`]. Dokobit calls are sent once.
//!
//! The registry's XML is mapped onto domain types in [`normalize`], away
//! from the transport code, so layout changes in the response stay local.

pub mod config;
pub mod dokobit;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod retry;
pub mod search;
pub mod vision;

pub use config::{ClientConfig, ConfigError};
pub use dokobit::DokobitClient;
pub use error::ClientError;
pub use normalize::{is_company_active, signing_representatives, CompanyDetails};
pub use registry::{CompanySuggestion, DetailOptions, RegistryClient};
pub use retry::RetryPolicy;
pub use search::{AutocompleteDebouncer, CompanySearch};
pub use vision::{ModelOutput, OutputSource, ReceiptAnalysis, VisionClient};

use std::time::Duration;

/// Top-level client. Holds one sub-client per external service.
#[derive(Debug, Clone)]
pub struct KlaarClient {
    dokobit: DokobitClient,
    registry: RegistryClient,
    vision: VisionClient,
}

impl KlaarClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            dokobit: DokobitClient::new(
                http.clone(),
                config.dokobit_url,
                config.dokobit_access_token,
            ),
            registry: RegistryClient::new(
                http.clone(),
                config.autocomplete_url,
                config.registry_url,
                config.registry_username,
                config.registry_password,
                config.retry,
            ),
            vision: VisionClient::new(
                http,
                config.model_url,
                config.model_api_key,
                config.vision_model,
                config.text_model,
                config.retry,
            ),
        })
    }

    /// Access the Dokobit signing client.
    pub fn dokobit(&self) -> &DokobitClient {
        &self.dokobit
    }

    /// Access the business registry client.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Access the receipt and advice model client.
    pub fn vision(&self) -> &VisionClient {
        &self.vision
    }
}
