//! # Signing Provider Seam
//!
//! The trait that the workflow driver uses to talk to a remote signature
//! service, plus the request, session and status types that cross it.
//!
//! Implementations live outside this crate (the Dokobit HTTP client) or in
//! [`crate::mock`] for tests and offline demos.
//!
//! ## Failure Taxonomy
//!
//! | Variant | Origin | Retried |
//! |---|---|---|
//! | `ValidationFailed` | local input check | never reaches the network |
//! | `Network` | transport | counted within the polling cap |
//! | `ProviderRejected` | provider said no | no |
//! | `Timeout` | polling cap exhausted | no |
//! | `CanceledByUser` | user declined on device | no |

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use klaar_core::{ContractId, PersonalCode, PhoneNumber, ValidationError};

use crate::contract::{ContractDocument, ServiceContract};

// ─── Method ──────────────────────────────────────────────────────────

/// Remote-signing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningMethod {
    #[serde(rename = "smartid")]
    SmartId,
    #[serde(rename = "mobileid")]
    MobileId,
}

impl SigningMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmartId => "smartid",
            Self::MobileId => "mobileid",
        }
    }

    /// Human-readable product name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SmartId => "Smart-ID",
            Self::MobileId => "Mobiil-ID",
        }
    }

    /// Whether the method needs a phone number besides the personal code.
    pub fn requires_phone(&self) -> bool {
        matches!(self, Self::MobileId)
    }
}

impl std::fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SigningMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smartid" | "smart-id" => Ok(Self::SmartId),
            "mobileid" | "mobile-id" | "mobiil-id" => Ok(Self::MobileId),
            other => Err(format!("unknown signing method \"{other}\"")),
        }
    }
}

// ─── Failures ────────────────────────────────────────────────────────

/// Why a signing attempt did not produce a signed contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningFailure {
    /// Local input check failed; nothing was sent.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The provider could not be reached or answered garbage.
    #[error("network error: {0}")]
    Network(String),

    /// The provider refused to start or complete the signing.
    #[error("provider rejected signing: {0}")]
    ProviderRejected(String),

    /// Status polling hit the attempt cap while still waiting.
    #[error("signing timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The signer declined on their device.
    #[error("signing was canceled by the user")]
    CanceledByUser,
}

impl SigningFailure {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "validation_failed",
            Self::Network(_) => "network_error",
            Self::ProviderRejected(_) => "provider_rejected",
            Self::Timeout { .. } => "timeout",
            Self::CanceledByUser => "canceled_by_user",
        }
    }

    /// Message shown to the signer (Estonian).
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationFailed(ValidationError::InvalidPersonalCode(_)) => {
                "Palun sisesta korrektne isikukood (11 numbrit)".to_string()
            }
            Self::ValidationFailed(ValidationError::InvalidPhoneNumber(_)) => {
                "Palun sisesta korrektne telefoninumber (+372...)".to_string()
            }
            Self::ValidationFailed(other) => other.to_string(),
            Self::Network(_) => "Ühenduse viga. Palun proovi uuesti.".to_string(),
            Self::ProviderRejected(msg) if !msg.trim().is_empty() => msg.clone(),
            Self::ProviderRejected(_) => "Allkirjastamise alustamine ebaõnnestus".to_string(),
            Self::Timeout { .. } => "Allkirjastamine aegus. Palun proovi uuesti.".to_string(),
            Self::CanceledByUser => "Allkirjastamine tühistati.".to_string(),
        }
    }
}

// ─── Request / Session / Status ──────────────────────────────────────

/// A validated request to start signing one contract.
///
/// Built fresh for every submission. `phone_number` is present iff the
/// method is Mobile-ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    pub method: SigningMethod,
    pub personal_code: PersonalCode,
    pub phone_number: Option<PhoneNumber>,
    pub contract_id: ContractId,
    pub company_name: String,
    pub document: ContractDocument,
}

impl SignRequest {
    /// Validate raw form input and build a request for `contract`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningFailure::ValidationFailed`] when the personal code,
    /// or for Mobile-ID the phone number, is malformed.
    pub fn new(
        method: SigningMethod,
        personal_code: &str,
        contract: &ServiceContract,
        phone_number: Option<&str>,
    ) -> Result<Self, SigningFailure> {
        let personal_code = PersonalCode::new(personal_code)?;
        let phone_number = match method {
            SigningMethod::MobileId => Some(PhoneNumber::new(phone_number.unwrap_or_default())?),
            SigningMethod::SmartId => None,
        };
        Ok(Self {
            method,
            personal_code,
            phone_number,
            contract_id: contract.id,
            company_name: contract.company_name.clone(),
            document: contract.document(),
        })
    }
}

/// Handle for one in-progress remote signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignSession {
    pub token: String,
    /// Code the signer compares with the prompt on their device.
    pub control_code: String,
}

/// The signed container returned once the signer confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedFile {
    pub name: Option<String>,
    /// Base64 container bytes.
    pub content: String,
    pub digest: Option<String>,
}

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignStatus {
    Ok(SignedFile),
    Waiting,
    Canceled,
    Error(String),
    /// Any status the workflow does not know, including `ok` without a file.
    Unrecognized(String),
}

// ─── Provider trait ──────────────────────────────────────────────────

/// A remote signature service.
pub trait SigningProvider: Send + Sync {
    /// Start a signing session. Never retried by callers.
    fn initiate(
        &self,
        request: &SignRequest,
    ) -> impl Future<Output = Result<SignSession, SigningFailure>> + Send;

    /// Check a session once. Exactly one remote call per invocation.
    fn check_status(
        &self,
        method: SigningMethod,
        token: &str,
    ) -> impl Future<Output = Result<SignStatus, SigningFailure>> + Send;

    /// Name for logs, e.g. "dokobit" or "mock".
    fn provider_name(&self) -> &str;
}

/// Validate input locally, then start a signing session.
///
/// Invalid input returns [`SigningFailure::ValidationFailed`] without
/// calling the provider.
pub async fn initiate_signing<P: SigningProvider>(
    provider: &P,
    method: SigningMethod,
    personal_code: &str,
    contract: &ServiceContract,
    phone_number: Option<&str>,
) -> Result<SignSession, SigningFailure> {
    let request = SignRequest::new(method, personal_code, contract, phone_number)?;
    provider.initiate(&request).await
}

/// Check the status of a session once.
pub async fn check_signing_status<P: SigningProvider>(
    provider: &P,
    method: SigningMethod,
    token: &str,
) -> Result<SignStatus, SigningFailure> {
    provider.check_status(method, token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSigningProvider;
    use klaar_core::RegistryCode;

    fn contract() -> ServiceContract {
        ServiceContract::new("Näidis OÜ", RegistryCode::new("12345678").unwrap())
    }

    #[test]
    fn method_parsing_and_display() {
        assert_eq!("Smart-ID".parse::<SigningMethod>().unwrap(), SigningMethod::SmartId);
        assert_eq!("mobileid".parse::<SigningMethod>().unwrap(), SigningMethod::MobileId);
        assert!("idcard".parse::<SigningMethod>().is_err());
        assert_eq!(SigningMethod::MobileId.to_string(), "mobileid");
        assert_eq!(
            serde_json::to_string(&SigningMethod::SmartId).unwrap(),
            "\"smartid\""
        );
    }

    #[test]
    fn request_requires_phone_only_for_mobile_id() {
        let c = contract();
        let smart =
            SignRequest::new(SigningMethod::SmartId, "38001011234", &c, Some("+37251234567"))
                .unwrap();
        assert!(smart.phone_number.is_none());

        let mobile =
            SignRequest::new(SigningMethod::MobileId, "38001011234", &c, Some("+372 5123 4567"))
                .unwrap();
        assert_eq!(mobile.phone_number.unwrap().as_str(), "+37251234567");

        let missing = SignRequest::new(SigningMethod::MobileId, "38001011234", &c, None);
        assert!(matches!(
            missing,
            Err(SigningFailure::ValidationFailed(ValidationError::InvalidPhoneNumber(_)))
        ));
    }

    #[test]
    fn request_carries_contract_document() {
        let c = contract();
        let req = SignRequest::new(SigningMethod::SmartId, "38001011234", &c, None).unwrap();
        assert_eq!(req.contract_id, c.id);
        assert_eq!(req.document.file_name, "leping_12345678.txt");
        assert_eq!(req.company_name, "Näidis OÜ");
    }

    #[test]
    fn failure_kinds_and_messages() {
        assert_eq!(SigningFailure::Timeout { attempts: 60 }.kind(), "timeout");
        assert_eq!(
            SigningFailure::CanceledByUser.user_message(),
            "Allkirjastamine tühistati."
        );
        assert_eq!(
            SigningFailure::ProviderRejected("Kasutaja ei ole Smart-ID klient".into())
                .user_message(),
            "Kasutaja ei ole Smart-ID klient"
        );
        assert_eq!(
            SigningFailure::ProviderRejected(String::new()).user_message(),
            "Allkirjastamise alustamine ebaõnnestus"
        );
        let v: SigningFailure = ValidationError::InvalidPersonalCode("1".into()).into();
        assert_eq!(v.kind(), "validation_failed");
        assert!(v.user_message().contains("11 numbrit"));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_provider() {
        let provider = MockSigningProvider::new();
        let c = contract();

        let result =
            initiate_signing(&provider, SigningMethod::SmartId, "12345", &c, None).await;
        assert!(matches!(result, Err(SigningFailure::ValidationFailed(_))));

        let result = initiate_signing(
            &provider,
            SigningMethod::MobileId,
            "38001011234",
            &c,
            Some("5123456"),
        )
        .await;
        assert!(matches!(result, Err(SigningFailure::ValidationFailed(_))));
        assert_eq!(provider.initiate_calls(), 0);
    }

    #[tokio::test]
    async fn valid_input_reaches_provider_once() {
        let provider = MockSigningProvider::new();
        let session =
            initiate_signing(&provider, SigningMethod::SmartId, "38001011234", &contract(), None)
                .await
                .unwrap();
        assert_eq!(provider.initiate_calls(), 1);
        assert!(!session.control_code.is_empty());

        let status = check_signing_status(&provider, SigningMethod::SmartId, &session.token)
            .await
            .unwrap();
        assert_eq!(status, SignStatus::Waiting);
        assert_eq!(provider.status_calls(), 1);
    }
}
