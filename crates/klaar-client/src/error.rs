//! Client error types.

use klaar_core::ValidationError;

/// Errors from registry and model calls.
///
/// The signature provider reports through
/// [`klaar_signing::SigningFailure`] instead, since its errors drive the
/// signing workflow.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body could not be read as JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Response body was readable but not in the expected shape.
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(String),
    /// The registry answered with a fault or an error message.
    #[error("registry error: {0}")]
    Registry(String),
    /// The model answered with something unusable.
    #[error("model error: {0}")]
    Model(String),
    /// Input rejected before any request was made.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
