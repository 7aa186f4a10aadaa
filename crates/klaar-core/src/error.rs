//! # Error Types
//!
//! Error types shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Validation errors carry the rejected input so that form code can show an
//! inline message without re-deriving what went wrong.

use thiserror::Error;

/// Top-level error type for Klaar core operations.
#[derive(Error, Debug)]
pub enum KlaarError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Timestamp could not be parsed or is out of range.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Payroll simulator input is out of range.
    #[error("invalid payroll input: {0}")]
    Payroll(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when an identifier fails format validation.
///
/// These are recovered locally (inline field error) and never reach a
/// network layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Personal ID code is not exactly 11 decimal digits.
    #[error("invalid personal code: \"{0}\" (expected 11 digits)")]
    InvalidPersonalCode(String),

    /// Phone number is not `+372` followed by 7-8 digits.
    #[error("invalid phone number: \"{0}\" (expected +372 followed by 7-8 digits)")]
    InvalidPhoneNumber(String),

    /// Registry code is empty.
    #[error("registry code is required")]
    MissingRegistryCode,

    /// Registry code contains non-digit characters.
    #[error("invalid registry code: \"{0}\" (digits only)")]
    NonNumericRegistryCode(String),

    /// Registry code is not 8 digits long.
    #[error("invalid registry code: \"{0}\" (expected 8 digits)")]
    RegistryCodeLength(String),

    /// Registry code falls outside the issued range.
    #[error("invalid registry code: \"{0}\" (outside 10000000-99999999)")]
    RegistryCodeRange(String),

    /// VAT number does not start with the Estonian `EE` prefix.
    #[error("invalid VAT number: \"{0}\" (must start with EE)")]
    VatNumberPrefix(String),

    /// VAT number does not have 9 digits after the prefix.
    #[error("invalid VAT number: \"{0}\" (expected 9 digits after EE)")]
    VatNumberDigits(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_carries_input() {
        let err = ValidationError::InvalidPersonalCode("123".into());
        assert!(err.to_string().contains("\"123\""));
        assert!(err.to_string().contains("11 digits"));
    }

    #[test]
    fn klaar_error_wraps_validation() {
        let err: KlaarError = ValidationError::MissingRegistryCode.into();
        assert!(matches!(err, KlaarError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "validation error: registry code is required"
        );
    }

    #[test]
    fn klaar_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: KlaarError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
