//! # Identity Newtypes and Validators
//!
//! Estonian identifiers used across onboarding and contract signing.
//! Each identifier is a distinct type; you cannot pass a [`RegistryCode`]
//! where a [`PersonalCode`] is expected.
//!
//! ## Validation
//!
//! String-based identifiers validate format at construction time.
//! [`ContractId`] is UUID-based and always valid by construction.
//!
//! The two predicates [`is_valid_personal_code`] and [`is_valid_phone_number`]
//! are pure and total: they never panic and have no side effects.
//!
//! - Personal ID code: 11 digits. The checksum digit is not verified.
//! - Phone number: `+372` followed by 7 or 8 digits, whitespace ignored.
//! - Registry code: 8 digits in the range 10000000-99999999.
//! - VAT number: `EE` followed by 9 digits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Estonian country calling code prefix accepted for Mobile-ID numbers.
const ESTONIAN_PREFIX: &str = "+372";

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// True iff `code` is exactly 11 ASCII decimal digits.
pub fn is_valid_personal_code(code: &str) -> bool {
    code.len() == 11 && code.bytes().all(|b| b.is_ascii_digit())
}

/// True iff `phone`, with all whitespace removed, is `+372` followed by
/// 7 or 8 ASCII digits.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let compact = strip_whitespace(phone);
    match compact.strip_prefix(ESTONIAN_PREFIX) {
        Some(rest) => {
            (7..=8).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// Unique identifier for a service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(Uuid);

impl ContractId {
    /// Create a new random contract identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a contract identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContractId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Estonian personal identification code (isikukood).
///
/// Used as the signer identity for Smart-ID and Mobile-ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonalCode(String);

impl PersonalCode {
    /// Create a personal code, validating the 11-digit format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPersonalCode`] if the value is not
    /// exactly 11 digits. Surrounding whitespace is not trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_valid_personal_code(&s) {
            return Err(ValidationError::InvalidPersonalCode(s));
        }
        Ok(Self(s))
    }

    /// Access the code as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estonian mobile phone number bound to a Mobile-ID SIM.
///
/// Stored in compact form: whitespace removed, e.g. `+37251234567`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a phone number, validating the `+372` format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPhoneNumber`] if the value does not
    /// match after whitespace removal.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if !is_valid_phone_number(&raw) {
            return Err(ValidationError::InvalidPhoneNumber(raw));
        }
        Ok(Self(strip_whitespace(&raw)))
    }

    /// Access the compact phone number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estonian business-registry code (registrikood).
///
/// # Validation
///
/// - Whitespace is stripped before checking
/// - Must be non-empty and digits only
/// - Must be exactly 8 digits, in the range 10000000-99999999
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryCode(String);

impl RegistryCode {
    /// Create a registry code, validating format and range.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`] check, in the order
    /// empty, non-numeric, length, range.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let cleaned = strip_whitespace(&raw);

        if cleaned.is_empty() {
            return Err(ValidationError::MissingRegistryCode);
        }
        if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::NonNumericRegistryCode(raw));
        }
        if cleaned.len() != 8 {
            return Err(ValidationError::RegistryCodeLength(raw));
        }
        // Eight digits cannot overflow u32.
        let numeric: u32 = cleaned
            .parse()
            .map_err(|_| ValidationError::NonNumericRegistryCode(raw.clone()))?;
        if !(10_000_000..=99_999_999).contains(&numeric) {
            return Err(ValidationError::RegistryCodeRange(raw));
        }

        Ok(Self(cleaned))
    }

    /// Access the 8-digit code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estonian VAT registration number (KMKR), e.g. `EE123456789`.
///
/// Stored uppercase with whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VatNumber(String);

impl VatNumber {
    /// Create a VAT number, validating the `EE` + 9 digits format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VatNumberPrefix`] or
    /// [`ValidationError::VatNumberDigits`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let cleaned = strip_whitespace(&raw).to_uppercase();

        let digits = match cleaned.strip_prefix("EE") {
            Some(d) => d,
            None => return Err(ValidationError::VatNumberPrefix(raw)),
        };
        if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::VatNumberDigits(raw));
        }

        Ok(Self(cleaned))
    }

    /// Access the normalized VAT number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every 11-digit numeric string is a valid personal code.
        #[test]
        fn any_11_digits_is_valid_personal_code(code in "[0-9]{11}") {
            prop_assert!(is_valid_personal_code(&code));
        }

        /// Digit strings of any other length are rejected.
        #[test]
        fn other_lengths_are_invalid(code in "[0-9]{0,10}|[0-9]{12,20}") {
            prop_assert!(!is_valid_personal_code(&code));
        }

        /// A single non-digit anywhere invalidates an 11-char code.
        #[test]
        fn non_digit_is_invalid(
            prefix in "[0-9]{0,10}",
            bad in "[a-zA-Z +\\-.]",
        ) {
            let mut code = prefix.clone();
            code.push_str(&bad);
            while code.chars().count() < 11 {
                code.push('0');
            }
            prop_assert!(!is_valid_personal_code(&code));
        }

        /// `+372` plus 7 or 8 digits is valid, with arbitrary inner spaces.
        #[test]
        fn estonian_numbers_are_valid(
            digits in "[0-9]{7,8}",
            spaces in prop::collection::vec(0usize..3, 8),
        ) {
            let mut phone = String::from("+372");
            for (i, d) in digits.chars().enumerate() {
                phone.push_str(&" ".repeat(spaces[i % spaces.len()]));
                phone.push(d);
            }
            prop_assert!(is_valid_phone_number(&phone));
        }

        /// Validators never panic on arbitrary input.
        #[test]
        fn validators_are_total(s in any::<String>()) {
            let _ = is_valid_personal_code(&s);
            let _ = is_valid_phone_number(&s);
            let _ = RegistryCode::new(s.clone());
            let _ = VatNumber::new(s);
        }
    }
}
