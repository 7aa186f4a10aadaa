//! # klaar-core: Foundational Types for Klaar Onboarding
//!
//! The leaf crate of the workspace. It defines the identifier newtypes and
//! validators that every onboarding flow relies on, the shared error
//! hierarchy, UTC timestamps, content digests, and the payroll simulator.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes.** `PersonalCode`, `PhoneNumber`, `RegistryCode`,
//!    `VatNumber` can only be constructed through their validators. The
//!    boolean predicates (`is_valid_personal_code`, `is_valid_phone_number`)
//!    are total and never panic, so form code can call them on every
//!    keystroke.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is always UTC, truncated to
//!    seconds.
//!
//! 3. **One digest path.** Documents sent for signing are hashed through
//!    [`ContentDigest::sha256`]; no other SHA-256 code exists in the
//!    workspace.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `klaar-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod payroll;
pub mod temporal;

pub use digest::ContentDigest;
pub use error::{KlaarError, ValidationError};
pub use identity::{
    is_valid_personal_code, is_valid_phone_number, ContractId, PersonalCode, PhoneNumber,
    RegistryCode, VatNumber,
};
pub use payroll::{ContractType, PayrollBreakdown};
pub use temporal::Timestamp;
