//! # klaar-signing: Contract E-Signing
//!
//! Everything needed to get a client's accounting-service contract signed
//! with Smart-ID or Mobile-ID:
//!
//! - [`contract`]: the contract record and the Estonian agreement text.
//! - [`provider`]: the [`SigningProvider`] seam, request and status types,
//!   and the failure taxonomy.
//! - [`mock`]: a scripted provider for tests and offline demos.
//! - [`workflow`]: the signing state machine as a pure reducer.
//! - [`driver`]: the async executor that runs the reducer's commands.
//!
//! ## Polling
//!
//! Once a session starts its status is checked immediately, then every
//! [`PollPolicy::interval`] until the signer approves, declines, or the
//! attempt cap runs out. Sessions are identified by a generation number so
//! that a reset makes any in-flight poll a no-op.

pub mod contract;
pub mod driver;
pub mod mock;
pub mod policy;
pub mod provider;
pub mod representative;
pub mod workflow;

pub use contract::{
    contract_terms, contract_text, employment_contract_text, ContractDocument, ContractStatus,
    ServiceContract,
};
pub use driver::{SigningDriver, SigningHandle};
pub use mock::MockSigningProvider;
pub use policy::{PolicyError, PollPolicy};
pub use provider::{
    check_signing_status, initiate_signing, SignRequest, SignSession, SignStatus, SignedFile,
    SigningFailure, SigningMethod, SigningProvider,
};
pub use representative::{PersonType, Representative};
pub use workflow::{
    SigningCommand, SigningEvent, SigningState, SigningWorkflow, StateKind, SubmitStep,
    TransitionRecord, WorkflowError,
};
