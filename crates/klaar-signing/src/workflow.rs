//! # Signing Workflow State Machine
//!
//! Drives one contract from method selection to a signed document.
//!
//! ## States
//!
//! ```text
//!            SelectMethod
//! Method ───────────────▶ Confirm   (Smart-ID, signer identity known)
//!   ▲  ◀───── Back ─────  Input     (otherwise)
//!   │                       │ Submit (valid input)
//!   │                       ▼
//!   │ Reset              Signing ──── ok ──────▶ Success (terminal)
//!   │                       │
//!   │                       └── canceled / error / timeout / rejected
//!   │                                  ▼
//!   └──────────────────── Error ── Retry ──▶ Confirm | Input | Method
//! ```
//!
//! ## Design
//!
//! The workflow is a reducer: [`SigningWorkflow::apply`] takes a
//! [`SigningEvent`], updates state synchronously, and may return a
//! [`SigningCommand`] for an executor to run (start a session, check status
//! after a delay, hand over the signed contract). It never performs I/O.
//!
//! Every submission bumps a generation counter. Session and poll results
//! carry the generation they were issued for; results for a superseded
//! generation (after `Reset` or a new submission) are ignored. This makes a
//! stray in-flight poll harmless.
//!
//! Local validation failures do not change state. They are stored as an
//! inline field error until the input is edited or resubmitted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use klaar_core::{PersonalCode, Timestamp, ValidationError};

use crate::contract::ServiceContract;
use crate::policy::PollPolicy;
use crate::provider::{
    SignRequest, SignSession, SignStatus, SignedFile, SigningFailure, SigningMethod,
};
use crate::representative::Representative;

// ─── States ──────────────────────────────────────────────────────────

/// State discriminant used in logs, errors and the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    Method,
    Confirm,
    Input,
    Signing,
    Success,
    Error,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Method => "method",
            Self::Confirm => "confirm",
            Self::Input => "input",
            Self::Signing => "signing",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// The step a submission was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStep {
    Confirm,
    Input,
}

/// Workflow state with the data that only exists in that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningState {
    /// Choosing Smart-ID or Mobile-ID.
    Method,
    /// Smart-ID with a known signer; one click to sign.
    Confirm,
    /// Entering personal code and, for Mobile-ID, phone number.
    Input,
    /// A session is being opened (`session` is `None`) or polled.
    Signing {
        signer: PersonalCode,
        session: Option<SignSession>,
    },
    /// Contract signed. Terminal.
    Success,
    /// Signing failed; `origin` is where the attempt was submitted from.
    Error {
        failure: SigningFailure,
        origin: SubmitStep,
    },
}

impl SigningState {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Method => StateKind::Method,
            Self::Confirm => StateKind::Confirm,
            Self::Input => StateKind::Input,
            Self::Signing { .. } => StateKind::Signing,
            Self::Success => StateKind::Success,
            Self::Error { .. } => StateKind::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }
}

// ─── Events and Commands ─────────────────────────────────────────────

/// Input to the reducer, from the user or from an executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningEvent {
    SelectMethod(SigningMethod),
    /// Pick a representative by position in the workflow's list.
    SelectRepresentative(usize),
    EditPersonalCode(String),
    EditPhoneNumber(String),
    Submit,
    /// Outcome of an [`SigningCommand::Initiate`].
    InitiationResult {
        generation: u64,
        result: Result<SignSession, SigningFailure>,
    },
    /// Outcome of a [`SigningCommand::Poll`].
    PollResult {
        generation: u64,
        result: Result<SignStatus, SigningFailure>,
    },
    Retry,
    Back,
    Reset,
}

impl SigningEvent {
    /// Event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectMethod(_) => "select_method",
            Self::SelectRepresentative(_) => "select_representative",
            Self::EditPersonalCode(_) => "edit_personal_code",
            Self::EditPhoneNumber(_) => "edit_phone_number",
            Self::Submit => "submit",
            Self::InitiationResult { .. } => "initiation_result",
            Self::PollResult { .. } => "poll_result",
            Self::Retry => "retry",
            Self::Back => "back",
            Self::Reset => "reset",
        }
    }
}

/// Work the reducer asks its executor to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningCommand {
    /// Open a signing session. Feed the outcome back as `InitiationResult`.
    Initiate { generation: u64, request: SignRequest },
    /// Wait `delay`, then check status once. Feed the outcome back as
    /// `PollResult`.
    Poll {
        generation: u64,
        method: SigningMethod,
        token: String,
        delay: Duration,
    },
    /// The contract is signed.
    Complete(ServiceContract),
}

// ─── Errors ──────────────────────────────────────────────────────────

/// An event that the workflow cannot accept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The event is not valid in the current state.
    #[error("cannot handle {event} in state {state}")]
    InvalidEvent {
        state: StateKind,
        event: &'static str,
    },

    /// No representative at the given position.
    #[error("no representative at position {0}")]
    UnknownRepresentative(usize),
}

/// Record of a workflow state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from_state: StateKind,
    pub to_state: StateKind,
    pub timestamp: Timestamp,
    pub reason: String,
}

// ─── Workflow ────────────────────────────────────────────────────────

/// Signing workflow for one service contract.
#[derive(Debug, Clone)]
pub struct SigningWorkflow {
    contract: ServiceContract,
    state: SigningState,
    method: Option<SigningMethod>,
    representatives: Vec<Representative>,
    selected: Option<usize>,
    personal_code: String,
    phone_number: String,
    field_error: Option<ValidationError>,
    policy: PollPolicy,
    generation: u64,
    attempts: u32,
    submitted_from: SubmitStep,
    transitions: Vec<TransitionRecord>,
}

impl SigningWorkflow {
    /// Start a workflow in `Method` state.
    ///
    /// The first representative is preselected and their personal code,
    /// if any, prefilled.
    pub fn new(
        contract: ServiceContract,
        representatives: Vec<Representative>,
        policy: PollPolicy,
    ) -> Self {
        let mut workflow = Self {
            contract,
            state: SigningState::Method,
            method: None,
            representatives,
            selected: None,
            personal_code: String::new(),
            phone_number: String::new(),
            field_error: None,
            policy,
            generation: 0,
            attempts: 0,
            submitted_from: SubmitStep::Input,
            transitions: Vec::new(),
        };
        if !workflow.representatives.is_empty() {
            workflow.select_representative(0);
        }
        workflow
    }

    // -- accessors --

    pub fn state(&self) -> &SigningState {
        &self.state
    }

    pub fn contract(&self) -> &ServiceContract {
        &self.contract
    }

    pub fn method(&self) -> Option<SigningMethod> {
        self.method
    }

    pub fn representatives(&self) -> &[Representative] {
        &self.representatives
    }

    pub fn selected_representative(&self) -> Option<&Representative> {
        self.selected.and_then(|i| self.representatives.get(i))
    }

    pub fn personal_code(&self) -> &str {
        &self.personal_code
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Inline validation error from the last submit, if any.
    pub fn field_error(&self) -> Option<&ValidationError> {
        self.field_error.as_ref()
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Current session generation. Bumped on every submit and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Status checks that came back without a final answer this session.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Control code of the active session, shown to the signer.
    pub fn control_code(&self) -> Option<&str> {
        match &self.state {
            SigningState::Signing {
                session: Some(session),
                ..
            } => Some(session.control_code.as_str()),
            _ => None,
        }
    }

    /// Whether a representative with a personal code is selected.
    pub fn identity_known(&self) -> bool {
        self.selected_representative()
            .is_some_and(Representative::has_personal_code)
    }

    /// True while `generation` is the live session.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && matches!(self.state, SigningState::Signing { .. })
    }

    /// Message to show the user for the current error, if any.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            SigningState::Error { failure, .. } => Some(failure.user_message()),
            _ => self
                .field_error
                .clone()
                .map(|e| SigningFailure::ValidationFailed(e).user_message()),
        }
    }

    // -- reducer --

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if the event is not valid in the current
    /// state. The workflow is unchanged in that case.
    pub fn apply(&mut self, event: SigningEvent) -> Result<Option<SigningCommand>, WorkflowError> {
        let event_name = event.name();
        match event {
            SigningEvent::SelectMethod(method) => {
                self.require(&[StateKind::Method], event_name)?;
                self.method = Some(method);
                self.field_error = None;
                let next = if method == SigningMethod::SmartId && self.identity_known() {
                    SigningState::Confirm
                } else {
                    SigningState::Input
                };
                self.transition(next, format!("{} selected", method.label()));
                Ok(None)
            }

            SigningEvent::SelectRepresentative(index) => {
                self.require(&[StateKind::Method, StateKind::Input], event_name)?;
                if index >= self.representatives.len() {
                    return Err(WorkflowError::UnknownRepresentative(index));
                }
                self.select_representative(index);
                self.field_error = None;
                Ok(None)
            }

            SigningEvent::EditPersonalCode(code) => {
                self.require(&[StateKind::Input], event_name)?;
                self.personal_code = code;
                self.field_error = None;
                Ok(None)
            }

            SigningEvent::EditPhoneNumber(phone) => {
                self.require(&[StateKind::Input], event_name)?;
                self.phone_number = phone;
                self.field_error = None;
                Ok(None)
            }

            SigningEvent::Submit => self.submit(event_name),

            SigningEvent::InitiationResult { generation, result } => {
                self.on_initiation(generation, result)
            }

            SigningEvent::PollResult { generation, result } => self.on_poll(generation, result),

            SigningEvent::Retry => {
                self.require(&[StateKind::Error], event_name)?;
                self.field_error = None;
                let next = match self.method {
                    Some(SigningMethod::SmartId) if self.identity_known() => SigningState::Confirm,
                    Some(_) => SigningState::Input,
                    None => SigningState::Method,
                };
                self.transition(next, "retry".to_string());
                Ok(None)
            }

            SigningEvent::Back => {
                self.require(&[StateKind::Confirm, StateKind::Input], event_name)?;
                self.method = None;
                self.field_error = None;
                self.transition(SigningState::Method, "back to method selection".to_string());
                Ok(None)
            }

            SigningEvent::Reset => {
                if self.state.is_terminal() {
                    return Err(self.invalid(event_name));
                }
                self.generation += 1;
                self.attempts = 0;
                self.method = None;
                self.field_error = None;
                if self.state.kind() != StateKind::Method {
                    self.transition(SigningState::Method, "reset".to_string());
                }
                Ok(None)
            }
        }
    }

    fn submit(
        &mut self,
        event_name: &'static str,
    ) -> Result<Option<SigningCommand>, WorkflowError> {
        let origin = match self.state {
            SigningState::Confirm => SubmitStep::Confirm,
            SigningState::Input => SubmitStep::Input,
            _ => return Err(self.invalid(event_name)),
        };
        let method = self.method.ok_or_else(|| self.invalid(event_name))?;
        let phone = method.requires_phone().then_some(self.phone_number.as_str());

        let request = match SignRequest::new(method, &self.personal_code, &self.contract, phone) {
            Ok(request) => request,
            Err(SigningFailure::ValidationFailed(err)) => {
                tracing::debug!(error = %err, "signing input rejected");
                self.field_error = Some(err);
                return Ok(None);
            }
            Err(failure) => {
                self.submitted_from = origin;
                self.fail(failure);
                return Ok(None);
            }
        };

        self.field_error = None;
        self.generation += 1;
        self.attempts = 0;
        self.submitted_from = origin;
        self.transition(
            SigningState::Signing {
                signer: request.personal_code.clone(),
                session: None,
            },
            format!("{} signing requested", method.label()),
        );
        Ok(Some(SigningCommand::Initiate {
            generation: self.generation,
            request,
        }))
    }

    fn on_initiation(
        &mut self,
        generation: u64,
        result: Result<SignSession, SigningFailure>,
    ) -> Result<Option<SigningCommand>, WorkflowError> {
        let (method, signer) = match (&self.state, self.method) {
            (SigningState::Signing { signer, session: None }, Some(method))
                if generation == self.generation =>
            {
                (method, signer.clone())
            }
            _ => {
                tracing::debug!(
                    generation,
                    current = self.generation,
                    "stale session result ignored"
                );
                return Ok(None);
            }
        };

        match result {
            Ok(session) => {
                tracing::info!(
                    generation,
                    method = %method,
                    control_code = %session.control_code,
                    "signing session started"
                );
                let token = session.token.clone();
                self.state = SigningState::Signing {
                    signer,
                    session: Some(session),
                };
                Ok(Some(SigningCommand::Poll {
                    generation,
                    method,
                    token,
                    delay: Duration::ZERO,
                }))
            }
            Err(failure) => {
                self.fail(failure);
                Ok(None)
            }
        }
    }

    fn on_poll(
        &mut self,
        generation: u64,
        result: Result<SignStatus, SigningFailure>,
    ) -> Result<Option<SigningCommand>, WorkflowError> {
        let (method, signer, token) = match (&self.state, self.method) {
            (
                SigningState::Signing {
                    signer,
                    session: Some(session),
                },
                Some(method),
            ) if generation == self.generation => (method, signer.clone(), session.token.clone()),
            _ => {
                tracing::debug!(generation, current = self.generation, "stale poll result ignored");
                return Ok(None);
            }
        };

        match result {
            Ok(SignStatus::Ok(file)) => Ok(Some(self.complete(signer, file))),
            Ok(SignStatus::Canceled) => {
                self.fail(SigningFailure::CanceledByUser);
                Ok(None)
            }
            Ok(SignStatus::Error(message)) => {
                self.fail(SigningFailure::ProviderRejected(message));
                Ok(None)
            }
            Ok(SignStatus::Waiting) => Ok(self.count_attempt(generation, method, token)),
            Ok(SignStatus::Unrecognized(status)) => {
                tracing::warn!(generation, status = %status, "unrecognized signing status");
                Ok(self.count_attempt(generation, method, token))
            }
            Err(SigningFailure::Network(reason)) => {
                tracing::warn!(generation, error = %reason, "status check failed");
                Ok(self.count_attempt(generation, method, token))
            }
            Err(failure) => {
                self.fail(failure);
                Ok(None)
            }
        }
    }

    fn count_attempt(
        &mut self,
        generation: u64,
        method: SigningMethod,
        token: String,
    ) -> Option<SigningCommand> {
        self.attempts += 1;
        tracing::debug!(generation, attempts = self.attempts, "signing still pending");
        if self.attempts < self.policy.max_attempts {
            Some(SigningCommand::Poll {
                generation,
                method,
                token,
                delay: self.policy.interval,
            })
        } else {
            self.fail(SigningFailure::Timeout {
                attempts: self.attempts,
            });
            None
        }
    }

    fn complete(&mut self, signer: PersonalCode, file: SignedFile) -> SigningCommand {
        let signer_name = self
            .selected_representative()
            .map(Representative::display_name);
        self.contract
            .mark_signed(signer_name, signer, file.content, Timestamp::now());
        tracing::info!(contract_id = %self.contract.id, "contract signed");
        self.transition(SigningState::Success, "contract signed".to_string());
        SigningCommand::Complete(self.contract.clone())
    }

    fn fail(&mut self, failure: SigningFailure) {
        tracing::warn!(kind = failure.kind(), error = %failure, "signing failed");
        let reason = failure.to_string();
        self.transition(
            SigningState::Error {
                failure,
                origin: self.submitted_from,
            },
            reason,
        );
    }

    fn select_representative(&mut self, index: usize) {
        if let Some(code) = self
            .representatives
            .get(index)
            .and_then(|rep| rep.personal_code.as_deref())
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            self.personal_code = code.to_string();
        }
        self.selected = Some(index);
    }

    fn require(&self, allowed: &[StateKind], event: &'static str) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state.kind()) {
            Ok(())
        } else {
            Err(self.invalid(event))
        }
    }

    fn invalid(&self, event: &'static str) -> WorkflowError {
        WorkflowError::InvalidEvent {
            state: self.state.kind(),
            event,
        }
    }

    fn transition(&mut self, to: SigningState, reason: String) {
        let from = self.state.kind();
        tracing::info!(
            from = %from,
            to = %to.kind(),
            reason = %reason,
            "signing workflow transition"
        );
        self.transitions.push(TransitionRecord {
            from_state: from,
            to_state: to.kind(),
            timestamp: Timestamp::now(),
            reason,
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
