//! # Signing Driver
//!
//! Executes [`SigningCommand`]s from the workflow reducer against a
//! [`SigningProvider`] on the Tokio runtime.
//!
//! The workflow lives behind a [`SigningHandle`] so that other tasks (a UI,
//! a Ctrl-C handler) can apply `Reset` while the driver sleeps between
//! polls. The lock is never held across an await. After every sleep the
//! driver checks that its session generation is still current and stops
//! quietly if it was superseded, so at most one poll per session is ever in
//! flight.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::contract::ServiceContract;
use crate::provider::SigningProvider;
use crate::workflow::{SigningCommand, SigningEvent, SigningWorkflow, WorkflowError};

/// Shared, lockable access to a signing workflow.
#[derive(Debug, Clone)]
pub struct SigningHandle(Arc<Mutex<SigningWorkflow>>);

impl SigningHandle {
    pub fn new(workflow: SigningWorkflow) -> Self {
        Self(Arc::new(Mutex::new(workflow)))
    }

    /// Apply an event directly, without executing the resulting command.
    pub fn apply(&self, event: SigningEvent) -> Result<Option<SigningCommand>, WorkflowError> {
        self.0.lock().apply(event)
    }

    /// Read the workflow under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&SigningWorkflow) -> R) -> R {
        f(&self.0.lock())
    }

    /// Owned copy of the current workflow.
    pub fn snapshot(&self) -> SigningWorkflow {
        self.0.lock().clone()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.lock().is_current(generation)
    }
}

type Observer = Arc<dyn Fn(&SigningWorkflow) + Send + Sync>;

/// Runs a signing workflow against a provider.
pub struct SigningDriver<P> {
    provider: Arc<P>,
    handle: SigningHandle,
    observer: Option<Observer>,
}

impl<P> Clone for SigningDriver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            handle: self.handle.clone(),
            observer: self.observer.clone(),
        }
    }
}

impl<P: SigningProvider> SigningDriver<P> {
    pub fn new(provider: P, handle: SigningHandle) -> Self {
        Self::with_shared_provider(Arc::new(provider), handle)
    }

    pub fn with_shared_provider(provider: Arc<P>, handle: SigningHandle) -> Self {
        Self {
            provider,
            handle,
            observer: None,
        }
    }

    /// Call `observer` after every event the driver applies.
    pub fn observe(mut self, observer: impl Fn(&SigningWorkflow) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn handle(&self) -> &SigningHandle {
        &self.handle
    }

    /// Apply `event` and execute every command that follows from it.
    ///
    /// Returns the signed contract when the flow completes, or `None` when
    /// it stops for any other reason (waiting for user input, an error
    /// state, or a superseded session).
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] if `event` is invalid in the current state.
    pub async fn dispatch(
        &self,
        event: SigningEvent,
    ) -> Result<Option<ServiceContract>, WorkflowError> {
        let mut next = self.apply(event)?;
        while let Some(command) = next {
            next = match command {
                SigningCommand::Initiate { generation, request } => {
                    tracing::info!(
                        provider = self.provider.provider_name(),
                        method = %request.method,
                        generation,
                        "initiating signing session"
                    );
                    let result = self.provider.initiate(&request).await;
                    self.apply(SigningEvent::InitiationResult { generation, result })?
                }
                SigningCommand::Poll {
                    generation,
                    method,
                    token,
                    delay,
                } => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if !self.handle.is_current(generation) {
                        tracing::debug!(generation, "session superseded, polling stopped");
                        return Ok(None);
                    }
                    let result = self.provider.check_status(method, &token).await;
                    self.apply(SigningEvent::PollResult { generation, result })?
                }
                SigningCommand::Complete(contract) => return Ok(Some(contract)),
            };
        }
        Ok(None)
    }

    fn apply(&self, event: SigningEvent) -> Result<Option<SigningCommand>, WorkflowError> {
        let mut workflow = self.handle.0.lock();
        let command = workflow.apply(event)?;
        if let Some(observer) = &self.observer {
            observer(&*workflow);
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::contract::ContractStatus;
    use crate::mock::MockSigningProvider;
    use crate::policy::PollPolicy;
    use crate::provider::{SignStatus, SigningFailure, SigningMethod};
    use crate::workflow::{SigningState, StateKind};
    use klaar_core::RegistryCode;
    use tokio::time::Instant;

    fn handle() -> SigningHandle {
        let contract =
            crate::ServiceContract::new("Näidis OÜ", RegistryCode::new("12345678").unwrap());
        SigningHandle::new(SigningWorkflow::new(contract, vec![], PollPolicy::default()))
    }

    async fn submit_smart_id(
        driver: &SigningDriver<MockSigningProvider>,
    ) -> Option<crate::ServiceContract> {
        driver
            .dispatch(SigningEvent::SelectMethod(SigningMethod::SmartId))
            .await
            .unwrap();
        driver
            .dispatch(SigningEvent::EditPersonalCode("38001011234".into()))
            .await
            .unwrap();
        driver.dispatch(SigningEvent::Submit).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn signs_after_pending_checks() {
        let driver = SigningDriver::new(MockSigningProvider::approving_after(2), handle());
        let start = Instant::now();

        let contract = submit_smart_id(&driver).await.expect("contract signed");

        assert_eq!(contract.status, ContractStatus::Signed);
        assert_eq!(driver.provider().initiate_calls(), 1);
        assert_eq!(driver.provider().status_calls(), 3);
        // First check is immediate, then two 2 s intervals.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
        assert_eq!(driver.handle().snapshot().state(), &SigningState::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn always_waiting_times_out_after_cap() {
        let driver = SigningDriver::new(MockSigningProvider::new(), handle());
        let start = Instant::now();

        assert!(submit_smart_id(&driver).await.is_none());

        assert_eq!(driver.provider().status_calls(), 60);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(118) && elapsed < Duration::from_secs(119));
        driver.handle().with(|wf| {
            assert!(matches!(
                wf.state(),
                SigningState::Error {
                    failure: SigningFailure::Timeout { attempts: 60 },
                    ..
                }
            ));
            assert!(!wf.contract().is_signed());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_polling_immediately() {
        let provider = MockSigningProvider::new();
        provider.push_status(Ok(SignStatus::Waiting));
        provider.push_status(Ok(SignStatus::Canceled));
        let driver = SigningDriver::new(provider, handle());

        assert!(submit_smart_id(&driver).await.is_none());

        assert_eq!(driver.provider().status_calls(), 2);
        let kind = driver.handle().with(|wf| wf.state().kind());
        assert_eq!(kind, StateKind::Error);
        assert_eq!(
            driver.handle().snapshot().error_message().as_deref(),
            Some("Allkirjastamine tühistati.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_counted_then_recover() {
        let provider = MockSigningProvider::new();
        provider.push_status(Err(SigningFailure::Network("timeout".into())));
        provider.push_status(Err(SigningFailure::Network("reset".into())));
        provider.push_status(Ok(SignStatus::Ok(MockSigningProvider::signed_file())));
        let driver = SigningDriver::new(provider, handle());

        assert!(submit_smart_id(&driver).await.is_some());
        assert_eq!(driver.provider().status_calls(), 3);
    }

    #[tokio::test]
    async fn initiation_failure_makes_no_status_calls() {
        let provider = MockSigningProvider::new()
            .with_initiate_failure(SigningFailure::Network("dns".into()));
        let driver = SigningDriver::new(provider, handle());

        assert!(submit_smart_id(&driver).await.is_none());
        assert_eq!(driver.provider().status_calls(), 0);
        assert_eq!(driver.handle().with(|wf| wf.state().kind()), StateKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_sleep_prevents_further_calls() {
        let driver = SigningDriver::new(MockSigningProvider::new(), handle());
        driver
            .dispatch(SigningEvent::SelectMethod(SigningMethod::SmartId))
            .await
            .unwrap();
        driver
            .dispatch(SigningEvent::EditPersonalCode("38001011234".into()))
            .await
            .unwrap();

        let task = tokio::spawn({
            let driver = driver.clone();
            async move { driver.dispatch(SigningEvent::Submit).await }
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(driver.provider().status_calls(), 1);

        driver.handle().apply(SigningEvent::Reset).unwrap();
        let outcome = task.await.unwrap().unwrap();
        assert!(outcome.is_none());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(driver.provider().status_calls(), 1);
        assert_eq!(driver.handle().with(|wf| wf.state().kind()), StateKind::Method);
    }

    #[tokio::test]
    async fn observer_sees_every_applied_event() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let driver = SigningDriver::new(MockSigningProvider::approving_after(0), handle())
            .observe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert!(submit_smart_id(&driver).await.is_some());
        // select, edit, submit, initiation result, one poll result
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn invalid_event_is_an_error() {
        let driver = SigningDriver::new(MockSigningProvider::new(), handle());
        let err = driver.dispatch(SigningEvent::Retry).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidEvent { .. }));
    }
}
