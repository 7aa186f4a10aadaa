//! Scripted in-memory signing provider.
//!
//! Used by tests and by the CLI `--mock` mode. Status checks pop responses
//! from a queue; once the queue is empty the fallback response repeats.
//! Call counters let tests assert how many remote calls a flow made.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::provider::{
    SignRequest, SignSession, SignStatus, SignedFile, SigningFailure, SigningMethod,
    SigningProvider,
};

/// Mock signature provider with a scripted status sequence.
#[derive(Debug)]
pub struct MockSigningProvider {
    session: Result<SignSession, SigningFailure>,
    statuses: Mutex<VecDeque<Result<SignStatus, SigningFailure>>>,
    fallback: Result<SignStatus, SigningFailure>,
    initiate_calls: AtomicU32,
    status_calls: AtomicU32,
    last_request: Mutex<Option<SignRequest>>,
}

impl MockSigningProvider {
    /// A provider that opens a session and then waits forever.
    pub fn new() -> Self {
        Self {
            session: Ok(SignSession {
                token: "mock-session-token".to_string(),
                control_code: "4821".to_string(),
            }),
            statuses: Mutex::new(VecDeque::new()),
            fallback: Ok(SignStatus::Waiting),
            initiate_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A provider that answers `waiting` `pending_checks` times, then `ok`.
    pub fn approving_after(pending_checks: usize) -> Self {
        let provider = Self::new();
        for _ in 0..pending_checks {
            provider.push_status(Ok(SignStatus::Waiting));
        }
        provider.push_status(Ok(SignStatus::Ok(Self::signed_file())));
        provider
    }

    /// Make `initiate` fail with `failure`.
    pub fn with_initiate_failure(mut self, failure: SigningFailure) -> Self {
        self.session = Err(failure);
        self
    }

    /// Response repeated once the scripted queue runs dry.
    pub fn with_fallback(mut self, fallback: Result<SignStatus, SigningFailure>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Append a scripted status response.
    pub fn push_status(&self, status: Result<SignStatus, SigningFailure>) {
        self.statuses.lock().push_back(status);
    }

    pub fn initiate_calls(&self) -> u32 {
        self.initiate_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// The most recent request passed to `initiate`.
    pub fn last_request(&self) -> Option<SignRequest> {
        self.last_request.lock().clone()
    }

    /// The container returned on approval.
    pub fn signed_file() -> SignedFile {
        SignedFile {
            name: Some("leping.asice".to_string()),
            content: "UEsDBBQAAAAIAA==".to_string(),
            digest: None,
        }
    }
}

impl Default for MockSigningProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningProvider for MockSigningProvider {
    async fn initiate(&self, request: &SignRequest) -> Result<SignSession, SigningFailure> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());
        self.session.clone()
    }

    async fn check_status(
        &self,
        _method: SigningMethod,
        _token: &str,
    ) -> Result<SignStatus, SigningFailure> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_then_fallback() {
        let provider = MockSigningProvider::approving_after(1)
            .with_fallback(Ok(SignStatus::Canceled));

        let s1 = provider.check_status(SigningMethod::SmartId, "t").await.unwrap();
        let s2 = provider.check_status(SigningMethod::SmartId, "t").await.unwrap();
        let s3 = provider.check_status(SigningMethod::SmartId, "t").await.unwrap();

        assert_eq!(s1, SignStatus::Waiting);
        assert!(matches!(s2, SignStatus::Ok(_)));
        assert_eq!(s3, SignStatus::Canceled);
        assert_eq!(provider.status_calls(), 3);
    }

    #[tokio::test]
    async fn initiate_failure_is_returned() {
        let provider = MockSigningProvider::new()
            .with_initiate_failure(SigningFailure::ProviderRejected("no account".into()));
        let contract = crate::ServiceContract::new(
            "Näidis OÜ",
            klaar_core::RegistryCode::new("12345678").unwrap(),
        );
        let req = SignRequest::new(SigningMethod::SmartId, "38001011234", &contract, None).unwrap();

        let err = provider.initiate(&req).await.unwrap_err();
        assert_eq!(err, SigningFailure::ProviderRejected("no account".into()));
        assert_eq!(provider.initiate_calls(), 1);
        assert_eq!(provider.last_request(), Some(req));
    }
}
