//! Retry policy for the idempotent registry and model calls.
//!
//! A call is repeated when the request never got an answer (connection
//! refused, timeout) or when a gateway in front of the service answered
//! 502, 503 or 504. Any other status goes back to the caller on the first
//! try, so registry SOAP faults and model quota errors (429) surface at once.
//!
//! Dokobit calls do not use this: a repeated sign request would open a
//! second session on the signer's phone, and status checks are already
//! paced by the signing workflow.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

/// How often and how patiently to repeat a failed idempotent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Send each request exactly once.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Policy from `KLAAR_HTTP_MAX_RETRIES` and `KLAAR_HTTP_RETRY_BASE_MS`,
    /// falling back to [`RetryPolicy::default`] per unset or unparsable
    /// variable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_retries: std::env::var("KLAAR_HTTP_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_retries),
            base_delay: std::env::var("KLAAR_HTTP_RETRY_BASE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default.base_delay),
        }
    }

    /// Delay before retry number `retry` (zero-based).
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Send a request built by `f`, repeating it under this policy.
    ///
    /// Returns the last response or transport error once the call succeeds,
    /// fails permanently, or runs out of retries.
    pub(crate) async fn send<F, Fut>(
        &self,
        endpoint: &str,
        f: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retry = 0;
        loop {
            let result = f().await;
            let reason = match &result {
                Ok(resp) if !is_gateway_failure(resp.status()) => None,
                Ok(resp) => Some(resp.status().to_string()),
                Err(e) => Some(e.to_string()),
            };
            let Some(reason) = reason else {
                return result;
            };
            if retry >= self.max_retries {
                return result;
            }
            let delay = self.delay(retry);
            retry += 1;
            tracing::warn!(
                endpoint,
                retry,
                max_retries = self.max_retries,
                "request failed ({reason}), retrying in {delay:?}"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Statuses a proxy returns when the service behind it is briefly away.
fn is_gateway_failure(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}
