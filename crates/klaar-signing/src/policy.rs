//! Status polling policy.

use std::time::Duration;

use thiserror::Error;

/// Default pause between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default number of status checks before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Invalid polling configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid {var}: \"{value}\" (expected a positive integer)")]
    InvalidValue { var: &'static str, value: String },
}

/// How often and how long to poll a signing session.
///
/// The first check runs immediately after the session starts; later
/// checks are spaced `interval` apart. With the defaults a session is
/// abandoned after 60 checks, just under two minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Read overrides from the environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `KLAAR_POLL_INTERVAL_MS` | 2000 |
    /// | `KLAAR_POLL_MAX_ATTEMPTS` | 60 |
    pub fn from_env() -> Result<Self, PolicyError> {
        let mut policy = Self::default();
        if let Some(ms) = env_positive("KLAAR_POLL_INTERVAL_MS")? {
            policy.interval = Duration::from_millis(ms);
        }
        if let Some(n) = env_positive("KLAAR_POLL_MAX_ATTEMPTS")? {
            policy.max_attempts = u32::try_from(n).map_err(|_| PolicyError::InvalidValue {
                var: "KLAAR_POLL_MAX_ATTEMPTS",
                value: n.to_string(),
            })?;
        }
        Ok(policy)
    }

    /// Worst-case logical time from session start to timeout.
    pub fn max_duration(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

pub(crate) fn env_positive(var: &'static str) -> Result<Option<u64>, PolicyError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(PolicyError::InvalidValue { var, value: raw }),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = PollPolicy::default();
        assert_eq!(p.interval, Duration::from_secs(2));
        assert_eq!(p.max_attempts, 60);
        assert_eq!(p.max_duration(), Duration::from_secs(118));
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(PollPolicy::new(Duration::from_millis(10), 0).max_attempts, 1);
    }

    #[test]
    fn env_parsing() {
        // Variable names unique to this test so parallel tests don't race.
        std::env::set_var("KLAAR_TEST_POLICY_OK", "250");
        std::env::set_var("KLAAR_TEST_POLICY_BAD", "soon");
        std::env::set_var("KLAAR_TEST_POLICY_ZERO", "0");
        assert_eq!(env_positive("KLAAR_TEST_POLICY_OK").unwrap(), Some(250));
        assert!(env_positive("KLAAR_TEST_POLICY_BAD").is_err());
        assert!(env_positive("KLAAR_TEST_POLICY_ZERO").is_err());
        assert_eq!(env_positive("KLAAR_TEST_POLICY_UNSET").unwrap(), None);
    }
}
