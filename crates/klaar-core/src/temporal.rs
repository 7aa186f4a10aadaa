//! # Temporal Types
//!
//! `Timestamp` is a UTC-only instant truncated to seconds. It stamps
//! contract creation, signing completion and workflow transitions.
//!
//! Contract documents render dates in the Estonian short form `d.m.yyyy`
//! (no zero padding), see [`estonian_date`].

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::KlaarError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string, accepting any offset and converting to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`KlaarError::InvalidTimestamp`] if the string is not RFC 3339.
    pub fn parse(s: &str) -> Result<Self, KlaarError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| KlaarError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar date of this instant in UTC.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Render as ISO8601 with Z suffix (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Render a date the way Estonian documents print it: `5.3.2026`.
pub fn estonian_date(date: NaiveDate) -> String {
    date.format("%-d.%-m.%Y").to_string()
}

/// Parse a registry date such as `2021-04-01`, `2021-04-01Z` or
/// `2021-04-01T00:00:00`. Returns `None` for anything unrecognized.
pub fn parse_registry_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(s, "%d.%m.%Y").ok())
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
