//! Canonical timestamp encoding shared by the durable backends.
//!
//! Both the line-delimited file and the relational table store creation
//! times as `YYYY-MM-DDTHH:MM:SSZ`. Fixed-width UTC strings sort
//! lexicographically in chronological order, which the relational backend
//! relies on when ordering in SQL.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Error returned for a stored timestamp that is not UTC RFC 3339 with `Z`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The value does not carry the literal `Z` UTC designator.
    #[error("created_at '{0}' must be an ISO-8601 UTC timestamp ending in 'Z'")]
    MissingUtcDesignator(String),

    /// The value could not be parsed.
    #[error("created_at '{value}' is not a valid timestamp: {reason}")]
    Unparseable {
        /// The offending value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Formats a timestamp in the canonical storage encoding.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored timestamp.
///
/// Fractional seconds are accepted on read; writers never emit them.
///
/// # Errors
///
/// Returns [`TimestampError`] when the value lacks the `Z` suffix or is not
/// valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    if !value.ends_with('Z') {
        return Err(TimestampError::MissingUtcDesignator(value.to_owned()));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| TimestampError::Unparseable {
            value: value.to_owned(),
            reason: err.to_string(),
        })
}
