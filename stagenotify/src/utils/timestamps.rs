//! Timestamp rendering for notification payloads.
//!
//! Every time field in a notification message goes through
//! [`format_notification_time`], which always renders in UTC with millisecond
//! precision and a literal `Z` suffix, independent of the host time zone.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Represents a timestamp carried by domain snapshots.
pub type Timestamp = DateTime<Utc>;

/// The `strftime` pattern equivalent to `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`.
pub const NOTIFICATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Formats a timestamp the way notification consumers expect it.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stagenotify::utils::format_notification_time;
///
/// let ts = Utc.with_ymd_and_hms(2011, 7, 13, 19, 43, 37).unwrap();
/// assert_eq!(format_notification_time(&ts), "2011-07-13T19:43:37.000Z");
/// ```
#[must_use]
pub fn format_notification_time(dt: &Timestamp) -> String {
    dt.format(NOTIFICATION_TIME_FORMAT).to_string()
}

/// Parses a timestamp written in the notification format.
///
/// Offsets other than `Z` are accepted and normalized to UTC, so values
/// produced by other systems can be fed back into fixtures.
pub fn parse_notification_time(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, NOTIFICATION_TIME_FORMAT) {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TimestampError::InvalidFormat(trimmed.to_string()))
}
