//! Utility functions for timestamp handling.
//!
//! Notification payloads render every time field through a single formatter
//! so output is reproducible regardless of host locale or time zone.

pub mod timestamps;

pub use timestamps::{format_notification_time, parse_notification_time, Timestamp, TimestampError};
