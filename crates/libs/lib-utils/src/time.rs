//! # Time Utilities
//!
//! Conversions for timestamps reported by the Solana RPC.

use chrono::{DateTime, Utc};

/// Convert a Unix timestamp (seconds), as reported by RPC block times, to UTC.
///
/// Returns `None` for values outside chrono's representable range.
pub fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}
