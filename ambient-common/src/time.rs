//! Timestamp and duration utilities

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert configuration seconds to a `Duration`
///
/// Configuration durations may be zero, negative or NaN; all of those map to
/// `Duration::ZERO` ("now").
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs > 0.0 {
        // Too large for a Duration (including infinity) saturates
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
