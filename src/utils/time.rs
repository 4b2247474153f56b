//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as ISO 8601 (UTC)
///
/// Out-of-range values are rendered as the raw number.
pub fn format_timestamp(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => ts.to_string(),
    }
}
