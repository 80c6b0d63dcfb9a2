//! Wall-clock helpers.

use chrono::{DateTime, Utc};

/// Current instant in UTC.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
