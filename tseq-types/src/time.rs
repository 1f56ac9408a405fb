//! Timestamp and interval representation.
//!
//! Timestamps are microseconds since the Unix epoch, the same resolution the
//! wire format carries. Intervals are signed microsecond offsets.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microseconds since the Unix epoch.
pub type Timestamp = i64;

/// Signed span of time in microseconds.
pub type Interval = i64;

pub const USECS_PER_SEC: i64 = 1_000_000;

/// Convert a `SystemTime` to a timestamp, saturating at the `i64` range.
pub fn from_system_time(time: SystemTime) -> Timestamp {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_micros()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_micros())
            .map(|v| -v)
            .unwrap_or(i64::MIN),
    }
}

/// Convert a timestamp back to a `SystemTime`.
pub fn to_system_time(t: Timestamp) -> SystemTime {
    if t >= 0 {
        UNIX_EPOCH + Duration::from_micros(t as u64)
    } else {
        UNIX_EPOCH - Duration::from_micros(t.unsigned_abs())
    }
}

/// Convert a `Duration` to an interval, saturating at `i64::MAX`.
pub fn interval_from_duration(d: Duration) -> Interval {
    i64::try_from(d.as_micros()).unwrap_or(i64::MAX)
}
