//! Fixed instants for window arithmetic in tests.

use chrono::{DateTime, TimeZone, Utc};

/// `2025-03-01T{hour}:{minute}:00Z`. All schedule fixtures live on this day.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    at_secs(hour, minute, 0)
}

/// `2025-03-01T{hour}:{minute}:{second}Z`.
pub fn at_secs(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, second)
        .single()
        .unwrap()
}
