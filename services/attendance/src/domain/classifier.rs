//! Attendance status derivation from a check-in instant relative to a schedule window.
//!
//! | instant                                   | status    |
//! |-------------------------------------------|-----------|
//! | `< start - 1h`                            | `pending` |
//! | `start - 1h ..= start + 10min`            | `present` |
//! | `start + 10min < instant <= start + 60min`| `late`    |
//! | `> start + 60min`                         | `absent`  |
//!
//! The window `end` does not participate.

use chrono::{DateTime, Duration, Utc};

use crate::domain::types::{AttendanceStatus, ScheduleWindow};

/// Check-in opens this many minutes before the window start.
pub const CHECKIN_OPENS_BEFORE_MINS: i64 = 60;

/// Arrivals up to this many minutes after start still count as present.
pub const ON_TIME_GRACE_MINS: i64 = 10;

/// Arrivals later than this many minutes after start count as absent.
pub const LATE_CUTOFF_MINS: i64 = 60;

/// A check-in resolves to a schedule from this many minutes before its start until this many
/// minutes after it closes, so early and very late scans are still classified.
pub const SCHEDULE_LOOKUP_MARGIN_MINS: i64 = 180;

pub fn classify(window: &ScheduleWindow, instant: DateTime<Utc>) -> AttendanceStatus {
    let start = window.start;
    if instant < start - Duration::minutes(CHECKIN_OPENS_BEFORE_MINS) {
        AttendanceStatus::Pending
    } else if instant <= start + Duration::minutes(ON_TIME_GRACE_MINS) {
        AttendanceStatus::Present
    } else if instant <= start + Duration::minutes(LATE_CUTOFF_MINS) {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Absent
    }
}
