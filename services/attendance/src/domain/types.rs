use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use rollcall_domain::id::{
    AttendanceId, CredentialId, GroupId, InviteCodeId, ScheduleId, UserId,
};
use rollcall_domain::user::UserRole;

use crate::domain::classifier::{LATE_CUTOFF_MINS, SCHEDULE_LOOKUP_MARGIN_MINS};
use crate::error::AttendanceServiceError;

/// Caller identity as seen by the use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub is_staff: bool,
}

// ── Invites ───────────────────────────────────────────────────────────────────

/// Role granted to whoever redeems the invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteKind {
    Member,
    Moderator,
}

impl InviteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
        }
    }
}

impl FromStr for InviteKind {
    type Err = AttendanceServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" | "normal" => Ok(Self::Member),
            "moderator" => Ok(Self::Moderator),
            other => Err(AttendanceServiceError::validation(format!(
                "invalid invite kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InviteCode {
    pub id: InviteCodeId,
    /// Human-enterable code. Unique only among non-expired rows.
    pub code: String,
    pub kind: InviteKind,
    pub issued_by: Option<UserId>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub one_time_use: bool,
    pub used: bool,
}

impl InviteCode {
    /// Expiry is inclusive: at `expires_at` the code is already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_consumed(&self) -> bool {
        self.one_time_use && self.used
    }
}

/// What a successful redemption grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteRedemption {
    pub invite_id: InviteCodeId,
    pub kind: InviteKind,
    pub issued_by: Option<UserId>,
}

/// Default invite lifetime in days.
pub const INVITE_TTL_DAYS: i64 = 7;

// ── Check-in credentials ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CheckinCredential {
    pub id: CredentialId,
    pub owner_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl CheckinCredential {
    /// A credential is still valid at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }
}

/// Default credential lifetime in seconds.
pub const CREDENTIAL_TTL_SECS: i64 = 300;

// ── Schedules ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduleWindow {
    /// `start <= now <= end`. Owners may only self-edit while this holds.
    pub fn is_in_progress(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }

    /// Instant from which no check-in can be classified better than absent.
    pub fn closes_at(&self) -> DateTime<Utc> {
        self.end.max(self.start + Duration::minutes(LATE_CUTOFF_MINS))
    }

    /// The span in which a check-in resolves to this schedule, inclusive on both ends.
    pub fn lookup_horizon(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let margin = Duration::minutes(SCHEDULE_LOOKUP_MARGIN_MINS);
        (self.start - margin, self.closes_at() + margin)
    }

    pub fn accepts_checkin(&self, now: DateTime<Utc>) -> bool {
        let (opens, closes) = self.lookup_horizon();
        opens <= now && now <= closes
    }
}

/// Among the schedules whose horizon contains `now`, the one starting closest to `now`.
/// Ties go to the earlier start.
pub fn nearest_schedule(
    candidates: impl IntoIterator<Item = Schedule>,
    now: DateTime<Utc>,
) -> Option<Schedule> {
    candidates
        .into_iter()
        .filter(|s| s.window.accepts_checkin(now))
        .min_by_key(|s| ((s.window.start - now).abs(), s.window.start))
}

#[derive(Debug, Clone)]
pub struct Schedule {
    pub id: ScheduleId,
    pub title: String,
    pub window: ScheduleWindow,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Clone, Copy)]
pub struct GroupMember {
    pub user_id: UserId,
    pub role: UserRole,
}

// ── Attendance ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Pending,
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Present,
        Self::Late,
        Self::Absent,
        Self::Excused,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
            Self::Excused => "excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceServiceError;

    /// Accepts the legacy names `tbd` and `exception`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" | "tbd" => Ok(Self::Pending),
            "present" => Ok(Self::Present),
            "late" => Ok(Self::Late),
            "absent" => Ok(Self::Absent),
            "excused" | "exception" => Ok(Self::Excused),
            other => Err(AttendanceServiceError::validation(format!(
                "invalid attendance status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinMethod {
    Credential,
    Manual,
    Unset,
}

impl CheckinMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credential => "credential",
            Self::Manual => "manual",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for CheckinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckinMethod {
    type Err = AttendanceServiceError;

    /// Accepts the legacy name `qr`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credential" | "qr" => Ok(Self::Credential),
            "manual" => Ok(Self::Manual),
            "unset" => Ok(Self::Unset),
            other => Err(AttendanceServiceError::validation(format!(
                "invalid check-in method: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub user_id: UserId,
    pub schedule_id: ScheduleId,
    pub status: AttendanceStatus,
    pub method: CheckinMethod,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Fresh row created when a user becomes eligible for a schedule.
    pub fn pending(user_id: UserId, schedule_id: ScheduleId, at: DateTime<Utc>) -> Self {
        Self {
            id: AttendanceId::new_v4(),
            user_id,
            schedule_id,
            status: AttendanceStatus::Pending,
            method: CheckinMethod::Unset,
            note: None,
            updated_at: at,
        }
    }
}

/// Row selection for listing and counting. Dates are calendar days in UTC: `start_date`
/// bounds the schedule start from below, `end_date` bounds the schedule end from above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub user_id: Option<UserId>,
    pub schedule_id: Option<ScheduleId>,
    pub group_id: Option<GroupId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AttendanceFilter {
    /// Whether any bound refers to the row's schedule rather than the row itself.
    pub fn constrains_schedule(&self) -> bool {
        self.group_id.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }

    /// Schedules must start at or after this instant.
    pub fn starts_from(&self) -> Option<DateTime<Utc>> {
        self.start_date.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Schedules must end strictly before this instant.
    pub fn ends_before(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn matches_schedule(&self, schedule: &Schedule) -> bool {
        self.group_id.is_none_or(|g| schedule.group_id == Some(g))
            && self.starts_from().is_none_or(|t| schedule.window.start >= t)
            && self.ends_before().is_none_or(|t| schedule.window.end < t)
    }
}

/// Row totals per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub total: u64,
    pub pending: u64,
    pub present: u64,
    pub late: u64,
    pub absent: u64,
    pub excused: u64,
}

impl AttendanceCounts {
    pub fn add(&mut self, status: AttendanceStatus, n: u64) {
        self.total += n;
        match status {
            AttendanceStatus::Pending => self.pending += n,
            AttendanceStatus::Present => self.present += n,
            AttendanceStatus::Late => self.late += n,
            AttendanceStatus::Absent => self.absent += n,
            AttendanceStatus::Excused => self.excused += n,
        }
    }
}
