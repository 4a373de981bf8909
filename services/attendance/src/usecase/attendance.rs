use chrono::{DateTime, Utc};
use tracing::info;

use rollcall_domain::id::{ScheduleId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::classifier::classify;
use crate::domain::clock::Clock;
use crate::domain::repository::{AttendanceRepository, ScheduleLookup};
use crate::domain::types::{
    AttendanceCounts, AttendanceFilter, AttendanceRecord, AttendanceStatus, CheckinMethod,
    Identity, Schedule,
};
use crate::error::AttendanceServiceError;

/// Fields an override may change. Absent fields keep their current value,
/// except `method`, which becomes `manual` when not given.
#[derive(Debug, Clone, Default)]
pub struct ManualUpdate {
    pub status: Option<AttendanceStatus>,
    pub method: Option<CheckinMethod>,
    pub note: Option<String>,
}

/// Sole writer of attendance status.
pub struct AttendanceLedger<A, S, C>
where
    A: AttendanceRepository,
    S: ScheduleLookup,
    C: Clock,
{
    pub attendances: A,
    pub schedules: S,
    pub clock: C,
}

impl<A, S, C> AttendanceLedger<A, S, C>
where
    A: AttendanceRepository,
    S: ScheduleLookup,
    C: Clock,
{
    /// Record a credential check-in at `instant`, classified against the schedule window.
    pub async fn apply_automatic(
        &self,
        owner: UserId,
        schedule: &Schedule,
        instant: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let mut record = self
            .attendances
            .find(owner, schedule.id)
            .await?
            .ok_or(AttendanceServiceError::AttendanceNotFound)?;

        record.status = classify(&schedule.window, instant);
        record.method = CheckinMethod::Credential;
        record.updated_at = self.clock.now();
        self.attendances.update(&record).await?;

        info!(
            user_id = %owner,
            schedule_id = %schedule.id,
            status = record.status.as_str(),
            "check-in classified"
        );
        Ok(record)
    }

    /// Override a row. Staff may always do so; the owner only while the schedule is in progress.
    pub async fn apply_manual(
        &self,
        owner: UserId,
        schedule_id: ScheduleId,
        update: ManualUpdate,
        actor: Identity,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let mut record = self
            .attendances
            .find(owner, schedule_id)
            .await?
            .ok_or(AttendanceServiceError::AttendanceNotFound)?;

        let now = self.clock.now();
        if !actor.is_staff {
            if actor.id != owner {
                return Err(AttendanceServiceError::Forbidden);
            }
            let schedule = self
                .schedules
                .find_by_id(schedule_id)
                .await?
                .ok_or(AttendanceServiceError::ScheduleNotFound)?;
            if !schedule.window.is_in_progress(now) {
                return Err(AttendanceServiceError::Forbidden);
            }
        }

        if let Some(status) = update.status {
            record.status = status;
        }
        record.method = update.method.unwrap_or(CheckinMethod::Manual);
        if update.note.is_some() {
            record.note = update.note;
        }
        record.updated_at = now;
        self.attendances.update(&record).await?;

        info!(
            user_id = %owner,
            schedule_id = %schedule_id,
            actor = %actor.id,
            status = record.status.as_str(),
            "attendance overridden"
        );
        Ok(record)
    }
}

/// Rejects inverted date ranges. Non-staff callers only see their own rows, and asking for
/// someone else's is forbidden.
fn scope_filter(
    actor: Identity,
    mut filter: AttendanceFilter,
) -> Result<AttendanceFilter, AttendanceServiceError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(AttendanceServiceError::validation(
                "start_date must not be after end_date",
            ));
        }
    }
    if actor.is_staff {
        return Ok(filter);
    }
    match filter.user_id {
        Some(user_id) if user_id != actor.id => Err(AttendanceServiceError::Forbidden),
        _ => {
            filter.user_id = Some(actor.id);
            Ok(filter)
        }
    }
}

// ── Get ──────────────────────────────────────────────────────────────────────

pub struct GetAttendanceUseCase<A: AttendanceRepository> {
    pub attendances: A,
}

impl<A: AttendanceRepository> GetAttendanceUseCase<A> {
    pub async fn execute(
        &self,
        actor: Identity,
        user_id: UserId,
        schedule_id: ScheduleId,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        if !actor.is_staff && actor.id != user_id {
            return Err(AttendanceServiceError::Forbidden);
        }
        self.attendances
            .find(user_id, schedule_id)
            .await?
            .ok_or(AttendanceServiceError::AttendanceNotFound)
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListAttendancesUseCase<A: AttendanceRepository> {
    pub attendances: A,
}

impl<A: AttendanceRepository> ListAttendancesUseCase<A> {
    pub async fn execute(
        &self,
        actor: Identity,
        filter: AttendanceFilter,
        page: PageRequest,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let filter = scope_filter(actor, filter)?;
        self.attendances.list(filter, page.clamped()).await
    }
}

// ── Count ────────────────────────────────────────────────────────────────────

pub struct CountAttendancesUseCase<A: AttendanceRepository> {
    pub attendances: A,
}

impl<A: AttendanceRepository> CountAttendancesUseCase<A> {
    pub async fn execute(
        &self,
        actor: Identity,
        filter: AttendanceFilter,
    ) -> Result<AttendanceCounts, AttendanceServiceError> {
        let filter = scope_filter(actor, filter)?;
        self.attendances.count(filter).await
    }
}
