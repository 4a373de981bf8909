use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rollcall_auth_types::IdentityHeaders;
use rollcall_core::response::ApiResponse;
use rollcall_core::serde::to_rfc3339_ms;
use rollcall_domain::id::{AttendanceId, GroupId, ScheduleId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::types::{AttendanceFilter, AttendanceRecord, AttendanceStatus, CheckinMethod};
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::attendance::{
    AttendanceLedger, CountAttendancesUseCase, GetAttendanceUseCase, ListAttendancesUseCase,
    ManualUpdate,
};

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub id: AttendanceId,
    pub user_id: UserId,
    pub schedule_id: ScheduleId,
    pub status: AttendanceStatus,
    pub method: CheckinMethod,
    pub note: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            schedule_id: r.schedule_id,
            status: r.status,
            method: r.method,
            note: r.note,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub user_id: Option<UserId>,
    pub schedule_id: Option<ScheduleId>,
    pub group_id: Option<GroupId>,
    /// `YYYY-MM-DD`, inclusive.
    pub start_date: Option<NaiveDate>,
    /// `YYYY-MM-DD`, inclusive.
    pub end_date: Option<NaiveDate>,
}

impl From<AttendanceQuery> for AttendanceFilter {
    fn from(q: AttendanceQuery) -> Self {
        Self {
            user_id: q.user_id,
            schedule_id: q.schedule_id,
            group_id: q.group_id,
            start_date: q.start_date,
            end_date: q.end_date,
        }
    }
}

// ── GET /attendances ──────────────────────────────────────────────────────────

pub async fn list_attendances(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(query): Query<AttendanceQuery>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = ListAttendancesUseCase {
        attendances: state.attendance_repo(),
    };
    let list = usecase
        .execute(identity.into(), query.into(), page)
        .await?;
    let body: Vec<AttendanceResponse> = list.into_iter().map(AttendanceResponse::from).collect();
    Ok(ApiResponse::ok("attendances", body))
}

// ── GET /attendances/count ────────────────────────────────────────────────────

pub async fn count_attendances(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = CountAttendancesUseCase {
        attendances: state.attendance_repo(),
    };
    let counts = usecase.execute(identity.into(), query.into()).await?;
    Ok(ApiResponse::ok("attendance counts", counts))
}

// ── GET /schedules/{schedule_id}/attendances/{user_id} ────────────────────────

pub async fn get_attendance(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path((schedule_id, user_id)): Path<(ScheduleId, UserId)>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = GetAttendanceUseCase {
        attendances: state.attendance_repo(),
    };
    let record = usecase
        .execute(identity.into(), user_id, schedule_id)
        .await?;
    Ok(ApiResponse::ok(
        "attendance",
        AttendanceResponse::from(record),
    ))
}

// ── PATCH /schedules/{schedule_id}/attendances/{user_id} ──────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: Option<String>,
    pub method: Option<String>,
    pub note: Option<String>,
}

impl UpdateAttendanceRequest {
    fn parse(self) -> Result<ManualUpdate, AttendanceServiceError> {
        Ok(ManualUpdate {
            status: self.status.as_deref().map(str::parse).transpose()?,
            method: self.method.as_deref().map(str::parse).transpose()?,
            note: self.note,
        })
    }
}

pub async fn update_attendance(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path((schedule_id, user_id)): Path<(ScheduleId, UserId)>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let update = body.parse()?;
    let ledger = AttendanceLedger {
        attendances: state.attendance_repo(),
        schedules: state.schedule_lookup(),
        clock: state.clock(),
    };
    let record = ledger
        .apply_manual(user_id, schedule_id, update, identity.into())
        .await?;
    Ok(ApiResponse::ok(
        "attendance updated",
        AttendanceResponse::from(record),
    ))
}
