use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use rollcall_core::response::ApiResponse;
use rollcall_domain::id::CredentialId;

use crate::error::AttendanceServiceError;
use crate::handlers::attendance::AttendanceResponse;
use crate::state::AppState;
use crate::usecase::checkin::CheckInUseCase;

#[derive(Deserialize)]
pub struct CheckInRequest {
    #[serde(alias = "qr_id")]
    pub credential_id: String,
}

// ── POST /checkins ────────────────────────────────────────────────────────────

/// Unauthenticated: the scanner presents the credential, which is itself the proof of identity.
pub async fn check_in(
    State(state): State<AppState>,
    Json(body): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let credential_id: CredentialId = body
        .credential_id
        .parse()
        .map_err(|_| AttendanceServiceError::validation("credential_id must be a UUID"))?;

    let usecase = CheckInUseCase::new(
        state.credential_repo(),
        state.attendance_repo(),
        state.schedule_lookup(),
        state.clock(),
    );
    let record = usecase.execute(credential_id).await?;
    Ok(ApiResponse::ok(
        "checked in",
        AttendanceResponse::from(record),
    ))
}
