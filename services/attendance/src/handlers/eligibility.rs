use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use rollcall_auth_types::IdentityHeaders;
use rollcall_core::response::ApiResponse;
use rollcall_domain::id::GroupId;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::eligibility::SyncEligibilityUseCase;

// ── POST /groups/{group_id}/eligibility ───────────────────────────────────────

pub async fn sync_eligibility(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(group_id): Path<GroupId>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = SyncEligibilityUseCase {
        members: state.membership_port(),
        schedules: state.schedule_lookup(),
        attendances: state.attendance_repo(),
        clock: state.clock(),
    };
    let result = usecase.execute(identity.into(), group_id).await?;
    Ok(ApiResponse::ok("eligibility synced", result))
}
