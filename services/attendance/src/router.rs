use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use rollcall_core::error::not_found;
use rollcall_core::health::healthz;
use rollcall_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    attendance::{count_attendances, get_attendance, list_attendances, update_attendance},
    checkin::check_in,
    credential::{issue_credential, list_credentials},
    eligibility::sync_eligibility,
    health::readyz,
    invite::{issue_invite, list_invites, redeem_invite, validate_invite},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Invites
        .route("/invites", post(issue_invite).get(list_invites))
        .route("/invites/validate", post(validate_invite))
        .route("/invites/redeem", post(redeem_invite))
        // Check-in credentials
        .route("/credentials", post(issue_credential).get(list_credentials))
        .route("/checkins", post(check_in))
        // Attendance
        .route("/attendances", get(list_attendances))
        .route("/attendances/count", get(count_attendances))
        .route(
            "/schedules/{schedule_id}/attendances/{user_id}",
            get(get_attendance).patch(update_attendance),
        )
        // Eligibility
        .route("/groups/{group_id}/eligibility", post(sync_eligibility))
        .fallback(not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
