use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;
use rollcall_domain::id::{ScheduleId, UserId};
use rollcall_testing::auth::MockAuth;

/// Router over a disconnected pool. Every request below fails before reaching storage.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        invite_ttl: Duration::days(7),
        credential_ttl: Duration::minutes(5),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn with_auth(
    mut request: axum_test::TestRequest,
    auth: &MockAuth,
) -> axum_test::TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_answer_healthz() {
    let response = server().get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_report_unready_without_database() {
    let response = server().get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_route() {
    let response = server().get("/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_require_identity_for_invites() {
    let response = server()
        .post("/invites")
        .json(&json!({ "kind": "member" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_member_issuing_invite() {
    let server = server();
    let response = with_auth(
        server.post("/invites").json(&json!({ "kind": "member" })),
        &MockAuth::member(),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
    assert_eq!(body["code"], 403);
}

#[tokio::test]
async fn should_reject_unknown_invite_kind() {
    let server = server();
    let response = with_auth(
        server.post("/invites").json(&json!({ "kind": "overlord" })),
        &MockAuth::staff(),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_out_of_range_invite_ttl() {
    let server = server();
    let response = with_auth(
        server
            .post("/invites")
            .json(&json!({ "kind": "member", "ttl_secs": i64::MAX })),
        &MockAuth::staff(),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "ttl_secs out of range");
}

#[tokio::test]
async fn should_reject_malformed_credential_id() {
    let response = server()
        .post("/checkins")
        .json(&json!({ "credential_id": "not-a-uuid" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_forbid_member_listing_other_users_attendance() {
    let server = server();
    let path = format!("/attendances?user_id={}", UserId::new_v4());
    let response = with_auth(server.get(&path), &MockAuth::member()).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_member_reading_other_users_attendance() {
    let server = server();
    let path = format!(
        "/schedules/{}/attendances/{}",
        ScheduleId::new_v4(),
        UserId::new_v4()
    );
    let response = with_auth(server.get(&path), &MockAuth::member()).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_unknown_status_on_override() {
    let server = server();
    let auth = MockAuth::staff();
    let path = format!(
        "/schedules/{}/attendances/{}",
        ScheduleId::new_v4(),
        UserId::new_v4()
    );
    let response = with_auth(
        server.patch(&path).json(&json!({ "status": "maybe" })),
        &auth,
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "invalid attendance status: maybe");
}

#[tokio::test]
async fn should_forbid_member_syncing_eligibility() {
    let server = server();
    let path = format!("/groups/{}/eligibility", rollcall_domain::id::GroupId::new_v4());
    let response = with_auth(server.post(&path), &MockAuth::member()).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
