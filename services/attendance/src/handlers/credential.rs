use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use rollcall_auth_types::IdentityHeaders;
use rollcall_core::response::ApiResponse;
use rollcall_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use rollcall_domain::id::{CredentialId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::types::CheckinCredential;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::credential::{IssueCredentialUseCase, ListCredentialsUseCase};

#[derive(Serialize)]
pub struct CredentialResponse {
    /// Opaque token; rendered as the QR payload by clients.
    pub id: CredentialId,
    pub owner_id: UserId,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub issued_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl From<CheckinCredential> for CredentialResponse {
    fn from(c: CheckinCredential) -> Self {
        Self {
            id: c.id,
            owner_id: c.owner_id,
            issued_at: c.issued_at,
            expires_at: c.expires_at,
            redeemed_at: c.redeemed_at,
        }
    }
}

// ── POST /credentials ─────────────────────────────────────────────────────────

pub async fn issue_credential(
    State(state): State<AppState>,
    identity: IdentityHeaders,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = IssueCredentialUseCase {
        credentials: state.credential_repo(),
        clock: state.clock(),
        ttl: state.credential_ttl,
    };
    let credential = usecase.execute(identity.user_id).await?;
    Ok(ApiResponse::created(
        "credential issued",
        CredentialResponse::from(credential),
    ))
}

// ── GET /credentials ──────────────────────────────────────────────────────────

pub async fn list_credentials(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = ListCredentialsUseCase {
        credentials: state.credential_repo(),
    };
    let list = usecase.execute(identity.user_id, page).await?;
    let body: Vec<CredentialResponse> = list.into_iter().map(CredentialResponse::from).collect();
    Ok(ApiResponse::ok("credentials", body))
}
