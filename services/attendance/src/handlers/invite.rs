use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use rollcall_auth_types::IdentityHeaders;
use rollcall_core::response::ApiResponse;
use rollcall_core::serde::to_rfc3339_ms;
use rollcall_domain::id::{InviteCodeId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::code::CodeGenerator;
use crate::domain::types::{InviteCode, InviteKind, InviteRedemption};
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::invite::{
    IssueInviteInput, IssueInviteUseCase, ListInvitesUseCase, RedeemInviteUseCase,
    ValidateInviteUseCase,
};

#[derive(Serialize)]
pub struct InviteResponse {
    pub id: InviteCodeId,
    pub code: String,
    pub kind: InviteKind,
    pub issued_by: Option<UserId>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub issued_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub one_time_use: bool,
    pub used: bool,
}

impl From<InviteCode> for InviteResponse {
    fn from(invite: InviteCode) -> Self {
        Self {
            id: invite.id,
            code: invite.code,
            kind: invite.kind,
            issued_by: invite.issued_by,
            issued_at: invite.issued_at,
            expires_at: invite.expires_at,
            one_time_use: invite.one_time_use,
            used: invite.used,
        }
    }
}

#[derive(Deserialize)]
pub struct InviteCodeRequest {
    #[serde(alias = "invite_code")]
    pub code: String,
}

// ── POST /invites ─────────────────────────────────────────────────────────────

fn default_one_time_use() -> bool {
    true
}

#[derive(Deserialize)]
pub struct IssueInviteRequest {
    #[serde(alias = "invite_type")]
    pub kind: String,
    /// Lifetime in seconds. The configured default applies when absent.
    pub ttl_secs: Option<i64>,
    #[serde(default = "default_one_time_use")]
    pub one_time_use: bool,
}

pub async fn issue_invite(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<IssueInviteRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let kind: InviteKind = body.kind.parse()?;
    let ttl = body
        .ttl_secs
        .map(|secs| {
            Duration::try_seconds(secs)
                .ok_or_else(|| AttendanceServiceError::validation("ttl_secs out of range"))
        })
        .transpose()?;
    let usecase = IssueInviteUseCase {
        invites: state.invite_repo(),
        clock: state.clock(),
        generator: CodeGenerator::default(),
        default_ttl: state.invite_ttl,
    };
    let invite = usecase
        .execute(
            identity.into(),
            IssueInviteInput {
                kind,
                ttl,
                one_time_use: body.one_time_use,
            },
        )
        .await?;
    Ok(ApiResponse::created(
        "invite issued",
        InviteResponse::from(invite),
    ))
}

// ── GET /invites ──────────────────────────────────────────────────────────────

pub async fn list_invites(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = ListInvitesUseCase {
        invites: state.invite_repo(),
    };
    let invites = usecase.execute(identity.into(), page).await?;
    let body: Vec<InviteResponse> = invites.into_iter().map(InviteResponse::from).collect();
    Ok(ApiResponse::ok("invites", body))
}

// ── POST /invites/validate ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct InviteValidationResponse {
    pub id: InviteCodeId,
    pub kind: InviteKind,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub one_time_use: bool,
}

pub async fn validate_invite(
    State(state): State<AppState>,
    _identity: IdentityHeaders,
    Json(body): Json<InviteCodeRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = ValidateInviteUseCase {
        invites: state.invite_repo(),
        clock: state.clock(),
    };
    let invite = usecase.execute(&body.code).await?;
    Ok(ApiResponse::ok(
        "invite code is valid",
        InviteValidationResponse {
            id: invite.id,
            kind: invite.kind,
            expires_at: invite.expires_at,
            one_time_use: invite.one_time_use,
        },
    ))
}

// ── POST /invites/redeem ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RedemptionResponse {
    pub invite_id: InviteCodeId,
    pub kind: InviteKind,
    pub issued_by: Option<UserId>,
}

impl From<InviteRedemption> for RedemptionResponse {
    fn from(r: InviteRedemption) -> Self {
        Self {
            invite_id: r.invite_id,
            kind: r.kind,
            issued_by: r.issued_by,
        }
    }
}

pub async fn redeem_invite(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<InviteCodeRequest>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    let usecase = RedeemInviteUseCase {
        invites: state.invite_repo(),
        clock: state.clock(),
    };
    let redemption = usecase.execute(&body.code, identity.user_id).await?;
    Ok(ApiResponse::ok(
        "invite redeemed",
        RedemptionResponse::from(redemption),
    ))
}
