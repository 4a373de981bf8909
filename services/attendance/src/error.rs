use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use rollcall_core::response::error_response;

/// Attendance service domain error variants.
///
/// Every variant except `Internal` is a terminal business outcome and must not be retried.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("invite code not found")]
    InviteNotFound,
    #[error("invite code expired")]
    InviteExpired,
    #[error("invite code already used")]
    InviteAlreadyUsed,
    #[error("no unique invite code available")]
    CodeSpaceExhausted,
    #[error("credential not found")]
    CredentialNotFound,
    #[error("credential expired")]
    CredentialExpired,
    #[error("credential already redeemed")]
    CredentialAlreadyRedeemed,
    #[error("attendance not found")]
    AttendanceNotFound,
    #[error("schedule not found")]
    ScheduleNotFound,
    #[error("no schedule in progress")]
    NoActiveSchedule,
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InviteNotFound => "INVITE_NOT_FOUND",
            Self::InviteExpired => "INVITE_EXPIRED",
            Self::InviteAlreadyUsed => "INVITE_ALREADY_USED",
            Self::CodeSpaceExhausted => "CODE_SPACE_EXHAUSTED",
            Self::CredentialNotFound => "CREDENTIAL_NOT_FOUND",
            Self::CredentialExpired => "CREDENTIAL_EXPIRED",
            Self::CredentialAlreadyRedeemed => "CREDENTIAL_ALREADY_REDEEMED",
            Self::AttendanceNotFound => "ATTENDANCE_NOT_FOUND",
            Self::ScheduleNotFound => "SCHEDULE_NOT_FOUND",
            Self::NoActiveSchedule => "NO_ACTIVE_SCHEDULE",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InviteNotFound
            | Self::CredentialNotFound
            | Self::AttendanceNotFound
            | Self::ScheduleNotFound
            | Self::NoActiveSchedule => StatusCode::NOT_FOUND,
            Self::InviteExpired | Self::CredentialExpired => StatusCode::GONE,
            Self::InviteAlreadyUsed | Self::CredentialAlreadyRedeemed => StatusCode::CONFLICT,
            Self::CodeSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        // Log 500s only. TraceLayer already records method/uri/status for all requests,
        // and 4xx here are expected business outcomes.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
