//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use rollcall_core::error::AppError;
use rollcall_domain::id::UserId;
use rollcall_domain::user::UserRole;

pub const X_ROLLCALL_USER_ID: &str = "x-rollcall-user-id";
pub const X_ROLLCALL_USER_ROLE: &str = "x-rollcall-user-role";

/// User identity injected by the gateway via `x-rollcall-user-id` and `x-rollcall-user-role` headers.
///
/// Rejects with [`AppError::Unauthorized`] (401) if either header is absent or unparseable, or if the role is unknown.
/// Role enforcement (403) is done by handlers and use cases after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub user_role: UserRole,
}

impl IdentityHeaders {
    pub fn is_staff(&self) -> bool {
        self.user_role.is_staff()
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async block so no borrow of `parts` escapes.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(X_ROLLCALL_USER_ID)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .map(UserId);

        let user_role = parts
            .headers
            .get(X_ROLLCALL_USER_ROLE)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(UserRole::from_u8);

        async move {
            let user_id = user_id.ok_or(AppError::Unauthorized)?;
            let user_role = user_role.ok_or(AppError::Unauthorized)?;
            Ok(Self { user_id, user_role })
        }
    }
}
