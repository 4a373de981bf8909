//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-rollcall-user-id` + `x-rollcall-user-role` headers
//! injected by the gateway. In tests, `MockAuth` produces these headers directly
//! so no real gateway or bearer token is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use rollcall_auth_types::{X_ROLLCALL_USER_ID, X_ROLLCALL_USER_ROLE};
use rollcall_domain::id::UserId;
use rollcall_domain::user::UserRole;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn member() -> Self {
        Self::new(UserId(Uuid::new_v4()), UserRole::Member)
    }

    pub fn staff() -> Self {
        Self::new(UserId(Uuid::new_v4()), UserRole::Staff)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(X_ROLLCALL_USER_ID),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(X_ROLLCALL_USER_ROLE),
            HeaderValue::from(u16::from(self.user_role.as_u8())),
        );
        map
    }
}
