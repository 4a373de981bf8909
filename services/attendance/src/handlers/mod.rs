pub mod attendance;
pub mod checkin;
pub mod credential;
pub mod eligibility;
pub mod health;
pub mod invite;

use rollcall_auth_types::IdentityHeaders;

use crate::domain::types::Identity;

impl From<IdentityHeaders> for Identity {
    fn from(headers: IdentityHeaders) -> Self {
        Self {
            id: headers.user_id,
            is_staff: headers.is_staff(),
        }
    }
}
