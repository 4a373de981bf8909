//! Newtype wrappers for domain identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifies a user account (owned by the external identity provider).
    UserId
);

uuid_id!(
    /// Identifies a scheduled event.
    ScheduleId
);

uuid_id!(
    /// Identifies a membership group that schedules are assigned to.
    GroupId
);

uuid_id!(
    /// Identifies an invite code row. Distinct from the human-enterable code string.
    InviteCodeId
);

uuid_id!(
    /// Identifies a check-in credential. This is the opaque secret embedded in the QR payload.
    CredentialId
);

uuid_id!(
    /// Identifies an attendance record.
    AttendanceId
);
