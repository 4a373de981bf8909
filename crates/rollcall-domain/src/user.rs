//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Wire format: `u8` (0 = Member, 1 = Moderator, 2 = Staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member = 0,
    Moderator = 1,
    Staff = 2,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Member),
            1 => Some(Self::Moderator),
            2 => Some(Self::Staff),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Staff may manage invites, schedules and any attendance row.
    pub fn is_staff(self) -> bool {
        self == Self::Staff
    }

    /// Organizers (staff or moderators) are not tracked for attendance.
    pub fn is_organizer(self) -> bool {
        self >= Self::Moderator
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}
