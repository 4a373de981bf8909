use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::domain::clock::SystemClock;
use crate::infra::db::{
    DbAttendanceRepository, DbCredentialRepository, DbInviteCodeRepository, DbMembershipPort,
    DbScheduleLookup,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub invite_ttl: Duration,
    pub credential_ttl: Duration,
}

impl AppState {
    pub fn invite_repo(&self) -> DbInviteCodeRepository {
        DbInviteCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn credential_repo(&self) -> DbCredentialRepository {
        DbCredentialRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_repo(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }

    pub fn schedule_lookup(&self) -> DbScheduleLookup {
        DbScheduleLookup {
            db: self.db.clone(),
        }
    }

    pub fn membership_port(&self) -> DbMembershipPort {
        DbMembershipPort {
            db: self.db.clone(),
        }
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
