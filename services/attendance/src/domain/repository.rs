#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use rollcall_domain::id::{CredentialId, GroupId, InviteCodeId, ScheduleId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::types::{
    AttendanceCounts, AttendanceFilter, AttendanceRecord, CheckinCredential, GroupMember,
    InviteCode, Schedule,
};
use crate::error::AttendanceServiceError;

/// Repository for invite codes. Rows are never deleted; expiry is a read-time check.
pub trait InviteCodeRepository: Send + Sync {
    /// Codes of all rows with `expires_at > now`.
    async fn list_unexpired_codes(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashSet<String>, AttendanceServiceError>;

    async fn create(&self, invite: &InviteCode) -> Result<(), AttendanceServiceError>;

    /// Row with this code and the greatest `expires_at` (then greatest `issued_at`).
    async fn find_latest_by_code(
        &self,
        code: &str,
    ) -> Result<Option<InviteCode>, AttendanceServiceError>;

    /// Flip `used` from false to true in one conditional write.
    /// Returns `false` if the row was already used (another redeemer won).
    async fn mark_used(&self, id: InviteCodeId) -> Result<bool, AttendanceServiceError>;

    /// Codes issued by `issuer`, newest first.
    async fn list_by_issuer(
        &self,
        issuer: UserId,
        page: PageRequest,
    ) -> Result<Vec<InviteCode>, AttendanceServiceError>;
}

/// Repository for single-use check-in credentials.
pub trait CredentialRepository: Send + Sync {
    async fn create(&self, credential: &CheckinCredential) -> Result<(), AttendanceServiceError>;

    async fn find_by_id(
        &self,
        id: CredentialId,
    ) -> Result<Option<CheckinCredential>, AttendanceServiceError>;

    /// Set `redeemed_at = at` only if it is still null.
    /// Returns `false` if the credential was already redeemed.
    async fn mark_redeemed(
        &self,
        id: CredentialId,
        at: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError>;

    /// Credentials owned by `owner`, newest first.
    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<CheckinCredential>, AttendanceServiceError>;
}

/// Repository for attendance rows, one per (user, schedule).
pub trait AttendanceRepository: Send + Sync {
    async fn find(
        &self,
        user_id: UserId,
        schedule_id: ScheduleId,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;

    /// Overwrite status, method, note and `updated_at` of an existing row.
    async fn update(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError>;

    async fn list(
        &self,
        filter: AttendanceFilter,
        page: PageRequest,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;

    async fn count(
        &self,
        filter: AttendanceFilter,
    ) -> Result<AttendanceCounts, AttendanceServiceError>;

    /// Users holding a row for `schedule_id`.
    async fn list_user_ids(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<UserId>, AttendanceServiceError>;

    /// Insert the given rows, skipping any (user, schedule) pair that already exists.
    /// Returns the number actually inserted.
    async fn insert_missing(
        &self,
        records: &[AttendanceRecord],
    ) -> Result<u64, AttendanceServiceError>;

    /// Delete rows of `schedule_id` owned by `user_ids`. Returns the number removed.
    async fn remove(
        &self,
        schedule_id: ScheduleId,
        user_ids: &[UserId],
    ) -> Result<u64, AttendanceServiceError>;
}

/// Read-only access to schedules.
pub trait ScheduleLookup: Send + Sync {
    async fn find_by_id(&self, id: ScheduleId)
    -> Result<Option<Schedule>, AttendanceServiceError>;

    /// The schedule `user_id` can check in to at `now`, if any.
    async fn find_active_for(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Schedule>, AttendanceServiceError>;

    async fn list_by_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<Schedule>, AttendanceServiceError>;
}

/// Read-only access to group membership.
pub trait MembershipPort: Send + Sync {
    async fn list_members(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupMember>, AttendanceServiceError>;
}
