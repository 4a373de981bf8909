use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use rollcall_domain::id::{GroupId, UserId};

use crate::domain::clock::Clock;
use crate::domain::repository::{AttendanceRepository, MembershipPort, ScheduleLookup};
use crate::domain::types::{AttendanceRecord, Identity};
use crate::error::AttendanceServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EligibilitySync {
    pub schedules: u64,
    pub created: u64,
    pub removed: u64,
}

/// Brings the attendance rows of every schedule in a group in line with the group's
/// current members. Callers run this after changing membership or a schedule's group.
///
/// Organizers (moderators and staff) run events and never get attendance rows.
/// Existing rows of eligible users are left untouched, so re-running is a no-op.
pub struct SyncEligibilityUseCase<M, S, A, C>
where
    M: MembershipPort,
    S: ScheduleLookup,
    A: AttendanceRepository,
    C: Clock,
{
    pub members: M,
    pub schedules: S,
    pub attendances: A,
    pub clock: C,
}

impl<M, S, A, C> SyncEligibilityUseCase<M, S, A, C>
where
    M: MembershipPort,
    S: ScheduleLookup,
    A: AttendanceRepository,
    C: Clock,
{
    pub async fn execute(
        &self,
        actor: Identity,
        group_id: GroupId,
    ) -> Result<EligibilitySync, AttendanceServiceError> {
        if !actor.is_staff {
            return Err(AttendanceServiceError::Forbidden);
        }

        let eligible: HashSet<UserId> = self
            .members
            .list_members(group_id)
            .await?
            .into_iter()
            .filter(|m| !m.role.is_organizer())
            .map(|m| m.user_id)
            .collect();

        let now = self.clock.now();
        let mut result = EligibilitySync::default();
        for schedule in self.schedules.list_by_group(group_id).await? {
            let existing: HashSet<UserId> = self
                .attendances
                .list_user_ids(schedule.id)
                .await?
                .into_iter()
                .collect();

            let missing: Vec<AttendanceRecord> = eligible
                .difference(&existing)
                .map(|user_id| AttendanceRecord::pending(*user_id, schedule.id, now))
                .collect();
            let stale: Vec<UserId> = existing.difference(&eligible).copied().collect();

            result.created += self.attendances.insert_missing(&missing).await?;
            result.removed += self.attendances.remove(schedule.id, &stale).await?;
            result.schedules += 1;
        }

        info!(
            group_id = %group_id,
            schedules = result.schedules,
            created = result.created,
            removed = result.removed,
            "eligibility synced"
        );
        Ok(result)
    }
}
