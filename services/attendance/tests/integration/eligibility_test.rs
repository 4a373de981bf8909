use rollcall_attendance::domain::types::{AttendanceRecord, AttendanceStatus, Schedule};
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::eligibility::{EligibilitySync, SyncEligibilityUseCase};
use rollcall_domain::id::{GroupId, UserId};
use rollcall_domain::user::UserRole;
use rollcall_testing::time::at;

use crate::helpers::{
    FixedClock, MockAttendanceRepo, MockMembership, MockScheduleLookup, group_member, member,
    schedule, staff,
};

fn group_schedule(group_id: GroupId, start: (u32, u32), end: (u32, u32)) -> Schedule {
    Schedule {
        group_id: Some(group_id),
        ..schedule(start, end)
    }
}

#[tokio::test]
async fn should_seed_pending_rows_for_members_only() {
    let group_id = GroupId::new_v4();
    let regular = group_member(UserRole::Member);
    let other = group_member(UserRole::Member);
    let members = vec![
        regular,
        other,
        group_member(UserRole::Moderator),
        group_member(UserRole::Staff),
    ];
    let schedules = vec![
        group_schedule(group_id, (10, 0), (11, 0)),
        group_schedule(group_id, (14, 0), (15, 0)),
        schedule((16, 0), (17, 0)),
    ];
    let repo = MockAttendanceRepo::empty();
    let handle = repo.records_handle();

    let uc = SyncEligibilityUseCase {
        members: MockMembership { group_id, members },
        schedules: MockScheduleLookup::new(schedules),
        attendances: repo,
        clock: FixedClock::new(at(8, 0)),
    };

    let result = uc.execute(staff(), group_id).await.unwrap();

    assert_eq!(
        result,
        EligibilitySync {
            schedules: 2,
            created: 4,
            removed: 0,
        }
    );
    let rows = handle.lock().unwrap();
    assert!(rows.iter().all(|r| r.status == AttendanceStatus::Pending));
    assert!(
        rows.iter()
            .all(|r| r.user_id == regular.user_id || r.user_id == other.user_id)
    );
}

#[tokio::test]
async fn should_be_idempotent_and_keep_existing_status() {
    let group_id = GroupId::new_v4();
    let m = group_member(UserRole::Member);
    let s = group_schedule(group_id, (10, 0), (11, 0));
    let mut present = AttendanceRecord::pending(m.user_id, s.id, at(7, 0));
    present.status = AttendanceStatus::Present;
    let repo = MockAttendanceRepo::new(vec![present]);
    let handle = repo.records_handle();

    let uc = SyncEligibilityUseCase {
        members: MockMembership {
            group_id,
            members: vec![m],
        },
        schedules: MockScheduleLookup::new(vec![s]),
        attendances: repo,
        clock: FixedClock::new(at(8, 0)),
    };

    for _ in 0..2 {
        let result = uc.execute(staff(), group_id).await.unwrap();
        assert_eq!(result.created, 0);
        assert_eq!(result.removed, 0);
    }
    let rows = handle.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, AttendanceStatus::Present);
}

#[tokio::test]
async fn should_remove_rows_of_departed_members() {
    let group_id = GroupId::new_v4();
    let stays = group_member(UserRole::Member);
    let departed = UserId::new_v4();
    let s = group_schedule(group_id, (10, 0), (11, 0));
    let repo = MockAttendanceRepo::new(vec![
        AttendanceRecord::pending(stays.user_id, s.id, at(7, 0)),
        AttendanceRecord::pending(departed, s.id, at(7, 0)),
    ]);
    let handle = repo.records_handle();

    let uc = SyncEligibilityUseCase {
        members: MockMembership {
            group_id,
            members: vec![stays],
        },
        schedules: MockScheduleLookup::new(vec![s]),
        attendances: repo,
        clock: FixedClock::new(at(8, 0)),
    };

    let result = uc.execute(staff(), group_id).await.unwrap();

    assert_eq!(result.removed, 1);
    let rows = handle.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, stays.user_id);
}

#[tokio::test]
async fn should_forbid_sync_by_non_staff() {
    let group_id = GroupId::new_v4();
    let uc = SyncEligibilityUseCase {
        members: MockMembership {
            group_id,
            members: vec![],
        },
        schedules: MockScheduleLookup::empty(),
        attendances: MockAttendanceRepo::empty(),
        clock: FixedClock::new(at(8, 0)),
    };

    let result = uc.execute(member(UserId::new_v4()), group_id).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}
