use rollcall_attendance::domain::types::{AttendanceRecord, AttendanceStatus, CheckinMethod};
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::checkin::CheckInUseCase;
use rollcall_attendance::usecase::credential::IssueCredentialUseCase;
use rollcall_domain::id::{CredentialId, UserId};
use rollcall_testing::time::at;

use crate::helpers::{
    FixedClock, MockAttendanceRepo, MockCredentialRepo, MockScheduleLookup, credential, schedule,
};

struct Harness {
    owner: UserId,
    clock: FixedClock,
    credentials: MockCredentialRepo,
    attendances: MockAttendanceRepo,
    checkin: CheckInUseCase<MockCredentialRepo, MockAttendanceRepo, MockScheduleLookup, FixedClock>,
}

fn harness(schedules: MockScheduleLookup) -> Harness {
    let owner = UserId::new_v4();
    let clock = FixedClock::new(at(8, 0));
    let credentials = MockCredentialRepo::empty();
    let attendances = MockAttendanceRepo::new(
        schedules
            .schedules
            .iter()
            .map(|s| AttendanceRecord::pending(owner, s.id, at(7, 0)))
            .collect(),
    );
    let checkin = CheckInUseCase::new(
        credentials.clone(),
        attendances.clone(),
        schedules,
        clock.clone(),
    );
    Harness {
        owner,
        clock,
        credentials,
        attendances,
        checkin,
    }
}

impl Harness {
    /// Issue a fresh credential at the current clock instant and scan it.
    async fn scan_fresh(&self) -> Result<AttendanceRecord, AttendanceServiceError> {
        let issued = IssueCredentialUseCase::new(self.credentials.clone(), self.clock.clone())
            .execute(self.owner)
            .await
            .unwrap();
        self.checkin.execute(issued.id).await
    }
}

#[tokio::test]
async fn should_classify_checkins_across_the_window() {
    // Window [10:00, 11:00); every instant below falls inside its lookup horizon.
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));

    for (instant, expected) in [
        (at(9, 15), AttendanceStatus::Present),
        (at(10, 15), AttendanceStatus::Late),
        (at(11, 5), AttendanceStatus::Absent),
        (at(8, 0), AttendanceStatus::Pending),
    ] {
        h.clock.set(instant);
        let record = h.scan_fresh().await.unwrap();
        assert_eq!(record.status, expected, "check-in at {instant}");
        assert_eq!(record.method, CheckinMethod::Credential);
        assert_eq!(record.user_id, h.owner);
    }
}

#[tokio::test]
async fn should_reject_replayed_scan() {
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));
    h.clock.set(at(9, 58));
    let issued = IssueCredentialUseCase::new(h.credentials.clone(), h.clock.clone())
        .execute(h.owner)
        .await
        .unwrap();

    h.checkin.execute(issued.id).await.unwrap();
    let result = h.checkin.execute(issued.id).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialAlreadyRedeemed)),
        "expected CredentialAlreadyRedeemed, got {result:?}"
    );
}

#[tokio::test]
async fn should_propagate_expired_credential() {
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));
    let stale = credential(h.owner, at(9, 0));
    h.credentials.credentials_handle().lock().unwrap().push(stale.clone());
    h.clock.set(at(9, 10));

    let result = h.checkin.execute(stale.id).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialExpired)),
        "expected CredentialExpired, got {result:?}"
    );
    assert_eq!(
        h.attendances.records_handle().lock().unwrap()[0].status,
        AttendanceStatus::Pending
    );
}

#[tokio::test]
async fn should_propagate_unknown_credential() {
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));

    let result = h.checkin.execute(CredentialId::new_v4()).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialNotFound)),
        "expected CredentialNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_fail_without_active_schedule_and_keep_credential() {
    // Horizon is [07:00, 14:00]; 06:30 is outside it.
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));
    h.clock.set(at(6, 30));
    let issued = IssueCredentialUseCase::new(h.credentials.clone(), h.clock.clone())
        .execute(h.owner)
        .await
        .unwrap();

    let result = h.checkin.execute(issued.id).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::NoActiveSchedule)),
        "expected NoActiveSchedule, got {result:?}"
    );
    let stored = h.credentials.credentials_handle();
    assert!(stored.lock().unwrap()[0].redeemed_at.is_none());
}

#[tokio::test]
async fn should_accept_retry_of_credential_after_no_active_schedule() {
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (11, 0))]));
    h.clock.set(at(6, 58));
    let issued = IssueCredentialUseCase::new(h.credentials.clone(), h.clock.clone())
        .execute(h.owner)
        .await
        .unwrap();

    let result = h.checkin.execute(issued.id).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::NoActiveSchedule)),
        "expected NoActiveSchedule, got {result:?}"
    );

    // Still inside the credential TTL, now inside the horizon.
    h.clock.set(at(7, 1));
    let record = h.checkin.execute(issued.id).await.unwrap();
    assert_eq!(record.status, AttendanceStatus::Pending);
    assert_eq!(record.method, CheckinMethod::Credential);

    let stored = h.credentials.credentials_handle();
    assert_eq!(stored.lock().unwrap()[0].redeemed_at, Some(at(7, 1)));

    let replay = h.checkin.execute(issued.id).await;
    assert!(
        matches!(replay, Err(AttendanceServiceError::CredentialAlreadyRedeemed)),
        "expected CredentialAlreadyRedeemed, got {replay:?}"
    );
}

#[tokio::test]
async fn should_classify_late_scan_after_short_window_closed() {
    let h = harness(MockScheduleLookup::new(vec![schedule((10, 0), (10, 30))]));
    h.clock.set(at(10, 45));

    let record = h.scan_fresh().await.unwrap();

    assert_eq!(record.status, AttendanceStatus::Late);
}

#[tokio::test]
async fn should_pick_schedule_starting_closest_to_now() {
    let morning = schedule((10, 0), (11, 0));
    let afternoon = schedule((14, 0), (15, 0));
    let h = harness(MockScheduleLookup::new(vec![morning, afternoon.clone()]));
    h.clock.set(at(13, 5));

    let record = h.scan_fresh().await.unwrap();

    assert_eq!(record.schedule_id, afternoon.id);
    assert_eq!(record.status, AttendanceStatus::Present);
}
