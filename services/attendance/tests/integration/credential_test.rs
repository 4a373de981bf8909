use chrono::Duration;
use futures::future::join_all;

use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::credential::{
    IssueCredentialUseCase, ListCredentialsUseCase, ValidateCredentialUseCase,
};
use rollcall_domain::id::{CredentialId, UserId};
use rollcall_domain::pagination::PageRequest;
use rollcall_testing::time::{at, at_secs};

use crate::helpers::{FixedClock, MockCredentialRepo, credential};

#[tokio::test]
async fn should_issue_credential_valid_for_five_minutes() {
    let repo = MockCredentialRepo::empty();
    let handle = repo.credentials_handle();
    let owner = UserId::new_v4();
    let uc = IssueCredentialUseCase::new(repo, FixedClock::new(at(9, 30)));

    let issued = uc.execute(owner).await.unwrap();

    assert_eq!(issued.owner_id, owner);
    assert_eq!(issued.issued_at, at(9, 30));
    assert_eq!(issued.expires_at, at(9, 35));
    assert!(issued.redeemed_at.is_none());
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_issue_distinct_credentials() {
    let uc = IssueCredentialUseCase::new(MockCredentialRepo::empty(), FixedClock::new(at(9, 30)));
    let owner = UserId::new_v4();

    let a = uc.execute(owner).await.unwrap();
    let b = uc.execute(owner).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn should_redeem_credential_and_return_owner() {
    let owner = UserId::new_v4();
    let c = credential(owner, at(9, 30));
    let repo = MockCredentialRepo::new(vec![c.clone()]);
    let handle = repo.credentials_handle();
    let uc = ValidateCredentialUseCase { credentials: repo };

    let identity = uc.execute(c.id, at(9, 32)).await.unwrap();

    assert_eq!(identity, owner);
    assert_eq!(handle.lock().unwrap()[0].redeemed_at, Some(at(9, 32)));
}

#[tokio::test]
async fn should_accept_credential_at_expiry_instant() {
    let c = credential(UserId::new_v4(), at(9, 30));
    let uc = ValidateCredentialUseCase {
        credentials: MockCredentialRepo::new(vec![c.clone()]),
    };

    assert!(uc.execute(c.id, at(9, 35)).await.is_ok());
}

#[tokio::test]
async fn should_reject_credential_one_second_after_expiry() {
    let c = credential(UserId::new_v4(), at(9, 30));
    let repo = MockCredentialRepo::new(vec![c.clone()]);
    let handle = repo.credentials_handle();
    let uc = ValidateCredentialUseCase { credentials: repo };

    let result = uc.execute(c.id, at_secs(9, 35, 1)).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialExpired)),
        "expected CredentialExpired, got {result:?}"
    );
    assert!(handle.lock().unwrap()[0].redeemed_at.is_none());
}

#[tokio::test]
async fn should_reject_replayed_credential() {
    let c = credential(UserId::new_v4(), at(9, 30));
    let uc = ValidateCredentialUseCase {
        credentials: MockCredentialRepo::new(vec![c.clone()]),
    };

    uc.execute(c.id, at(9, 31)).await.unwrap();
    let result = uc.execute(c.id, at(9, 32)).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialAlreadyRedeemed)),
        "expected CredentialAlreadyRedeemed, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_redeemed_before_expired() {
    let mut c = credential(UserId::new_v4(), at(9, 30));
    c.redeemed_at = Some(at(9, 31));
    let uc = ValidateCredentialUseCase {
        credentials: MockCredentialRepo::new(vec![c.clone()]),
    };

    let result = uc.execute(c.id, at(10, 0)).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialAlreadyRedeemed)),
        "expected CredentialAlreadyRedeemed, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_credential() {
    let uc = ValidateCredentialUseCase {
        credentials: MockCredentialRepo::empty(),
    };

    let result = uc.execute(CredentialId::new_v4(), at(9, 30)).await;
    assert!(
        matches!(result, Err(AttendanceServiceError::CredentialNotFound)),
        "expected CredentialNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_scan_win() {
    const SCANNERS: usize = 6;

    let owner = UserId::new_v4();
    let c = credential(owner, at(9, 30));
    let uc = ValidateCredentialUseCase {
        credentials: MockCredentialRepo::new(vec![c.clone()]).with_read_barrier(SCANNERS),
    };

    let results = join_all((0..SCANNERS).map(|_| uc.execute(c.id, at(9, 31)))).await;

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners, vec![&owner], "expected exactly one winner, got {results:?}");
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AttendanceServiceError::CredentialAlreadyRedeemed)))
            .count(),
        SCANNERS - 1
    );
}

#[tokio::test]
async fn should_list_own_credentials_newest_first() {
    let owner = UserId::new_v4();
    let clock = FixedClock::new(at(9, 0));
    let repo = MockCredentialRepo::empty();
    let handle = repo.credentials_handle();
    let issue = IssueCredentialUseCase::new(repo.clone(), clock.clone());

    let first = issue.execute(owner).await.unwrap();
    clock.advance(Duration::minutes(10));
    let second = issue.execute(owner).await.unwrap();
    handle
        .lock()
        .unwrap()
        .push(credential(UserId::new_v4(), at(9, 5)));

    let list = ListCredentialsUseCase { credentials: repo }
        .execute(owner, PageRequest::default())
        .await
        .unwrap();

    let ids: Vec<CredentialId> = list.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}
