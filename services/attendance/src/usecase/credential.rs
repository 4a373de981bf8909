use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use rollcall_domain::id::{CredentialId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::clock::Clock;
use crate::domain::repository::CredentialRepository;
use crate::domain::types::{CREDENTIAL_TTL_SECS, CheckinCredential};
use crate::error::AttendanceServiceError;

// ── Issue ────────────────────────────────────────────────────────────────────

pub struct IssueCredentialUseCase<R: CredentialRepository, C: Clock> {
    pub credentials: R,
    pub clock: C,
    pub ttl: Duration,
}

impl<R: CredentialRepository, C: Clock> IssueCredentialUseCase<R, C> {
    pub fn new(credentials: R, clock: C) -> Self {
        Self {
            credentials,
            clock,
            ttl: Duration::seconds(CREDENTIAL_TTL_SECS),
        }
    }

    pub async fn execute(&self, owner: UserId) -> Result<CheckinCredential, AttendanceServiceError> {
        let now = self.clock.now();
        let credential = CheckinCredential {
            id: CredentialId::new_v4(),
            owner_id: owner,
            issued_at: now,
            expires_at: now + self.ttl,
            redeemed_at: None,
        };
        self.credentials.create(&credential).await?;

        info!(credential_id = %credential.id, owner = %owner, "credential issued");
        Ok(credential)
    }
}

// ── Validate ─────────────────────────────────────────────────────────────────

pub struct ValidateCredentialUseCase<R: CredentialRepository> {
    pub credentials: R,
}

impl<R: CredentialRepository> ValidateCredentialUseCase<R> {
    /// Redeem the credential at `now` and return its owner.
    pub async fn execute(
        &self,
        id: CredentialId,
        now: DateTime<Utc>,
    ) -> Result<UserId, AttendanceServiceError> {
        let credential = self.check(id, now).await?;
        self.redeem(&credential, now).await?;
        Ok(credential.owner_id)
    }

    /// Read-only checks, in order: exists, not yet redeemed, not expired.
    pub async fn check(
        &self,
        id: CredentialId,
        now: DateTime<Utc>,
    ) -> Result<CheckinCredential, AttendanceServiceError> {
        let credential = self
            .credentials
            .find_by_id(id)
            .await?
            .ok_or(AttendanceServiceError::CredentialNotFound)?;

        if credential.is_redeemed() {
            return Err(AttendanceServiceError::CredentialAlreadyRedeemed);
        }
        if credential.is_expired(now) {
            return Err(AttendanceServiceError::CredentialExpired);
        }
        Ok(credential)
    }

    /// Consume a credential that passed [`check`](Self::check).
    ///
    /// The conditional write decides the winner among concurrent callers that all passed
    /// the read; losers get `CredentialAlreadyRedeemed`.
    pub async fn redeem(
        &self,
        credential: &CheckinCredential,
        now: DateTime<Utc>,
    ) -> Result<(), AttendanceServiceError> {
        if !self.credentials.mark_redeemed(credential.id, now).await? {
            warn!(credential_id = %credential.id, "credential redemption lost race");
            return Err(AttendanceServiceError::CredentialAlreadyRedeemed);
        }
        info!(credential_id = %credential.id, owner = %credential.owner_id, "credential redeemed");
        Ok(())
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListCredentialsUseCase<R: CredentialRepository> {
    pub credentials: R,
}

impl<R: CredentialRepository> ListCredentialsUseCase<R> {
    pub async fn execute(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<CheckinCredential>, AttendanceServiceError> {
        self.credentials.list_by_owner(owner, page.clamped()).await
    }
}
