use rollcall_domain::id::CredentialId;

use crate::domain::clock::Clock;
use crate::domain::repository::{AttendanceRepository, CredentialRepository, ScheduleLookup};
use crate::domain::types::AttendanceRecord;
use crate::error::AttendanceServiceError;
use crate::usecase::attendance::AttendanceLedger;
use crate::usecase::credential::ValidateCredentialUseCase;

/// Credential redemption composed with attendance classification.
pub struct CheckInUseCase<R, A, S, C>
where
    R: CredentialRepository,
    A: AttendanceRepository,
    S: ScheduleLookup,
    C: Clock,
{
    pub credentials: ValidateCredentialUseCase<R>,
    pub ledger: AttendanceLedger<A, S, C>,
}

impl<R, A, S, C> CheckInUseCase<R, A, S, C>
where
    R: CredentialRepository,
    A: AttendanceRepository,
    S: ScheduleLookup,
    C: Clock,
{
    pub fn new(credentials: R, attendances: A, schedules: S, clock: C) -> Self {
        Self {
            credentials: ValidateCredentialUseCase { credentials },
            ledger: AttendanceLedger {
                attendances,
                schedules,
                clock,
            },
        }
    }

    /// Every failure that can be detected without writing is detected before the credential
    /// is consumed, so a check-in outside any schedule leaves the credential usable.
    pub async fn execute(
        &self,
        credential_id: CredentialId,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let now = self.ledger.clock.now();
        let credential = self.credentials.check(credential_id, now).await?;

        let schedule = self
            .ledger
            .schedules
            .find_active_for(credential.owner_id, now)
            .await?
            .ok_or(AttendanceServiceError::NoActiveSchedule)?;

        // Consumed only once a schedule is resolved. The guarded write still picks a single
        // winner among concurrent scans, so deferring it never admits a second success.
        self.credentials.redeem(&credential, now).await?;
        self.ledger
            .apply_automatic(credential.owner_id, &schedule, now)
            .await
    }
}
