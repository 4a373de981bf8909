use chrono::Duration;
use tracing::{info, warn};

use rollcall_domain::id::{InviteCodeId, UserId};
use rollcall_domain::pagination::PageRequest;

use crate::domain::clock::Clock;
use crate::domain::code::CodeGenerator;
use crate::domain::repository::InviteCodeRepository;
use crate::domain::types::{INVITE_TTL_DAYS, Identity, InviteCode, InviteKind, InviteRedemption};
use crate::error::AttendanceServiceError;

/// Look up the row a code currently refers to and reject it if it cannot be redeemed.
async fn find_redeemable<R: InviteCodeRepository>(
    invites: &R,
    code: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<InviteCode, AttendanceServiceError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AttendanceServiceError::validation("invite code is required"));
    }

    let invite = invites
        .find_latest_by_code(code)
        .await?
        .ok_or(AttendanceServiceError::InviteNotFound)?;

    if invite.is_expired(now) {
        return Err(AttendanceServiceError::InviteExpired);
    }
    if invite.is_consumed() {
        return Err(AttendanceServiceError::InviteAlreadyUsed);
    }
    Ok(invite)
}

// ── Issue ────────────────────────────────────────────────────────────────────

pub struct IssueInviteInput {
    pub kind: InviteKind,
    /// Lifetime; defaults to the use case's `default_ttl`.
    pub ttl: Option<Duration>,
    pub one_time_use: bool,
}

pub struct IssueInviteUseCase<R: InviteCodeRepository, C: Clock> {
    pub invites: R,
    pub clock: C,
    pub generator: CodeGenerator,
    pub default_ttl: Duration,
}

impl<R: InviteCodeRepository, C: Clock> IssueInviteUseCase<R, C> {
    pub fn new(invites: R, clock: C) -> Self {
        Self {
            invites,
            clock,
            generator: CodeGenerator::default(),
            default_ttl: Duration::days(INVITE_TTL_DAYS),
        }
    }

    pub async fn execute(
        &self,
        actor: Identity,
        input: IssueInviteInput,
    ) -> Result<InviteCode, AttendanceServiceError> {
        if !actor.is_staff {
            return Err(AttendanceServiceError::Forbidden);
        }
        let ttl = input.ttl.unwrap_or(self.default_ttl);
        if ttl <= Duration::zero() {
            return Err(AttendanceServiceError::validation("ttl must be positive"));
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AttendanceServiceError::validation("ttl out of range"))?;
        let taken = self.invites.list_unexpired_codes(now).await?;
        let code = self.generator.generate(&taken)?;

        let invite = InviteCode {
            id: InviteCodeId::new_v4(),
            code,
            kind: input.kind,
            issued_by: Some(actor.id),
            issued_at: now,
            expires_at,
            one_time_use: input.one_time_use,
            used: false,
        };
        self.invites.create(&invite).await?;

        info!(
            invite_id = %invite.id,
            kind = invite.kind.as_str(),
            issued_by = %actor.id,
            expires_at = %invite.expires_at,
            "invite issued"
        );
        Ok(invite)
    }
}

// ── Redeem ───────────────────────────────────────────────────────────────────

pub struct RedeemInviteUseCase<R: InviteCodeRepository, C: Clock> {
    pub invites: R,
    pub clock: C,
}

impl<R: InviteCodeRepository, C: Clock> RedeemInviteUseCase<R, C> {
    /// Consume `code` for `redeemer`. For one-time codes exactly one concurrent caller succeeds;
    /// the rest get `InviteAlreadyUsed`.
    pub async fn execute(
        &self,
        code: &str,
        redeemer: UserId,
    ) -> Result<InviteRedemption, AttendanceServiceError> {
        let now = self.clock.now();
        let invite = find_redeemable(&self.invites, code, now).await?;

        let won = self.invites.mark_used(invite.id).await?;
        if invite.one_time_use && !won {
            warn!(invite_id = %invite.id, redeemer = %redeemer, "invite redemption lost race");
            return Err(AttendanceServiceError::InviteAlreadyUsed);
        }

        info!(
            invite_id = %invite.id,
            kind = invite.kind.as_str(),
            redeemer = %redeemer,
            "invite redeemed"
        );
        Ok(InviteRedemption {
            invite_id: invite.id,
            kind: invite.kind,
            issued_by: invite.issued_by,
        })
    }
}

// ── Validate (peek) ──────────────────────────────────────────────────────────

pub struct ValidateInviteUseCase<R: InviteCodeRepository, C: Clock> {
    pub invites: R,
    pub clock: C,
}

impl<R: InviteCodeRepository, C: Clock> ValidateInviteUseCase<R, C> {
    /// Same checks as redeem, without consuming the code.
    pub async fn execute(&self, code: &str) -> Result<InviteCode, AttendanceServiceError> {
        find_redeemable(&self.invites, code, self.clock.now()).await
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListInvitesUseCase<R: InviteCodeRepository> {
    pub invites: R,
}

impl<R: InviteCodeRepository> ListInvitesUseCase<R> {
    pub async fn execute(
        &self,
        actor: Identity,
        page: PageRequest,
    ) -> Result<Vec<InviteCode>, AttendanceServiceError> {
        self.invites.list_by_issuer(actor.id, page.clamped()).await
    }
}
