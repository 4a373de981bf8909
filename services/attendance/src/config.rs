use anyhow::{Context as _, bail};
use chrono::Duration;
use serde::Deserialize;

use rollcall_core::config::Config;

use crate::domain::types::{CREDENTIAL_TTL_SECS, INVITE_TTL_DAYS};

/// Attendance service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `ATTENDANCE_PORT`.
    #[serde(default = "default_port")]
    pub attendance_port: u16,
    /// Default invite lifetime when the issuer does not give one. Env var: `INVITE_TTL_DAYS`.
    #[serde(default = "default_invite_ttl_days")]
    pub invite_ttl_days: i64,
    /// Check-in credential lifetime. Env var: `CREDENTIAL_TTL_SECS`.
    #[serde(default = "default_credential_ttl_secs")]
    pub credential_ttl_secs: i64,
}

impl Config for AttendanceConfig {}

fn default_port() -> u16 {
    3114
}

fn default_invite_ttl_days() -> i64 {
    INVITE_TTL_DAYS
}

fn default_credential_ttl_secs() -> i64 {
    CREDENTIAL_TTL_SECS
}

impl AttendanceConfig {
    pub fn invite_ttl(&self) -> anyhow::Result<Duration> {
        let ttl = Duration::try_days(self.invite_ttl_days)
            .with_context(|| format!("INVITE_TTL_DAYS out of range: {}", self.invite_ttl_days))?;
        positive("INVITE_TTL_DAYS", ttl)
    }

    pub fn credential_ttl(&self) -> anyhow::Result<Duration> {
        let ttl = Duration::try_seconds(self.credential_ttl_secs).with_context(|| {
            format!("CREDENTIAL_TTL_SECS out of range: {}", self.credential_ttl_secs)
        })?;
        positive("CREDENTIAL_TTL_SECS", ttl)
    }
}

fn positive(var: &str, ttl: Duration) -> anyhow::Result<Duration> {
    if ttl <= Duration::zero() {
        bail!("{var} must be positive");
    }
    Ok(ttl)
}
