use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use rollcall_attendance::config::AttendanceConfig;
use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;
use rollcall_core::config::Config;
use rollcall_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AttendanceConfig::from_env().context("load attendance config")?;

    let invite_ttl = config.invite_ttl()?;
    let credential_ttl = config.credential_ttl()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let state = AppState {
        db,
        invite_ttl,
        credential_ttl,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
