//! menu-cloud: Store Menu backend
//!
//! Long-running HTTP service that:
//! - Registers merchants (email OTP, admin approval)
//! - Issues session tokens for admins and restaurant owners
//! - Serves tenant-scoped menu management (restaurants, categories, items, uploads)
//! - Serves the public, time-boxed menu

mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod state;
mod storage;
mod util;

use std::net::SocketAddr;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let http_port = config.http_port;

    tracing::info!("Starting menu-cloud (env: {})", config.environment);

    let state = AppState::new(config).await?;

    bootstrap_admin(&state).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("menu-cloud HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the first admin from `BOOTSTRAP_ADMIN_*` while the admins table is empty
async fn bootstrap_admin(state: &AppState) -> Result<(), BoxError> {
    let (Some(email), Some(password)) = (
        state.config.bootstrap_admin_email.as_deref(),
        state.config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if db::admins::count(&state.pool).await? > 0 {
        return Ok(());
    }

    let email = util::normalize_email(email);
    if !util::is_valid_email(&email) {
        return Err(format!("BOOTSTRAP_ADMIN_EMAIL is not a valid email: {email}").into());
    }
    if password.chars().count() < util::MIN_PASSWORD_LEN {
        return Err("BOOTSTRAP_ADMIN_PASSWORD is too short".into());
    }

    let hash = util::hash_password(password).map_err(|e| format!("password hash: {e}"))?;
    let id = db::admins::create(&state.pool, &email, &hash, util::now_millis()).await?;
    tracing::info!(admin_id = id, email = %email, "Bootstrap admin created");
    Ok(())
}
