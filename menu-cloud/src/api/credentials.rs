//! Email/password rotation for admins and merchant owners
//!
//! Both roles share one rule set: a valid email, unique across the admin and
//! merchant tables, a minimum password length, and at least one change.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::ApiResult;
use super::extract::ApiJson;
use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;
use crate::util::{MIN_PASSWORD_LEN, hash_password, is_valid_email, normalize_email, now_millis};

#[derive(Debug, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AdminProfileResponse {
    pub admin: AdminProfile,
}

/// GET /api/admin/credentials
pub async fn get_admin_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<AdminProfileResponse> {
    let admin_id = ctx.require_admin()?;
    let admin = db::admins::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or(ErrorCode::AdminNotFound)?;
    Ok(Json(AdminProfileResponse {
        admin: AdminProfile {
            id: admin.id,
            email: admin.email,
        },
    }))
}

/// Validated credential edit; `None` leaves that credential unchanged
#[derive(Debug, PartialEq, Eq)]
pub struct CredentialChange {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialChange {
    pub fn parse(email: &str, password: &str) -> Result<Self, AppError> {
        let email = normalize_email(email);
        let email = if email.is_empty() {
            None
        } else if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email address"));
        } else {
            Some(email)
        };

        let password = if password.is_empty() {
            None
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ErrorCode::PasswordTooShort.into());
        } else {
            Some(password.to_string())
        };

        if email.is_none() && password.is_none() {
            return Err(ErrorCode::NothingToUpdate.into());
        }
        Ok(Self { email, password })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTarget {
    Admin,
    Merchant,
}

impl CredentialTarget {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "merchant" => Ok(Self::Merchant),
            _ => Err(AppError::validation("Invalid target")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCredentialsRequest {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OwnCredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/admin/credentials
pub async fn update_credentials(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(req): ApiJson<UpdateCredentialsRequest>,
) -> ApiResult<serde_json::Value> {
    let admin_id = ctx.require_admin()?;
    let target = CredentialTarget::parse(&req.target)?;

    match target {
        CredentialTarget::Admin => {
            let change = CredentialChange::parse(&req.email, &req.password)?;
            apply_admin(&state, admin_id, change).await?;
        }
        CredentialTarget::Merchant => {
            let account_id = req
                .account_id
                .filter(|id| *id > 0)
                .ok_or_else(|| AppError::validation("Missing account_id"))?;
            db::merchant_accounts::find_by_id(&state.pool, account_id)
                .await?
                .ok_or(ErrorCode::AccountNotFound)?;
            let change = CredentialChange::parse(&req.email, &req.password)?;
            apply_merchant(&state, account_id, change).await?;
        }
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/account/credentials
pub async fn update_own_credentials(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(req): ApiJson<OwnCredentialsRequest>,
) -> ApiResult<serde_json::Value> {
    let (account_id, _) = ctx.require_owner()?;
    let change = CredentialChange::parse(&req.email, &req.password)?;
    apply_merchant(&state, account_id, change).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn apply_admin(
    state: &AppState,
    admin_id: i64,
    change: CredentialChange,
) -> Result<(), crate::error::ServiceError> {
    if let Some(email) = &change.email
        && db::email_in_use(&state.pool, email, Some(admin_id), None).await?
    {
        return Err(ErrorCode::EmailInUse.into());
    }
    let hash = change.password.as_deref().map(hash_password).transpose()?;
    let updated = db::admins::update_credentials(
        &state.pool,
        admin_id,
        change.email.as_deref(),
        hash.as_deref(),
        now_millis(),
    )
    .await?;
    if !updated {
        return Err(ErrorCode::AdminNotFound.into());
    }
    tracing::info!(admin_id, email_changed = change.email.is_some(), "Admin credentials updated");
    Ok(())
}

async fn apply_merchant(
    state: &AppState,
    account_id: i64,
    change: CredentialChange,
) -> Result<(), crate::error::ServiceError> {
    if let Some(email) = &change.email
        && db::email_in_use(&state.pool, email, None, Some(account_id)).await?
    {
        return Err(ErrorCode::EmailInUse.into());
    }
    let hash = change.password.as_deref().map(hash_password).transpose()?;
    let updated = db::merchant_accounts::update_credentials(
        &state.pool,
        account_id,
        change.email.as_deref(),
        hash.as_deref(),
        now_millis(),
    )
    .await?;
    if !updated {
        return Err(ErrorCode::AccountNotFound.into());
    }
    tracing::info!(
        account_id,
        email_changed = change.email.is_some(),
        "Merchant credentials updated"
    );
    Ok(())
}
