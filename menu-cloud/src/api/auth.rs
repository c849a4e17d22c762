//! Authentication endpoints: login, password reset request and confirmation

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{AccountStatus, Role};

use super::ApiResult;
use super::extract::ApiJson;
use super::register::SessionUser;
use crate::auth::Otp;
use crate::db;
use crate::state::AppState;
use crate::util::{
    MIN_PASSWORD_LEN, hash_password, is_valid_email, normalize_email, now_millis, verify_password,
};

// ── POST /api/login ──

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Admins are checked first, then merchant accounts
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid_credentials().into());
    }

    if let Some(admin) = db::admins::find_by_email(&state.pool, &email).await? {
        if !verify_password(&req.password, &admin.password_hash) {
            return Err(AppError::invalid_credentials().into());
        }
        let token = state.tokens.issue_admin(admin.id).map_err(AppError::from)?;
        tracing::info!(admin_id = admin.id, "Admin logged in");
        return Ok(Json(LoginResponse {
            token,
            user: SessionUser {
                role: Role::Admin,
                restaurant_id: None,
                status: None,
            },
        }));
    }

    let account = db::merchant_accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &account.password_hash) {
        return Err(AppError::invalid_credentials().into());
    }

    let status = account.status()?;
    status.login_gate()?;

    let token = state
        .tokens
        .issue_owner(account.id, account.restaurant_id, status)
        .map_err(AppError::from)?;

    tracing::info!(account_id = account.id, "Owner logged in");

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            role: Role::Owner,
            restaurant_id: Some(account.restaurant_id),
            status: Some(status),
        },
    }))
}

// ── POST /api/password-reset/request ──

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct PasswordResetRequested {
    pub success: bool,
    pub email_sent: bool,
    pub expires_in: i64,
    pub message: String,
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PasswordResetRequest>,
) -> ApiResult<PasswordResetRequested> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Please enter a valid email").into());
    }

    let account = db::merchant_accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::AccountNotFound, "Email not found"))?;

    // the OTP column still belongs to the registration flow
    if account.status()? == AccountStatus::PendingOtp {
        return Err(ErrorCode::OtpNotPending.into());
    }

    let now = now_millis();
    let ttl = state.config.otp_ttl_secs;
    let (otp, code) = Otp::issue(now, ttl)?;
    db::merchant_accounts::set_otp(&state.pool, account.id, &otp, now).await?;

    let email_sent = state
        .email
        .send_password_reset(&account.email, &account.business_name, &code)
        .await;

    tracing::info!(account_id = account.id, email_sent, "Password reset code issued");

    Ok(Json(PasswordResetRequested {
        success: true,
        email_sent,
        expires_in: ttl,
        message: format!("OTP sent. It expires in {} minutes.", (ttl / 60).max(1)),
    }))
}

// ── POST /api/password-reset/confirm ──

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub password: String,
}

impl ResetPasswordRequest {
    /// Field checks that need no database; returns the normalised email
    fn validate(&self) -> Result<String, AppError> {
        let email = normalize_email(&self.email);
        if email.is_empty() || self.otp.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::validation("Missing required fields"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ErrorCode::PasswordTooShort.into());
        }
        Ok(email)
    }
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.validate()?;

    let account = db::merchant_accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::AccountNotFound, "Email not found"))?;

    if account.status()? == AccountStatus::PendingOtp {
        return Err(ErrorCode::OtpNotPending.into());
    }

    let otp = account.otp().ok_or(ErrorCode::NoOtpIssued)?;
    let now = now_millis();
    otp.verify(&req.otp, now)?;

    let hashed = hash_password(&req.password)?;
    db::merchant_accounts::reset_password(&state.pool, account.id, &hashed, now).await?;

    tracing::info!(account_id = account.id, "Password reset");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password reset successful",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset(email: &str, otp: &str, password: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            email: email.into(),
            otp: otp.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_reset_validation() {
        assert_eq!(
            reset(" O@Cafe.com ", "123456", "secret1").validate().unwrap(),
            "o@cafe.com"
        );
        assert_eq!(
            reset("o@cafe.com", "", "secret1").validate().unwrap_err().message,
            "Missing required fields"
        );
        assert_eq!(
            reset("o", "123456", "secret1").validate().unwrap_err().message,
            "Invalid email"
        );
        assert_eq!(
            reset("o@cafe.com", "123456", "123").validate().unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
    }

    #[test]
    fn test_owner_login_response_shape() {
        let response = LoginResponse {
            token: "t".into(),
            user: SessionUser {
                role: Role::Owner,
                restaurant_id: Some(42),
                status: Some(AccountStatus::Approved),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["role"], "owner");
        assert_eq!(json["user"]["restaurant_id"], 42);
        assert_eq!(json["user"]["status"], "approved");
    }

    #[test]
    fn test_admin_login_response_has_no_scope() {
        let response = LoginResponse {
            token: "t".into(),
            user: SessionUser {
                role: Role::Admin,
                restaurant_id: None,
                status: None,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"], serde_json::json!({ "role": "admin" }));
    }
}
