//! Registration API handlers
//!
//! POST /api/register: create account (pending_otp) + placeholder restaurant, email the OTP
//! POST /api/verify-otp: verify the OTP → pending_approval, return a session token
//! POST /api/resend-otp: issue a fresh OTP for an account still in pending_otp

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{AccountStatus, RestaurantSettings, Role};

use super::ApiResult;
use super::extract::ApiJson;
use crate::auth::Otp;
use crate::db;
use crate::db::merchant_accounts::NewAccount;
use crate::error::{ServiceError, is_unique_violation};
use crate::state::AppState;
use crate::util::{
    MIN_PASSWORD_LEN, hash_password, is_valid_email, normalize_email, now_millis, slugify,
};

const RECEIVED_MESSAGE: &str =
    "Your registration request has been received. Please verify your email with the code we sent.";

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, alias = "name")]
    pub restaurant_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

/// Validated, normalised registration input
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        let business_name = self.restaurant_name.trim().to_string();
        let email = normalize_email(&self.email);
        let phone = self.phone.trim().to_string();

        if business_name.is_empty() || email.is_empty() || phone.is_empty() || self.password.is_empty()
        {
            return Err(AppError::validation("Missing required fields"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ErrorCode::PasswordTooShort.into());
        }
        Ok(Registration {
            business_name,
            email,
            phone,
            password: self.password,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub restaurant_id: i64,
    pub menu_slug: String,
    pub email_sent: bool,
    pub admin_alert_sent: bool,
    /// Development only (`OTP_DEBUG_RETURN`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct ResendOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResendOtpResponse {
    pub success: bool,
    pub email_sent: bool,
    pub expires_in: i64,
}

// ── POST /api/register ──

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let reg = req.validate()?;

    if db::email_in_use(&state.pool, &reg.email, None, None).await? {
        return Err(ErrorCode::EmailAlreadyRegistered.into());
    }

    let password_hash = hash_password(&reg.password)?;
    let now = now_millis();
    let (otp, code) = Otp::issue(now, state.config.otp_ttl_secs)?;

    let base_slug = slugify(&reg.business_name);
    let placeholder = RestaurantSettings {
        name_en: format!("pending-{base_slug}"),
        phone: reg.phone.clone(),
        whatsapp: reg.phone.clone(),
        ..Default::default()
    };

    // Account + restaurant are created together or not at all
    let mut tx = state.pool.begin().await?;

    let restaurant =
        db::restaurants::create_with_unique_slug(&mut *tx, &base_slug, &placeholder, false, now)
            .await?
            .ok_or(ErrorCode::SlugTaken)?;

    let account = NewAccount {
        restaurant_id: restaurant.id,
        business_name: &reg.business_name,
        phone: &reg.phone,
        email: &reg.email,
        password_hash: &password_hash,
        otp: &otp,
    };
    let account_id = match db::merchant_accounts::create(&mut *tx, account, now).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(ErrorCode::EmailAlreadyRegistered.into());
        }
        Err(e) => return Err(ServiceError::from(e)),
    };

    tx.commit().await?;

    tracing::info!(
        account_id = account_id,
        restaurant_id = restaurant.id,
        slug = %restaurant.menu_slug,
        email = %reg.email,
        "Merchant registered, OTP issued"
    );

    let email_sent = state
        .email
        .send_registration_received(&reg.email, &reg.business_name, &code)
        .await;
    let admin_alert_sent = state
        .email
        .send_admin_registration_alert(&reg.business_name, &reg.email, &reg.phone)
        .await;

    Ok(Json(RegisterResponse {
        success: true,
        message: RECEIVED_MESSAGE,
        restaurant_id: restaurant.id,
        menu_slug: restaurant.menu_slug,
        email_sent,
        admin_alert_sent,
        otp: state.config.otp_debug_return.then_some(code),
    }))
}

// ── POST /api/verify-otp ──

pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyOtpRequest>,
) -> ApiResult<VerifyOtpResponse> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.otp.trim().is_empty() {
        return Err(AppError::validation("Email and OTP are required").into());
    }

    let account = db::merchant_accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or(ErrorCode::AccountNotFound)?;

    let next = account.status()?.verify_otp()?;
    let otp = account.otp().ok_or(ErrorCode::NoOtpIssued)?;
    let now = now_millis();
    otp.verify(&req.otp, now)?;

    if !db::merchant_accounts::mark_email_verified(&state.pool, account.id, now).await? {
        // lost a race with another verification of the same account
        return Err(ErrorCode::OtpNotPending.into());
    }

    let token = state
        .tokens
        .issue_owner(account.id, account.restaurant_id, next)
        .map_err(AppError::from)?;

    tracing::info!(account_id = account.id, "Email verified, awaiting approval");

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified. Waiting for admin approval.",
        token,
        user: SessionUser {
            role: Role::Owner,
            restaurant_id: Some(account.restaurant_id),
            status: Some(next),
        },
    }))
}

// ── POST /api/resend-otp ──

pub async fn resend_otp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResendOtpRequest>,
) -> ApiResult<ResendOtpResponse> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Please enter a valid email").into());
    }

    let account = db::merchant_accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or(ErrorCode::AccountNotFound)?;
    account.status()?.verify_otp()?;

    let now = now_millis();
    let (otp, code) = Otp::issue(now, state.config.otp_ttl_secs)?;
    db::merchant_accounts::set_otp(&state.pool, account.id, &otp, now).await?;

    let email_sent = state
        .email
        .send_verification_code(&account.email, &account.business_name, &code)
        .await;

    tracing::info!(account_id = account.id, email_sent, "Verification code re-issued");

    Ok(Json(ResendOtpResponse {
        success: true,
        email_sent,
        expires_in: state.config.otp_ttl_secs,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, phone: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            restaurant_name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_validate_normalises() {
        let reg = request("  Cafe Roma ", " Owner@Cafe.com", " 0500 ", "secret1")
            .validate()
            .unwrap();
        assert_eq!(
            reg,
            Registration {
                business_name: "Cafe Roma".into(),
                email: "owner@cafe.com".into(),
                phone: "0500".into(),
                password: "secret1".into(),
            }
        );
    }

    #[test]
    fn test_validate_rejections() {
        let missing = request("Cafe", "", "0500", "secret1").validate().unwrap_err();
        assert_eq!(missing.code, ErrorCode::ValidationFailed);
        assert_eq!(missing.message, "Missing required fields");

        let bad_email = request("Cafe", "owner", "0500", "secret1")
            .validate()
            .unwrap_err();
        assert_eq!(bad_email.message, "Invalid email address");

        let short = request("Cafe", "o@cafe.com", "0500", "12345")
            .validate()
            .unwrap_err();
        assert_eq!(short.code, ErrorCode::PasswordTooShort);
    }

    #[test]
    fn test_request_accepts_name_alias() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name":"Cafe","email":"o@cafe.com","phone":"1","password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(req.restaurant_name, "Cafe");
    }

    #[test]
    fn test_debug_otp_hidden_by_default() {
        let response = RegisterResponse {
            success: true,
            message: RECEIVED_MESSAGE,
            restaurant_id: 1,
            menu_slug: "cafe".into(),
            email_sent: false,
            admin_alert_sent: false,
            otp: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("otp").is_none());
        assert_eq!(json["email_sent"], false);
    }
}
