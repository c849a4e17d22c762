//! Admin registrations panel
//!
//! GET  /api/admin/registrations: every merchant account with its restaurant, newest first
//! POST /api/admin/registrations: decide an account and/or edit its menu access

use axum::{Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AccessWindow, Bound, Decision, Restaurant, normalize_access_bound,
};

use super::ApiResult;
use super::extract::ApiJson;
use crate::db;
use crate::db::merchant_accounts::Registration;
use crate::email::templates::EmailTemplate;
use crate::state::AppState;
use crate::util::now_millis;

pub async fn list_registrations(State(state): State<AppState>) -> ApiResult<Vec<Registration>> {
    let rows = db::merchant_accounts::list_registrations(&state.pool).await?;
    Ok(Json(rows))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRegistrationRequest {
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub menu_enabled: Option<bool>,
    /// Absent: untouched. `null` or `""`: cleared.
    #[serde(default, deserialize_with = "patch")]
    pub access_start_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch")]
    pub access_end_at: Option<Option<String>>,
    #[serde(default)]
    pub email_template: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub notify_menu_email: Option<bool>,
}

/// Checked form of [`UpdateRegistrationRequest`]
#[derive(Debug, PartialEq)]
pub struct RegistrationUpdate {
    pub account_id: i64,
    pub decision: Option<Decision>,
    pub menu_enabled: Option<bool>,
    pub start: Option<Option<chrono::NaiveDateTime>>,
    pub end: Option<Option<chrono::NaiveDateTime>>,
    pub template: EmailTemplate,
    pub notify_menu_email: bool,
}

impl UpdateRegistrationRequest {
    pub fn validate(self) -> Result<RegistrationUpdate, AppError> {
        if self.account_id <= 0 {
            return Err(AppError::validation("Invalid payload"));
        }
        let template = EmailTemplate::parse(self.email_template.as_deref().unwrap_or(""))?;
        let decision = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(Decision::parse(s)?),
        };
        let start = normalize_patch(self.access_start_at, Bound::Start)?;
        let end = normalize_patch(self.access_end_at, Bound::End)?;
        Ok(RegistrationUpdate {
            account_id: self.account_id,
            decision,
            menu_enabled: self.menu_enabled,
            start,
            end,
            template,
            notify_menu_email: self.notify_menu_email.unwrap_or(false),
        })
    }
}

impl RegistrationUpdate {
    /// Window after applying the patch to `current`; inverted windows are rejected
    pub fn window(&self, current: AccessWindow) -> Result<Option<AccessWindow>, ErrorCode> {
        if self.start.is_none() && self.end.is_none() {
            return Ok(None);
        }
        let window = AccessWindow {
            start: self.start.unwrap_or(current.start),
            end: self.end.unwrap_or(current.end),
        };
        if !window.is_ordered() {
            return Err(ErrorCode::InvalidAccessWindow);
        }
        Ok(Some(window))
    }
}

fn normalize_patch(
    value: Option<Option<String>>,
    bound: Bound,
) -> Result<Option<Option<chrono::NaiveDateTime>>, ErrorCode> {
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(raw)) => normalize_access_bound(&raw, bound).map(Some),
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateRegistrationResponse {
    pub success: bool,
    /// `null` when no email was attempted
    pub email_sent: Option<bool>,
}

pub async fn update_registration(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateRegistrationRequest>,
) -> ApiResult<UpdateRegistrationResponse> {
    let update = req.validate()?;

    let account = db::merchant_accounts::find_by_id(&state.pool, update.account_id)
        .await?
        .ok_or(ErrorCode::AccountNotFound)?;
    let restaurant = db::restaurants::find_by_id(&state.pool, account.restaurant_id)
        .await?
        .ok_or(ErrorCode::RestaurantNotFound)?;

    let window = update.window(restaurant.access_window())?;
    let previous_enabled = restaurant.menu_enabled;
    let now = now_millis();

    let mut tx = state.pool.begin().await?;
    if let Some(decision) = update.decision {
        let status = decision.status();
        db::merchant_accounts::set_status(&mut *tx, account.id, status, now).await?;
        db::restaurants::set_menu_enabled(&mut *tx, restaurant.id, decision.menu_enabled(), now)
            .await?;
    }
    if let Some(enabled) = update.menu_enabled {
        db::restaurants::set_menu_enabled(&mut *tx, restaurant.id, enabled, now).await?;
    }
    if let Some(window) = window {
        db::restaurants::set_access_window(&mut *tx, restaurant.id, window, now).await?;
    }
    tx.commit().await?;

    tracing::info!(
        account_id = account.id,
        decision = ?update.decision,
        menu_enabled = ?update.menu_enabled,
        window_changed = window.is_some(),
        "Registration updated"
    );

    let name = business_name(&restaurant, &account.business_name);
    let email_sent = if let Some(decision) = update.decision {
        Some(
            state
                .email
                .send_registration_decision(
                    &account.email,
                    name,
                    decision,
                    update.template,
                    &restaurant.menu_slug,
                )
                .await,
        )
    } else if let Some(enabled) = update.menu_enabled
        && enabled != previous_enabled
        && update.notify_menu_email
    {
        Some(
            state
                .email
                .send_menu_access_changed(
                    &account.email,
                    name,
                    enabled,
                    update.template,
                    &restaurant.menu_slug,
                )
                .await,
        )
    } else {
        None
    };

    Ok(Json(UpdateRegistrationResponse {
        success: true,
        email_sent,
    }))
}

/// Name used in merchant emails: the restaurant's English name, then Arabic,
/// then the name given at registration while the restaurant is a placeholder
pub fn business_name<'a>(restaurant: &'a Restaurant, registered: &'a str) -> &'a str {
    let en = restaurant.name_en.trim();
    if !en.is_empty() && !en.starts_with("pending-") {
        return en;
    }
    let ar = restaurant.name_ar.trim();
    if !ar.is_empty() {
        return ar;
    }
    registered
}

/// `true`/`false`, `1`/`0` or `null`
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(Option::<Flag>::deserialize(deserializer)?.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    }))
}

/// Distinguishes an absent field (outer `None`, via `default`) from `null`
fn patch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Ok(Some(Option::<String>::deserialize(deserializer)?))
}
