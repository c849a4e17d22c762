//! Merchant account rows and lifecycle writes
//!
//! Status transitions are guarded in SQL as well (`WHERE status = ...`) so a
//! concurrent request cannot apply a transition from a stale read.

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::AccountStatus;
use shared::models::restaurant::access_time;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::auth::Otp;
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, sqlx::FromRow)]
pub struct MerchantAccount {
    pub id: i64,
    pub restaurant_id: i64,
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub otp_code: Option<String>,
    pub otp_issued_at: Option<i64>,
    pub otp_expires_at: Option<i64>,
    pub status: String,
    pub email_verified_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MerchantAccount {
    pub fn status(&self) -> ServiceResult<AccountStatus> {
        AccountStatus::from_db(&self.status).ok_or_else(|| {
            ServiceError::Db(format!("account {} has unknown status {:?}", self.id, self.status).into())
        })
    }

    /// The pending code, if one was issued
    pub fn otp(&self) -> Option<Otp> {
        Otp::from_columns(
            self.otp_code.clone(),
            self.otp_issued_at,
            self.otp_expires_at,
        )
    }
}

/// Row of the admin registrations panel
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Registration {
    pub id: i64,
    pub restaurant_id: i64,
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub email_verified_at: Option<i64>,
    pub created_at: i64,
    pub name_ar: String,
    pub name_en: String,
    pub menu_slug: String,
    pub menu_enabled: bool,
    #[serde(with = "access_time")]
    pub access_start_at: Option<NaiveDateTime>,
    #[serde(with = "access_time")]
    pub access_end_at: Option<NaiveDateTime>,
}

pub struct NewAccount<'a> {
    pub restaurant_id: i64,
    pub business_name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub otp: &'a Otp,
}

pub async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<MerchantAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM merchant_accounts WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id<'e>(
    conn: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<MerchantAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM merchant_accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Current status column, without loading the row
pub async fn find_status(pool: &PgPool, id: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT status FROM merchant_accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert in `pending_otp`; part of the registration transaction
pub async fn create(
    conn: &mut PgConnection,
    account: NewAccount<'_>,
    now: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO merchant_accounts
             (restaurant_id, business_name, phone, email, password_hash,
              otp_code, otp_issued_at, otp_expires_at, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending_otp', $9, $9)
         RETURNING id",
    )
    .bind(account.restaurant_id)
    .bind(account.business_name)
    .bind(account.phone)
    .bind(account.email)
    .bind(account.password_hash)
    .bind(account.otp.code_hash())
    .bind(account.otp.issued_at())
    .bind(account.otp.expires_at())
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Replace the pending code
pub async fn set_otp(pool: &PgPool, id: i64, otp: &Otp, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE merchant_accounts
         SET otp_code = $2, otp_issued_at = $3, otp_expires_at = $4, updated_at = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(otp.code_hash())
    .bind(otp.issued_at())
    .bind(otp.expires_at())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// `pending_otp` → `pending_approval`; false if the account already left `pending_otp`
pub async fn mark_email_verified(pool: &PgPool, id: i64, now: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE merchant_accounts
         SET status = 'pending_approval', email_verified_at = $2,
             otp_code = NULL, otp_issued_at = NULL, otp_expires_at = NULL,
             updated_at = $2
         WHERE id = $1 AND status = 'pending_otp'",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

/// Only ever called with a decided status
pub async fn set_status<'e>(
    conn: impl PgExecutor<'e>,
    id: i64,
    status: AccountStatus,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE merchant_accounts SET status = $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(status.as_db())
        .bind(now)
        .execute(conn)
        .await?;
    Ok(())
}

/// Set a new password and consume the reset code
pub async fn reset_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE merchant_accounts
         SET password_hash = $2,
             otp_code = NULL, otp_issued_at = NULL, otp_expires_at = NULL,
             updated_at = $3
         WHERE id = $1",
    )
    .bind(id)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// `None` fields are left unchanged
pub async fn update_credentials(
    pool: &PgPool,
    id: i64,
    email: Option<&str>,
    password_hash: Option<&str>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE merchant_accounts
         SET email = COALESCE($2, email),
             password_hash = COALESCE($3, password_hash),
             updated_at = $4
         WHERE id = $1",
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

/// Newest first
pub async fn list_registrations(pool: &PgPool) -> Result<Vec<Registration>, sqlx::Error> {
    sqlx::query_as(
        "SELECT ma.id, ma.restaurant_id, ma.business_name, ma.email, ma.phone, ma.status,
                ma.email_verified_at, ma.created_at,
                r.name_ar, r.name_en, r.menu_slug, r.menu_enabled,
                r.access_start_at, r.access_end_at
         FROM merchant_accounts ma
         JOIN restaurants r ON r.id = ma.restaurant_id
         ORDER BY ma.created_at DESC, ma.id DESC",
    )
    .fetch_all(pool)
    .await
}
