//! Database access layer
//!
//! Free functions per table. Tenant-scoped queries take `scope: Option<i64>`
//! and filter with `($n::BIGINT IS NULL OR restaurant_id = $n)`, so `None`
//! (admin, global) and `Some(id)` share one statement.

pub mod admins;
pub mod categories;
pub mod items;
pub mod merchant_accounts;
pub mod restaurants;

use sqlx::PgExecutor;

/// Whether `email` belongs to any admin or merchant account, ignoring the
/// caller's own row
pub async fn email_in_use<'e>(
    conn: impl PgExecutor<'e>,
    email: &str,
    except_admin: Option<i64>,
    except_account: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (in_use,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM admins
             WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
         ) OR EXISTS (
             SELECT 1 FROM merchant_accounts
             WHERE LOWER(email) = LOWER($1) AND ($3::BIGINT IS NULL OR id <> $3)
         )",
    )
    .bind(email)
    .bind(except_admin)
    .bind(except_account)
    .fetch_one(conn)
    .await?;
    Ok(in_use)
}
