use shared::models::{AccessWindow, Restaurant, RestaurantSettings};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::util::slug_candidate;

/// Suffixes tried before giving up on a base slug
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

pub async fn find_by_id<'e>(
    conn: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurants WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn list(pool: &PgPool, scope: Option<i64>) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM restaurants WHERE ($1::BIGINT IS NULL OR id = $1) ORDER BY id",
    )
    .bind(scope)
    .fetch_all(pool)
    .await
}

/// Case-insensitive slug lookup
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurants WHERE LOWER(menu_slug) = LOWER($1)")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Fallback lookup by display name (either language)
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM restaurants
         WHERE LOWER(name_en) = LOWER($1) OR LOWER(name_ar) = LOWER($1)
         ORDER BY id
         LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Insert with the first free slug among `base`, `base-2`, `base-3`, ...
///
/// Uses `ON CONFLICT DO NOTHING`, so a slug taken concurrently moves on to the
/// next suffix instead of aborting the surrounding transaction. Returns `None`
/// when every attempt collided.
pub async fn create_with_unique_slug(
    conn: &mut PgConnection,
    base_slug: &str,
    settings: &RestaurantSettings,
    menu_enabled: bool,
    now: i64,
) -> Result<Option<Restaurant>, sqlx::Error> {
    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let slug = slug_candidate(base_slug, attempt);
        let created: Option<Restaurant> = sqlx::query_as(
            "INSERT INTO restaurants
                 (name_ar, name_en, menu_slug, menu_enabled, logo, phone, whatsapp, instagram,
                  theme_bg, theme_card, theme_text, theme_muted, theme_accent, theme_accent2,
                  theme_border, font_family, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17)
             ON CONFLICT DO NOTHING
             RETURNING *",
        )
        .bind(&settings.name_ar)
        .bind(&settings.name_en)
        .bind(&slug)
        .bind(menu_enabled)
        .bind(&settings.logo)
        .bind(&settings.phone)
        .bind(&settings.whatsapp)
        .bind(&settings.instagram)
        .bind(&settings.theme_bg)
        .bind(&settings.theme_card)
        .bind(&settings.theme_text)
        .bind(&settings.theme_muted)
        .bind(&settings.theme_accent)
        .bind(&settings.theme_accent2)
        .bind(&settings.theme_border)
        .bind(&settings.font_family)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(restaurant) = created {
            return Ok(Some(restaurant));
        }
        tracing::debug!(slug = %slug, "Slug taken, trying next suffix");
    }
    Ok(None)
}

/// Settings edit; the slug is never touched. A `None` logo keeps the current one.
pub async fn update_settings(
    pool: &PgPool,
    id: i64,
    settings: &RestaurantSettings,
    now: i64,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE restaurants
         SET name_ar = $2, name_en = $3, logo = COALESCE($4, logo),
             phone = $5, whatsapp = $6, instagram = $7,
             theme_bg = $8, theme_card = $9, theme_text = $10, theme_muted = $11,
             theme_accent = $12, theme_accent2 = $13, theme_border = $14,
             font_family = $15, updated_at = $16
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&settings.name_ar)
    .bind(&settings.name_en)
    .bind(&settings.logo)
    .bind(&settings.phone)
    .bind(&settings.whatsapp)
    .bind(&settings.instagram)
    .bind(&settings.theme_bg)
    .bind(&settings.theme_card)
    .bind(&settings.theme_text)
    .bind(&settings.theme_muted)
    .bind(&settings.theme_accent)
    .bind(&settings.theme_accent2)
    .bind(&settings.theme_border)
    .bind(&settings.font_family)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn set_menu_enabled<'e>(
    conn: impl PgExecutor<'e>,
    id: i64,
    enabled: bool,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE restaurants SET menu_enabled = $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(enabled)
        .bind(now)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn set_access_window<'e>(
    conn: impl PgExecutor<'e>,
    id: i64,
    window: AccessWindow,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE restaurants
         SET access_start_at = $2, access_end_at = $3, updated_at = $4
         WHERE id = $1",
    )
    .bind(id)
    .bind(window.start)
    .bind(window.end)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Cascades to categories, items and the linked merchant account
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
