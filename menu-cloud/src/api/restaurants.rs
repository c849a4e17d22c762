//! Restaurant settings
//!
//! Owners read and edit only their own restaurant. Creating and deleting
//! restaurants is reserved to admins.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantSettings};

use super::extract::{ApiJson, ApiQuery};
use super::{ApiResult, IdQuery, ScopeQuery};
use crate::auth::{AuthContext, Scope};
use crate::db;
use crate::state::AppState;
use crate::util::{now_millis, slugify};

pub async fn list_restaurants(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<Vec<Restaurant>> {
    let scope = ctx.resolve_scope(query.restaurant_id);
    let restaurants = db::restaurants::list(&state.pool, scope.restaurant_id()).await?;
    Ok(Json(restaurants))
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(settings): ApiJson<RestaurantSettings>,
) -> ApiResult<Restaurant> {
    ctx.require_admin()?;

    let base_slug = slugify(slug_source(&settings));
    let mut conn = state.pool.acquire().await?;
    let restaurant = db::restaurants::create_with_unique_slug(
        &mut *conn,
        &base_slug,
        &settings,
        true,
        now_millis(),
    )
    .await?
    .ok_or(ErrorCode::SlugTaken)?;

    tracing::info!(
        restaurant_id = restaurant.id,
        slug = %restaurant.menu_slug,
        "Restaurant created"
    );
    Ok(Json(restaurant))
}

/// English name, then Arabic; `slugify` falls back to `business` for the rest
fn slug_source(settings: &RestaurantSettings) -> &str {
    [settings.name_en.trim(), settings.name_ar.trim()]
        .into_iter()
        .find(|name| !name.is_empty())
        .unwrap_or("")
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub settings: RestaurantSettings,
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(req): ApiJson<UpdateRestaurantRequest>,
) -> ApiResult<Restaurant> {
    let id = match ctx.resolve_scope(req.id) {
        Scope::Restaurant(id) => id,
        Scope::All => return Err(AppError::invalid_request("Missing id").into()),
    };

    let restaurant = db::restaurants::update_settings(&state.pool, id, &req.settings, now_millis())
        .await?
        .ok_or(ErrorCode::RestaurantNotFound)?;

    tracing::info!(restaurant_id = id, "Restaurant settings updated");
    Ok(Json(restaurant))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<serde_json::Value> {
    ctx.require_admin()?;
    let id = query.require()?;

    if !db::restaurants::delete(&state.pool, id).await? {
        return Err(ErrorCode::RestaurantNotFound.into());
    }

    tracing::info!(restaurant_id = id, "Restaurant deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_source_prefers_english_name() {
        let settings = RestaurantSettings {
            name_en: " Cafe Roma ".into(),
            name_ar: "مقهى روما".into(),
            ..Default::default()
        };
        assert_eq!(slugify(slug_source(&settings)), "cafe-roma");
    }

    #[test]
    fn test_slug_source_falls_back_to_business() {
        let settings = RestaurantSettings {
            name_ar: "مقهى".into(),
            ..Default::default()
        };
        // Arabic-only names carry no ASCII slug characters
        assert_eq!(slugify(slug_source(&settings)), "business");
        assert_eq!(slugify(slug_source(&RestaurantSettings::default())), "business");
    }

    #[test]
    fn test_update_request_flattens_settings() {
        let req: UpdateRestaurantRequest = serde_json::from_str(
            r##"{"id":7,"name_en":"Roma","theme_accent":"#ff0000","font_family":"Cairo"}"##,
        )
        .unwrap();
        assert_eq!(req.id, Some(7));
        assert_eq!(req.settings.name_en, "Roma");
        assert_eq!(req.settings.theme_accent.as_deref(), Some("#ff0000"));
        assert_eq!(req.settings.logo, None);
    }

    #[test]
    fn test_owner_update_ignores_requested_id() {
        let owner = AuthContext::Owner {
            account_id: 1,
            restaurant_id: 42,
            status: None,
        };
        assert_eq!(owner.resolve_scope(Some(7)), Scope::Restaurant(42));

        let admin = AuthContext::Admin { admin_id: 1 };
        assert_eq!(admin.resolve_scope(None), Scope::All);
    }
}
