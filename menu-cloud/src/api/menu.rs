//! Public menu
//!
//! GET /api/menu?restaurant_id= | ?restaurant_slug=
//!
//! No authentication. The restaurant must exist, be enabled and be inside its
//! access window; each failure has its own error code.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, Item, Restaurant};

use super::ApiResult;
use super::extract::ApiQuery;
use crate::db;
use crate::state::AppState;
use crate::util::slugify;

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub restaurant_id: Option<i64>,
    pub restaurant_slug: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MenuLookup {
    Id(i64),
    /// `slug` is `None` when the input has nothing slug-safe (e.g. an Arabic
    /// name), in which case only the name fallback is tried
    Slug { slug: Option<String>, name: String },
}

impl MenuQuery {
    pub fn lookup(&self) -> Result<MenuLookup, AppError> {
        if let Some(id) = self.restaurant_id.filter(|id| *id > 0) {
            return Ok(MenuLookup::Id(id));
        }
        let raw = self.restaurant_slug.as_deref().map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return Err(AppError::invalid_request(
                "Missing restaurant_id or restaurant_slug",
            ));
        }
        let slug = raw
            .chars()
            .any(|c| c.is_ascii_alphanumeric())
            .then(|| slugify(raw));
        Ok(MenuLookup::Slug {
            slug,
            name: raw.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub restaurant: Restaurant,
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
}

pub async fn get_menu(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MenuQuery>,
) -> ApiResult<MenuResponse> {
    let lookup = query.lookup()?;

    let restaurant = match &lookup {
        MenuLookup::Id(id) => db::restaurants::find_by_id(&state.pool, *id).await?,
        MenuLookup::Slug { slug, name } => {
            let by_slug = match slug {
                Some(slug) => db::restaurants::find_by_slug(&state.pool, slug).await?,
                None => None,
            };
            match by_slug {
                Some(restaurant) => Some(restaurant),
                None => db::restaurants::find_by_name(&state.pool, name).await?,
            }
        }
    }
    .ok_or(ErrorCode::RestaurantNotFound)?;

    if let Err(code) = restaurant.check_menu_access(Utc::now().naive_utc()) {
        tracing::debug!(restaurant_id = restaurant.id, reason = ?code, "Menu access denied");
        return Err(code.into());
    }

    let scope = Some(restaurant.id);
    let categories = db::categories::list(&state.pool, scope).await?;
    let items = db::items::list(&state.pool, scope, None).await?;

    Ok(Json(MenuResponse {
        restaurant,
        categories,
        items,
    }))
}
