//! Menu items, scoped to the caller's restaurant
//!
//! An item's category, when set, must belong to the item's own restaurant.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Item, ItemFields};

use super::categories::ensure_restaurant;
use super::extract::{ApiJson, ApiQuery};
use super::{ApiResult, IdQuery, ScopeQuery};
use crate::auth::AuthContext;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::now_millis;

#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub restaurant_id: Option<i64>,
    pub category_id: Option<i64>,
}

pub async fn list_items(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ItemListQuery>,
) -> ApiResult<Vec<Item>> {
    let scope = ctx.resolve_scope(query.restaurant_id);
    let items = db::items::list(&state.pool, scope.restaurant_id(), query.category_id).await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(flatten)]
    pub fields: ItemFields,
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
    ApiJson(req): ApiJson<CreateItemRequest>,
) -> ApiResult<Item> {
    check_price(&req.fields)?;
    let restaurant_id = ctx.resolve_target(req.restaurant_id.or(query.restaurant_id))?;
    ensure_restaurant(&state, restaurant_id).await?;
    ensure_category(&state, &req.fields, restaurant_id).await?;

    let item = db::items::create(&state.pool, restaurant_id, &req.fields, now_millis()).await?;

    tracing::info!(restaurant_id, item_id = item.id, "Item created");
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: ItemFields,
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
    ApiJson(req): ApiJson<UpdateItemRequest>,
) -> ApiResult<Item> {
    let id = IdQuery { id: req.id }.require()?;
    check_price(&req.fields)?;
    let scope = ctx.resolve_scope(query.restaurant_id).restaurant_id();

    let restaurant_id = db::items::owner_of(&state.pool, id, scope)
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;
    ensure_category(&state, &req.fields, restaurant_id).await?;

    let item = db::items::update(&state.pool, id, scope, &req.fields, now_millis())
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiQuery(scope_query): ApiQuery<ScopeQuery>,
) -> ApiResult<serde_json::Value> {
    let id = query.require()?;
    let scope = ctx.resolve_scope(scope_query.restaurant_id);

    if !db::items::delete(&state.pool, id, scope.restaurant_id()).await? {
        return Err(ErrorCode::ItemNotFound.into());
    }

    tracing::info!(item_id = id, "Item deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

fn check_price(fields: &ItemFields) -> Result<(), AppError> {
    if fields.validate_price() {
        Ok(())
    } else {
        Err(AppError::validation("Price must not be negative").with_detail("field", "price"))
    }
}

async fn ensure_category(
    state: &AppState,
    fields: &ItemFields,
    restaurant_id: i64,
) -> Result<(), ServiceError> {
    let Some(category_id) = fields.category_id else {
        return Ok(());
    };
    if !db::categories::belongs_to(&state.pool, category_id, restaurant_id).await? {
        return Err(ErrorCode::CategoryNotFound.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_negative_price_is_validation_error() {
        let fields = ItemFields {
            price: Some(Decimal::new(-250, 2)),
            ..Default::default()
        };
        let err = check_price(&fields).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(check_price(&ItemFields::default()).is_ok());
    }

    #[test]
    fn test_create_request_parses_decimal_price() {
        let req: CreateItemRequest = serde_json::from_str(
            r#"{"name_en":"Latte","price":4.25,"category_id":3}"#,
        )
        .unwrap();
        assert_eq!(req.restaurant_id, None);
        assert_eq!(req.fields.category_id, Some(3));
        assert_eq!(req.fields.price_or_zero(), Decimal::new(425, 2));
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ItemListQuery::default();
        assert_eq!(query.restaurant_id, None);
        assert_eq!(query.category_id, None);
    }
}
