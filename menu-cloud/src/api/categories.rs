//! Menu categories, scoped to the caller's restaurant

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Category, CategoryFields};

use super::extract::{ApiJson, ApiQuery};
use super::{ApiResult, IdQuery, ScopeQuery};
use crate::auth::AuthContext;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::now_millis;

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
) -> ApiResult<Vec<Category>> {
    let scope = ctx.resolve_scope(query.restaurant_id);
    let categories = db::categories::list(&state.pool, scope.restaurant_id()).await?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Target restaurant for admins; ignored for owners
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(flatten)]
    pub fields: CategoryFields,
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let restaurant_id = ctx.resolve_target(req.restaurant_id.or(query.restaurant_id))?;
    ensure_restaurant(&state, restaurant_id).await?;

    let category =
        db::categories::create(&state.pool, restaurant_id, &req.fields, now_millis()).await?;

    tracing::info!(restaurant_id, category_id = category.id, "Category created");
    Ok(Json(category))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: CategoryFields,
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ScopeQuery>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let id = IdQuery { id: req.id }.require()?;
    let scope = ctx.resolve_scope(query.restaurant_id);

    let category =
        db::categories::update(&state.pool, id, scope.restaurant_id(), &req.fields, now_millis())
            .await?
            .ok_or(ErrorCode::CategoryNotFound)?;
    Ok(Json(category))
}

/// Items filed under the category keep existing, uncategorised
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiQuery(scope_query): ApiQuery<ScopeQuery>,
) -> ApiResult<serde_json::Value> {
    let id = query.require()?;
    let scope = ctx.resolve_scope(scope_query.restaurant_id);

    if !db::categories::delete(&state.pool, id, scope.restaurant_id()).await? {
        return Err(ErrorCode::CategoryNotFound.into());
    }

    tracing::info!(category_id = id, "Category deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// 404 unless the restaurant row exists
pub(super) async fn ensure_restaurant(
    state: &AppState,
    restaurant_id: i64,
) -> Result<(), ServiceError> {
    db::restaurants::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or(ErrorCode::RestaurantNotFound)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_reads_target_and_fields() {
        let req: CreateCategoryRequest = serde_json::from_str(
            r#"{"restaurant_id":3,"name_en":"Drinks","name_ar":"مشروبات"}"#,
        )
        .unwrap();
        assert_eq!(req.restaurant_id, Some(3));
        assert_eq!(req.fields.name_en, "Drinks");
        assert_eq!(req.fields.description_en, "");
        assert_eq!(req.fields.image, None);
    }

    #[test]
    fn test_admin_create_needs_restaurant() {
        let admin = AuthContext::Admin { admin_id: 1 };
        let err = admin.resolve_target(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(admin.resolve_target(Some(5)).unwrap(), 5);
    }

    #[test]
    fn test_owner_create_is_pinned() {
        let owner = AuthContext::Owner {
            account_id: 2,
            restaurant_id: 9,
            status: None,
        };
        assert_eq!(owner.resolve_target(Some(5)).unwrap(), 9);
        assert_eq!(owner.resolve_target(None).unwrap(), 9);
    }

    #[test]
    fn test_update_without_id_is_bad_request() {
        let req: UpdateCategoryRequest = serde_json::from_str(r#"{"name_en":"Food"}"#).unwrap();
        let err = IdQuery { id: req.id }.require().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Missing id");
    }
}
