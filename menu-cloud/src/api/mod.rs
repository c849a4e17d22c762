//! HTTP routes for menu-cloud

pub mod admin;
pub mod auth;
pub mod categories;
pub mod credentials;
pub mod extract;
pub mod health;
pub mod items;
pub mod menu;
pub mod register;
pub mod restaurants;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{require_active_owner, require_admin, require_auth};
use crate::auth::rate_limit::{
    login_rate_limit, otp_rate_limit, password_reset_rate_limit, register_rate_limit,
};
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// `?restaurant_id=` scope override (honoured for admins only)
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub restaurant_id: Option<i64>,
}

/// `?id=` target of a delete
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<i64>,
}

impl IdQuery {
    pub fn require(&self) -> Result<i64, AppError> {
        self.id
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::invalid_request("Missing id"))
    }
}

/// Multipart overhead on top of the file itself
const MULTIPART_SLACK_BYTES: usize = 64 * 1024;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Random 128-bit hex request id
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = hex::encode(rand::random::<[u8; 16]>());
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let login = Router::new()
        .route("/api/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    let registration = Router::new()
        .route("/api/register", post(register::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let otp = Router::new()
        .route("/api/verify-otp", post(register::verify_otp))
        .route("/api/resend-otp", post(register::resend_otp))
        .route_layer(middleware::from_fn_with_state(state.clone(), otp_rate_limit));

    let password_reset = Router::new()
        .route(
            "/api/password-reset/request",
            post(auth::request_password_reset),
        )
        .route("/api/password-reset/confirm", post(auth::reset_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            password_reset_rate_limit,
        ));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/menu", get(menu::get_menu))
        .nest_service("/uploads", ServeDir::new(state.storage.root()));

    // Admin only; shares `/api/restaurants` with the tenant group by method
    let admin = Router::new()
        .route(
            "/api/admin/registrations",
            get(admin::list_registrations).post(admin::update_registration),
        )
        .route(
            "/api/admin/credentials",
            get(credentials::get_admin_profile).post(credentials::update_credentials),
        )
        .route(
            "/api/restaurants",
            post(restaurants::create_restaurant).delete(restaurants::delete_restaurant),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin or owner, tenant scoped; owners are re-checked against their
    // current account status on every request
    let tenant = Router::new()
        .route(
            "/api/account/credentials",
            post(credentials::update_own_credentials),
        )
        .route(
            "/api/restaurants",
            get(restaurants::list_restaurants).put(restaurants::update_restaurant),
        )
        .route(
            "/api/categories",
            get(categories::list_categories)
                .post(categories::create_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/items",
            get(items::list_items)
                .post(items::create_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/api/uploads",
            post(upload::upload_image).layer(DefaultBodyLimit::max(
                state.storage.max_bytes() + MULTIPART_SLACK_BYTES,
            )),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_active_owner,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(registration)
        .merge(otp)
        .merge(password_reset)
        .merge(admin)
        .merge(tenant)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, XRequestId))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

async fn method_not_allowed() -> AppError {
    AppError::new(ErrorCode::MethodNotAllowed)
}
