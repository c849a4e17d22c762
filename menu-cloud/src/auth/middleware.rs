//! Bearer-token middleware for the protected API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use shared::models::AccountStatus;

use super::context::AuthContext;
use super::token::TokenService;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// Verify the bearer token and attach the caller's [`AuthContext`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = TokenService::extract_from_header(header).ok_or_else(|| {
        AppError::invalid_token("Invalid Authorization format").into_response()
    })?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|e| AppError::from(e).into_response())?;

    let ctx = AuthContext::from_claims(&claims).map_err(|code| AppError::new(code).into_response())?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Reject non-admin callers; must run after [`require_auth`]
pub async fn require_admin(request: Request, next: Next) -> Result<Response, Response> {
    let ctx = request
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| AppError::not_authenticated().into_response())?;
    ctx.require_admin().map_err(IntoResponse::into_response)?;
    Ok(next.run(request).await)
}

/// Re-check an owner's account on every request so a rejection takes effect
/// before the token expires; must run after [`require_auth`]
pub async fn require_active_owner(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ctx = request
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    if let AuthContext::Owner { account_id, .. } = ctx {
        let status = db::merchant_accounts::find_status(&state.pool, account_id)
            .await
            .map_err(|e| ServiceError::from(e).into_response())?
            .as_deref()
            .and_then(AccountStatus::from_db)
            .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid).into_response())?;

        if let Err(code) = status.session_gate() {
            tracing::info!(account_id, status = %status, "Owner session refused");
            return Err(AppError::new(code).into_response());
        }
    }

    Ok(next.run(request).await)
}
