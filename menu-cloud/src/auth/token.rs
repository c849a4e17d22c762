//! Session token codec (HS256)
//!
//! Admin tokens carry only `sub` and `role`. Owner tokens additionally carry
//! the owner's `restaurant_id` and account `status` at issue time.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{AccountStatus, Role};
use thiserror::Error;

/// Claims stored in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id or merchant account id, depending on `role`, as a decimal string
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token generation failed: {0}")]
    Generation(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::token_expired(),
            TokenError::Invalid(msg) => {
                tracing::debug!("Token validation failed: {msg}");
                AppError::new(ErrorCode::TokenInvalid)
            }
            TokenError::Generation(msg) => {
                tracing::error!("Token generation failed: {msg}");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

/// Signs and verifies session tokens with the shared secret
#[derive(Clone)]
pub struct TokenService {
    issuer: String,
    ttl_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str, issuer: &str, ttl_secs: i64) -> Self {
        Self {
            issuer: issuer.to_string(),
            ttl_secs,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue_admin(&self, admin_id: i64) -> Result<String, TokenError> {
        self.sign(admin_id, Role::Admin, None, None)
    }

    pub fn issue_owner(
        &self,
        account_id: i64,
        restaurant_id: i64,
        status: AccountStatus,
    ) -> Result<String, TokenError> {
        self.sign(account_id, Role::Owner, Some(restaurant_id), Some(status))
    }

    fn sign(
        &self,
        sub: i64,
        role: Role,
        restaurant_id: Option<i64>,
        status: Option<AccountStatus>,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            role,
            restaurant_id,
            status,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify signature, issuer and expiry
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-test-secret-test-secret", "menu_api", 3600)
    }

    #[test]
    fn test_admin_token_has_no_tenant_scope() {
        let svc = service();
        let claims = svc.verify(&svc.issue_admin(1).unwrap()).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.restaurant_id, None);
        assert_eq!(claims.status, None);
        assert_eq!(claims.iss, "menu_api");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_owner_token_carries_restaurant_and_status() {
        let svc = service();
        let token = svc
            .issue_owner(7, 42, AccountStatus::PendingApproval)
            .unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Owner);
        assert_eq!(claims.restaurant_id, Some(42));
        assert_eq!(claims.status, Some(AccountStatus::PendingApproval));
    }

    #[test]
    fn test_issued_tokens_verify_with_required_claims() {
        let svc = service();
        for token in [
            svc.issue_admin(3).unwrap(),
            svc.issue_owner(4, 5, AccountStatus::Approved).unwrap(),
        ] {
            let claims = svc.verify(&token).unwrap();
            assert!(claims.sub.parse::<i64>().is_ok());
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue_admin(1).unwrap();
        let other = TokenService::new("another-secret-another-secret-xx", "menu_api", 3600);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = service().issue_admin(1).unwrap();
        let other = TokenService::new("test-secret-test-secret-test-secret", "other", 3600);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let now = Utc::now().timestamp();
        let token = svc
            .encode(&Claims {
                sub: "1".into(),
                role: Role::Admin,
                restaurant_id: None,
                status: None,
                iss: "menu_api".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        assert!(matches!(svc.verify(&token), Err(TokenError::Expired)));
        let err: AppError = svc.verify(&token).unwrap_err().into();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(TokenService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(TokenService::extract_from_header("Bearer "), None);
        assert_eq!(TokenService::extract_from_header("Basic abc"), None);
    }
}
