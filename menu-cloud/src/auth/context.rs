//! Authorization context resolved from a verified token
//!
//! Every tenant-scoped endpoint goes through [`AuthContext::resolve_scope`]
//! (reads) or [`AuthContext::resolve_target`] (writes). An owner is always
//! pinned to the restaurant in their token; a client supplied id is only
//! honoured for admins.

use shared::error::{AppError, ErrorCode};
use shared::models::{AccountStatus, Role};

use super::token::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    /// Global administrator, no tenant scope
    Admin { admin_id: i64 },
    /// Merchant owner, scoped to exactly one restaurant
    Owner {
        account_id: i64,
        restaurant_id: i64,
        status: Option<AccountStatus>,
    },
}

/// Effective restaurant filter for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every restaurant (admins only)
    All,
    Restaurant(i64),
}

impl Scope {
    /// `None` means unrestricted; used as the `$n IS NULL OR restaurant_id = $n` bind
    pub fn restaurant_id(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Restaurant(id) => Some(*id),
        }
    }
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, ErrorCode> {
        let sub = claims
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ErrorCode::TokenInvalid)?;
        match claims.role {
            Role::Admin => Ok(Self::Admin { admin_id: sub }),
            Role::Owner => {
                let restaurant_id = claims
                    .restaurant_id
                    .filter(|id| *id > 0)
                    .ok_or(ErrorCode::RestaurantScopeMissing)?;
                Ok(Self::Owner {
                    account_id: sub,
                    restaurant_id,
                    status: claims.status,
                })
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    /// Read scope: admins may narrow to a requested restaurant (or see all),
    /// owners always get their own restaurant whatever was requested
    pub fn resolve_scope(&self, requested: Option<i64>) -> Scope {
        match self {
            Self::Admin { .. } => match requested.filter(|id| *id > 0) {
                Some(id) => Scope::Restaurant(id),
                None => Scope::All,
            },
            Self::Owner { restaurant_id, .. } => Scope::Restaurant(*restaurant_id),
        }
    }

    /// Concrete restaurant for a write; admins must name one
    pub fn resolve_target(&self, requested: Option<i64>) -> Result<i64, AppError> {
        match self.resolve_scope(requested) {
            Scope::Restaurant(id) => Ok(id),
            Scope::All => Err(AppError::required("restaurant_id")),
        }
    }

    pub fn require_admin(&self) -> Result<i64, AppError> {
        match self {
            Self::Admin { admin_id } => Ok(*admin_id),
            Self::Owner { .. } => Err(AppError::admin_required()),
        }
    }

    /// `(account_id, restaurant_id)` of an owner
    pub fn require_owner(&self) -> Result<(i64, i64), AppError> {
        match self {
            Self::Owner {
                account_id,
                restaurant_id,
                ..
            } => Ok((*account_id, *restaurant_id)),
            Self::Admin { .. } => Err(AppError::permission_denied(
                "This action is only available to restaurant owners",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: AuthContext = AuthContext::Admin { admin_id: 1 };
    const OWNER: AuthContext = AuthContext::Owner {
        account_id: 9,
        restaurant_id: 42,
        status: Some(AccountStatus::Approved),
    };

    fn claims(role: Role, restaurant_id: Option<i64>) -> Claims {
        Claims {
            sub: "9".into(),
            role,
            restaurant_id,
            status: None,
            iss: "menu_api".into(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_owner_is_pinned_to_own_restaurant() {
        assert_eq!(OWNER.resolve_scope(None), Scope::Restaurant(42));
        assert_eq!(OWNER.resolve_scope(Some(7)), Scope::Restaurant(42));
        assert_eq!(OWNER.resolve_target(Some(7)).unwrap(), 42);
    }

    #[test]
    fn test_admin_scope_follows_request() {
        assert_eq!(ADMIN.resolve_scope(None), Scope::All);
        assert_eq!(ADMIN.resolve_scope(Some(0)), Scope::All);
        assert_eq!(ADMIN.resolve_scope(Some(7)), Scope::Restaurant(7));
        assert_eq!(ADMIN.resolve_target(Some(7)).unwrap(), 7);
    }

    #[test]
    fn test_admin_write_needs_restaurant() {
        let err = ADMIN.resolve_target(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_scope_bind_value() {
        assert_eq!(Scope::All.restaurant_id(), None);
        assert_eq!(Scope::Restaurant(3).restaurant_id(), Some(3));
    }

    #[test]
    fn test_role_checks() {
        assert_eq!(ADMIN.require_admin().unwrap(), 1);
        assert_eq!(
            OWNER.require_admin().unwrap_err().code,
            ErrorCode::AdminRequired
        );
        assert_eq!(OWNER.require_owner().unwrap(), (9, 42));
        assert!(ADMIN.require_owner().is_err());
    }

    #[test]
    fn test_from_claims() {
        assert_eq!(
            AuthContext::from_claims(&claims(Role::Admin, None)),
            Ok(AuthContext::Admin { admin_id: 9 })
        );
        assert_eq!(
            AuthContext::from_claims(&claims(Role::Owner, Some(42))),
            Ok(AuthContext::Owner {
                account_id: 9,
                restaurant_id: 42,
                status: None,
            })
        );
        assert_eq!(
            AuthContext::from_claims(&claims(Role::Owner, None)),
            Err(ErrorCode::RestaurantScopeMissing)
        );
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let mut bad = claims(Role::Admin, None);
        bad.sub = "admin".into();
        assert_eq!(AuthContext::from_claims(&bad), Err(ErrorCode::TokenInvalid));
    }

    #[test]
    fn test_issued_token_resolves_to_context() {
        let svc = super::super::token::TokenService::new(
            "test-secret-test-secret-test-secret",
            "menu_api",
            3600,
        );
        let token = svc.issue_owner(9, 42, AccountStatus::PendingApproval).unwrap();
        let ctx = AuthContext::from_claims(&svc.verify(&token).unwrap()).unwrap();
        assert_eq!(ctx.require_owner().unwrap(), (9, 42));
    }
}
