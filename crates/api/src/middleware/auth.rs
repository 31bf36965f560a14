//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sellerdesk_core::error::CoreError;
use sellerdesk_core::roles::ROLE_MASTER;
use sellerdesk_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated seller extracted from a JWT Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The seller id (from `claims.sub`).
    pub seller_id: DbId,
    /// `"master"` or `"seller"`.
    pub role: String,
}

impl AuthUser {
    pub fn is_master(&self) -> bool {
        self.role == ROLE_MASTER
    }

    /// Masters may act on any seller; everyone else only on themselves.
    pub fn ensure_self_or_master(&self, seller_id: DbId) -> Result<(), AppError> {
        if self.is_master() || self.seller_id == seller_id {
            return Ok(());
        }
        Err(AppError::Core(CoreError::Forbidden(
            "Access to another seller is not allowed".into(),
        )))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            seller_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn user(seller_id: DbId, role: &str) -> AuthUser {
        AuthUser {
            seller_id,
            role: role.to_string(),
        }
    }

    #[test]
    fn seller_may_only_touch_itself() {
        let seller = user(7, "seller");
        assert!(seller.ensure_self_or_master(7).is_ok());
        assert_matches!(
            seller.ensure_self_or_master(8),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }

    #[test]
    fn master_may_touch_anyone() {
        let master = user(1, "master");
        assert!(master.is_master());
        assert!(master.ensure_self_or_master(99).is_ok());
    }
}
