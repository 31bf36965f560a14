//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sellerdesk_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `master` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn master_only(RequireMaster(user): RequireMaster) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireMaster(pub AuthUser);

impl FromRequestParts<AppState> for RequireMaster {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_master() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Master role required".into(),
            )));
        }
        Ok(RequireMaster(user))
    }
}
