pub mod auth;
pub mod health;
pub mod seller;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                  login (public)
///
/// /sellers                     search (master), sign up (public)
/// /sellers/export              export as json or csv (master)
/// /sellers/lookup              seller picker (authenticated)
/// /sellers/{id}                get, revise (self or master), delete (master)
/// /sellers/{id}/history        status change history (self or master)
/// /sellers/{id}/snapshots      every profile version (master)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sellers", seller::router())
}
