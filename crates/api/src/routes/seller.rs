//! Route definitions for the `/sellers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::seller;
use crate::state::AppState;

/// Routes mounted at `/sellers`.
///
/// ```text
/// GET    /                 -> search
/// POST   /                 -> sign_up
/// GET    /export           -> export
/// GET    /lookup           -> lookup
/// GET    /{id}             -> get_seller
/// PUT    /{id}             -> update_seller
/// DELETE /{id}             -> delete_seller
/// GET    /{id}/history     -> status_history
/// GET    /{id}/snapshots   -> list_snapshots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::search).post(seller::sign_up))
        .route("/export", get(seller::export))
        .route("/lookup", get(seller::lookup))
        .route(
            "/{id}",
            get(seller::get_seller)
                .put(seller::update_seller)
                .delete(seller::delete_seller),
        )
        .route("/{id}/history", get(seller::status_history))
        .route("/{id}/snapshots", get(seller::list_snapshots))
}
