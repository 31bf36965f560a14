use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sellerdesk_db::DbPool,
    /// Server configuration (JWT settings, lock timeout).
    pub config: Arc<ServerConfig>,
}
