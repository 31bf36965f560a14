//! Shared application router builder.
//!
//! Both the binary (`main.rs`) and the integration tests build the app
//! through [`build_app_router`], so they run the same middleware stack.
//! Timeout and CORS settings are sized for the seller routes.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request id, set on the way in and echoed back.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application [`Router`] with all middleware layers.
///
/// Layers, outermost first: CORS, request id, tracing, request id echo,
/// timeout, panic recovery.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout(config),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// The configured request timeout, raised if needed so a revision waiting
/// out its full lock timeout still gets to answer with a 409.
pub fn request_timeout(config: &ServerConfig) -> Duration {
    let configured = Duration::from_secs(config.request_timeout_secs);
    let lock_wait = Duration::from_millis(config.lock_timeout_ms);
    configured.max(lock_wait + Duration::from_secs(1))
}

/// Build the CORS layer for the back-office frontend.
///
/// The seller routes only use GET, POST, PUT and DELETE. The export's
/// `Content-Disposition` and the request id are exposed so the browser can
/// name the downloaded file and report the id with errors.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([
            CONTENT_DISPOSITION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn config(request_timeout_secs: u64, lock_timeout_ms: u64) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs,
            shutdown_timeout_secs: 30,
            lock_timeout_ms,
            db_max_connections: 5,
            jwt: JwtConfig {
                secret: "secret".into(),
                access_token_expiry_mins: 60,
            },
        }
    }

    #[test]
    fn configured_timeout_wins_when_longer_than_lock_wait() {
        assert_eq!(request_timeout(&config(30, 3_000)), Duration::from_secs(30));
    }

    #[test]
    fn timeout_outlasts_lock_wait() {
        assert_eq!(
            request_timeout(&config(2, 5_000)),
            Duration::from_secs(6)
        );
    }
}
