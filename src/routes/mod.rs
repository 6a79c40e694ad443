//! Route definitions for credential-gate

mod auth;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::config::Config;
use crate::handlers::{health_check, not_found};
use crate::middleware;
use crate::state::AppState;

pub use auth::auth_routes;

/// Request bodies above this size are rejected
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Assemble the full application router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health_check))
        .merge(auth_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::redact_server_errors,
        ))
        .layer(axum::middleware::from_fn(middleware::security_headers));

    if state.config.environment.is_production() {
        router = router.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    router
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(configure_cors(&state.config))
        .with_state(state)
}

fn configure_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                frontend_url = %config.frontend_url,
                "FRONTEND_URL is not a valid origin, cross-origin requests will be refused"
            );
            cors
        }
    }
}
