//! Last-resort error shaping
//!
//! Panics become a 500 envelope, and outside development every 500 body is
//! replaced so internal details never reach the client.

use std::any::Any;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::REDACTED_MESSAGE;
use crate::state::AppState;

/// Replace 500 bodies with a generic message unless running in development
pub async fn redact_server_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::INTERNAL_SERVER_ERROR
        || state.config.environment.exposes_error_details()
    {
        return response;
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "code": "INTERNAL_ERROR",
            "message": REDACTED_MESSAGE,
        })),
    )
        .into_response()
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "code": "INTERNAL_ERROR",
            "message": detail,
        })),
    )
        .into_response()
}
