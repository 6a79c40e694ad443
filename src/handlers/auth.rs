//! Authentication HTTP handlers
//!
//! Endpoints for email/password registration and login.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /api/auth/register - Create an account and issue a token
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = payload?;

    let session = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user: session.user,
            token: session.token,
        }),
    ))
}

/// POST /api/auth/login - Verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;

    let session = state.auth_service.login(req).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: session.user,
        token: session.token,
    }))
}

/// GET /api/auth/me - Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = state.auth_service.current_user(user.user_id).await?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user,
    }))
}
