//! Authentication middleware
//!
//! Extractor for JWT bearer token verification and user extraction.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthError, AuthService};
use crate::error::ApiError;

/// Authenticated user extracted from a session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Extractor for authenticated users
///
/// This extractor verifies the JWT token from the Authorization header.
/// Bad signatures and expired tokens are both rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingToken)?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = auth_service.verify_token(bearer.token())?;
        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::from(AuthError::TokenInvalid))?;

        Ok(AuthenticatedUser { user_id })
    }
}
