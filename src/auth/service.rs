//! Authentication service
//!
//! Core business logic for email/password registration and login.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    collect_violations, FieldViolation, LoginRequest, NewUser, RegisterRequest, UserResponse,
};
use crate::store::{StoreError, UserStore};

use super::jwt::{Claims, TokenError, TokenIssuer};
use super::password::{HashError, PasswordHasher};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("User already exists with this email")]
    DuplicateUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AuthError::DuplicateUser,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
            StoreError::Backend(msg) => AuthError::Unexpected(msg),
        }
    }
}

impl From<HashError> for AuthError {
    fn from(e: HashError) -> Self {
        AuthError::Unexpected(e.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid(_) => AuthError::TokenInvalid,
            TokenError::EncodingFailed(msg) => AuthError::Unexpected(msg),
        }
    }
}

/// A user together with a freshly issued session token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserResponse,
    pub token: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens: Arc::new(tokens),
        }
    }

    /// Register a new account and issue a session token
    #[tracing::instrument(skip_all, fields(email = %request.email.trim()))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError> {
        let request = request.normalized();

        if let Err(errors) = request.validate() {
            let violations = collect_violations(&errors);
            tracing::debug!(violations = violations.len(), "Registration rejected");
            return Err(AuthError::Validation(violations));
        }

        // Skip the expensive hash when the address is obviously taken. The
        // store's unique constraint still decides races.
        match self.store.find_by_email(&request.email).await {
            Ok(_) => return Err(AuthError::DuplicateUser),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = self.hasher.hash(&request.password).await?;

        let user = self
            .store
            .create(NewUser {
                email: request.email,
                name: request.name,
                password_hash,
            })
            .await
            .map_err(|e| {
                if matches!(e, StoreError::Conflict) {
                    tracing::info!("Concurrent registration lost the uniqueness race");
                }
                AuthError::from(e)
            })?;

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }

    /// Authenticate with email and password and issue a session token
    ///
    /// Unknown emails and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`] after the same amount of hashing work.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let user = match self.store.find_by_email(&request.email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                self.hasher.verify_dummy(&request.password).await;
                tracing::debug!("Login failed");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.hasher.verify(&request.password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }

    /// Verify a bearer token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Resolve the user a verified token was issued for
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self.store.find_by_id(user_id).await?;
        Ok(user.into())
    }

    /// Credential store (for health checks)
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryUserStore;

    fn service() -> (AuthService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        let service = AuthService::new(
            store.clone(),
            PasswordHasher::new(4).unwrap(),
            TokenIssuer::new("test-secret", 86_400),
        );
        (service, store)
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _) = service();

        let registered = service
            .register(RegisterRequest::new("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "a@x.com");
        assert_eq!(registered.user.name, "Alice");

        let session = service.login(login("a@x.com", "secret1")).await.unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let claims = service.verify_token(&session.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let (service, store) = service();

        service
            .register(RegisterRequest::new("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .register(RegisterRequest::new("Alice Two", " A@X.com", "another1"))
            .await;
        assert!(matches!(result, Err(AuthError::DuplicateUser)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_validation_reports_every_field() {
        let (service, store) = service();

        let result = service
            .register(RegisterRequest::new("", "nope", "123"))
            .await;

        match result {
            Err(AuthError::Validation(violations)) => assert_eq!(violations.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(RegisterRequest::new("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        let wrong_password = service.login(login("a@x.com", "wrong")).await.unwrap_err();
        let unknown_email = service
            .login(login("nobody@x.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let (service, _) = service();
        service
            .register(RegisterRequest::new("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        assert!(service.login(login("A@X.COM", "secret1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_current_user_from_token() {
        let (service, _) = service();
        let session = service
            .register(RegisterRequest::new("Alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        let claims = service.verify_token(&session.token).unwrap();
        let user = service
            .current_user(claims.user_id().unwrap())
            .await
            .unwrap();
        assert_eq!(user, session.user);
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let (service, _) = service();
        assert!(matches!(
            service.verify_token("garbage"),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            AuthError::from(StoreError::Conflict),
            AuthError::DuplicateUser
        ));
        assert!(matches!(
            AuthError::from(StoreError::Unavailable("down".into())),
            AuthError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AuthError::from(StoreError::Backend("boom".into())),
            AuthError::Unexpected(_)
        ));
    }
}
