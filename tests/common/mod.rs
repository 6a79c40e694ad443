//! Shared helpers for the HTTP-level tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use credential_gate::auth::{AuthService, PasswordHasher, TokenIssuer};
use credential_gate::config::{Config, Environment, StoreBackend};
use credential_gate::models::{NewUser, User};
use credential_gate::store::{InMemoryUserStore, StoreError, UserStore};
use credential_gate::{build_router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config(environment: Environment) -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        environment,
        jwt_secret: TEST_SECRET.to_string(),
        bcrypt_cost: 4,
        ..Config::default()
    }
}

pub fn app_with_store(store: Arc<dyn UserStore>, environment: Environment) -> Router {
    let config = Arc::new(test_config(environment));
    let auth_service = Arc::new(AuthService::new(
        store,
        PasswordHasher::new(config.bcrypt_cost).unwrap(),
        TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_seconds),
    ));
    build_router(AppState::new(auth_service, config))
}

/// Router over a fresh in-memory store, plus the store for inspection
pub fn test_app() -> (Router, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    let app = app_with_store(store.clone(), Environment::Development);
    (app, store)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Store whose every call fails the same way
pub struct FailingStore {
    pub error: fn() -> StoreError,
}

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err((self.error)())
    }

    async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
        Err((self.error)())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<User, StoreError> {
        Err((self.error)())
    }

    async fn is_healthy(&self) -> bool {
        false
    }
}
