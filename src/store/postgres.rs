//! PostgreSQL credential store
//!
//! Pool management and migrations follow the usual sqlx setup; uniqueness is
//! enforced by the `users_email_lower_key` index created in `migrations/`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::config::Config;
use crate::models::{normalize_email, NewUser, User};

/// `UserStore` backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a connection pool from configuration
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        tracing::info!("Connecting to database at {}", config.database_url_masked());

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::info!("Database migrations completed successfully");

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = new_user.into_user(Uuid::new_v4(), Utc::now());

        sqlx::query_as(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}
