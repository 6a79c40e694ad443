//! Credential store
//!
//! Persistence for user records behind the [`UserStore`] trait. The store is
//! the authoritative guard for email uniqueness: `create` must reject a
//! duplicate (case-insensitive) email with [`StoreError::Conflict`] and never
//! overwrite an existing record.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Credential store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A user with this email already exists")]
    Conflict,

    #[error("User not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// PostgreSQL SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Persistence for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with `Conflict` if the email is taken
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<User, StoreError>;

    /// Whether the backing store is currently reachable
    async fn is_healthy(&self) -> bool;

    /// Release connections on shutdown
    async fn close(&self) {}
}
