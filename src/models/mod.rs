//! Data models for credential-gate

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// Stored user record
///
/// The email is kept trimmed and lowercased; `password_hash` is a bcrypt
/// string and never leaves the service.
#[derive(Debug, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input to `UserStore::create`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    /// Materialize the record a store will persist
    pub fn into_user(self, id: Uuid, created_at: DateTime<Utc>) -> User {
        User {
            id,
            email: normalize_email(&self.email),
            name: self.name,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

/// User response (sanitized for API)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn test_user_response_hides_hash() {
        let user = NewUser {
            email: "Bob@Example.com".to_string(),
            name: "Bob".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
        }
        .into_user(Uuid::new_v4(), Utc::now());

        assert_eq!(user.email, "bob@example.com");

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(json["name"], "Bob");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("created_at").is_none());
    }
}
