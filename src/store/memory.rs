//! In-process credential store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::{normalize_email, NewUser, User};

/// `UserStore` backed by a map keyed on the normalized email
///
/// The existence check and insert happen under a single write lock, so two
/// concurrent registrations for the same address cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = new_user.into_user(Uuid::new_v4(), Utc::now());

        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.email.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .get(&normalize_email(email))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
