//! PostgreSQL credential store tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::PgPool;
    use uuid::Uuid;

    use credential_gate::models::NewUser;
    use credential_gate::store::{PgUserStore, StoreError, UserStore};

    /// Helper to create a migrated store against the test database
    async fn setup_test_store() -> PgUserStore {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/credential_gate_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        let store = PgUserStore::new(pool);
        store.run_migrations().await.expect("Failed to migrate");
        store
    }

    fn unique_email() -> String {
        format!("user-{}@example.com", Uuid::new_v4())
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholde".to_string(),
        }
    }

    async fn count_email(pool: &PgPool, email: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_create_and_find() {
        let store = setup_test_store().await;
        let email = unique_email();

        let created = store.create(new_user(&email)).await.unwrap();
        let found = store.find_by_email(&email.to_uppercase()).await.unwrap();
        assert_eq!(found.id, created.id);

        let by_id = store.find_by_id(created.id).await.unwrap();
        assert_eq!(by_id.email, email);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_unique_constraint_maps_to_conflict() {
        let store = setup_test_store().await;
        let email = unique_email();

        store.create(new_user(&email)).await.unwrap();
        let result = store.create(new_user(&email.to_uppercase())).await;

        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(count_email(store.pool(), &email).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_concurrent_registrations_single_winner() {
        let store = Arc::new(setup_test_store().await);
        let email = unique_email();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let email = email.clone();
                tokio::spawn(async move { store.create(new_user(&email)).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::Conflict) => {}
                Err(e) => panic!("unexpected store error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(count_email(store.pool(), &email).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_health_and_not_found() {
        let store = setup_test_store().await;
        assert!(store.is_healthy().await);
        assert!(matches!(
            store.find_by_email(&unique_email()).await,
            Err(StoreError::NotFound)
        ));
    }
}
