//! Password hashing
//!
//! bcrypt with a per-hash random salt. Hashing is deliberately slow, so the
//! async entry points push the work onto tokio's blocking pool.

use thiserror::Error;

/// bcrypt only reads this many bytes of input; anything beyond is ignored
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Errors from hashing or verifying a password
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password exceeds 72 bytes")]
    TooLong,

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

/// Hash a password with bcrypt at the given cost
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused instead of being
/// silently truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String, HashError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(HashError::TooLong);
    }
    bcrypt::hash(password, cost).map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a password against a stored bcrypt hash
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed. Over-long input never matches, since no stored hash
/// can have been made from it.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, HashError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    bcrypt::verify(password, hash).map_err(|e| HashError::MalformedHash(e.to_string()))
}

/// Async-friendly bcrypt hasher
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Verified against when the account does not exist
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, HashError> {
        let dummy_hash = hash_password("credential-gate-dummy-password", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    /// Hash a plaintext password off the async workers
    pub async fn hash(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }

    /// Verify a plaintext password against a stored hash off the async workers
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| HashError::TaskFailed(e.to_string()))?
    }

    /// Burn the same amount of work as a real verification
    pub async fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash).await;
    }
}
