//! JWT session token issuance and validation
//!
//! Tokens are HS256-signed, carry the user id and email, and expire after a
//! fixed TTL. Nothing is stored server-side, so there is no revocation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email at the time of issuance
    pub email: String,
    /// JWT ID
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

/// Signs and verifies session tokens with the server secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenIssuer {
    /// # Arguments
    /// * `secret` - JWT signing secret
    /// * `ttl_seconds` - Token time-to-live in seconds
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token for a user, valid from now
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`
    ///
    /// A non-positive TTL or an expiry past chrono's range is refused rather
    /// than producing a token that is already dead.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        if self.ttl_seconds <= 0 {
            return Err(TokenError::EncodingFailed(format!(
                "token TTL must be positive, got {}s",
                self.ttl_seconds
            )));
        }

        let exp = Duration::try_seconds(self.ttl_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                TokenError::EncodingFailed(format!(
                    "token TTL of {}s overflows the expiry timestamp",
                    self.ttl_seconds
                ))
            })?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token
    ///
    /// The signature is checked first; a well-signed token past its `exp`
    /// yields [`TokenError::Expired`], anything else [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify_user_id(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify(token)?.user_id()
    }
}
