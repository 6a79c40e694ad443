//! Authentication module for credential-gate
//!
//! - bcrypt password hashing run on the blocking pool
//! - Stateless JWT session tokens with a fixed TTL
//! - Register / login orchestration over a [`crate::store::UserStore`]

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, TokenError, TokenIssuer};
pub use password::{
    hash_password, verify_password, HashError, PasswordHasher, MAX_PASSWORD_BYTES,
};
pub use service::{AuthError, AuthService, AuthSession};
