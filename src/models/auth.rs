//! Authentication models for credential-gate

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::UserResponse;
use crate::auth::MAX_PASSWORD_BYTES;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request body for `POST /api/auth/register`
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation failures alongside everything else.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom = "password_fits_bcrypt"
    )]
    pub password: String,
}

/// bcrypt ignores input past 72 bytes, so longer passwords are refused
fn password_fits_bcrypt(password: &str) -> Result<(), ValidationError> {
    if password.len() <= MAX_PASSWORD_BYTES {
        return Ok(());
    }
    let mut err = ValidationError::new("password_too_long");
    err.message = Some(Cow::Borrowed("Password must be at most 72 bytes"));
    Err(err)
}

impl RegisterRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Trim the name and canonicalize the email; the password is left untouched
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: super::normalize_email(&self.email),
            password: self.password,
        }
    }
}

/// Request body for `POST /api/auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Successful register/login payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Payload for `GET /api/auth/me`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// A single failed field check
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` output into an ordered list of violations
pub fn collect_violations(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| {
            let field_errors: &[validator::ValidationError] = match kind {
                validator::ValidationErrorsKind::Field(errs) => errs.as_slice(),
                _ => &[],
            };
            field_errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldViolation::new(*field, message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
