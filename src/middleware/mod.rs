//! Middleware for credential-gate
//!
//! Request logging, security headers, error redaction and bearer-token
//! authentication.

pub mod auth;
mod errors;
mod request_log;
mod security;

pub use auth::AuthenticatedUser;
pub use errors::{panic_response, redact_server_errors};
pub use request_log::request_logging;
pub use security::{hsts_header, security_headers};
