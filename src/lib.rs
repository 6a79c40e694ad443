//! credential-gate library
//!
//! Email/password registration and login over a pluggable credential store,
//! with stateless JWT session tokens.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use routes::build_router;
pub use state::AppState;
