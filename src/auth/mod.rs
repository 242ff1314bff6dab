//!
//! # Authentication & Authorization
//!
//! Everything credential-shaped lives here: password hashing, token
//! issuance/verification, the auth service orchestrating registration, login,
//! and refresh, the bearer middleware + extractor for protected routes, and
//! the task ownership check.

pub mod extractors;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod service;
pub mod token;

use lazy_static::lazy_static;
use serde::Deserialize;
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use ownership::{authorize, ensure_owner, Access};
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenKind, TokenManager, TokenPair};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Payload for registering a new identity.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username: 3-50 characters, alphanumeric plus underscores and
    /// hyphens.
    #[validate(
        length(min = 3, max = 50),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
    /// Plaintext password, 8-100 characters. Hashed immediately; never
    /// stored or logged.
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

/// Payload for a login request. The password is not length-checked here:
/// any wrong password should fail as `InvalidCredentials`, not as a
/// validation error that hints at the rules.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Payload for a refresh-token exchange.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
