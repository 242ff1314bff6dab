use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password with bcrypt. Each call draws a fresh salt, so
/// hashing the same input twice yields different strings.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(AppError::from)
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// A hash that does not parse counts as a failed match rather than an error;
/// the comparison itself is constant-time inside bcrypt.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}
