//! Password hashing and verification.
//!
//! Wraps bcrypt with the service error type. A non-matching password is a
//! business outcome (`Ok(false)`), not an error; only a malformed stored
//! hash or a failure of the primitive itself is surfaced as an error.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::DEFAULT_COST;

/// Hashes a plaintext password with a per-call salt at the default cost.
pub fn hash(password: &str) -> ServiceResult<String> {
    bcrypt::hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::internal(format!("password hashing failed: {e}")))
}

/// Verifies a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` when the password simply does not match. Errors only
/// when the stored hash is malformed or verification itself fails.
pub fn verify(password: &str, hashed: &str) -> ServiceResult<bool> {
    bcrypt::verify(password, hashed)
        .map_err(|e| ServiceError::internal(format!("password verification failed: {e}")))
}
