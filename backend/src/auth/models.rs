//! Data structures for authentication-related entities.
//!
//! Request payloads carry their own validation rules; the plaintext
//! password in them is transient and is never persisted or logged.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "cannot be blank"),
        email(message = "must be a valid email address")
    )]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "the length must be between 6 and 100"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "cannot be blank"),
        email(message = "must be a valid email address")
    )]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "the length must be between 6 and 100"))]
    pub password: String,
}

/// Registration success body
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub response: String,
}

/// Login success body containing the signed session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
