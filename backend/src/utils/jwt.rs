//! JWT token utilities for authentication.
//!
//! Provides signed token creation and claims management for user sessions.
//! Tokens are HS256-signed with the configured secret and carry the user's
//! id, email and expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::ServiceError;

/// Claims embedded in an issued session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id as assigned by the store
    pub id: i64,
    /// Normalized (lowercased) email
    pub email: String,
    /// Expiration timestamp (seconds since epoch)
    pub exp: usize,
}

/// Creates and verifies signed session tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_hours: i64,
}

impl TokenIssuer {
    /// Builds an issuer from the explicit auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_signing_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_signing_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // The claims set has no `aud`; leave audience validation off.
        validation.validate_aud = false;

        TokenIssuer {
            encoding_key,
            decoding_key,
            validation,
            expiry_hours: config.token_expiry_hours,
        }
    }

    /// Issues a fresh signed token for the given identity.
    ///
    /// The configured lifetime is applied in hours.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, ServiceError> {
        let exp = Utc::now() + Duration::hours(self.expiry_hours);

        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            exp: exp.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal(format!("token signing failed: {e}")))
    }

    /// Validates a token's signature and expiry and returns its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::invalid_credentials(format!("token validation failed: {e}")))
    }
}
