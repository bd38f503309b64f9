//! Global application error types and handlers.
//!
//! This module defines the service error taxonomy used across the backend
//! and renders every failure into the wire-level `{status, message}` shape.
//! Internal failures (hashing, signing, storage) are logged with full detail
//! server-side and reach the client only as a generic message; validation
//! and business failures carry descriptive messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

/// Generic service error covering every failure the auth workflow produces.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    InvalidCredentials { message: String },

    #[error("database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    #[error("{message}")]
    Internal { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Field-specific validation error detail.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

/// Wire-level error body: `{"status": <int>, "message": <string>}` with
/// per-field `details` merged in for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ServiceError {
    // Helper constructors for common patterns

    /// Builds a validation error from the validator crate's output,
    /// collecting one detail entry per offending field rule.
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .unwrap_or(&"Invalid value".into())
                        .to_string(),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        Self::Validation {
            message: "There is some problem with the data you submitted.".to_string(),
            details,
        }
    }

    /// A 400 for requests that could not be decoded at all.
    pub fn bad_request() -> Self {
        Self::Validation {
            message: "Your request is in a bad format.".to_string(),
            details: Vec::new(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ServiceError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, message, details)
            }
            ServiceError::Conflict { message } => (StatusCode::BAD_REQUEST, message, Vec::new()),
            ServiceError::NotFound { message } => (StatusCode::NOT_FOUND, message, Vec::new()),
            ServiceError::InvalidCredentials { message } => {
                (StatusCode::BAD_REQUEST, message, Vec::new())
            }
            ServiceError::Database {
                source: sqlx::Error::RowNotFound,
            } => (
                StatusCode::NOT_FOUND,
                "The requested resource was not found.".to_string(),
                Vec::new(),
            ),
            ServiceError::Database { source } => {
                tracing::error!(error = %source, "database error while processing request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "We encountered an error while processing your request.".to_string(),
                    Vec::new(),
                )
            }
            ServiceError::Internal { message } => {
                tracing::error!(error = %message, "internal error while processing request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "We encountered an error while processing your request.".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Outermost fault boundary: converts a panic caught while handling a
/// request into the standard 500 body, keeping the panic payload out of the
/// response. Installed via `tower_http::catch_panic::CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "recovered from panic while handling request");

    let body = ErrorResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        message: "We encountered an error while processing your request.".to_string(),
        details: Vec::new(),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conflict_maps_to_400_with_message() {
        let response = ServiceError::conflict("User already registered").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["message"], "User already registered");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = ServiceError::not_found("User not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn invalid_credentials_maps_to_400() {
        let response = ServiceError::invalid_credentials("Invalid password").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid password");
    }

    #[tokio::test]
    async fn row_not_found_translates_to_404() {
        let error = ServiceError::from(sqlx::Error::RowNotFound);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "The requested resource was not found.");
    }

    #[tokio::test]
    async fn internal_error_suppresses_detail() {
        let response = ServiceError::internal("bcrypt exploded: secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "We encountered an error while processing your request."
        );
        assert!(!body.to_string().contains("secret detail"));
    }

    #[tokio::test]
    async fn validation_carries_field_details() {
        let error = ServiceError::Validation {
            message: "There is some problem with the data you submitted.".to_string(),
            details: vec![
                FieldError {
                    field: "email".to_string(),
                    message: "must be a valid email address".to_string(),
                },
                FieldError {
                    field: "name".to_string(),
                    message: "cannot be blank".to_string(),
                },
            ],
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let details = body["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["field"], "email");
    }

    #[tokio::test]
    async fn panic_handler_returns_generic_500() {
        let response = handle_panic(Box::new("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "We encountered an error while processing your request."
        );
        assert!(!body.to_string().contains("boom"));
    }
}
