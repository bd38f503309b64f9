//! Handler functions for authentication-related API endpoints.
//!
//! These functions decode incoming HTTP requests into typed commands,
//! invoke the `auth::service` for the core business logic, and encode
//! results into the wire-level response shapes.

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::service::AuthService;
use crate::config::AuthConfig;
use crate::errors::ServiceError;
use axum::{
    Json,
    extract::{Extension, FromRequest, Request},
    response::Json as ResponseJson,
};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

/// JSON extractor that renders decode failures in the standard error body
/// instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(JsonBody(payload)),
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "invalid request body");
                Err(ServiceError::bad_request())
            }
        }
    }
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<AuthConfig>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<ResponseJson<RegisterResponse>, ServiceError> {
    let auth_service = AuthService::new(&pool, &config);

    let response = auth_service.register(payload).await?;

    Ok(ResponseJson(RegisterResponse { response }))
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<AuthConfig>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, ServiceError> {
    let auth_service = AuthService::new(&pool, &config);

    let token = auth_service.login(payload).await?;

    Ok(ResponseJson(LoginResponse { token }))
}
