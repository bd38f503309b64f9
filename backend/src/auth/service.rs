//! Core business logic for the authentication system.

use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::config::AuthConfig;
use crate::database::models::CreateUser;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::TokenIssuer;
use crate::utils::password;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service orchestrating registration and login.
///
/// Stateless per call: all durable state lives in the user repository, and
/// the signing material comes from the explicit [`AuthConfig`] handed in at
/// construction.
pub struct AuthService<'a> {
    repo: UserRepository<'a>,
    token_issuer: TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance over the shared pool.
    pub fn new(pool: &'a SqlitePool, config: &AuthConfig) -> Self {
        AuthService {
            repo: UserRepository::new(pool),
            token_issuer: TokenIssuer::new(config),
        }
    }

    /// Registers a new user and returns the success message.
    ///
    /// The email is stored lowercased and the password only ever as a
    /// bcrypt hash. Exactly one record is created on success, none on any
    /// failure path.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<String> {
        request.validate().map_err(ServiceError::validation)?;

        let email = request.email.to_lowercase();

        if self.repo.email_exists(&email).await? {
            return Err(ServiceError::conflict("User already registered"));
        }

        let password_hash = password::hash(&request.password)?;

        let data = CreateUser {
            name: request.name,
            email,
            password_hash,
        };

        match self.repo.create_user(data).await {
            Ok(_) => Ok("Account created successfully".to_string()),
            // A concurrent registration can slip past the pre-check; the
            // UNIQUE constraint on email settles the race.
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::conflict("User already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticates a user and returns a fresh signed session token.
    ///
    /// Read-only with respect to the store.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<String> {
        request.validate().map_err(ServiceError::validation)?;

        let email = request.email.to_lowercase();

        let user = self
            .repo
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let is_match = password::verify(&request.password, &user.password_hash)?;

        if !is_match {
            return Err(ServiceError::invalid_credentials("Invalid password"));
        }

        self.token_issuer.issue(user.id, &email)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenIssuer;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_signing_key: "test-signing-key".to_string(),
            token_expiry_hours: 3600,
        }
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_lowercased_email_and_hashed_password() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let message = service
            .register(register_request("Alice", "Alice@Test.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(message, "Account created successfully");

        let repo = UserRepository::new(&pool);
        let user = repo
            .get_user_by_email("alice@test.com")
            .await
            .unwrap()
            .expect("user should be stored under the lowercased email");

        assert_eq!(user.name, "Alice");
        assert_ne!(user.password_hash, "secret1");
        assert!(password::verify("secret1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("Alice", "Alice@Test.com", "secret1"))
            .await
            .unwrap();

        let err = service
            .register(register_request("Alice Again", "alice@test.com", "secret2"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict { .. }));
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn register_reports_every_invalid_field() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let err = service
            .register(register_request("", "bad", "123"))
            .await
            .unwrap_err();

        let ServiceError::Validation { details, .. } = err else {
            panic!("expected a validation error, got {err:?}");
        };

        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));

        let repo = UserRepository::new(&pool);
        assert!(!repo.email_exists("bad").await.unwrap());
    }

    #[tokio::test]
    async fn login_issues_token_bound_to_the_stored_identity() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("Alice", "Alice@Test.com", "secret1"))
            .await
            .unwrap();

        let token = service
            .login(login_request("alice@test.com", "secret1"))
            .await
            .unwrap();
        assert!(!token.is_empty());

        let repo = UserRepository::new(&pool);
        let user = repo
            .get_user_by_email("alice@test.com")
            .await
            .unwrap()
            .unwrap();

        let claims = TokenIssuer::new(&config).decode(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "alice@test.com");
    }

    #[tokio::test]
    async fn login_normalizes_the_email_before_lookup() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("Alice", "alice@test.com", "secret1"))
            .await
            .unwrap();

        let token = service
            .login(login_request("ALICE@Test.Com", "secret1"))
            .await
            .unwrap();

        let claims = TokenIssuer::new(&config).decode(&token).unwrap();
        assert_eq!(claims.email, "alice@test.com");
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails_without_mutating_the_store() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("Alice", "alice@test.com", "secret1"))
            .await
            .unwrap();

        let repo = UserRepository::new(&pool);
        let before = repo
            .get_user_by_email("alice@test.com")
            .await
            .unwrap()
            .unwrap();

        let err = service
            .login(login_request("alice@test.com", "wrong12"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidCredentials { .. }));
        assert_eq!(err.to_string(), "Invalid password");

        let after = repo
            .get_user_by_email("alice@test.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.password_hash, after.password_hash);
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_not_found() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let err = service
            .login(login_request("nobody@test.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn repeated_logins_each_yield_a_valid_token() {
        let pool = setup_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("Alice", "alice@test.com", "secret1"))
            .await
            .unwrap();

        let first = service
            .login(login_request("alice@test.com", "secret1"))
            .await
            .unwrap();
        let second = service
            .login(login_request("alice@test.com", "secret1"))
            .await
            .unwrap();

        let issuer = TokenIssuer::new(&config);
        assert!(issuer.decode(&first).is_ok());
        assert!(issuer.decode(&second).is_ok());
    }
}
