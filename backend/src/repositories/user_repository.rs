//! Database repository for user management operations.
//!
//! Provides CRUD operations for user identity records. The `email` column
//! carries a UNIQUE constraint, so a concurrent duplicate insert fails at
//! the store instead of racing a separate existence check.

use crate::database::models::{CreateUser, User};
use sqlx::SqlitePool;

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity. "Not found" is
/// reported as `None`, distinct from a query failure.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing user details
    ///
    /// # Returns
    /// The newly created User with all fields populated, including the
    /// store-assigned id and timestamps. A duplicate email surfaces as a
    /// unique-constraint database error.
    pub async fn create_user(&self, user: CreateUser) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?, ?, ?)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(self.pool)
        .await
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_id(&self, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    /// Retrieves a user by their email.
    ///
    /// # Arguments
    /// * `email` - Email to search for, expected lowercased
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
    }

    /// Checks if an email already exists in the system.
    ///
    /// # Returns
    /// `true` if a user with this email exists
    pub async fn email_exists(&self, email: &str) -> sqlx::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Updates an existing user's mutable fields and bumps `updated_at`.
    ///
    /// # Returns
    /// The updated User as stored
    pub async fn update_user(&self, user: &User) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = ?, email = ?, password_hash = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.id)
        .fetch_one(self.pool)
        .await
    }

    /// Deletes a user by id.
    ///
    /// # Errors
    /// Returns `sqlx::Error::RowNotFound` when no user has the given id.
    pub async fn delete_user(&self, id: i64) -> sqlx::Result<()> {
        let user = self
            .get_user_by_id(id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tracing::info!(user_id = user.id, "deleting user");

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user.id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
