//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::user::{User, UserPermissions},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user, or refresh the password and permissions of an existing one
    pub async fn upsert(
        &self,
        username: &str,
        password_hash: &str,
        permissions: UserPermissions,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, can_mark_returned, can_edit_catalog)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                can_mark_returned = EXCLUDED.can_mark_returned,
                can_edit_catalog = EXCLUDED.can_edit_catalog
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(permissions.can_mark_returned)
        .bind(permissions.can_edit_catalog)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
