//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims, UserPermissions},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a user by username and password and issue a JWT
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, UserClaims)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user, password)? {
            tracing::info!(username, "rejected login");
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let claims = UserClaims::for_user(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok((token, claims))
    }

    /// Create or reset an account
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        permissions: UserPermissions,
    ) -> AppResult<User> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be empty".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self.repository.users.upsert(username, &password_hash, permissions).await?;
        tracing::info!(user_id = user.id, username, "user account saved");
        Ok(user)
    }
}

/// Verify user password against the stored argon2 hash
fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
