//! User model, permissions and JWT claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Library user (borrower or staff)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub can_mark_returned: bool,
    pub can_edit_catalog: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn permissions(&self) -> UserPermissions {
        UserPermissions {
            can_mark_returned: self.can_mark_returned,
            can_edit_catalog: self.can_edit_catalog,
        }
    }
}

/// Capabilities granted to a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPermissions {
    /// May see every loan and renew or return copies
    pub can_mark_returned: bool,
    /// May create, update and delete catalog records
    pub can_edit_catalog: bool,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: UserPermissions,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims for a user, valid for `expiration_hours`
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            permissions: user.permissions(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiration_hours as i64)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks
    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        if self.permissions.can_mark_returned {
            Ok(())
        } else {
            Err(AppError::Authorization("Permission 'can_mark_returned' required".to_string()))
        }
    }

    pub fn require_edit_catalog(&self) -> Result<(), AppError> {
        if self.permissions.can_edit_catalog {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to edit the catalog".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(can_mark_returned: bool) -> User {
        User {
            id: 7,
            username: "librarian".into(),
            password_hash: String::new(),
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            can_mark_returned,
            can_edit_catalog: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_keeps_permissions() {
        let claims = UserClaims::for_user(&user(true), 1);
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.sub, "librarian");
        assert!(decoded.permissions.can_mark_returned);
        assert!(!decoded.permissions.can_edit_catalog);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = UserClaims::for_user(&user(false), 1).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn capability_checks() {
        let staff = UserClaims::for_user(&user(true), 1);
        let reader = UserClaims::for_user(&user(false), 1);

        assert!(staff.require_mark_returned().is_ok());
        assert!(matches!(reader.require_mark_returned(), Err(AppError::Authorization(_))));
        assert!(matches!(staff.require_edit_catalog(), Err(AppError::Authorization(_))));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user(false)).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
