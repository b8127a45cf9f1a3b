//! API handlers for the catalog REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod instances;
pub mod languages;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::SessionConfig, error::AppError, models::user::UserClaims,
    services::sessions::SessionsService, AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

/// Session id from the session cookie, issuing a new cookie when absent
pub fn session_from_cookies(jar: CookieJar, config: &SessionConfig) -> (CookieJar, String) {
    if let Some(existing) = jar.get(&config.cookie_name) {
        if !existing.value().is_empty() {
            let id = existing.value().to_string();
            return (jar, id);
        }
    }

    let id = SessionsService::new_session_id();
    let cookie = Cookie::build((config.cookie_name.clone(), id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_existing_session_cookie() {
        let config = SessionConfig::default();
        let jar = CookieJar::new().add(Cookie::new("sessionid", "abc"));

        let (jar, id) = session_from_cookies(jar, &config);
        assert_eq!(id, "abc");
        assert_eq!(jar.get("sessionid").map(|c| c.value().to_string()), Some("abc".to_string()));
    }

    #[test]
    fn issues_cookie_when_missing() {
        let config = SessionConfig::default();

        let (jar, id) = session_from_cookies(CookieJar::new(), &config);
        assert!(!id.is_empty());
        let cookie = jar.get("sessionid").expect("cookie should be set");
        assert_eq!(cookie.value(), id);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn empty_cookie_gets_replaced() {
        let config = SessionConfig::default();
        let jar = CookieJar::new().add(Cookie::new("sessionid", ""));

        let (_, id) = session_from_cookies(jar, &config);
        assert!(!id.is_empty());
    }
}
