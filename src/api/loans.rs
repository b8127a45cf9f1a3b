//! Loan listing endpoints

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{error::AppResult, models::book_instance::BookInstance};

use super::AuthenticatedUser;

/// Copies on loan to the current user, soonest due first
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed copies", body = Vec<BookInstance>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    let loans = state
        .services
        .loans
        .borrowed_by(claims.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(loans))
}

/// Every copy on loan, soonest due first (librarians)
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All copies on loan", body = Vec<BookInstance>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned permission")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    let loans = state
        .services
        .loans
        .all_borrowed(&claims, Utc::now().date_naive())
        .await?;
    Ok(Json(loans))
}
