//! Book instance endpoints, including librarian renewal

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, models::book_instance::BookInstance};

use super::AuthenticatedUser;

const RENEWAL_HELP: &str = "Enter a date between now and 4 weeks (default 3).";

/// Renewal request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewRequest {
    /// New due date (YYYY-MM-DD)
    pub renewal_date: NaiveDate,
}

/// Renewal form defaults
#[derive(Serialize, ToSchema)]
pub struct RenewalFormResponse {
    pub instance: BookInstance,
    /// Suggested due date
    pub renewal_date: NaiveDate,
    pub help_text: String,
}

/// Get a copy by ID
#[utoipa::path(
    get,
    path = "/instances/{id}",
    tag = "catalog",
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Book instance", body = BookInstance),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn get_instance(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    Ok(Json(state.services.catalog.get_instance(id).await?))
}

/// Suggested renewal date for a copy
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Renewal defaults", body = RenewalFormResponse),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Book instance not found"),
        (status = 409, description = "Book instance is not on loan")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalFormResponse>> {
    let today = Utc::now().date_naive();
    let (instance, renewal_date) = state.services.loans.renewal_form(&claims, id, today).await?;

    Ok(Json(RenewalFormResponse {
        instance,
        renewal_date,
        help_text: RENEWAL_HELP.to_string(),
    }))
}

/// Renew the loan of a copy
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Loan renewed", body = BookInstance),
        (status = 400, description = "Date in the past or more than 4 weeks ahead"),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Book instance not found"),
        (status = 409, description = "Book instance is not on loan")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Json<BookInstance>> {
    let today = Utc::now().date_naive();
    let instance = state
        .services
        .loans
        .renew(&claims, id, request.renewal_date, today)
        .await?;
    Ok(Json(instance))
}
