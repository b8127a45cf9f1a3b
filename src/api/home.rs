//! Home page endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::catalog::CatalogCounts};

use super::session_from_cookies;

#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    /// Home-page visits in this session, including this one
    pub num_visits: i64,
}

/// Library summary counts and the session visit counter
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = HomeResponse)
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeResponse>)> {
    let (jar, session_id) = session_from_cookies(jar, &state.config.session);

    let counts = state.services.catalog.counts().await?;
    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    Ok((jar, Json(HomeResponse { counts, num_visits })))
}
