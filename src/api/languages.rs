//! Language endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::language::{Language, LanguageDetails},
};

/// List languages by name
#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    responses(
        (status = 200, description = "List of languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Language>>> {
    Ok(Json(state.services.catalog.list_languages().await?))
}

/// Get a language and the copies printed in it
#[utoipa::path(
    get,
    path = "/languages/{name}",
    tag = "catalog",
    params(
        ("name" = String, Path, description = "Language name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Language details", body = LanguageDetails),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<LanguageDetails>> {
    Ok(Json(state.services.catalog.get_language(&name).await?))
}
