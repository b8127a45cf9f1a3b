//! Genre endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::genre::{Genre, GenreDetails},
};

/// List genres by name
#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    responses(
        (status = 200, description = "List of genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.services.catalog.list_genres().await?))
}

/// Get a genre with its books
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details", body = GenreDetails),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreDetails>> {
    Ok(Json(state.services.catalog.get_genre(id).await?))
}
