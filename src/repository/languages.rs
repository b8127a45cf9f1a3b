//! Languages repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::Language,
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(languages)
    }

    /// Look a language up by name, ignoring case
    pub async fn get_by_name(&self, name: &str) -> AppResult<Language> {
        sqlx::query_as::<_, Language>(
            "SELECT id, name FROM languages WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Language '{}' not found", name)))
    }
}
