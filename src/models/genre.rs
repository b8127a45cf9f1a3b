//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookShort;

/// Book genre (e.g. Science Fiction, Poetry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Genre with the books filed under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetails {
    #[serde(flatten)]
    pub genre: Genre,
    pub books: Vec<BookShort>,
}
