//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book_instance::BookInstance;

/// Language a book instance is printed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Language with the copies printed in it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LanguageDetails {
    #[serde(flatten)]
    pub language: Language,
    pub instances: Vec<BookInstance>,
}
