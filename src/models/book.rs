//! Book model (a title, not a specific copy)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{author::Author, book_instance::BookInstance, genre::Genre};

/// Number of genres shown in the condensed genre label
const DISPLAY_GENRE_LIMIT: usize = 3;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Nulled when the author is deleted
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    /// "Last, First" of the author, if any
    pub author: Option<String>,
}

/// Book with author, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub display_genre: String,
    pub instances: Vec<BookInstance>,
}

/// Pagination parameters for list endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 20)
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    /// Row offset of the requested page, saturating on huge page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Comma-separated names of the first few genres
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(DISPLAY_GENRE_LIMIT)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(id: i32, name: &str) -> Genre {
        Genre { id, name: name.to_string() }
    }

    #[test]
    fn display_genre_keeps_first_three() {
        let genres = vec![
            genre(1, "Fantasy"),
            genre(2, "Science Fiction"),
            genre(3, "Western"),
            genre(4, "Poetry"),
        ];
        assert_eq!(display_genre(&genres), "Fantasy, Science Fiction, Western");
        assert_eq!(display_genre(&genres[..1]), "Fantasy");
        assert_eq!(display_genre(&[]), "");
    }

    #[test]
    fn list_query_defaults_and_clamps() {
        let q = ListQuery::default();
        assert_eq!((q.page(), q.per_page(), q.offset()), (1, 20, 0));

        let q = ListQuery { page: Some(3), per_page: Some(10) };
        assert_eq!(q.offset(), 20);

        let q = ListQuery { page: Some(0), per_page: Some(1000) };
        assert_eq!((q.page(), q.per_page()), (1, 100));

        let q = ListQuery { page: Some(i64::MAX), per_page: Some(20) };
        assert_eq!(q.offset(), i64::MAX);

        let q = ListQuery { page: Some(i64::MIN), per_page: Some(i64::MAX) };
        assert_eq!((q.page(), q.offset()), (1, 0));
    }
}
