//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookShort, ListQuery},
        genre::Genre,
    },
};

use super::contains_pattern;

const BOOK_SHORT_SELECT: &str = r#"
    SELECT b.id, b.title,
           CASE WHEN a.id IS NULL THEN NULL
                ELSE a.last_name || ', ' || a.first_name END AS author
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count distinct books carrying at least one genre whose name contains
    /// `needle` (case-insensitive)
    pub async fn count_with_genre_containing(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT bg.book_id)
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE g.name ILIKE $1
            "#,
        )
        .bind(contains_pattern(needle))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// List books ordered by title, with total count
    pub async fn list(&self, query: &ListQuery) -> AppResult<(Vec<BookShort>, i64)> {
        let total = self.count().await?;

        let sql = format!("{} ORDER BY b.title, b.id LIMIT $1 OFFSET $2", BOOK_SHORT_SELECT);
        let books = sqlx::query_as::<_, BookShort>(&sql)
            .bind(query.per_page())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Genres of a book, by name
    pub async fn genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// Books written by an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let sql = format!("{} WHERE b.author_id = $1 ORDER BY b.title, b.id", BOOK_SHORT_SELECT);
        let books = sqlx::query_as::<_, BookShort>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Books filed under a genre
    pub async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookShort>> {
        let sql = format!(
            "{} JOIN book_genres bg ON bg.book_id = b.id WHERE bg.genre_id = $1 ORDER BY b.title, b.id",
            BOOK_SHORT_SELECT
        );
        let books = sqlx::query_as::<_, BookShort>(&sql)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }
}
