//! Catalog browsing and maintenance service

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{display_genre, BookDetails, BookShort, ListQuery},
        book_instance::{BookInstance, LoanStatus},
        genre::{Genre, GenreDetails},
        language::{Language, LanguageDetails},
        user::UserClaims,
    },
    repository::Repository,
};

/// Genre-name fragment that classifies a book as fiction
pub const FICTION_MARKER: &str = "fiction";

/// Home-page record counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    /// Books with at least one genre whose name contains "fiction"
    pub num_fiction: i64,
    /// All other books
    pub num_nonfiction: i64,
}

impl CatalogCounts {
    pub fn new(
        num_books: i64,
        num_instances: i64,
        num_instances_available: i64,
        num_authors: i64,
        num_fiction: i64,
    ) -> Self {
        Self {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_fiction,
            num_nonfiction: nonfiction_count(num_books, num_fiction),
        }
    }
}

/// Books not counted as fiction; never negative
pub fn nonfiction_count(total_books: i64, fiction_books: i64) -> i64 {
    (total_books - fiction_books).max(0)
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Counts shown on the home page
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.instances.count().await?;
        let num_instances_available = self
            .repository
            .instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;
        let num_fiction = self
            .repository
            .books
            .count_with_genre_containing(FICTION_MARKER)
            .await?;

        Ok(CatalogCounts::new(
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_fiction,
        ))
    }

    pub async fn list_books(&self, query: &ListQuery) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(query).await
    }

    /// Book with its author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.books.genres(id).await?;
        let instances = self.repository.instances.list_for_book(id).await?;

        Ok(BookDetails {
            display_genre: display_genre(&genres),
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn list_authors(&self, query: &ListQuery) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(query).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, claims: &UserClaims, author: CreateAuthor) -> AppResult<Author> {
        claims.require_edit_catalog()?;
        author.validate()?;

        let created = self.repository.authors.create(&author).await?;
        tracing::info!(author_id = created.id, user_id = claims.user_id, "author created");
        Ok(created)
    }

    pub async fn update_author(
        &self,
        claims: &UserClaims,
        id: i32,
        author: UpdateAuthor,
    ) -> AppResult<Author> {
        claims.require_edit_catalog()?;
        author.validate()?;

        self.repository.authors.update(id, &author).await
    }

    /// Delete an author, leaving their books without one
    pub async fn delete_author(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_edit_catalog()?;

        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, user_id = claims.user_id, "author deleted");
        Ok(())
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<GenreDetails> {
        let genre = self.repository.genres.get_by_id(id).await?;
        let books = self.repository.books.list_by_genre(id).await?;
        Ok(GenreDetails { genre, books })
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, name: &str) -> AppResult<LanguageDetails> {
        let language = self.repository.languages.get_by_name(name).await?;
        let instances = self.repository.instances.list_for_language(language.id).await?;
        Ok(LanguageDetails { language, instances })
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }
}
