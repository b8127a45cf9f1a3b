//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, LoanStatus},
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.language_id, bi.imprint, bi.due_back, bi.status,
           bi.borrower_id, b.title AS book_title, l.name AS language
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
    LEFT JOIN languages l ON l.id = bi.language_id
"#;

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies in a given status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let sql = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        sqlx::query_as::<_, BookInstance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Copies of a book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let sql = format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Copies printed in a language
    pub async fn list_for_language(&self, language_id: i32) -> AppResult<Vec<BookInstance>> {
        let sql = format!(
            "{} WHERE bi.language_id = $1 ORDER BY bi.due_back NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(language_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn list_on_loan_to(&self, borrower_id: i32) -> AppResult<Vec<BookInstance>> {
        let sql = format!(
            "{} WHERE bi.borrower_id = $1 AND bi.status = $2 ORDER BY bi.due_back ASC NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(borrower_id)
            .bind(LoanStatus::OnLoan)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every copy on loan, soonest due first
    pub async fn list_on_loan(&self) -> AppResult<Vec<BookInstance>> {
        let sql = format!(
            "{} WHERE bi.status = $1 ORDER BY bi.due_back ASC NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(LoanStatus::OnLoan)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Move the due date of a copy that is on loan
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let result = sqlx::query(
            "UPDATE book_instances SET due_back = $1 WHERE id = $2 AND status = $3",
        )
        .bind(due_back)
        .bind(id)
        .bind(LoanStatus::OnLoan)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Tell a missing copy apart from one that is not on loan
            return match self.get_by_id(id).await?.require_on_loan() {
                Ok(()) => Err(AppError::Conflict(format!("Book instance {} changed during renewal", id))),
                Err(e) => Err(e),
            };
        }

        self.get_by_id(id).await
    }
}
