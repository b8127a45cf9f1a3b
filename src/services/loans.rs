//! Loan listings and renewals

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{book_instance::BookInstance, user::UserClaims},
    repository::Repository,
};

use super::renewal::{default_renewal_date, validate_renewal_date};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies currently on loan to `borrower_id`, soonest due first
    pub async fn borrowed_by(&self, borrower_id: i32, today: NaiveDate) -> AppResult<Vec<BookInstance>> {
        let loans = self.repository.instances.list_on_loan_to(borrower_id).await?;
        Ok(flag_overdue(loans, today))
    }

    /// Every copy on loan; requires `can_mark_returned`
    pub async fn all_borrowed(&self, claims: &UserClaims, today: NaiveDate) -> AppResult<Vec<BookInstance>> {
        claims.require_mark_returned()?;
        let loans = self.repository.instances.list_on_loan().await?;
        Ok(flag_overdue(loans, today))
    }

    /// Copy to renew together with the suggested new due date
    pub async fn renewal_form(
        &self,
        claims: &UserClaims,
        instance_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<(BookInstance, NaiveDate)> {
        claims.require_mark_returned()?;
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        instance.require_on_loan()?;
        Ok((instance, default_renewal_date(today)))
    }

    /// Move the due date of a copy after validating it against `today`
    pub async fn renew(
        &self,
        claims: &UserClaims,
        instance_id: Uuid,
        renewal_date: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<BookInstance> {
        claims.require_mark_returned()?;
        let due_back = validate_renewal_date(renewal_date, today)?;

        let instance = self.repository.instances.set_due_back(instance_id, due_back).await?;
        tracing::info!(
            instance_id = %instance_id,
            due_back = %due_back,
            user_id = claims.user_id,
            "loan renewed"
        );
        Ok(instance)
    }
}

fn flag_overdue(loans: Vec<BookInstance>, today: NaiveDate) -> Vec<BookInstance> {
    loans.into_iter().map(|copy| copy.with_overdue(today)).collect()
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::{
        error::AppError,
        models::{book_instance::LoanStatus, user::UserPermissions},
    };

    fn claims(user_id: i32, can_mark_returned: bool) -> UserClaims {
        UserClaims {
            sub: format!("user{}", user_id),
            user_id,
            permissions: UserPermissions { can_mark_returned, can_edit_catalog: false },
            exp: 0,
            iat: 0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(pool: &PgPool) -> (i32, Uuid, Uuid) {
        let reader: i32 =
            sqlx::query_scalar("INSERT INTO users (username, password_hash) VALUES ('reader', 'x') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        let on_loan = Uuid::new_v4();
        let available = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, status, borrower_id, due_back) VALUES
                ($1, $2, $3, $4),
                ($5, $6, NULL, NULL)
            "#,
        )
        .bind(on_loan)
        .bind(LoanStatus::OnLoan)
        .bind(reader)
        .bind(date(2024, 3, 1))
        .bind(available)
        .bind(LoanStatus::Available)
        .execute(pool)
        .await
        .unwrap();
        (reader, on_loan, available)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn all_borrowed_checks_permission_first(pool: PgPool) {
        let (reader, _, _) = seed(&pool).await;
        let loans = LoansService::new(Repository::new(pool));
        let today = date(2024, 3, 10);

        assert!(matches!(
            loans.all_borrowed(&claims(reader, false), today).await,
            Err(AppError::Authorization(_))
        ));

        let all = loans.all_borrowed(&claims(reader, true), today).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].overdue);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn borrowed_by_flags_overdue_copies(pool: PgPool) {
        let (reader, on_loan, _) = seed(&pool).await;
        let loans = LoansService::new(Repository::new(pool));

        let mine = loans.borrowed_by(reader, date(2024, 2, 1)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, on_loan);
        assert!(!mine[0].overdue);

        assert!(loans.borrowed_by(reader + 1, date(2024, 2, 1)).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn renewing_a_copy_not_on_loan_is_a_conflict(pool: PgPool) {
        let (_, on_loan, available) = seed(&pool).await;
        let loans = LoansService::new(Repository::new(pool));
        let librarian = claims(99, true);
        let today = date(2024, 3, 10);

        assert!(matches!(
            loans.renew(&librarian, available, date(2024, 3, 17), today).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            loans.renewal_form(&librarian, available, today).await,
            Err(AppError::Conflict(_))
        ));

        let renewed = loans.renew(&librarian, on_loan, date(2024, 3, 17), today).await.unwrap();
        assert_eq!(renewed.due_back, Some(date(2024, 3, 17)));
    }
}
