//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookShort;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Date of death ("Died")
    pub date_of_death: Option<NaiveDate>,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author with the books they wrote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<BookShort>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Update author request
///
/// Absent fields are left unchanged. Dates can be cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub date_of_death: Option<Option<NaiveDate>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_last_name_first() {
        let author = Author {
            id: 1,
            first_name: "Ursula".into(),
            last_name: "Le Guin".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1929, 10, 21),
            date_of_death: NaiveDate::from_ymd_opt(2018, 1, 22),
        };
        assert_eq!(author.to_string(), "Le Guin, Ursula");
    }

    #[test]
    fn create_rejects_empty_and_overlong_names() {
        let empty = CreateAuthor {
            first_name: String::new(),
            last_name: "Herbert".into(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert!(empty.validate().is_err());

        let long = CreateAuthor {
            first_name: "Frank".into(),
            last_name: "x".repeat(101),
            date_of_birth: None,
            date_of_death: None,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn update_allows_partial_payloads() {
        let update: UpdateAuthor = serde_json::from_str(r#"{"last_name": "Herbert"}"#).unwrap();
        assert!(update.validate().is_ok());
        assert!(update.first_name.is_none());
        assert_eq!(update.date_of_birth, None);
    }

    #[test]
    fn update_distinguishes_null_dates_from_absent_ones() {
        let update: UpdateAuthor =
            serde_json::from_str(r#"{"date_of_death": null, "date_of_birth": "1920-10-08"}"#).unwrap();
        assert_eq!(update.date_of_death, Some(None));
        assert_eq!(update.date_of_birth, Some(NaiveDate::from_ymd_opt(1920, 10, 8)));
    }
}
