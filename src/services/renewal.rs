//! Renewal date validation
//!
//! A renewal date must fall between today and four weeks from today,
//! both bounds included. Three weeks is offered as the default.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Furthest a loan can be renewed ahead of today
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Suggested renewal period
pub const DEFAULT_RENEWAL_WEEKS: i64 = 3;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalError {
    #[error("Invalid date - renewal in past")]
    PastDate,

    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

/// Check a proposed renewal date against `today`, returning it unchanged when valid.
pub fn validate_renewal_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
    if date < today {
        return Err(RenewalError::PastDate);
    }

    // No upper bound when today + 4 weeks is past the last representable date
    let latest = today.checked_add_signed(Duration::weeks(MAX_RENEWAL_WEEKS));
    if latest.is_some_and(|latest| date > latest) {
        return Err(RenewalError::TooFarAhead);
    }

    Ok(date)
}

/// Default value proposed to the librarian, clamped to the last representable date
pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_signed(Duration::weeks(DEFAULT_RENEWAL_WEEKS))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_yesterday() {
        let today = date(2024, 1, 1);
        assert_eq!(
            validate_renewal_date(date(2023, 12, 31), today),
            Err(RenewalError::PastDate)
        );
    }

    #[test]
    fn rejects_beyond_four_weeks() {
        let today = date(2024, 1, 1);
        assert_eq!(
            validate_renewal_date(date(2024, 1, 30), today),
            Err(RenewalError::TooFarAhead)
        );
    }

    #[test]
    fn accepts_within_window() {
        let today = date(2024, 1, 1);
        assert_eq!(validate_renewal_date(date(2024, 1, 15), today), Ok(date(2024, 1, 15)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let today = date(2024, 1, 1);
        assert_eq!(validate_renewal_date(today, today), Ok(today));
        assert_eq!(validate_renewal_date(date(2024, 1, 29), today), Ok(date(2024, 1, 29)));
    }

    #[test]
    fn every_day_of_the_window_is_accepted() {
        let today = date(2024, 2, 20);
        for offset in 0..=28 {
            let candidate = today + Duration::days(offset);
            assert_eq!(validate_renewal_date(candidate, today), Ok(candidate));
        }
        for offset in 1..60 {
            assert_eq!(
                validate_renewal_date(today - Duration::days(offset), today),
                Err(RenewalError::PastDate)
            );
            assert_eq!(
                validate_renewal_date(today + Duration::days(28 + offset), today),
                Err(RenewalError::TooFarAhead)
            );
        }
    }

    #[test]
    fn default_is_three_weeks_out_and_valid() {
        let today = date(2024, 1, 1);
        let suggested = default_renewal_date(today);
        assert_eq!(suggested, date(2024, 1, 22));
        assert!(validate_renewal_date(suggested, today).is_ok());
    }

    #[test]
    fn dates_near_the_calendar_end_do_not_overflow() {
        let today = NaiveDate::MAX - Duration::days(3);
        assert_eq!(validate_renewal_date(NaiveDate::MAX, today), Ok(NaiveDate::MAX));
        assert_eq!(
            validate_renewal_date(today - Duration::days(1), today),
            Err(RenewalError::PastDate)
        );
        assert_eq!(default_renewal_date(today), NaiveDate::MAX);
    }
}
