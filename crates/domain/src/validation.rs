// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field and temporal validation rules.
//!
//! These functions are pure and deterministic for a given `now`; callers pass
//! the evaluation instant explicitly so the rules stay testable.

use crate::error::DomainError;
use time::{Duration, OffsetDateTime};

/// Minimum grade level in the catalog.
pub const MIN_GRADE_LEVEL: u8 = 1;
/// Maximum grade level in the catalog.
pub const MAX_GRADE_LEVEL: u8 = 12;

/// Minimum length of a grade name, in characters.
pub const MIN_NAME_LENGTH: usize = 2;
/// Maximum length of a grade name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;
/// Minimum length of a grade description when one is provided.
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
/// Maximum length of a grade description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// How far into the future an enrollment boundary date may lie.
///
/// One day of slack tolerates clock skew and same-day backdating across
/// timezones.
pub const MAX_START_FUTURE_DAYS: i64 = 1;
/// How far into the past an enrollment start date may lie, in years.
pub const MAX_START_PAST_YEARS: i32 = 10;

/// Returns the latest instant an enrollment boundary date may take.
fn future_bound(now: OffsetDateTime) -> OffsetDateTime {
    now + Duration::days(MAX_START_FUTURE_DAYS)
}

/// Returns the earliest instant an enrollment start date may take.
///
/// Calendar subtraction: the bound keeps the month and day of `now`. A
/// Feb 29 `now` whose target year is not a leap year clamps to Feb 28.
fn past_bound(now: OffsetDateTime) -> OffsetDateTime {
    let year: i32 = now.year() - MAX_START_PAST_YEARS;
    now.replace_year(year).unwrap_or_else(|_| {
        // Day 28 exists in every month of every year.
        now.replace_day(28)
            .and_then(|clamped| clamped.replace_year(year))
            .unwrap_or(now)
    })
}

/// Validates that an enrollment start date lies within the allowed window.
///
/// The window is `[now - 10 years, now + 1 day]`.
///
/// # Errors
///
/// Returns `DomainError::StartDateTooFarInFuture` or
/// `DomainError::StartDateTooFarInPast` if the date is outside the window.
pub fn validate_start_date(
    start_date: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if start_date > future_bound(now) {
        return Err(DomainError::StartDateTooFarInFuture(start_date));
    }
    if start_date < past_bound(now) {
        return Err(DomainError::StartDateTooFarInPast(start_date));
    }
    Ok(())
}

/// Validates that an enrollment end date does not lie in the future.
///
/// The same one-day skew tolerance as for start dates applies.
///
/// # Errors
///
/// Returns `DomainError::EndDateInFuture` if the date is past `now + 1 day`.
pub fn validate_end_date(end_date: OffsetDateTime, now: OffsetDateTime) -> Result<(), DomainError> {
    if end_date > future_bound(now) {
        return Err(DomainError::EndDateInFuture(end_date));
    }
    Ok(())
}

/// Validates a date used by point-in-time queries.
///
/// # Errors
///
/// Returns `DomainError::QueryDateInFuture` if the date is after `now`.
pub fn validate_query_date(date: OffsetDateTime, now: OffsetDateTime) -> Result<(), DomainError> {
    if date > now {
        return Err(DomainError::QueryDateInFuture(date));
    }
    Ok(())
}

/// Validates a date range used by range queries.
///
/// The range start must not follow the end, and must not lie beyond the
/// one-day future bound.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` for an inverted range and
/// `DomainError::StartDateTooFarInFuture` for a range starting in the future.
pub fn validate_date_range(
    start_date: OffsetDateTime,
    end_date: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if start_date > end_date {
        return Err(DomainError::InvalidDateRange {
            start_date,
            end_date,
        });
    }
    if start_date > future_bound(now) {
        return Err(DomainError::StartDateTooFarInFuture(start_date));
    }
    Ok(())
}

/// Validates a grade name.
///
/// The name is checked after trimming.
///
/// # Errors
///
/// Returns `DomainError::InvalidGradeName` if the name is blank or its
/// length is outside 2-100 characters.
pub fn validate_grade_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidGradeName(String::from(
            "Grade name cannot be blank",
        )));
    }
    let len: usize = trimmed.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(DomainError::InvalidGradeName(format!(
            "Grade name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates an optional grade description.
///
/// # Errors
///
/// Returns `DomainError::InvalidGradeDescription` if a description is
/// provided but blank, or its length is outside 10-500 characters.
pub fn validate_grade_description(description: Option<&str>) -> Result<(), DomainError> {
    let Some(description) = description else {
        return Ok(());
    };
    let trimmed: &str = description.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidGradeDescription(String::from(
            "Description cannot be blank if provided",
        )));
    }
    let len: usize = trimmed.chars().count();
    if !(MIN_DESCRIPTION_LENGTH..=MAX_DESCRIPTION_LENGTH).contains(&len) {
        return Err(DomainError::InvalidGradeDescription(format!(
            "Description must be between {MIN_DESCRIPTION_LENGTH} and {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}
