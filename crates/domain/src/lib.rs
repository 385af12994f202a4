// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod enrollment;
mod error;
mod grade;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use enrollment::Enrollment;
pub use error::DomainError;
pub use grade::Grade;
pub use types::{GradeId, GradeLevel, StudentId};
pub use validation::{
    MAX_DESCRIPTION_LENGTH, MAX_GRADE_LEVEL, MAX_NAME_LENGTH, MAX_START_FUTURE_DAYS,
    MAX_START_PAST_YEARS, MIN_DESCRIPTION_LENGTH, MIN_GRADE_LEVEL, MIN_NAME_LENGTH,
    validate_date_range, validate_end_date, validate_grade_description, validate_grade_name,
    validate_query_date, validate_start_date,
};
