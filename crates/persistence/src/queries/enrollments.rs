// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment queries.
//!
//! "Currently active" means `is_active = 1 AND end_date IS NULL`. Point-in-
//! time membership is the open interval `start_date < date < end_date`
//! (unbounded when `end_date IS NULL`). Both predicates compare the stored
//! fixed-width UTC text directly.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{StudentGradeRow, format_timestamp};
use crate::diesel_schema::student_grades;
use crate::error::PersistenceError;
use gradetrack_domain::{Enrollment, GradeId, StudentId};
use time::OffsetDateTime;

fn rows_into_domain(rows: Vec<StudentGradeRow>) -> Result<Vec<Enrollment>, PersistenceError> {
    rows.into_iter().map(StudentGradeRow::into_domain).collect()
}

/// Retrieves an enrollment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the enrollment is not found.
pub fn get_enrollment_by_id(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<Option<Enrollment>, PersistenceError> {
    debug!(enrollment_id, "Looking up enrollment by ID");

    let result: Result<StudentGradeRow, diesel::result::Error> = student_grades::table
        .filter(student_grades::student_grade_id.eq(enrollment_id))
        .select(StudentGradeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all enrollments for a student, most recent start first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_enrollments_by_student_id(
    conn: &mut SqliteConnection,
    student_id: StudentId,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves all enrollments for a grade, most recent start first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_enrollments_by_grade_id(
    conn: &mut SqliteConnection,
    grade_id: GradeId,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::grade_id.eq(grade_id.value()))
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves the student's currently active enrollment, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_current_enrollment_by_student_id(
    conn: &mut SqliteConnection,
    student_id: StudentId,
) -> Result<Option<Enrollment>, PersistenceError> {
    debug!(
        student_id = student_id.value(),
        "Looking up current enrollment"
    );

    let result: Result<StudentGradeRow, diesel::result::Error> = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .select(StudentGradeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_active_enrollments_by_grade_id(
    conn: &mut SqliteConnection,
    grade_id: GradeId,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::grade_id.eq(grade_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves every currently active enrollment.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_all_active_enrollments(
    conn: &mut SqliteConnection,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves the enrollments that spanned the given instant.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_enrollments_active_on_date(
    conn: &mut SqliteConnection,
    date: OffsetDateTime,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let date_text: String = format_timestamp(date)?;

    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::start_date.lt(&date_text))
        .filter(
            student_grades::end_date
                .is_null()
                .or(student_grades::end_date.gt(&date_text)),
        )
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves a student's enrollments that overlap the given interval.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_enrollments_by_student_id_and_date_range(
    conn: &mut SqliteConnection,
    student_id: StudentId,
    start_date: OffsetDateTime,
    end_date: OffsetDateTime,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let start_text: String = format_timestamp(start_date)?;
    let end_text: String = format_timestamp(end_date)?;

    let rows: Vec<StudentGradeRow> = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .filter(student_grades::start_date.le(&end_text))
        .filter(
            student_grades::end_date
                .is_null()
                .or(student_grades::end_date.ge(&start_text)),
        )
        .order(student_grades::start_date.desc())
        .select(StudentGradeRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Returns whether the student has a currently active enrollment in the grade.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_student_enrolled_in_grade(
    conn: &mut SqliteConnection,
    student_id: StudentId,
    grade_id: GradeId,
) -> Result<bool, PersistenceError> {
    let count: i64 = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .filter(student_grades::grade_id.eq(grade_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Returns whether the student has any currently active enrollment.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_active_enrollment(
    conn: &mut SqliteConnection,
    student_id: StudentId,
) -> Result<bool, PersistenceError> {
    let count: i64 = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Counts the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_enrollments_by_grade_id(
    conn: &mut SqliteConnection,
    grade_id: GradeId,
) -> Result<i64, PersistenceError> {
    Ok(student_grades::table
        .filter(student_grades::grade_id.eq(grade_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .count()
        .get_result(conn)?)
}

/// Counts all enrollments for a student.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_enrollments_by_student_id(
    conn: &mut SqliteConnection,
    student_id: StudentId,
) -> Result<i64, PersistenceError> {
    Ok(student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .count()
        .get_result(conn)?)
}
