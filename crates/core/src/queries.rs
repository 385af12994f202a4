// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query helpers.
//!
//! These validate their inputs and delegate to the store; they take no
//! locks and have no side effects, so repeated calls without an
//! intervening mutation return identical results.

use crate::error::CoreError;
use crate::store::EnrollmentStore;
use gradetrack_domain::{
    Enrollment, GradeId, StudentId, validate_date_range, validate_query_date,
};
use time::OffsetDateTime;

/// Looks up an enrollment by its identifier.
///
/// # Errors
///
/// Returns `CoreError::Store` if the store fails.
pub fn get_enrollment_by_id<S: EnrollmentStore>(
    store: &S,
    enrollment_id: i64,
) -> Result<Option<Enrollment>, CoreError> {
    Ok(store.find_by_id(enrollment_id)?)
}

/// Returns all enrollments for a student.
///
/// # Errors
///
/// Returns an error for a non-positive student ID or a store failure.
pub fn get_enrollments_by_student_id<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
) -> Result<Vec<Enrollment>, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    Ok(store.find_by_student_id(student)?)
}

/// Returns all enrollments for a grade.
///
/// # Errors
///
/// Returns an error for a non-positive grade ID or a store failure.
pub fn get_enrollments_by_grade_id<S: EnrollmentStore>(
    store: &S,
    grade_id: i64,
) -> Result<Vec<Enrollment>, CoreError> {
    let grade_id: GradeId = GradeId::new(grade_id)?;
    Ok(store.find_by_grade_id(grade_id)?)
}

/// Returns the student's currently active enrollment, if any.
///
/// # Errors
///
/// Returns an error for a non-positive student ID or a store failure.
pub fn get_current_enrollment_by_student_id<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
) -> Result<Option<Enrollment>, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    Ok(store.find_current_enrollment_by_student_id(student)?)
}

/// Returns the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error for a non-positive grade ID or a store failure.
pub fn get_active_enrollments_by_grade_id<S: EnrollmentStore>(
    store: &S,
    grade_id: i64,
) -> Result<Vec<Enrollment>, CoreError> {
    let grade_id: GradeId = GradeId::new(grade_id)?;
    Ok(store.find_active_enrollments_by_grade_id(grade_id)?)
}

/// Returns every currently active enrollment.
///
/// # Errors
///
/// Returns `CoreError::Store` if the store fails.
pub fn get_all_active_enrollments<S: EnrollmentStore>(
    store: &S,
) -> Result<Vec<Enrollment>, CoreError> {
    Ok(store.find_all_active_enrollments()?)
}

/// Returns the enrollments that spanned the given instant.
///
/// # Errors
///
/// Returns an error if the date lies in the future or the store fails.
pub fn get_enrollments_active_on_date<S: EnrollmentStore>(
    store: &S,
    date: OffsetDateTime,
) -> Result<Vec<Enrollment>, CoreError> {
    validate_query_date(date, OffsetDateTime::now_utc())?;
    Ok(store.find_enrollments_active_on_date(date)?)
}

/// Returns a student's enrollments overlapping the given interval.
///
/// # Errors
///
/// Returns an error for a non-positive student ID, an inverted or
/// future-starting range, or a store failure.
pub fn get_enrollments_by_student_id_and_date_range<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
    start_date: OffsetDateTime,
    end_date: OffsetDateTime,
) -> Result<Vec<Enrollment>, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    validate_date_range(start_date, end_date, OffsetDateTime::now_utc())?;
    Ok(store.find_enrollments_by_student_id_and_date_range(student, start_date, end_date)?)
}

/// Returns whether the student is currently enrolled in the grade.
///
/// # Errors
///
/// Returns an error for non-positive IDs or a store failure.
pub fn is_student_enrolled_in_grade<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
    grade_id: i64,
) -> Result<bool, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    let grade_id: GradeId = GradeId::new(grade_id)?;
    Ok(store.is_student_enrolled_in_grade(student, grade_id)?)
}

/// Returns whether the student has any currently active enrollment.
///
/// # Errors
///
/// Returns an error for a non-positive student ID or a store failure.
pub fn has_active_enrollment<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
) -> Result<bool, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    Ok(store.has_active_enrollment(student)?)
}

/// Counts the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error for a non-positive grade ID or a store failure.
pub fn count_active_enrollments_by_grade_id<S: EnrollmentStore>(
    store: &S,
    grade_id: i64,
) -> Result<i64, CoreError> {
    let grade_id: GradeId = GradeId::new(grade_id)?;
    Ok(store.count_active_enrollments_by_grade_id(grade_id)?)
}

/// Counts all enrollments for a student.
///
/// # Errors
///
/// Returns an error for a non-positive student ID or a store failure.
pub fn count_enrollments_by_student_id<S: EnrollmentStore>(
    store: &S,
    student_id: i64,
) -> Result<i64, CoreError> {
    let student: StudentId = StudentId::new(student_id)?;
    Ok(store.count_enrollments_by_student_id(student)?)
}
