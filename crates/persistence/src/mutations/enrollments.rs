// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment mutations.
//!
//! The transfer primitive is the only multi-statement write; it runs inside
//! a database transaction so the end-then-begin pair commits as one.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::student_grades;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::last_insert_rowid;
use gradetrack_domain::{Enrollment, GradeId, StudentId};
use time::OffsetDateTime;

/// Inserts a new enrollment and returns it with its assigned ID.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn insert_enrollment(
    conn: &mut SqliteConnection,
    enrollment: &Enrollment,
) -> Result<Enrollment, PersistenceError> {
    info!(
        student_id = enrollment.student_id.value(),
        grade_id = enrollment.grade_id.value(),
        "Creating enrollment"
    );

    diesel::insert_into(student_grades::table)
        .values((
            student_grades::student_id.eq(enrollment.student_id.value()),
            student_grades::grade_id.eq(enrollment.grade_id.value()),
            student_grades::start_date.eq(format_timestamp(enrollment.start_date)?),
            student_grades::end_date
                .eq(enrollment.end_date.map(format_timestamp).transpose()?),
            student_grades::is_active.eq(i32::from(enrollment.is_active)),
            student_grades::created_at.eq(format_timestamp(enrollment.created_at)?),
            student_grades::updated_at.eq(format_timestamp(enrollment.updated_at)?),
        ))
        .execute(conn)?;

    let enrollment_id: i64 = last_insert_rowid(conn)?;
    info!(enrollment_id, "Enrollment created");

    Ok(Enrollment::with_id(
        enrollment_id,
        enrollment.student_id,
        enrollment.grade_id,
        enrollment.start_date,
        enrollment.end_date,
        enrollment.is_active,
        enrollment.created_at,
        enrollment.updated_at,
    ))
}

/// Ends the active enrollment for the (student, grade) pairing.
///
/// Sets the end date, clears the activity flag, and bumps the update
/// timestamp. Returns `Ok(None)` when no active pairing exists.
///
/// # Errors
///
/// Returns an error if the write fails or the updated row cannot be read
/// back.
pub fn end_active_enrollment(
    conn: &mut SqliteConnection,
    student_id: StudentId,
    grade_id: GradeId,
    end_date: OffsetDateTime,
) -> Result<Option<Enrollment>, PersistenceError> {
    let Some(enrollment_id) = find_active_pairing_id(conn, student_id, grade_id)? else {
        return Ok(None);
    };

    info!(
        enrollment_id,
        student_id = student_id.value(),
        grade_id = grade_id.value(),
        "Ending enrollment"
    );

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    diesel::update(student_grades::table)
        .filter(student_grades::student_grade_id.eq(enrollment_id))
        .set((
            student_grades::end_date.eq(Some(format_timestamp(end_date)?)),
            student_grades::is_active.eq(0),
            student_grades::updated_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    queries::enrollments::get_enrollment_by_id(conn, enrollment_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("enrollment {enrollment_id}")))
        .map(Some)
}

/// Atomically ends the active enrollment in `from_grade_id` and inserts
/// `replacement` as the student's new enrollment.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` when the student has no active
/// enrollment in `from_grade_id`; the transaction rolls back and nothing is
/// written. Returns another error if either write fails.
pub fn transfer_enrollment(
    conn: &mut SqliteConnection,
    from_grade_id: GradeId,
    transfer_date: OffsetDateTime,
    replacement: &Enrollment,
) -> Result<Enrollment, PersistenceError> {
    let student_id: StudentId = replacement.student_id;
    info!(
        student_id = student_id.value(),
        from_grade_id = from_grade_id.value(),
        to_grade_id = replacement.grade_id.value(),
        "Transferring enrollment"
    );

    conn.transaction(|conn| {
        let enrollment_id: i64 = find_active_pairing_id(conn, student_id, from_grade_id)?
            .ok_or_else(|| {
                PersistenceError::NotFound(format!(
                    "no active enrollment for student {} in grade {}",
                    student_id.value(),
                    from_grade_id.value()
                ))
            })?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        diesel::update(student_grades::table)
            .filter(student_grades::student_grade_id.eq(enrollment_id))
            .set((
                student_grades::end_date.eq(Some(format_timestamp(transfer_date)?)),
                student_grades::is_active.eq(0),
                student_grades::updated_at.eq(format_timestamp(now)?),
            ))
            .execute(conn)?;

        insert_enrollment(conn, replacement)
    })
}

/// Deletes an enrollment row. Returns whether a row was deleted.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn delete_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: i64,
) -> Result<bool, PersistenceError> {
    info!(enrollment_id, "Deleting enrollment");

    let affected: usize = diesel::delete(student_grades::table)
        .filter(student_grades::student_grade_id.eq(enrollment_id))
        .execute(conn)?;

    Ok(affected > 0)
}

/// Finds the row ID of the active enrollment for the pairing, if any.
fn find_active_pairing_id(
    conn: &mut SqliteConnection,
    student_id: StudentId,
    grade_id: GradeId,
) -> Result<Option<i64>, PersistenceError> {
    let result: Result<i64, diesel::result::Error> = student_grades::table
        .filter(student_grades::student_id.eq(student_id.value()))
        .filter(student_grades::grade_id.eq(grade_id.value()))
        .filter(student_grades::is_active.eq(1))
        .filter(student_grades::end_date.is_null())
        .select(student_grades::student_grade_id)
        .first(conn);

    match result {
        Ok(id) => Ok(Some(id)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
