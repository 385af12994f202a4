// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grade catalog mutations.
//!
//! Uniqueness of name and level is enforced twice: by the catalog rules in
//! the api layer and by the UNIQUE constraints in the schema. A constraint
//! hit here surfaces as `PersistenceError::ConstraintViolation`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::grades;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::last_insert_rowid;
use gradetrack_domain::Grade;

/// Inserts a new grade and returns it with its assigned ID.
///
/// # Errors
///
/// Returns an error if the grade is already persisted, violates a
/// uniqueness constraint, or the write fails.
pub fn insert_grade(conn: &mut SqliteConnection, grade: &Grade) -> Result<Grade, PersistenceError> {
    info!(name = %grade.name, level = grade.level.number(), "Creating grade");

    diesel::insert_into(grades::table)
        .values((
            grades::name.eq(&grade.name),
            grades::description.eq(&grade.description),
            grades::level.eq(i32::from(grade.level.number())),
            grades::is_active.eq(i32::from(grade.is_active)),
            grades::created_at.eq(format_timestamp(grade.created_at)?),
            grades::updated_at.eq(format_timestamp(grade.updated_at)?),
        ))
        .execute(conn)?;

    let grade_id: i64 = last_insert_rowid(conn)?;
    info!(grade_id, "Grade created");

    Ok(Grade::with_id(
        grade_id,
        grade.name.clone(),
        grade.description.clone(),
        grade.level,
        grade.is_active,
        grade.created_at,
        grade.updated_at,
    ))
}

/// Overwrites a persisted grade's mutable columns.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the grade has no persisted ID or
/// no row matches it, or another error if the write fails.
pub fn update_grade(conn: &mut SqliteConnection, grade: &Grade) -> Result<Grade, PersistenceError> {
    let grade_id: i64 = grade
        .grade_id()
        .ok_or_else(|| PersistenceError::NotFound("grade has no persisted ID".to_string()))?;

    info!(grade_id, "Updating grade");

    let affected: usize = diesel::update(grades::table)
        .filter(grades::grade_id.eq(grade_id))
        .set((
            grades::name.eq(&grade.name),
            grades::description.eq(&grade.description),
            grades::level.eq(i32::from(grade.level.number())),
            grades::is_active.eq(i32::from(grade.is_active)),
            grades::updated_at.eq(format_timestamp(grade.updated_at)?),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("grade {grade_id}")));
    }

    queries::grades::get_grade_by_id(conn, grade_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("grade {grade_id}")))
}

/// Deletes a grade row. Returns whether a row was deleted.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if enrollments still
/// reference the grade, or another error if the write fails.
pub fn delete_grade(conn: &mut SqliteConnection, grade_id: i64) -> Result<bool, PersistenceError> {
    info!(grade_id, "Deleting grade");

    let affected: usize = diesel::delete(grades::table)
        .filter(grades::grade_id.eq(grade_id))
        .execute(conn)?;

    Ok(affected > 0)
}
