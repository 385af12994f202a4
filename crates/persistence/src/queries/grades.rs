// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grade catalog queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::GradeRow;
use crate::diesel_schema::grades;
use crate::error::PersistenceError;
use gradetrack_domain::Grade;

/// Retrieves a grade by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the grade is not found.
pub fn get_grade_by_id(
    conn: &mut SqliteConnection,
    grade_id: i64,
) -> Result<Option<Grade>, PersistenceError> {
    debug!(grade_id, "Looking up grade by ID");

    let result: Result<GradeRow, diesel::result::Error> = grades::table
        .filter(grades::grade_id.eq(grade_id))
        .select(GradeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a grade by its trimmed name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the grade is not found.
pub fn get_grade_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<Grade>, PersistenceError> {
    let trimmed: &str = name.trim();
    debug!(name = trimmed, "Looking up grade by name");

    let result: Result<GradeRow, diesel::result::Error> = grades::table
        .filter(grades::name.eq(trimmed))
        .select(GradeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a grade by its numeric level.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the grade is not found.
pub fn get_grade_by_level(
    conn: &mut SqliteConnection,
    level: u8,
) -> Result<Option<Grade>, PersistenceError> {
    debug!(level, "Looking up grade by level");

    let result: Result<GradeRow, diesel::result::Error> = grades::table
        .filter(grades::level.eq(i32::from(level)))
        .select(GradeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all grades ordered by level.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_all_grades(conn: &mut SqliteConnection) -> Result<Vec<Grade>, PersistenceError> {
    let rows: Vec<GradeRow> = grades::table
        .order(grades::level.asc())
        .select(GradeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(GradeRow::into_domain).collect()
}

/// Retrieves all active grades ordered by level.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_active_grades(conn: &mut SqliteConnection) -> Result<Vec<Grade>, PersistenceError> {
    let rows: Vec<GradeRow> = grades::table
        .filter(grades::is_active.eq(1))
        .order(grades::level.asc())
        .select(GradeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(GradeRow::into_domain).collect()
}

/// Retrieves all inactive grades ordered by level.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_inactive_grades(conn: &mut SqliteConnection) -> Result<Vec<Grade>, PersistenceError> {
    let rows: Vec<GradeRow> = grades::table
        .filter(grades::is_active.eq(0))
        .order(grades::level.asc())
        .select(GradeRow::as_select())
        .load(conn)?;

    rows.into_iter().map(GradeRow::into_domain).collect()
}

/// Checks whether a grade with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn grade_exists(conn: &mut SqliteConnection, grade_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = grades::table
        .filter(grades::grade_id.eq(grade_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Checks whether a grade with the given trimmed name exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn grade_exists_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = grades::table
        .filter(grades::name.eq(name.trim()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Checks whether a grade with the given level exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn grade_exists_by_level(
    conn: &mut SqliteConnection,
    level: u8,
) -> Result<bool, PersistenceError> {
    let count: i64 = grades::table
        .filter(grades::level.eq(i32::from(level)))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Counts all grades in the catalog.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_grades(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(grades::table.count().get_result(conn)?)
}

/// Counts the active grades in the catalog.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_grades(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(grades::table
        .filter(grades::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
