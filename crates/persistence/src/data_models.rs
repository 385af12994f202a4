// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and the timestamp codec.
//!
//! Timestamps are stored as fixed-width UTC text
//! (`YYYY-MM-DD HH:MM:SS.ffffff`), so lexicographic comparison in SQL is
//! chronological comparison. RFC 3339 would not give that guarantee: its
//! fractional second is variable width.

use diesel::prelude::*;

use crate::diesel_schema::{grades, student_grades};
use crate::error::PersistenceError;
use gradetrack_domain::{Enrollment, Grade, GradeId, GradeLevel, StudentId};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// Formats a timestamp as fixed-width UTC text for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::CorruptRecord(format!("unformattable timestamp: {e}")))
}

/// Parses a stored timestamp back into a UTC instant.
///
/// # Errors
///
/// Returns an error if the text does not match the storage format.
pub(crate) fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRecord(format!("bad timestamp {text:?}: {e}")))
}

/// Diesel Queryable struct for grade rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = grades)]
pub(crate) struct GradeRow {
    pub grade_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub level: i32,
    pub is_active: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl GradeRow {
    /// Maps the row back into a domain `Grade`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if a column holds a value
    /// the domain type cannot represent.
    pub fn into_domain(self) -> Result<Grade, PersistenceError> {
        let level_number: u8 = u8::try_from(self.level)
            .map_err(|_| PersistenceError::CorruptRecord(format!("bad level {}", self.level)))?;
        let level: GradeLevel = GradeLevel::new(level_number)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        Ok(Grade::with_id(
            self.grade_id,
            self.name,
            self.description,
            level,
            self.is_active != 0,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

/// Diesel Queryable struct for enrollment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = student_grades)]
pub(crate) struct StudentGradeRow {
    pub student_grade_id: i64,
    pub student_id: i64,
    pub grade_id: i64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl StudentGradeRow {
    /// Maps the row back into a domain `Enrollment`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRecord` if a column holds a value
    /// the domain type cannot represent.
    pub fn into_domain(self) -> Result<Enrollment, PersistenceError> {
        let student_id: StudentId = StudentId::new(self.student_id)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        let grade_id: GradeId = GradeId::new(self.grade_id)
            .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
        let end_date: Option<OffsetDateTime> = self
            .end_date
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        Ok(Enrollment::with_id(
            self.student_grade_id,
            student_id,
            grade_id,
            parse_timestamp(&self.start_date)?,
            end_date,
            self.is_active != 0,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}
