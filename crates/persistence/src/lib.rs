// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the GradeTrack academic records service.
//!
//! This crate stores the grade catalog and enrollment records in `SQLite`
//! via Diesel with embedded migrations. It implements the policy engine's
//! [`EnrollmentStore`] and [`GradeCatalog`] port traits and additionally
//! exposes the grade catalog CRUD primitives used by the api layer.
//!
//! ## Backend
//!
//! `SQLite` is the only backend:
//! - In-memory databases for unit and integration tests (one uniquely
//!   named shared-cache database per adapter, so tests are isolated)
//! - File-based databases with WAL mode for deployments
//!
//! ## Concurrency
//!
//! The adapter holds one connection behind a mutex. Each port primitive
//! takes the connection for its whole body, so every primitive is
//! individually atomic; the multi-statement transfer additionally runs in
//! a database transaction. Cross-primitive serialization per student is
//! the policy engine's job, not this crate's.
//!
//! ## Timestamps
//!
//! All timestamps are stored as fixed-width UTC text so that SQL string
//! comparison is chronological comparison. See `data_models` for the
//! codec.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use gradetrack::{EnrollmentStore, GradeCatalog, StoreError};
use gradetrack_domain::{Enrollment, Grade, GradeId, StudentId};
use time::OffsetDateTime;

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential
/// ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the grade catalog and enrollment records.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection = sqlite::open(&shared_memory_url, sqlite::Journal::Rollback)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = sqlite::open(path_str, sqlite::Journal::Wal)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Takes the connection for one primitive.
    ///
    /// The guarded state is a connection, not shared data a panicking
    /// thread could leave torn, so a poisoned mutex is recovered.
    fn lock_conn(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Grade catalog CRUD
    // ========================================================================

    /// Inserts a new grade and returns it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a uniqueness constraint rejects the grade or the
    /// write fails.
    pub fn create_grade(&self, grade: &Grade) -> Result<Grade, PersistenceError> {
        mutations::grades::insert_grade(&mut self.lock_conn(), grade)
    }

    /// Retrieves a grade by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>, PersistenceError> {
        queries::grades::get_grade_by_id(&mut self.lock_conn(), grade_id)
    }

    /// Retrieves a grade by its trimmed name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_grade_by_name(&self, name: &str) -> Result<Option<Grade>, PersistenceError> {
        queries::grades::get_grade_by_name(&mut self.lock_conn(), name)
    }

    /// Retrieves a grade by its numeric level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_grade_by_level(&self, level: u8) -> Result<Option<Grade>, PersistenceError> {
        queries::grades::get_grade_by_level(&mut self.lock_conn(), level)
    }

    /// Retrieves all grades ordered by level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_all_grades(&self) -> Result<Vec<Grade>, PersistenceError> {
        queries::grades::get_all_grades(&mut self.lock_conn())
    }

    /// Retrieves all active grades ordered by level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active_grades(&self) -> Result<Vec<Grade>, PersistenceError> {
        queries::grades::get_active_grades(&mut self.lock_conn())
    }

    /// Retrieves all inactive grades ordered by level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_inactive_grades(&self) -> Result<Vec<Grade>, PersistenceError> {
        queries::grades::get_inactive_grades(&mut self.lock_conn())
    }

    /// Checks whether a grade with the given ID exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn grade_exists(&self, grade_id: i64) -> Result<bool, PersistenceError> {
        queries::grades::grade_exists(&mut self.lock_conn(), grade_id)
    }

    /// Checks whether a grade with the given name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn grade_exists_by_name(&self, name: &str) -> Result<bool, PersistenceError> {
        queries::grades::grade_exists_by_name(&mut self.lock_conn(), name)
    }

    /// Checks whether a grade with the given level exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn grade_exists_by_level(&self, level: u8) -> Result<bool, PersistenceError> {
        queries::grades::grade_exists_by_level(&mut self.lock_conn(), level)
    }

    /// Counts all grades in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_grades(&self) -> Result<i64, PersistenceError> {
        queries::grades::count_grades(&mut self.lock_conn())
    }

    /// Counts the active grades in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_grades(&self) -> Result<i64, PersistenceError> {
        queries::grades::count_active_grades(&mut self.lock_conn())
    }

    /// Overwrites a persisted grade's mutable columns.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for an unknown or unsaved
    /// grade, or another error if the write fails.
    pub fn update_grade(&self, grade: &Grade) -> Result<Grade, PersistenceError> {
        mutations::grades::update_grade(&mut self.lock_conn(), grade)
    }

    /// Deletes a grade row. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ConstraintViolation` if enrollments still
    /// reference the grade, or another error if the write fails.
    pub fn delete_grade(&self, grade_id: i64) -> Result<bool, PersistenceError> {
        mutations::grades::delete_grade(&mut self.lock_conn(), grade_id)
    }
}

impl GradeCatalog for Persistence {
    fn find_grade_by_id(&self, grade_id: GradeId) -> Result<Option<Grade>, StoreError> {
        Ok(queries::grades::get_grade_by_id(
            &mut self.lock_conn(),
            grade_id.value(),
        )?)
    }
}

impl EnrollmentStore for Persistence {
    fn save(&self, enrollment: Enrollment) -> Result<Enrollment, StoreError> {
        Ok(mutations::enrollments::insert_enrollment(
            &mut self.lock_conn(),
            &enrollment,
        )?)
    }

    fn find_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_enrollment_by_id(
            &mut self.lock_conn(),
            enrollment_id,
        )?)
    }

    fn find_by_student_id(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_enrollments_by_student_id(
            &mut self.lock_conn(),
            student_id,
        )?)
    }

    fn find_by_grade_id(&self, grade_id: GradeId) -> Result<Vec<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_enrollments_by_grade_id(
            &mut self.lock_conn(),
            grade_id,
        )?)
    }

    fn find_current_enrollment_by_student_id(
        &self,
        student_id: StudentId,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_current_enrollment_by_student_id(
            &mut self.lock_conn(),
            student_id,
        )?)
    }

    fn find_active_enrollments_by_grade_id(
        &self,
        grade_id: GradeId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_active_enrollments_by_grade_id(
            &mut self.lock_conn(),
            grade_id,
        )?)
    }

    fn find_all_active_enrollments(&self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_all_active_enrollments(
            &mut self.lock_conn(),
        )?)
    }

    fn find_enrollments_active_on_date(
        &self,
        date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(queries::enrollments::get_enrollments_active_on_date(
            &mut self.lock_conn(),
            date,
        )?)
    }

    fn find_enrollments_by_student_id_and_date_range(
        &self,
        student_id: StudentId,
        start_date: OffsetDateTime,
        end_date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(
            queries::enrollments::get_enrollments_by_student_id_and_date_range(
                &mut self.lock_conn(),
                student_id,
                start_date,
                end_date,
            )?,
        )
    }

    fn is_student_enrolled_in_grade(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
    ) -> Result<bool, StoreError> {
        Ok(queries::enrollments::is_student_enrolled_in_grade(
            &mut self.lock_conn(),
            student_id,
            grade_id,
        )?)
    }

    fn has_active_enrollment(&self, student_id: StudentId) -> Result<bool, StoreError> {
        Ok(queries::enrollments::has_active_enrollment(
            &mut self.lock_conn(),
            student_id,
        )?)
    }

    fn end_enrollment(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
        end_date: OffsetDateTime,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(mutations::enrollments::end_active_enrollment(
            &mut self.lock_conn(),
            student_id,
            grade_id,
            end_date,
        )?)
    }

    fn transfer_enrollment(
        &self,
        from_grade_id: GradeId,
        transfer_date: OffsetDateTime,
        replacement: Enrollment,
    ) -> Result<Enrollment, StoreError> {
        Ok(mutations::enrollments::transfer_enrollment(
            &mut self.lock_conn(),
            from_grade_id,
            transfer_date,
            &replacement,
        )?)
    }

    fn delete_by_id(&self, enrollment_id: i64) -> Result<bool, StoreError> {
        Ok(mutations::enrollments::delete_enrollment(
            &mut self.lock_conn(),
            enrollment_id,
        )?)
    }

    fn count_active_enrollments_by_grade_id(&self, grade_id: GradeId) -> Result<i64, StoreError> {
        Ok(queries::enrollments::count_active_enrollments_by_grade_id(
            &mut self.lock_conn(),
            grade_id,
        )?)
    }

    fn count_enrollments_by_student_id(&self, student_id: StudentId) -> Result<i64, StoreError> {
        Ok(queries::enrollments::count_enrollments_by_student_id(
            &mut self.lock_conn(),
            student_id,
        )?)
    }
}
