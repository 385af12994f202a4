// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Port traits the policy engine depends on.
//!
//! The engine never talks to a storage backend directly; it only calls
//! these contracts. Every primitive is individually atomic, and
//! [`EnrollmentStore::transfer_enrollment`] is additionally transactional:
//! a committed state never shows the end-then-begin pair half applied.

use gradetrack_domain::{Enrollment, Grade, GradeId, StudentId};
use thiserror::Error;
use time::OffsetDateTime;

/// Errors surfaced by the store and catalog collaborators.
///
/// These are the dependency-failure channel of the engine: they are
/// propagated unchanged except where an operation attaches its semantic
/// meaning to a `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
    /// A storage-level invariant rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),
    /// The backend failed or is unreachable.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read access to the grade catalog collaborator.
pub trait GradeCatalog {
    /// Looks up a grade by its canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog backend fails.
    fn find_grade_by_id(&self, grade_id: GradeId) -> Result<Option<Grade>, StoreError>;
}

/// Persistence contract for enrollment records.
///
/// "Currently active" and "active on a date" follow the literal derived
/// predicates on [`Enrollment`]: `is_active && end_date == None`, and
/// `date > start_date && (end_date == None || date < end_date)`.
pub trait EnrollmentStore {
    /// Persists a new enrollment, assigning its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&self, enrollment: Enrollment) -> Result<Enrollment, StoreError>;

    /// Looks up an enrollment by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>, StoreError>;

    /// Returns all enrollments for a student, most recent start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_by_student_id(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns all enrollments for a grade, most recent start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_by_grade_id(&self, grade_id: GradeId) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns the student's currently active enrollment, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_current_enrollment_by_student_id(
        &self,
        student_id: StudentId,
    ) -> Result<Option<Enrollment>, StoreError>;

    /// Returns the currently active enrollments in a grade.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_active_enrollments_by_grade_id(
        &self,
        grade_id: GradeId,
    ) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns every currently active enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_all_active_enrollments(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns the enrollments that spanned the given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_enrollments_active_on_date(
        &self,
        date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns a student's enrollments that overlap the given interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_enrollments_by_student_id_and_date_range(
        &self,
        student_id: StudentId,
        start_date: OffsetDateTime,
        end_date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError>;

    /// Returns whether the student has a currently active enrollment in the
    /// grade.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn is_student_enrolled_in_grade(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
    ) -> Result<bool, StoreError>;

    /// Returns whether the student has any currently active enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn has_active_enrollment(&self, student_id: StudentId) -> Result<bool, StoreError>;

    /// Ends the active enrollment for the (student, grade) pairing.
    ///
    /// Sets the end date, clears the activity flag, and bumps the update
    /// timestamp in one atomic write. Returns `None` when no active pairing
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Constraint` if the end date would precede the
    /// record's start date, or another error if the write fails.
    fn end_enrollment(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
        end_date: OffsetDateTime,
    ) -> Result<Option<Enrollment>, StoreError>;

    /// Atomically ends the active enrollment in `from_grade_id` and saves
    /// `replacement` as the student's new enrollment.
    ///
    /// The student is taken from the replacement record. Both writes commit
    /// together; no other reader observes the student with zero or two
    /// active enrollments.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the student has no active
    /// enrollment in `from_grade_id` (nothing is written in that case).
    fn transfer_enrollment(
        &self,
        from_grade_id: GradeId,
        transfer_date: OffsetDateTime,
        replacement: Enrollment,
    ) -> Result<Enrollment, StoreError>;

    /// Deletes an enrollment record. Returns whether a record was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_by_id(&self, enrollment_id: i64) -> Result<bool, StoreError>;

    /// Counts the currently active enrollments in a grade.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count_active_enrollments_by_grade_id(&self, grade_id: GradeId) -> Result<i64, StoreError>;

    /// Counts all enrollments (active and historical) for a student.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count_enrollments_by_student_id(&self, student_id: StudentId) -> Result<i64, StoreError>;
}
