// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The five mutating lifecycle operations.
//!
//! Per student the machine has two states, unenrolled and enrolled-in-a-
//! grade: `enroll` moves into a grade, `end`/`graduate` move back out,
//! `transfer` moves between grades, and self-loops are rejected. There is
//! no terminal state; a graduated student may re-enroll. Historical
//! (ended) records are retained and queryable but take no further part in
//! the machine.
//!
//! Validation is eager: every rule is checked before the first mutating
//! store call, so a failed operation has no partial effects. Once a
//! mutating call is issued its result is returned unmodified apart from
//! attaching the operation's semantic meaning to a store `NotFound`.

use crate::error::CoreError;
use crate::locks::StudentLocks;
use crate::store::{EnrollmentStore, GradeCatalog, StoreError};
use gradetrack_domain::{
    DomainError, Enrollment, Grade, GradeId, StudentId, validate_end_date, validate_start_date,
};
use time::OffsetDateTime;

/// The enrollment policy engine.
///
/// Stateless apart from the keyed lock table; safe to share across
/// request-handling tasks. All storage flows through the store passed to
/// each operation.
#[derive(Debug, Default)]
pub struct EnrollmentPolicy {
    /// Serializes mutating operations per student.
    locks: StudentLocks,
}

impl EnrollmentPolicy {
    /// Creates a new policy engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrolls a student into a grade.
    ///
    /// `start_date` defaults to now and must lie within
    /// `[now - 10 years, now + 1 day]`. The grade must exist and be active.
    /// The student must have no active enrollment anywhere.
    ///
    /// # Errors
    ///
    /// * `DomainError::GradeNotFound` / `GradeNotActive` for a missing or
    ///   inactive grade
    /// * `DomainError::AlreadyEnrolledInGrade` when the pairing is already
    ///   active
    /// * `DomainError::OtherEnrollmentActive` when another enrollment is
    ///   active
    /// * `DomainError` invalid-argument variants for malformed inputs
    /// * `CoreError::Store` when a collaborator fails
    pub fn enroll<S>(
        &self,
        store: &S,
        student_id: i64,
        grade_id: i64,
        start_date: Option<OffsetDateTime>,
    ) -> Result<Enrollment, CoreError>
    where
        S: EnrollmentStore + GradeCatalog,
    {
        let student: StudentId = StudentId::new(student_id)?;
        let grade_id: GradeId = GradeId::new(grade_id)?;
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let start_date: OffsetDateTime = start_date.unwrap_or(now);
        validate_start_date(start_date, now)?;

        let grade: Grade = store
            .find_grade_by_id(grade_id)?
            .ok_or(DomainError::GradeNotFound(grade_id))?;
        if !grade.is_valid_for_enrollment() {
            return Err(DomainError::GradeNotActive(grade_id).into());
        }

        // The uniqueness checks run under the student's lock so a
        // concurrent enroll/transfer cannot slip between check and write.
        let _guard = self.locks.acquire(student);

        if store.is_student_enrolled_in_grade(student, grade_id)? {
            return Err(DomainError::AlreadyEnrolledInGrade {
                student_id: student,
                grade_id,
            }
            .into());
        }
        if store.has_active_enrollment(student)? {
            return Err(DomainError::OtherEnrollmentActive {
                student_id: student,
            }
            .into());
        }

        let enrollment: Enrollment = Enrollment::begin(student, grade_id, start_date, now)?;
        Ok(store.save(enrollment)?)
    }

    /// Transfers a student between grades.
    ///
    /// Ends the active enrollment in `from_grade_id` at `transfer_date` and
    /// starts a new one in `to_grade_id` at the same instant, atomically at
    /// the store.
    ///
    /// # Errors
    ///
    /// * `DomainError::SameGradeTransfer` when source and destination match
    /// * `DomainError::GradeNotFound` when either grade is missing
    /// * `DomainError::GradeNotActive` when the destination is inactive
    /// * `DomainError::NotEnrolledInGrade` when the student is not active in
    ///   the source grade
    /// * `CoreError::Store` when a collaborator fails
    pub fn transfer<S>(
        &self,
        store: &S,
        student_id: i64,
        from_grade_id: i64,
        to_grade_id: i64,
        transfer_date: Option<OffsetDateTime>,
    ) -> Result<Enrollment, CoreError>
    where
        S: EnrollmentStore + GradeCatalog,
    {
        let student: StudentId = StudentId::new(student_id)?;
        let from_grade: GradeId = GradeId::new(from_grade_id)?;
        let to_grade: GradeId = GradeId::new(to_grade_id)?;
        if from_grade == to_grade {
            return Err(DomainError::SameGradeTransfer(to_grade).into());
        }
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let transfer_date: OffsetDateTime = transfer_date.unwrap_or(now);
        validate_start_date(transfer_date, now)?;

        store
            .find_grade_by_id(from_grade)?
            .ok_or(DomainError::GradeNotFound(from_grade))?;
        let destination: Grade = store
            .find_grade_by_id(to_grade)?
            .ok_or(DomainError::GradeNotFound(to_grade))?;
        if !destination.is_valid_for_enrollment() {
            return Err(DomainError::GradeNotActive(to_grade).into());
        }

        let _guard = self.locks.acquire(student);

        let current: Enrollment = store
            .find_current_enrollment_by_student_id(student)?
            .filter(|enrollment| enrollment.grade_id == from_grade)
            .ok_or(DomainError::NotEnrolledInGrade {
                student_id: student,
                grade_id: from_grade,
            })?;
        if transfer_date < current.start_date {
            return Err(DomainError::EndDateBeforeStartDate {
                start_date: current.start_date,
                end_date: transfer_date,
            }
            .into());
        }

        let replacement: Enrollment = Enrollment::begin(student, to_grade, transfer_date, now)?;
        match store.transfer_enrollment(from_grade, transfer_date, replacement) {
            Ok(enrollment) => Ok(enrollment),
            Err(StoreError::NotFound(_)) => Err(DomainError::NotEnrolledInGrade {
                student_id: student,
                grade_id: from_grade,
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Ends a student's active enrollment in a grade.
    ///
    /// `end_date` defaults to now and must not lie beyond the one-day
    /// future bound nor before the enrollment's start date.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotEnrolledInGrade` when no active pairing exists
    /// * `DomainError::EndDateInFuture` / `EndDateBeforeStartDate` for
    ///   out-of-range dates
    /// * `CoreError::Store` when a collaborator fails
    pub fn end_enrollment<S>(
        &self,
        store: &S,
        student_id: i64,
        grade_id: i64,
        end_date: Option<OffsetDateTime>,
    ) -> Result<Enrollment, CoreError>
    where
        S: EnrollmentStore,
    {
        let student: StudentId = StudentId::new(student_id)?;
        let grade_id: GradeId = GradeId::new(grade_id)?;
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let end_date: OffsetDateTime = end_date.unwrap_or(now);
        validate_end_date(end_date, now)?;

        let _guard = self.locks.acquire(student);

        let current: Enrollment = store
            .find_current_enrollment_by_student_id(student)?
            .filter(|enrollment| enrollment.grade_id == grade_id)
            .ok_or(DomainError::NotEnrolledInGrade {
                student_id: student,
                grade_id,
            })?;
        if end_date < current.start_date {
            return Err(DomainError::EndDateBeforeStartDate {
                start_date: current.start_date,
                end_date,
            }
            .into());
        }

        store
            .end_enrollment(student, grade_id, end_date)?
            .ok_or_else(|| {
                DomainError::NotEnrolledInGrade {
                    student_id: student,
                    grade_id,
                }
                .into()
            })
    }

    /// Ends a student's current enrollment without naming the grade.
    ///
    /// Resolves the active enrollment and delegates to [`Self::end_enrollment`]
    /// with its grade.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotEnrolledInAnyGrade` when the student has no
    ///   active enrollment
    /// * Anything `end_enrollment` can return
    pub fn graduate<S>(
        &self,
        store: &S,
        student_id: i64,
        graduation_date: Option<OffsetDateTime>,
    ) -> Result<Enrollment, CoreError>
    where
        S: EnrollmentStore,
    {
        let student: StudentId = StudentId::new(student_id)?;
        let current: Enrollment = store
            .find_current_enrollment_by_student_id(student)?
            .ok_or(DomainError::NotEnrolledInAnyGrade(student))?;
        self.end_enrollment(store, student_id, current.grade_id.value(), graduation_date)
    }

    /// Permanently deletes an enrollment record.
    ///
    /// Only records that are not currently active may be removed; ended
    /// history may be pruned, live state may not.
    ///
    /// # Errors
    ///
    /// * `DomainError::EnrollmentNotFound` when the record is missing
    /// * `DomainError::EnrollmentStillActive` when it is currently active
    /// * `CoreError::Store` when a collaborator fails
    pub fn remove_enrollment<S>(&self, store: &S, enrollment_id: i64) -> Result<bool, CoreError>
    where
        S: EnrollmentStore,
    {
        let enrollment: Enrollment = store
            .find_by_id(enrollment_id)?
            .ok_or(DomainError::EnrollmentNotFound(enrollment_id))?;
        if enrollment.is_currently_active() {
            return Err(DomainError::EnrollmentStillActive(enrollment_id).into());
        }
        Ok(store.delete_by_id(enrollment_id)?)
    }
}
