// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{GradeId, StudentId};
use time::OffsetDateTime;

/// Errors that can occur during domain validation.
///
/// Every variant carries a stable, descriptive message so callers (and
/// tests) can distinguish the violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Student identifier is not positive.
    InvalidStudentId(i64),
    /// Grade identifier is not positive.
    InvalidGradeId(i64),
    /// Grade level is outside 1-12.
    InvalidGradeLevel(u8),
    /// Grade name is blank or has an invalid length.
    InvalidGradeName(String),
    /// Grade description is blank or has an invalid length.
    InvalidGradeDescription(String),
    /// Referenced grade does not exist.
    GradeNotFound(GradeId),
    /// Grade exists but is not active for enrollment.
    GradeNotActive(GradeId),
    /// Another grade already uses this name.
    DuplicateGradeName(String),
    /// Another grade already uses this level.
    DuplicateGradeLevel(u8),
    /// An active grade cannot be deleted.
    GradeStillActive(GradeId),
    /// Enrollment start date is beyond the one-day future bound.
    StartDateTooFarInFuture(OffsetDateTime),
    /// Enrollment start date is more than ten years in the past.
    StartDateTooFarInPast(OffsetDateTime),
    /// Enrollment end date is beyond the one-day future bound.
    EndDateInFuture(OffsetDateTime),
    /// Enrollment end date precedes the start date.
    EndDateBeforeStartDate {
        /// The enrollment start date.
        start_date: OffsetDateTime,
        /// The offending end date.
        end_date: OffsetDateTime,
    },
    /// A point-in-time query date lies in the future.
    QueryDateInFuture(OffsetDateTime),
    /// A range query has its start after its end.
    InvalidDateRange {
        /// The range start.
        start_date: OffsetDateTime,
        /// The range end.
        end_date: OffsetDateTime,
    },
    /// Student already has an active enrollment in this grade.
    AlreadyEnrolledInGrade {
        /// The student.
        student_id: StudentId,
        /// The grade.
        grade_id: GradeId,
    },
    /// Student already has an active enrollment in another grade.
    OtherEnrollmentActive {
        /// The student.
        student_id: StudentId,
    },
    /// Transfer source and destination are the same grade.
    SameGradeTransfer(GradeId),
    /// Student has no active enrollment in the specified grade.
    NotEnrolledInGrade {
        /// The student.
        student_id: StudentId,
        /// The grade.
        grade_id: GradeId,
    },
    /// Student has no active enrollment at all.
    NotEnrolledInAnyGrade(StudentId),
    /// Enrollment record does not exist.
    EnrollmentNotFound(i64),
    /// An active enrollment cannot be removed.
    EnrollmentStillActive(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStudentId(value) => {
                write!(f, "Student ID must be positive, got {value}")
            }
            Self::InvalidGradeId(value) => {
                write!(f, "Grade ID must be positive, got {value}")
            }
            Self::InvalidGradeLevel(level) => {
                write!(f, "Grade level must be between 1 and 12, got {level}")
            }
            Self::InvalidGradeName(msg) => write!(f, "Invalid grade name: {msg}"),
            Self::InvalidGradeDescription(msg) => {
                write!(f, "Invalid grade description: {msg}")
            }
            Self::GradeNotFound(grade_id) => write!(f, "Grade {grade_id} not found"),
            Self::GradeNotActive(grade_id) => {
                write!(f, "Grade {grade_id} is not active for enrollment")
            }
            Self::DuplicateGradeName(name) => {
                write!(f, "Grade with name '{name}' already exists")
            }
            Self::DuplicateGradeLevel(level) => {
                write!(f, "Grade with level {level} already exists")
            }
            Self::GradeStillActive(grade_id) => {
                write!(
                    f,
                    "Cannot delete active grade {grade_id}. Deactivate it first"
                )
            }
            Self::StartDateTooFarInFuture(start_date) => {
                write!(
                    f,
                    "Start date cannot be more than 1 day in the future, got {start_date}"
                )
            }
            Self::StartDateTooFarInPast(start_date) => {
                write!(
                    f,
                    "Start date cannot be more than 10 years in the past, got {start_date}"
                )
            }
            Self::EndDateInFuture(end_date) => {
                write!(
                    f,
                    "End date cannot be more than 1 day in the future, got {end_date}"
                )
            }
            Self::EndDateBeforeStartDate {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "End date {end_date} cannot be before start date {start_date}"
                )
            }
            Self::QueryDateInFuture(date) => {
                write!(f, "Query date cannot be in the future, got {date}")
            }
            Self::InvalidDateRange {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Range start {start_date} cannot be after range end {end_date}"
                )
            }
            Self::AlreadyEnrolledInGrade {
                student_id,
                grade_id,
            } => {
                write!(
                    f,
                    "Student {student_id} is already enrolled in grade {grade_id}"
                )
            }
            Self::OtherEnrollmentActive { student_id } => {
                write!(f, "Student {student_id} is already enrolled in another grade")
            }
            Self::SameGradeTransfer(grade_id) => {
                write!(f, "Cannot transfer to the same grade {grade_id}")
            }
            Self::NotEnrolledInGrade {
                student_id,
                grade_id,
            } => {
                write!(f, "Student {student_id} is not enrolled in grade {grade_id}")
            }
            Self::NotEnrolledInAnyGrade(student_id) => {
                write!(f, "Student {student_id} is not enrolled in any grade")
            }
            Self::EnrollmentNotFound(enrollment_id) => {
                write!(f, "Enrollment {enrollment_id} not found")
            }
            Self::EnrollmentStillActive(enrollment_id) => {
                write!(
                    f,
                    "Cannot remove active enrollment {enrollment_id}. End it first"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
