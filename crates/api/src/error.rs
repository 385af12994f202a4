// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gradetrack::{CoreError, StoreError};
use gradetrack_domain::DomainError;
use gradetrack_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. The server maps them onto HTTP status codes: `InvalidInput`
/// is 400, `ResourceNotFound` is 404, `Conflict` is 409, `Internal` is
/// 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation conflicts with the current state.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into the API error contract.
///
/// Every domain variant maps to exactly one API category; the message is
/// the domain error's stable display text.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidStudentId(_) => ApiError::InvalidInput {
            field: String::from("student_id"),
            message,
        },
        DomainError::InvalidGradeId(_) => ApiError::InvalidInput {
            field: String::from("grade_id"),
            message,
        },
        DomainError::InvalidGradeLevel(_) => ApiError::InvalidInput {
            field: String::from("level"),
            message,
        },
        DomainError::InvalidGradeName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::InvalidGradeDescription(_) => ApiError::InvalidInput {
            field: String::from("description"),
            message,
        },
        DomainError::StartDateTooFarInFuture(_) | DomainError::StartDateTooFarInPast(_) => {
            ApiError::InvalidInput {
                field: String::from("start_date"),
                message,
            }
        }
        DomainError::EndDateInFuture(_) | DomainError::EndDateBeforeStartDate { .. } => {
            ApiError::InvalidInput {
                field: String::from("end_date"),
                message,
            }
        }
        DomainError::QueryDateInFuture(_) => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message,
        },
        DomainError::GradeNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Grade"),
            message,
        },
        DomainError::EnrollmentNotFound(_)
        | DomainError::NotEnrolledInGrade { .. }
        | DomainError::NotEnrolledInAnyGrade(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Enrollment"),
            message,
        },
        DomainError::GradeNotActive(_) => ApiError::InvalidInput {
            field: String::from("grade_id"),
            message,
        },
        DomainError::DuplicateGradeName(_) => ApiError::Conflict {
            rule: String::from("unique_grade_name"),
            message,
        },
        DomainError::DuplicateGradeLevel(_) => ApiError::Conflict {
            rule: String::from("unique_grade_level"),
            message,
        },
        DomainError::GradeStillActive(_) => ApiError::Conflict {
            rule: String::from("inactive_grade_delete_only"),
            message,
        },
        DomainError::AlreadyEnrolledInGrade { .. } | DomainError::OtherEnrollmentActive { .. } => {
            ApiError::Conflict {
                rule: String::from("single_active_enrollment"),
                message,
            }
        }
        DomainError::SameGradeTransfer(_) => ApiError::InvalidInput {
            field: String::from("to_grade_id"),
            message,
        },
        DomainError::EnrollmentStillActive(_) => ApiError::Conflict {
            rule: String::from("inactive_enrollment_removal_only"),
            message,
        },
    }
}

/// Translates a core error into the API error contract.
///
/// Domain violations are translated per variant. Store failures reaching
/// this point carry no operation semantics, so constraint hits become
/// conflicts and everything else is internal.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(StoreError::Constraint(message)) => ApiError::Conflict {
            rule: String::from("storage_constraint"),
            message,
        },
        CoreError::Store(store_err) => ApiError::Internal {
            message: store_err.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            PersistenceError::ConstraintViolation(message) => Self::Conflict {
                rule: String::from("storage_constraint"),
                message,
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}
