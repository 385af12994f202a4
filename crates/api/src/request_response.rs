// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! All dates cross the boundary as RFC 3339 strings; handlers parse
//! requests and responses are built from domain values here.

use crate::error::ApiError;
use gradetrack_domain::{Enrollment, Grade};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn format_rfc3339(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

/// API request to enroll a student into a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudentRequest {
    /// The student identifier.
    pub student_id: i64,
    /// The grade identifier.
    pub grade_id: i64,
    /// Optional enrollment start (RFC 3339); defaults to now.
    pub start_date: Option<String>,
}

/// API request to transfer a student between grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStudentRequest {
    /// The student identifier.
    pub student_id: i64,
    /// The grade being left.
    pub from_grade_id: i64,
    /// The grade being joined.
    pub to_grade_id: i64,
    /// Optional transfer instant (RFC 3339); defaults to now.
    pub transfer_date: Option<String>,
}

/// API request to end a student's enrollment in a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndEnrollmentRequest {
    /// The student identifier.
    pub student_id: i64,
    /// The grade identifier.
    pub grade_id: i64,
    /// Optional end instant (RFC 3339); defaults to now.
    pub end_date: Option<String>,
}

/// API request to graduate a student from their current grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduateStudentRequest {
    /// The student identifier.
    pub student_id: i64,
    /// Optional graduation instant (RFC 3339); defaults to now.
    pub graduation_date: Option<String>,
}

/// API representation of an enrollment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    /// The canonical enrollment identifier.
    pub enrollment_id: i64,
    /// The enrolled student.
    pub student_id: i64,
    /// The grade enrolled into.
    pub grade_id: i64,
    /// Enrollment start (RFC 3339).
    pub start_date: String,
    /// Enrollment end (RFC 3339), if ended.
    pub end_date: Option<String>,
    /// The stored activity flag.
    pub is_active: bool,
    /// The derived currently-active predicate.
    pub is_currently_active: bool,
    /// Duration in whole days (to now for open enrollments).
    pub duration_days: i64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339).
    pub updated_at: String,
}

impl EnrollmentResponse {
    /// Builds the response from a persisted enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment has no ID or a timestamp cannot
    /// be formatted.
    pub fn from_enrollment(enrollment: &Enrollment) -> Result<Self, ApiError> {
        let enrollment_id: i64 = enrollment.enrollment_id().ok_or_else(|| ApiError::Internal {
            message: String::from("Enrollment loaded without a persisted ID"),
        })?;
        Ok(Self {
            enrollment_id,
            student_id: enrollment.student_id.value(),
            grade_id: enrollment.grade_id.value(),
            start_date: format_rfc3339(enrollment.start_date)?,
            end_date: enrollment.end_date.map(format_rfc3339).transpose()?,
            is_active: enrollment.is_active,
            is_currently_active: enrollment.is_currently_active(),
            duration_days: enrollment.enrollment_duration(),
            created_at: format_rfc3339(enrollment.created_at)?,
            updated_at: format_rfc3339(enrollment.updated_at)?,
        })
    }
}

/// API response for a list of enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentListResponse {
    /// The matching enrollments.
    pub enrollments: Vec<EnrollmentResponse>,
    /// The number of matches.
    pub count: usize,
}

impl EnrollmentListResponse {
    /// Builds the response from persisted enrollments.
    ///
    /// # Errors
    ///
    /// Returns an error if any enrollment cannot be represented.
    pub fn from_enrollments(enrollments: &[Enrollment]) -> Result<Self, ApiError> {
        let enrollments: Vec<EnrollmentResponse> = enrollments
            .iter()
            .map(EnrollmentResponse::from_enrollment)
            .collect::<Result<_, _>>()?;
        let count: usize = enrollments.len();
        Ok(Self { enrollments, count })
    }
}

/// API response for an enrollment removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveEnrollmentResponse {
    /// The removed enrollment identifier.
    pub enrollment_id: i64,
    /// Whether a record was removed.
    pub removed: bool,
    /// A success message.
    pub message: String,
}

/// API response for an enrollment-existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCheckResponse {
    /// The student identifier checked.
    pub student_id: i64,
    /// The grade identifier checked, when the check is grade-scoped.
    pub grade_id: Option<i64>,
    /// Whether a matching active enrollment exists.
    pub enrolled: bool,
}

/// API response for a count query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    /// The count.
    pub count: i64,
}

/// API request to create a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGradeRequest {
    /// The grade name (2-100 characters, unique).
    pub name: String,
    /// Optional description (10-500 characters when present).
    pub description: Option<String>,
    /// The numeric level (1-12, unique).
    pub level: u8,
}

/// API request to update a grade's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGradeRequest {
    /// The new grade name.
    pub name: String,
    /// The new description.
    pub description: Option<String>,
    /// The new numeric level.
    pub level: u8,
}

/// API representation of a grade catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResponse {
    /// The canonical grade identifier.
    pub grade_id: i64,
    /// The grade name.
    pub name: String,
    /// The description, if set.
    pub description: Option<String>,
    /// The numeric level.
    pub level: u8,
    /// Whether the grade accepts enrollments.
    pub is_active: bool,
    /// The name joined with the description.
    pub full_description: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339).
    pub updated_at: String,
}

impl GradeResponse {
    /// Builds the response from a persisted grade.
    ///
    /// # Errors
    ///
    /// Returns an error if the grade has no ID or a timestamp cannot be
    /// formatted.
    pub fn from_grade(grade: &Grade) -> Result<Self, ApiError> {
        let grade_id: i64 = grade.grade_id().ok_or_else(|| ApiError::Internal {
            message: String::from("Grade loaded without a persisted ID"),
        })?;
        Ok(Self {
            grade_id,
            name: grade.name.clone(),
            description: grade.description.clone(),
            level: grade.level.number(),
            is_active: grade.is_active,
            full_description: grade.full_description(),
            created_at: format_rfc3339(grade.created_at)?,
            updated_at: format_rfc3339(grade.updated_at)?,
        })
    }
}

/// API response for a list of grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeListResponse {
    /// The matching grades, ordered by level.
    pub grades: Vec<GradeResponse>,
    /// The number of matches.
    pub count: usize,
}

impl GradeListResponse {
    /// Builds the response from persisted grades.
    ///
    /// # Errors
    ///
    /// Returns an error if any grade cannot be represented.
    pub fn from_grades(grades: &[Grade]) -> Result<Self, ApiError> {
        let grades: Vec<GradeResponse> = grades
            .iter()
            .map(GradeResponse::from_grade)
            .collect::<Result<_, _>>()?;
        let count: usize = grades.len();
        Ok(Self { grades, count })
    }
}

/// API response for a grade-existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeExistsResponse {
    /// Whether a matching grade exists.
    pub exists: bool,
}

/// API response for a grade activation or deactivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetGradeActiveResponse {
    /// The grade identifier.
    pub grade_id: i64,
    /// The grade's activity flag after the operation.
    pub is_active: bool,
    /// Whether the operation changed anything.
    pub changed: bool,
    /// A success message.
    pub message: String,
}

/// API response for a grade deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteGradeResponse {
    /// The deleted grade identifier.
    pub grade_id: i64,
    /// Whether a row was deleted.
    pub deleted: bool,
    /// A success message.
    pub message: String,
}
