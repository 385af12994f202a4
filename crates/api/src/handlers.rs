// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for enrollment lifecycle operations, enrollment
//! queries, and grade catalog management.
//!
//! Handlers translate DTOs to domain inputs, delegate to the policy engine
//! or persistence adapter, and translate every failure into the
//! [`ApiError`] contract. No handler mutates state after a validation
//! failure.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use gradetrack::{EnrollmentPolicy, queries};
use gradetrack_domain::{DomainError, Enrollment, Grade, GradeId, GradeLevel};
use gradetrack_persistence::Persistence;

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    CountResponse, CreateGradeRequest, DeleteGradeResponse, EndEnrollmentRequest,
    EnrollStudentRequest, EnrollmentCheckResponse, EnrollmentListResponse, EnrollmentResponse,
    GradeExistsResponse, GradeListResponse, GradeResponse, GraduateStudentRequest,
    RemoveEnrollmentResponse, SetGradeActiveResponse, TransferStudentRequest, UpdateGradeRequest,
};

fn parse_date(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: format!("Expected an RFC 3339 date, got {value:?}: {e}"),
    })
}

fn parse_optional_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, ApiError> {
    value.map(|v| parse_date(field, v)).transpose()
}

// ============================================================================
// Enrollment lifecycle
// ============================================================================

/// Enrolls a student into a grade.
///
/// # Errors
///
/// Returns an error if the request is invalid, the grade is missing or
/// inactive, or the student already has an active enrollment.
pub fn enroll_student(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    request: &EnrollStudentRequest,
) -> Result<EnrollmentResponse, ApiError> {
    info!(
        student_id = request.student_id,
        grade_id = request.grade_id,
        "Enrolling student"
    );

    let start_date: Option<OffsetDateTime> =
        parse_optional_date("start_date", request.start_date.as_deref())?;
    let enrollment: Enrollment = policy
        .enroll(persistence, request.student_id, request.grade_id, start_date)
        .map_err(translate_core_error)?;

    EnrollmentResponse::from_enrollment(&enrollment)
}

/// Transfers a student between grades.
///
/// # Errors
///
/// Returns an error if the request is invalid, a grade is missing, the
/// destination is inactive, or the student is not active in the source
/// grade.
pub fn transfer_student(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    request: &TransferStudentRequest,
) -> Result<EnrollmentResponse, ApiError> {
    info!(
        student_id = request.student_id,
        from_grade_id = request.from_grade_id,
        to_grade_id = request.to_grade_id,
        "Transferring student"
    );

    let transfer_date: Option<OffsetDateTime> =
        parse_optional_date("transfer_date", request.transfer_date.as_deref())?;
    let enrollment: Enrollment = policy
        .transfer(
            persistence,
            request.student_id,
            request.from_grade_id,
            request.to_grade_id,
            transfer_date,
        )
        .map_err(translate_core_error)?;

    EnrollmentResponse::from_enrollment(&enrollment)
}

/// Ends a student's active enrollment in a grade.
///
/// # Errors
///
/// Returns an error if the request is invalid or the student is not
/// active in the grade.
pub fn end_enrollment(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    request: &EndEnrollmentRequest,
) -> Result<EnrollmentResponse, ApiError> {
    info!(
        student_id = request.student_id,
        grade_id = request.grade_id,
        "Ending enrollment"
    );

    let end_date: Option<OffsetDateTime> =
        parse_optional_date("end_date", request.end_date.as_deref())?;
    let enrollment: Enrollment = policy
        .end_enrollment(persistence, request.student_id, request.grade_id, end_date)
        .map_err(translate_core_error)?;

    EnrollmentResponse::from_enrollment(&enrollment)
}

/// Graduates a student from their current grade.
///
/// # Errors
///
/// Returns an error if the request is invalid or the student has no
/// active enrollment.
pub fn graduate_student(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    request: &GraduateStudentRequest,
) -> Result<EnrollmentResponse, ApiError> {
    info!(student_id = request.student_id, "Graduating student");

    let graduation_date: Option<OffsetDateTime> =
        parse_optional_date("graduation_date", request.graduation_date.as_deref())?;
    let enrollment: Enrollment = policy
        .graduate(persistence, request.student_id, graduation_date)
        .map_err(translate_core_error)?;

    EnrollmentResponse::from_enrollment(&enrollment)
}

/// Permanently removes an ended enrollment record.
///
/// # Errors
///
/// Returns an error if the record is missing or currently active.
pub fn remove_enrollment(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    enrollment_id: i64,
) -> Result<RemoveEnrollmentResponse, ApiError> {
    info!(enrollment_id, "Removing enrollment");

    let removed: bool = policy
        .remove_enrollment(persistence, enrollment_id)
        .map_err(translate_core_error)?;

    Ok(RemoveEnrollmentResponse {
        enrollment_id,
        removed,
        message: format!("Enrollment {enrollment_id} removed"),
    })
}

// ============================================================================
// Enrollment queries
// ============================================================================

/// Retrieves an enrollment by ID.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no such enrollment exists.
pub fn get_enrollment(
    persistence: &Persistence,
    enrollment_id: i64,
) -> Result<EnrollmentResponse, ApiError> {
    let enrollment: Enrollment = queries::get_enrollment_by_id(persistence, enrollment_id)
        .map_err(translate_core_error)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::EnrollmentNotFound(enrollment_id))
        })?;

    EnrollmentResponse::from_enrollment(&enrollment)
}

/// Lists a student's full enrollment history, most recent start first.
///
/// # Errors
///
/// Returns an error for an invalid student ID or a store failure.
pub fn list_enrollments_by_student(
    persistence: &Persistence,
    student_id: i64,
) -> Result<EnrollmentListResponse, ApiError> {
    let enrollments: Vec<Enrollment> =
        queries::get_enrollments_by_student_id(persistence, student_id)
            .map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Lists all enrollments in a grade, most recent start first.
///
/// # Errors
///
/// Returns an error for an invalid grade ID or a store failure.
pub fn list_enrollments_by_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<EnrollmentListResponse, ApiError> {
    let enrollments: Vec<Enrollment> =
        queries::get_enrollments_by_grade_id(persistence, grade_id)
            .map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Retrieves a student's currently active enrollment.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the student has no active
/// enrollment.
pub fn get_current_enrollment(
    persistence: &Persistence,
    student_id: i64,
) -> Result<EnrollmentResponse, ApiError> {
    let current: Option<Enrollment> =
        queries::get_current_enrollment_by_student_id(persistence, student_id)
            .map_err(translate_core_error)?;

    match current {
        Some(enrollment) => EnrollmentResponse::from_enrollment(&enrollment),
        None => Err(ApiError::ResourceNotFound {
            resource_type: String::from("Enrollment"),
            message: format!("Student {student_id} has no active enrollment"),
        }),
    }
}

/// Lists the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error for an invalid grade ID or a store failure.
pub fn list_active_enrollments_by_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<EnrollmentListResponse, ApiError> {
    let enrollments: Vec<Enrollment> =
        queries::get_active_enrollments_by_grade_id(persistence, grade_id)
            .map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Lists every currently active enrollment.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_all_active_enrollments(
    persistence: &Persistence,
) -> Result<EnrollmentListResponse, ApiError> {
    let enrollments: Vec<Enrollment> =
        queries::get_all_active_enrollments(persistence).map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Lists the enrollments that spanned the given instant.
///
/// # Errors
///
/// Returns an error for a malformed or future date, or a store failure.
pub fn list_enrollments_active_on_date(
    persistence: &Persistence,
    date: &str,
) -> Result<EnrollmentListResponse, ApiError> {
    let date: OffsetDateTime = parse_date("date", date)?;
    let enrollments: Vec<Enrollment> =
        queries::get_enrollments_active_on_date(persistence, date).map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Lists a student's enrollments overlapping the given interval.
///
/// # Errors
///
/// Returns an error for an invalid student ID, malformed or inverted
/// dates, or a store failure.
pub fn list_enrollments_in_date_range(
    persistence: &Persistence,
    student_id: i64,
    start_date: &str,
    end_date: &str,
) -> Result<EnrollmentListResponse, ApiError> {
    let start_date: OffsetDateTime = parse_date("start_date", start_date)?;
    let end_date: OffsetDateTime = parse_date("end_date", end_date)?;
    let enrollments: Vec<Enrollment> = queries::get_enrollments_by_student_id_and_date_range(
        persistence,
        student_id,
        start_date,
        end_date,
    )
    .map_err(translate_core_error)?;
    EnrollmentListResponse::from_enrollments(&enrollments)
}

/// Checks whether a student is currently enrolled in a grade.
///
/// # Errors
///
/// Returns an error for invalid IDs or a store failure.
pub fn check_enrolled_in_grade(
    persistence: &Persistence,
    student_id: i64,
    grade_id: i64,
) -> Result<EnrollmentCheckResponse, ApiError> {
    let enrolled: bool = queries::is_student_enrolled_in_grade(persistence, student_id, grade_id)
        .map_err(translate_core_error)?;
    Ok(EnrollmentCheckResponse {
        student_id,
        grade_id: Some(grade_id),
        enrolled,
    })
}

/// Checks whether a student has any currently active enrollment.
///
/// # Errors
///
/// Returns an error for an invalid student ID or a store failure.
pub fn check_has_active_enrollment(
    persistence: &Persistence,
    student_id: i64,
) -> Result<EnrollmentCheckResponse, ApiError> {
    let enrolled: bool = queries::has_active_enrollment(persistence, student_id)
        .map_err(translate_core_error)?;
    Ok(EnrollmentCheckResponse {
        student_id,
        grade_id: None,
        enrolled,
    })
}

/// Counts the currently active enrollments in a grade.
///
/// # Errors
///
/// Returns an error for an invalid grade ID or a store failure.
pub fn count_active_enrollments_for_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<CountResponse, ApiError> {
    let count: i64 = queries::count_active_enrollments_by_grade_id(persistence, grade_id)
        .map_err(translate_core_error)?;
    Ok(CountResponse { count })
}

/// Counts all enrollments for a student.
///
/// # Errors
///
/// Returns an error for an invalid student ID or a store failure.
pub fn count_enrollments_for_student(
    persistence: &Persistence,
    student_id: i64,
) -> Result<CountResponse, ApiError> {
    let count: i64 = queries::count_enrollments_by_student_id(persistence, student_id)
        .map_err(translate_core_error)?;
    Ok(CountResponse { count })
}

// ============================================================================
// Grade catalog
// ============================================================================

fn fetch_grade(persistence: &Persistence, grade_id: i64) -> Result<Grade, ApiError> {
    let typed_id: GradeId = GradeId::new(grade_id).map_err(translate_domain_error)?;
    persistence
        .get_grade_by_id(grade_id)?
        .ok_or_else(|| translate_domain_error(DomainError::GradeNotFound(typed_id)))
}

/// Creates a new grade catalog entry.
///
/// # Errors
///
/// Returns an error if a field fails validation or the name or level is
/// already in use.
pub fn create_grade(
    persistence: &Persistence,
    request: &CreateGradeRequest,
) -> Result<GradeResponse, ApiError> {
    info!(name = %request.name, level = request.level, "Creating grade");

    let level: GradeLevel = GradeLevel::new(request.level).map_err(translate_domain_error)?;
    let grade: Grade = Grade::new(
        &request.name,
        request.description.as_deref(),
        level,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_domain_error)?;

    if persistence.get_grade_by_name(&grade.name)?.is_some() {
        return Err(translate_domain_error(DomainError::DuplicateGradeName(
            grade.name,
        )));
    }
    if persistence.get_grade_by_level(request.level)?.is_some() {
        return Err(translate_domain_error(DomainError::DuplicateGradeLevel(
            request.level,
        )));
    }

    let created: Grade = persistence.create_grade(&grade)?;
    GradeResponse::from_grade(&created)
}

/// Retrieves a grade by ID.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no such grade exists.
pub fn get_grade(persistence: &Persistence, grade_id: i64) -> Result<GradeResponse, ApiError> {
    GradeResponse::from_grade(&fetch_grade(persistence, grade_id)?)
}

/// Retrieves a grade by its trimmed name.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no such grade exists.
pub fn find_grade_by_name(
    persistence: &Persistence,
    name: &str,
) -> Result<GradeResponse, ApiError> {
    let grade: Grade =
        persistence
            .get_grade_by_name(name)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Grade"),
                message: format!("No grade named '{}'", name.trim()),
            })?;
    GradeResponse::from_grade(&grade)
}

/// Retrieves a grade by its numeric level.
///
/// # Errors
///
/// Returns an error for an out-of-range level, or
/// `ApiError::ResourceNotFound` if no such grade exists.
pub fn find_grade_by_level(
    persistence: &Persistence,
    level: u8,
) -> Result<GradeResponse, ApiError> {
    GradeLevel::new(level).map_err(translate_domain_error)?;
    let grade: Grade =
        persistence
            .get_grade_by_level(level)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Grade"),
                message: format!("No grade at level {level}"),
            })?;
    GradeResponse::from_grade(&grade)
}

/// Lists all grades ordered by level.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_all_grades(persistence: &Persistence) -> Result<GradeListResponse, ApiError> {
    let grades: Vec<Grade> = persistence.get_all_grades()?;
    GradeListResponse::from_grades(&grades)
}

/// Lists all active grades ordered by level.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_active_grades(persistence: &Persistence) -> Result<GradeListResponse, ApiError> {
    let grades: Vec<Grade> = persistence.get_active_grades()?;
    GradeListResponse::from_grades(&grades)
}

/// Lists all inactive grades ordered by level.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_inactive_grades(persistence: &Persistence) -> Result<GradeListResponse, ApiError> {
    let grades: Vec<Grade> = persistence.get_inactive_grades()?;
    GradeListResponse::from_grades(&grades)
}

/// Checks whether a grade exists by ID.
///
/// # Errors
///
/// Returns an error for a non-positive ID or a store failure.
pub fn check_grade_exists(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<GradeExistsResponse, ApiError> {
    GradeId::new(grade_id).map_err(translate_domain_error)?;
    Ok(GradeExistsResponse {
        exists: persistence.grade_exists(grade_id)?,
    })
}

/// Checks whether a grade exists by its trimmed name.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn check_grade_exists_by_name(
    persistence: &Persistence,
    name: &str,
) -> Result<GradeExistsResponse, ApiError> {
    Ok(GradeExistsResponse {
        exists: persistence.grade_exists_by_name(name)?,
    })
}

/// Checks whether a grade exists at the given level.
///
/// # Errors
///
/// Returns an error for an out-of-range level or a store failure.
pub fn check_grade_exists_by_level(
    persistence: &Persistence,
    level: u8,
) -> Result<GradeExistsResponse, ApiError> {
    GradeLevel::new(level).map_err(translate_domain_error)?;
    Ok(GradeExistsResponse {
        exists: persistence.grade_exists_by_level(level)?,
    })
}

/// Counts all grades in the catalog.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn count_grades(persistence: &Persistence) -> Result<CountResponse, ApiError> {
    Ok(CountResponse {
        count: persistence.count_grades()?,
    })
}

/// Counts the active grades in the catalog.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn count_active_grades(persistence: &Persistence) -> Result<CountResponse, ApiError> {
    Ok(CountResponse {
        count: persistence.count_active_grades()?,
    })
}

/// Updates a grade's name, description, and level.
///
/// Uniqueness is re-checked only for fields that actually change.
///
/// # Errors
///
/// Returns an error if the grade is missing, a field fails validation, or
/// the new name or level is already in use.
pub fn update_grade(
    persistence: &Persistence,
    grade_id: i64,
    request: &UpdateGradeRequest,
) -> Result<GradeResponse, ApiError> {
    info!(grade_id, "Updating grade");

    let existing: Grade = fetch_grade(persistence, grade_id)?;
    let level: GradeLevel = GradeLevel::new(request.level).map_err(translate_domain_error)?;
    let updated: Grade = existing
        .with_details(
            &request.name,
            request.description.as_deref(),
            level,
            OffsetDateTime::now_utc(),
        )
        .map_err(translate_domain_error)?;

    if updated.name != existing.name && persistence.get_grade_by_name(&updated.name)?.is_some() {
        return Err(translate_domain_error(DomainError::DuplicateGradeName(
            updated.name,
        )));
    }
    if updated.level != existing.level
        && persistence.get_grade_by_level(request.level)?.is_some()
    {
        return Err(translate_domain_error(DomainError::DuplicateGradeLevel(
            request.level,
        )));
    }

    let persisted: Grade = persistence.update_grade(&updated)?;
    GradeResponse::from_grade(&persisted)
}

/// Marks a grade active. Idempotent; reports whether anything changed.
///
/// # Errors
///
/// Returns an error if the grade is missing or the write fails.
pub fn activate_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<SetGradeActiveResponse, ApiError> {
    info!(grade_id, "Activating grade");
    set_grade_active(persistence, grade_id, true)
}

/// Marks a grade inactive. Idempotent; reports whether anything changed.
///
/// An inactive grade rejects new enrollments but existing enrollments are
/// untouched.
///
/// # Errors
///
/// Returns an error if the grade is missing or the write fails.
pub fn deactivate_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<SetGradeActiveResponse, ApiError> {
    info!(grade_id, "Deactivating grade");
    set_grade_active(persistence, grade_id, false)
}

fn set_grade_active(
    persistence: &Persistence,
    grade_id: i64,
    target: bool,
) -> Result<SetGradeActiveResponse, ApiError> {
    let existing: Grade = fetch_grade(persistence, grade_id)?;
    let changed: bool = existing.is_active != target;

    if changed {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let toggled: Grade = if target {
            existing.activated(now)
        } else {
            existing.deactivated(now)
        };
        persistence.update_grade(&toggled)?;
    }

    let state: &str = if target { "active" } else { "inactive" };
    let message: String = if changed {
        format!("Grade {grade_id} is now {state}")
    } else {
        format!("Grade {grade_id} was already {state}")
    };
    Ok(SetGradeActiveResponse {
        grade_id,
        is_active: target,
        changed,
        message,
    })
}

/// Deletes an inactive grade from the catalog.
///
/// # Errors
///
/// Returns an error if the grade is missing, still active, or still
/// referenced by enrollment records.
pub fn delete_grade(
    persistence: &Persistence,
    grade_id: i64,
) -> Result<DeleteGradeResponse, ApiError> {
    info!(grade_id, "Deleting grade");

    let existing: Grade = fetch_grade(persistence, grade_id)?;
    if existing.is_active {
        let typed_id: GradeId = GradeId::new(grade_id).map_err(translate_domain_error)?;
        return Err(translate_domain_error(DomainError::GradeStillActive(
            typed_id,
        )));
    }

    let deleted: bool = persistence.delete_grade(grade_id)?;
    Ok(DeleteGradeResponse {
        grade_id,
        deleted,
        message: format!("Grade {grade_id} deleted"),
    })
}
