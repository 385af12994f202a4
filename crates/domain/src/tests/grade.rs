// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{level, reference_now};
use crate::{DomainError, Grade};
use time::OffsetDateTime;

fn create_test_grade() -> Grade {
    Grade::new(
        "Third Grade",
        Some("Elementary school third grade"),
        level(3),
        reference_now(),
    )
    .unwrap()
}

#[test]
fn test_grade_creation() {
    let grade: Grade = create_test_grade();
    assert_eq!(grade.grade_id(), None);
    assert_eq!(grade.name, "Third Grade");
    assert_eq!(grade.level.number(), 3);
    assert!(grade.is_active);
    assert!(grade.is_valid_for_enrollment());
}

#[test]
fn test_grade_trims_name_and_description() {
    let grade: Grade = Grade::new(
        "  First Grade  ",
        Some("  Elementary school first grade  "),
        level(1),
        reference_now(),
    )
    .unwrap();
    assert_eq!(grade.name, "First Grade");
    assert_eq!(
        grade.description.as_deref(),
        Some("Elementary school first grade")
    );
}

#[test]
fn test_grade_rejects_blank_name() {
    let result = Grade::new("   ", None, level(1), reference_now());
    assert!(matches!(result, Err(DomainError::InvalidGradeName(_))));
}

#[test]
fn test_grade_rejects_short_name() {
    let result = Grade::new("A", None, level(1), reference_now());
    assert!(matches!(result, Err(DomainError::InvalidGradeName(_))));
}

#[test]
fn test_grade_rejects_long_name() {
    let name: String = "x".repeat(101);
    let result = Grade::new(&name, None, level(1), reference_now());
    assert!(matches!(result, Err(DomainError::InvalidGradeName(_))));
}

#[test]
fn test_grade_rejects_short_description() {
    let result = Grade::new("First Grade", Some("too short"), level(1), reference_now());
    assert!(matches!(
        result,
        Err(DomainError::InvalidGradeDescription(_))
    ));
}

#[test]
fn test_grade_allows_missing_description() {
    let grade: Grade = Grade::new("First Grade", None, level(1), reference_now()).unwrap();
    assert_eq!(grade.description, None);
}

#[test]
fn test_full_description_with_and_without_description() {
    let grade: Grade = create_test_grade();
    assert_eq!(
        grade.full_description(),
        "Third Grade - Elementary school third grade"
    );

    let bare: Grade = Grade::new("First Grade", None, level(1), reference_now()).unwrap();
    assert_eq!(bare.full_description(), "First Grade");
}

#[test]
fn test_deactivated_grade_not_valid_for_enrollment() {
    let later: OffsetDateTime = reference_now() + time::Duration::hours(1);
    let grade: Grade = create_test_grade().deactivated(later);
    assert!(!grade.is_active);
    assert!(!grade.is_valid_for_enrollment());
    assert_eq!(grade.updated_at, later);
    assert_eq!(grade.created_at, reference_now());
}

#[test]
fn test_activated_restores_enrollment_validity() {
    let grade: Grade = create_test_grade().deactivated(reference_now());
    let reactivated: Grade = grade.activated(reference_now());
    assert!(reactivated.is_valid_for_enrollment());
}

#[test]
fn test_with_details_preserves_identity_and_creation() {
    let grade: Grade = Grade::with_id(
        9,
        String::from("Third Grade"),
        None,
        level(3),
        true,
        reference_now(),
        reference_now(),
    );
    let later: OffsetDateTime = reference_now() + time::Duration::days(1);
    let updated: Grade = grade
        .with_details("Fourth Grade", Some("Elementary school fourth grade"), level(4), later)
        .unwrap();
    assert_eq!(updated.grade_id(), Some(9));
    assert_eq!(updated.name, "Fourth Grade");
    assert_eq!(updated.level.number(), 4);
    assert_eq!(updated.created_at, reference_now());
    assert_eq!(updated.updated_at, later);
}
