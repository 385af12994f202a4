// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, GradeId, GradeLevel, StudentId};

#[test]
fn test_student_id_creation() {
    let student_id: StudentId = StudentId::new(42).unwrap();
    assert_eq!(student_id.value(), 42);
}

#[test]
fn test_student_id_rejects_zero() {
    let result = StudentId::new(0);
    assert_eq!(result, Err(DomainError::InvalidStudentId(0)));
}

#[test]
fn test_student_id_rejects_negative() {
    let result = StudentId::new(-7);
    assert_eq!(result, Err(DomainError::InvalidStudentId(-7)));
}

#[test]
fn test_grade_id_creation() {
    let grade_id: GradeId = GradeId::new(3).unwrap();
    assert_eq!(grade_id.value(), 3);
}

#[test]
fn test_grade_id_rejects_non_positive() {
    assert!(GradeId::new(0).is_err());
    assert!(GradeId::new(-1).is_err());
}

#[test]
fn test_grade_level_bounds() {
    assert_eq!(GradeLevel::new(1).unwrap().number(), 1);
    assert_eq!(GradeLevel::new(12).unwrap().number(), 12);
    assert_eq!(GradeLevel::new(0), Err(DomainError::InvalidGradeLevel(0)));
    assert_eq!(GradeLevel::new(13), Err(DomainError::InvalidGradeLevel(13)));
}

#[test]
fn test_grade_level_display() {
    let level: GradeLevel = GradeLevel::new(7).unwrap();
    assert_eq!(level.to_string(), "7");
}

#[test]
fn test_invalid_grade_level_message() {
    let err: DomainError = GradeLevel::new(13).unwrap_err();
    assert_eq!(err.to_string(), "Grade level must be between 1 and 12, got 13");
}
