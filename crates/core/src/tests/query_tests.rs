// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryStore, days_from_now, seeded_store};
use crate::error::CoreError;
use crate::policy::EnrollmentPolicy;
use crate::queries;
use gradetrack_domain::{DomainError, Enrollment};
use time::OffsetDateTime;

fn store_with_history() -> MemoryStore {
    let store: MemoryStore = seeded_store();
    let policy: EnrollmentPolicy = EnrollmentPolicy::new();
    // Student 7: grade 1 for days -60..-30, grade 2 active since day -29.
    policy.enroll(&store, 7, 1, Some(days_from_now(-60))).unwrap();
    policy
        .end_enrollment(&store, 7, 1, Some(days_from_now(-30)))
        .unwrap();
    policy.enroll(&store, 7, 2, Some(days_from_now(-29))).unwrap();
    // Student 8: grade 1 active since day -10.
    policy.enroll(&store, 8, 1, Some(days_from_now(-10))).unwrap();
    store
}

#[test]
fn get_enrollment_by_id_round_trips() {
    let store: MemoryStore = store_with_history();

    let found: Enrollment = queries::get_enrollment_by_id(&store, 1).unwrap().unwrap();
    assert_eq!(found.enrollment_id(), Some(1));
    assert!(queries::get_enrollment_by_id(&store, 404).unwrap().is_none());
}

#[test]
fn get_enrollments_by_student_id_returns_full_history() {
    let store: MemoryStore = store_with_history();

    let history: Vec<Enrollment> = queries::get_enrollments_by_student_id(&store, 7).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].start_date > history[1].start_date);
}

#[test]
fn get_enrollments_by_student_id_rejects_non_positive_id() {
    let store: MemoryStore = seeded_store();

    assert_eq!(
        queries::get_enrollments_by_student_id(&store, -1).unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidStudentId(-1))
    );
}

#[test]
fn current_enrollment_reflects_lifecycle_state() {
    let store: MemoryStore = store_with_history();

    let current: Enrollment = queries::get_current_enrollment_by_student_id(&store, 7)
        .unwrap()
        .unwrap();
    assert_eq!(current.grade_id.value(), 2);
    assert!(
        queries::get_current_enrollment_by_student_id(&store, 99)
            .unwrap()
            .is_none()
    );
}

#[test]
fn active_enrollment_queries_agree() {
    let store: MemoryStore = store_with_history();

    let all_active: Vec<Enrollment> = queries::get_all_active_enrollments(&store).unwrap();
    assert_eq!(all_active.len(), 2);

    let grade_one: Vec<Enrollment> =
        queries::get_active_enrollments_by_grade_id(&store, 1).unwrap();
    assert_eq!(grade_one.len(), 1);
    assert_eq!(grade_one[0].student_id.value(), 8);

    assert_eq!(
        queries::count_active_enrollments_by_grade_id(&store, 1).unwrap(),
        1
    );
    assert_eq!(
        queries::count_active_enrollments_by_grade_id(&store, 2).unwrap(),
        1
    );
    assert!(queries::has_active_enrollment(&store, 7).unwrap());
    assert!(queries::is_student_enrolled_in_grade(&store, 7, 2).unwrap());
    assert!(!queries::is_student_enrolled_in_grade(&store, 7, 1).unwrap());
}

#[test]
fn active_on_date_uses_open_interval() {
    let store: MemoryStore = store_with_history();

    // Day -45 falls inside student 7's first span and before everyone else.
    let mid: Vec<Enrollment> =
        queries::get_enrollments_active_on_date(&store, days_from_now(-45)).unwrap();
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].student_id.value(), 7);

    // The exact end instant is excluded.
    let at_end: Vec<Enrollment> =
        queries::get_enrollments_active_on_date(&store, days_from_now(-30)).unwrap();
    assert!(at_end.iter().all(|enrollment| !enrollment.has_ended()));
}

#[test]
fn active_on_date_rejects_future_date() {
    let store: MemoryStore = seeded_store();

    let err: CoreError =
        queries::get_enrollments_active_on_date(&store, days_from_now(1)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::QueryDateInFuture(_))
    ));
}

#[test]
fn date_range_query_returns_overlapping_enrollments() {
    let store: MemoryStore = store_with_history();

    let overlapping: Vec<Enrollment> = queries::get_enrollments_by_student_id_and_date_range(
        &store,
        7,
        days_from_now(-40),
        days_from_now(-35),
    )
    .unwrap();
    assert_eq!(overlapping.len(), 1);
    assert_eq!(overlapping[0].grade_id.value(), 1);

    let spanning: Vec<Enrollment> = queries::get_enrollments_by_student_id_and_date_range(
        &store,
        7,
        days_from_now(-60),
        days_from_now(0),
    )
    .unwrap();
    assert_eq!(spanning.len(), 2);
}

#[test]
fn date_range_query_rejects_inverted_range() {
    let store: MemoryStore = seeded_store();

    let err: CoreError = queries::get_enrollments_by_student_id_and_date_range(
        &store,
        7,
        days_from_now(-5),
        days_from_now(-10),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidDateRange { .. })
    ));
}

#[test]
fn repeated_reads_are_idempotent() {
    let store: MemoryStore = store_with_history();
    let date: OffsetDateTime = days_from_now(-45);

    let first: Vec<Enrollment> = queries::get_enrollments_active_on_date(&store, date).unwrap();
    let second: Vec<Enrollment> = queries::get_enrollments_active_on_date(&store, date).unwrap();
    assert_eq!(first, second);

    assert_eq!(
        queries::count_enrollments_by_student_id(&store, 7).unwrap(),
        queries::count_enrollments_by_student_id(&store, 7).unwrap()
    );
}
