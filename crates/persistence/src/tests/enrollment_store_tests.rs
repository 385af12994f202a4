// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{days_from_now, new_enrollment, now_micros, persistence, seed_grade};
use crate::Persistence;
use gradetrack::{EnrollmentStore, GradeCatalog, StoreError};
use gradetrack_domain::{Enrollment, Grade, GradeId, StudentId};
use time::OffsetDateTime;

fn student(value: i64) -> StudentId {
    StudentId::new(value).unwrap()
}

fn grade_id(grade: &Grade) -> GradeId {
    GradeId::new(grade.grade_id().unwrap()).unwrap()
}

#[test]
fn save_assigns_id_and_round_trips() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let start: OffsetDateTime = days_from_now(-5);

    let saved: Enrollment = store.save(new_enrollment(&first, 10, start)).unwrap();
    let id: i64 = saved.enrollment_id().unwrap();

    let fetched: Enrollment = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(fetched.start_date, start);
    assert!(fetched.is_currently_active());
}

#[test]
fn save_rejects_unknown_grade_reference() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let phantom: Grade = Grade::with_id(
        999,
        first.name.clone(),
        first.description.clone(),
        first.level,
        first.is_active,
        first.created_at,
        first.updated_at,
    );

    let err: StoreError = store
        .save(new_enrollment(&phantom, 10, days_from_now(-1)))
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

#[test]
fn grade_catalog_lookup_round_trips() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);

    let found: Grade = store.find_grade_by_id(grade_id(&first)).unwrap().unwrap();
    assert_eq!(found, first);
    assert!(
        store
            .find_grade_by_id(GradeId::new(999).unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn current_enrollment_and_activity_predicates() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let second: Grade = seed_grade(&store, "Second Grade", 2);

    store
        .save(new_enrollment(&first, 10, days_from_now(-20)))
        .unwrap();
    store
        .save(new_enrollment(&second, 11, days_from_now(-10)))
        .unwrap();

    let current: Enrollment = store
        .find_current_enrollment_by_student_id(student(10))
        .unwrap()
        .unwrap();
    assert_eq!(current.grade_id, grade_id(&first));

    assert!(store.has_active_enrollment(student(10)).unwrap());
    assert!(
        store
            .is_student_enrolled_in_grade(student(10), grade_id(&first))
            .unwrap()
    );
    assert!(
        !store
            .is_student_enrolled_in_grade(student(10), grade_id(&second))
            .unwrap()
    );
    assert!(!store.has_active_enrollment(student(99)).unwrap());

    assert_eq!(store.find_all_active_enrollments().unwrap().len(), 2);
    assert_eq!(
        store
            .find_active_enrollments_by_grade_id(grade_id(&first))
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        store
            .count_active_enrollments_by_grade_id(grade_id(&second))
            .unwrap(),
        1
    );
}

#[test]
fn end_enrollment_closes_the_pairing_once() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let end: OffsetDateTime = days_from_now(-1);

    store
        .save(new_enrollment(&first, 10, days_from_now(-30)))
        .unwrap();

    let ended: Enrollment = store
        .end_enrollment(student(10), grade_id(&first), end)
        .unwrap()
        .unwrap();
    assert!(!ended.is_active);
    assert_eq!(ended.end_date, Some(end));

    // The pairing is no longer active, so a second end is a no-op.
    assert!(
        store
            .end_enrollment(student(10), grade_id(&first), end)
            .unwrap()
            .is_none()
    );
    assert!(!store.has_active_enrollment(student(10)).unwrap());
}

#[test]
fn transfer_commits_end_and_begin_together() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let second: Grade = seed_grade(&store, "Second Grade", 2);
    let transfer_date: OffsetDateTime = days_from_now(-1);

    let old: Enrollment = store
        .save(new_enrollment(&first, 10, days_from_now(-30)))
        .unwrap();

    let replacement: Enrollment = new_enrollment(&second, 10, transfer_date);
    let new: Enrollment = store
        .transfer_enrollment(grade_id(&first), transfer_date, replacement)
        .unwrap();

    assert_eq!(new.grade_id, grade_id(&second));
    assert!(new.is_currently_active());

    let ended: Enrollment = store
        .find_by_id(old.enrollment_id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(ended.end_date, Some(transfer_date));
    assert!(!ended.is_active);

    assert_eq!(store.find_all_active_enrollments().unwrap().len(), 1);
    assert_eq!(store.count_enrollments_by_student_id(student(10)).unwrap(), 2);
}

#[test]
fn transfer_without_active_source_writes_nothing() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let second: Grade = seed_grade(&store, "Second Grade", 2);

    let replacement: Enrollment = new_enrollment(&second, 10, days_from_now(-1));
    let err: StoreError = store
        .transfer_enrollment(grade_id(&first), days_from_now(-1), replacement)
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.count_enrollments_by_student_id(student(10)).unwrap(), 0);
}

#[test]
fn active_on_date_is_an_open_interval() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let start: OffsetDateTime = days_from_now(-30);
    let end: OffsetDateTime = days_from_now(-10);

    store.save(new_enrollment(&first, 10, start)).unwrap();
    store.end_enrollment(student(10), grade_id(&first), end).unwrap();

    // Inside the span.
    assert_eq!(
        store
            .find_enrollments_active_on_date(days_from_now(-20))
            .unwrap()
            .len(),
        1
    );
    // Both endpoints are excluded.
    assert!(store.find_enrollments_active_on_date(start).unwrap().is_empty());
    assert!(store.find_enrollments_active_on_date(end).unwrap().is_empty());
}

#[test]
fn date_range_matches_overlapping_enrollments() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let second: Grade = seed_grade(&store, "Second Grade", 2);

    store
        .save(new_enrollment(&first, 10, days_from_now(-60)))
        .unwrap();
    store
        .end_enrollment(student(10), grade_id(&first), days_from_now(-30))
        .unwrap();
    store
        .save(new_enrollment(&second, 10, days_from_now(-29)))
        .unwrap();

    let early: Vec<Enrollment> = store
        .find_enrollments_by_student_id_and_date_range(
            student(10),
            days_from_now(-50),
            days_from_now(-40),
        )
        .unwrap();
    assert_eq!(early.len(), 1);
    assert_eq!(early[0].grade_id, grade_id(&first));

    let spanning: Vec<Enrollment> = store
        .find_enrollments_by_student_id_and_date_range(
            student(10),
            days_from_now(-60),
            now_micros(),
        )
        .unwrap();
    assert_eq!(spanning.len(), 2);

    let disjoint: Vec<Enrollment> = store
        .find_enrollments_by_student_id_and_date_range(
            student(10),
            days_from_now(-90),
            days_from_now(-70),
        )
        .unwrap();
    assert!(disjoint.is_empty());
}

#[test]
fn history_is_ordered_most_recent_start_first() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);
    let second: Grade = seed_grade(&store, "Second Grade", 2);

    store
        .save(new_enrollment(&first, 10, days_from_now(-60)))
        .unwrap();
    store
        .end_enrollment(student(10), grade_id(&first), days_from_now(-30))
        .unwrap();
    store
        .save(new_enrollment(&second, 10, days_from_now(-29)))
        .unwrap();

    let history: Vec<Enrollment> = store.find_by_student_id(student(10)).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].grade_id, grade_id(&second));
    assert_eq!(history[1].grade_id, grade_id(&first));

    let by_grade: Vec<Enrollment> = store.find_by_grade_id(grade_id(&first)).unwrap();
    assert_eq!(by_grade.len(), 1);
}

#[test]
fn delete_by_id_reports_whether_a_row_was_deleted() {
    let store: Persistence = persistence();
    let first: Grade = seed_grade(&store, "First Grade", 1);

    let saved: Enrollment = store
        .save(new_enrollment(&first, 10, days_from_now(-5)))
        .unwrap();
    let id: i64 = saved.enrollment_id().unwrap();

    assert!(store.delete_by_id(id).unwrap());
    assert!(!store.delete_by_id(id).unwrap());
    assert!(store.find_by_id(id).unwrap().is_none());
}
