// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::{EnrollmentStore, GradeCatalog, StoreError};
use gradetrack_domain::{Enrollment, Grade, GradeId, GradeLevel, StudentId};
use std::collections::HashMap;
use std::sync::Mutex;
use time::{Duration, OffsetDateTime};

/// In-memory store used by the policy and query tests.
///
/// Each trait method takes the inner mutex for its whole body, so every
/// primitive is individually atomic just like the persistence backend.
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

struct MemoryStoreInner {
    grades: HashMap<i64, Grade>,
    enrollments: HashMap<i64, Enrollment>,
    next_enrollment_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryStoreInner {
                grades: HashMap::new(),
                enrollments: HashMap::new(),
                next_enrollment_id: 1,
            }),
        }
    }

    pub fn insert_grade(&self, grade_id: i64, name: &str, level: u8, is_active: bool) {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let grade: Grade = Grade::with_id(
            grade_id,
            String::from(name),
            None,
            GradeLevel::new(level).unwrap(),
            is_active,
            now,
            now,
        );
        self.inner.lock().unwrap().grades.insert(grade_id, grade);
    }
}

impl GradeCatalog for MemoryStore {
    fn find_grade_by_id(&self, grade_id: GradeId) -> Result<Option<Grade>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .grades
            .get(&grade_id.value())
            .cloned())
    }
}

impl EnrollmentStore for MemoryStore {
    fn save(&self, enrollment: Enrollment) -> Result<Enrollment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id: i64 = inner.next_enrollment_id;
        inner.next_enrollment_id += 1;
        let persisted: Enrollment = Enrollment::with_id(
            id,
            enrollment.student_id,
            enrollment.grade_id,
            enrollment.start_date,
            enrollment.end_date,
            enrollment.is_active,
            enrollment.created_at,
            enrollment.updated_at,
        );
        inner.enrollments.insert(id, persisted.clone());
        Ok(persisted)
    }

    fn find_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .enrollments
            .get(&enrollment_id)
            .cloned())
    }

    fn find_by_student_id(&self, student_id: StudentId) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Enrollment> = inner
            .enrollments
            .values()
            .filter(|enrollment| enrollment.student_id == student_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(matches)
    }

    fn find_by_grade_id(&self, grade_id: GradeId) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Enrollment> = inner
            .enrollments
            .values()
            .filter(|enrollment| enrollment.grade_id == grade_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(matches)
    }

    fn find_current_enrollment_by_student_id(
        &self,
        student_id: StudentId,
    ) -> Result<Option<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .enrollments
            .values()
            .find(|enrollment| {
                enrollment.student_id == student_id && enrollment.is_currently_active()
            })
            .cloned())
    }

    fn find_active_enrollments_by_grade_id(
        &self,
        grade_id: GradeId,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .enrollments
            .values()
            .filter(|enrollment| {
                enrollment.grade_id == grade_id && enrollment.is_currently_active()
            })
            .cloned()
            .collect())
    }

    fn find_all_active_enrollments(&self) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .enrollments
            .values()
            .filter(|enrollment| enrollment.is_currently_active())
            .cloned()
            .collect())
    }

    fn find_enrollments_active_on_date(
        &self,
        date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .enrollments
            .values()
            .filter(|enrollment| enrollment.is_valid_for_date(date))
            .cloned()
            .collect())
    }

    fn find_enrollments_by_student_id_and_date_range(
        &self,
        student_id: StudentId,
        start_date: OffsetDateTime,
        end_date: OffsetDateTime,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .enrollments
            .values()
            .filter(|enrollment| {
                enrollment.student_id == student_id
                    && enrollment.start_date <= end_date
                    && enrollment.end_date.is_none_or(|end| end >= start_date)
            })
            .cloned()
            .collect())
    }

    fn is_student_enrolled_in_grade(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.enrollments.values().any(|enrollment| {
            enrollment.student_id == student_id
                && enrollment.grade_id == grade_id
                && enrollment.is_currently_active()
        }))
    }

    fn has_active_enrollment(&self, student_id: StudentId) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.enrollments.values().any(|enrollment| {
            enrollment.student_id == student_id && enrollment.is_currently_active()
        }))
    }

    fn end_enrollment(
        &self,
        student_id: StudentId,
        grade_id: GradeId,
        end_date: OffsetDateTime,
    ) -> Result<Option<Enrollment>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(id) = inner
            .enrollments
            .values()
            .find(|enrollment| {
                enrollment.student_id == student_id
                    && enrollment.grade_id == grade_id
                    && enrollment.is_currently_active()
            })
            .and_then(Enrollment::enrollment_id)
        else {
            return Ok(None);
        };
        let current: Enrollment = inner.enrollments[&id].clone();
        let ended: Enrollment = current
            .ended(end_date, OffsetDateTime::now_utc())
            .map_err(|err| StoreError::Constraint(err.to_string()))?;
        inner.enrollments.insert(id, ended.clone());
        Ok(Some(ended))
    }

    fn transfer_enrollment(
        &self,
        from_grade_id: GradeId,
        transfer_date: OffsetDateTime,
        replacement: Enrollment,
    ) -> Result<Enrollment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(id) = inner
            .enrollments
            .values()
            .find(|enrollment| {
                enrollment.student_id == replacement.student_id
                    && enrollment.grade_id == from_grade_id
                    && enrollment.is_currently_active()
            })
            .and_then(Enrollment::enrollment_id)
        else {
            return Err(StoreError::NotFound(format!(
                "no active enrollment for student {} in grade {}",
                replacement.student_id.value(),
                from_grade_id.value()
            )));
        };
        let current: Enrollment = inner.enrollments[&id].clone();
        let ended: Enrollment = current
            .ended(transfer_date, OffsetDateTime::now_utc())
            .map_err(|err| StoreError::Constraint(err.to_string()))?;
        inner.enrollments.insert(id, ended);
        let new_id: i64 = inner.next_enrollment_id;
        inner.next_enrollment_id += 1;
        let persisted: Enrollment = Enrollment::with_id(
            new_id,
            replacement.student_id,
            replacement.grade_id,
            replacement.start_date,
            replacement.end_date,
            replacement.is_active,
            replacement.created_at,
            replacement.updated_at,
        );
        inner.enrollments.insert(new_id, persisted.clone());
        Ok(persisted)
    }

    fn delete_by_id(&self, enrollment_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .enrollments
            .remove(&enrollment_id)
            .is_some())
    }

    fn count_active_enrollments_by_grade_id(&self, grade_id: GradeId) -> Result<i64, StoreError> {
        let count: usize = self.find_active_enrollments_by_grade_id(grade_id)?.len();
        Ok(i64::try_from(count).unwrap())
    }

    fn count_enrollments_by_student_id(&self, student_id: StudentId) -> Result<i64, StoreError> {
        let count: usize = self.find_by_student_id(student_id)?.len();
        Ok(i64::try_from(count).unwrap())
    }
}

pub fn seeded_store() -> MemoryStore {
    let store: MemoryStore = MemoryStore::new();
    store.insert_grade(1, "First Grade", 1, true);
    store.insert_grade(2, "Second Grade", 2, true);
    store.insert_grade(3, "Third Grade", 3, false);
    store
}

pub fn days_from_now(days: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::days(days)
}
