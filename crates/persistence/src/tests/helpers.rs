// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use gradetrack_domain::{Enrollment, Grade, GradeId, GradeLevel, StudentId};
use time::{Duration, OffsetDateTime};

pub fn persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// A UTC instant truncated to microseconds, matching storage precision, so
/// round-tripped values compare equal.
pub fn now_micros() -> OffsetDateTime {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap()
}

pub fn days_from_now(days: i64) -> OffsetDateTime {
    now_micros() + Duration::days(days)
}

pub fn seed_grade(persistence: &Persistence, name: &str, level: u8) -> Grade {
    let grade: Grade =
        Grade::new(name, None, GradeLevel::new(level).unwrap(), now_micros()).unwrap();
    persistence.create_grade(&grade).unwrap()
}

pub fn new_enrollment(grade: &Grade, student_id: i64, start_date: OffsetDateTime) -> Enrollment {
    Enrollment::begin(
        StudentId::new(student_id).unwrap(),
        GradeId::new(grade.grade_id().unwrap()).unwrap(),
        start_date,
        now_micros(),
    )
    .unwrap()
}
