// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::handlers;
use crate::request_response::{CreateGradeRequest, EnrollStudentRequest, GradeResponse};
use gradetrack::EnrollmentPolicy;
use gradetrack_persistence::Persistence;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub fn context() -> (Persistence, EnrollmentPolicy) {
    (Persistence::new_in_memory().unwrap(), EnrollmentPolicy::new())
}

pub fn rfc3339_days_from_now(days: i64) -> String {
    (OffsetDateTime::now_utc() + Duration::days(days))
        .format(&Rfc3339)
        .unwrap()
}

pub fn seed_grade(persistence: &Persistence, name: &str, level: u8) -> GradeResponse {
    handlers::create_grade(
        persistence,
        &CreateGradeRequest {
            name: String::from(name),
            description: None,
            level,
        },
    )
    .unwrap()
}

pub fn enroll(
    persistence: &Persistence,
    policy: &EnrollmentPolicy,
    student_id: i64,
    grade_id: i64,
    start_days_ago: i64,
) -> crate::request_response::EnrollmentResponse {
    handlers::enroll_student(
        persistence,
        policy,
        &EnrollStudentRequest {
            student_id,
            grade_id,
            start_date: Some(rfc3339_days_from_now(-start_days_ago)),
        },
    )
    .unwrap()
}
