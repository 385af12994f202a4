// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod grade;
mod types;

use crate::{GradeId, GradeLevel, StudentId};
use time::OffsetDateTime;
use time::macros::datetime;

/// A fixed reference instant used across the domain tests.
pub fn reference_now() -> OffsetDateTime {
    datetime!(2026-02-01 12:00:00 UTC)
}

pub fn student(value: i64) -> StudentId {
    StudentId::new(value).unwrap()
}

pub fn grade_id(value: i64) -> GradeId {
    GradeId::new(value).unwrap()
}

pub fn level(number: u8) -> GradeLevel {
    GradeLevel::new(number).unwrap()
}
