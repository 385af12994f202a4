// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{GradeId, StudentId};
use crate::validation::validate_start_date;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One contiguous span of a student's membership in one grade.
///
/// Records are immutable values; lifecycle mutations (`ended`) return a new
/// value keyed by the same identity. A mutation never changes
/// `enrollment_id`, `student_id`, `grade_id`, or `created_at`.
///
/// `is_active` and `end_date` are tracked independently; "currently active"
/// is the derived conjunction, not a stored convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the enrollment has not been persisted yet.
    enrollment_id: Option<i64>,
    /// The enrolled student.
    pub student_id: StudentId,
    /// The grade enrolled into.
    pub grade_id: GradeId,
    /// Enrollment start (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    /// Enrollment end (UTC), set by end/graduate/transfer.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    /// Activity flag, independent of `end_date`.
    pub is_active: bool,
    /// Creation timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last-update timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Enrollment {
    /// Creates a new active `Enrollment` without a persisted ID.
    ///
    /// The start date is validated against the enrollment window
    /// (`[now - 10 years, now + 1 day]`).
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is outside the allowed window.
    pub fn begin(
        student_id: StudentId,
        grade_id: GradeId,
        start_date: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_start_date(start_date, now)?;
        Ok(Self {
            enrollment_id: None,
            student_id,
            grade_id,
            start_date,
            end_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates an `Enrollment` with an existing persisted ID.
    ///
    /// Used when rehydrating a record from storage. The start-date window is
    /// deliberately not re-checked here: historical records may legitimately
    /// predate the window relative to the current clock.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn with_id(
        enrollment_id: i64,
        student_id: StudentId,
        grade_id: GradeId,
        start_date: OffsetDateTime,
        end_date: Option<OffsetDateTime>,
        is_active: bool,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            enrollment_id: Some(enrollment_id),
            student_id,
            grade_id,
            start_date,
            end_date,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn enrollment_id(&self) -> Option<i64> {
        self.enrollment_id
    }

    /// Returns whether the enrollment is currently active.
    #[must_use]
    pub const fn is_currently_active(&self) -> bool {
        self.is_active && self.end_date.is_none()
    }

    /// Returns whether the enrollment has ended.
    #[must_use]
    pub const fn has_ended(&self) -> bool {
        self.end_date.is_some()
    }

    /// Returns the enrollment duration in whole days.
    ///
    /// For an open enrollment the duration runs to the current instant.
    #[must_use]
    pub fn enrollment_duration(&self) -> i64 {
        let end: OffsetDateTime = self.end_date.unwrap_or_else(OffsetDateTime::now_utc);
        (end - self.start_date).whole_days()
    }

    /// Returns whether the enrollment spanned the given instant.
    ///
    /// The interval is open on both ends: the instant must lie strictly
    /// after the start and, for ended records, strictly before the end.
    #[must_use]
    pub fn is_valid_for_date(&self, date: OffsetDateTime) -> bool {
        date > self.start_date && self.end_date.is_none_or(|end| date < end)
    }

    /// Returns a copy with the enrollment ended at `end_date`.
    ///
    /// Sets `end_date`, clears `is_active`, and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EndDateBeforeStartDate` if the end date
    /// precedes the start date.
    pub fn ended(&self, end_date: OffsetDateTime, now: OffsetDateTime) -> Result<Self, DomainError> {
        if end_date < self.start_date {
            return Err(DomainError::EndDateBeforeStartDate {
                start_date: self.start_date,
                end_date,
            });
        }
        let mut enrollment: Self = self.clone();
        enrollment.end_date = Some(end_date);
        enrollment.is_active = false;
        enrollment.updated_at = now;
        Ok(enrollment)
    }
}
