// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::GradeLevel;
use crate::validation::{validate_grade_description, validate_grade_name};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A grade catalog entry (e.g. level 3 = "Third Grade").
///
/// Name and level are each unique across the catalog; uniqueness is enforced
/// where the full catalog is visible, not here. A grade is valid for
/// enrollment iff it is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the grade has not been persisted yet.
    grade_id: Option<i64>,
    /// The grade name (trimmed, unique).
    pub name: String,
    /// Optional free-form description (trimmed).
    pub description: Option<String>,
    /// The numeric level (1-12, unique).
    pub level: GradeLevel,
    /// Whether the grade currently accepts enrollments.
    pub is_active: bool,
    /// Creation timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last-update timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Grade {
    /// Creates a new active `Grade` without a persisted ID.
    ///
    /// Name and description are trimmed before validation and storage.
    ///
    /// # Arguments
    ///
    /// * `name` - The grade name
    /// * `description` - Optional description
    /// * `level` - The grade level
    /// * `now` - The creation instant
    ///
    /// # Errors
    ///
    /// Returns an error if the name or description fails field validation.
    pub fn new(
        name: &str,
        description: Option<&str>,
        level: GradeLevel,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_grade_name(name)?;
        validate_grade_description(description)?;
        Ok(Self {
            grade_id: None,
            name: name.trim().to_owned(),
            description: description.map(|d| d.trim().to_owned()),
            level,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a `Grade` with an existing persisted ID.
    ///
    /// Used when rehydrating a record from storage; field validation is the
    /// storage layer's concern at that point.
    #[must_use]
    pub const fn with_id(
        grade_id: i64,
        name: String,
        description: Option<String>,
        level: GradeLevel,
        is_active: bool,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            grade_id: Some(grade_id),
            name,
            description,
            level,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn grade_id(&self) -> Option<i64> {
        self.grade_id
    }

    /// Returns whether this grade may receive new enrollments.
    #[must_use]
    pub const fn is_valid_for_enrollment(&self) -> bool {
        self.is_active
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }

    /// Returns the name joined with the description, if one is set.
    #[must_use]
    pub fn full_description(&self) -> String {
        self.description.as_ref().map_or_else(
            || self.name.clone(),
            |description| format!("{} - {description}", self.name),
        )
    }

    /// Returns a copy with new name, description, and level.
    ///
    /// Identity, activity flag, and `created_at` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the new name or description fails field
    /// validation.
    pub fn with_details(
        &self,
        name: &str,
        description: Option<&str>,
        level: GradeLevel,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_grade_name(name)?;
        validate_grade_description(description)?;
        Ok(Self {
            grade_id: self.grade_id,
            name: name.trim().to_owned(),
            description: description.map(|d| d.trim().to_owned()),
            level,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: now,
        })
    }

    /// Returns a copy marked active.
    #[must_use]
    pub fn activated(&self, now: OffsetDateTime) -> Self {
        let mut grade: Self = self.clone();
        grade.is_active = true;
        grade.updated_at = now;
        grade
    }

    /// Returns a copy marked inactive.
    #[must_use]
    pub fn deactivated(&self, now: OffsetDateTime) -> Self {
        let mut grade: Self = self.clone();
        grade.is_active = false;
        grade.updated_at = now;
        grade
    }
}
