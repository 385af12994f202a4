// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{MAX_GRADE_LEVEL, MIN_GRADE_LEVEL};
use serde::{Deserialize, Serialize};

/// Identifies a student in the external student registry.
///
/// Students are not modeled further by this service; the identifier is the
/// only thing enrollment records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId {
    /// The numeric identifier (always positive).
    value: i64,
}

impl StudentId {
    /// Creates a new `StudentId`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStudentId` if the value is not positive.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value > 0 {
            Ok(Self { value })
        } else {
            Err(DomainError::InvalidStudentId(value))
        }
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Identifies a grade catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradeId {
    /// The numeric identifier (always positive).
    value: i64,
}

impl GradeId {
    /// Creates a new `GradeId`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGradeId` if the value is not positive.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value > 0 {
            Ok(Self { value })
        } else {
            Err(DomainError::InvalidGradeId(value))
        }
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

impl std::fmt::Display for GradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a school grade level.
///
/// Levels are domain constants numbered 1 through 12 and are unique across
/// the grade catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradeLevel {
    /// The level number (1-12).
    number: u8,
}

impl GradeLevel {
    /// Creates a new `GradeLevel`.
    ///
    /// # Arguments
    ///
    /// * `number` - The level number (must be between 1 and 12 inclusive)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidGradeLevel` if the number is not in the
    /// range 1-12.
    pub const fn new(number: u8) -> Result<Self, DomainError> {
        if number >= MIN_GRADE_LEVEL && number <= MAX_GRADE_LEVEL {
            Ok(Self { number })
        } else {
            Err(DomainError::InvalidGradeLevel(number))
        }
    }

    /// Returns the level number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)
    }
}
