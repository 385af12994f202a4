// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment policy engine for the GradeTrack academic records service.
//!
//! This crate owns the enrollment lifecycle state machine: how a student
//! moves between grades over time (enroll, transfer, end, graduate, remove)
//! and the temporal-consistency rules on enrollment records. The engine
//! holds no domain state of its own; all shared mutable state lives behind
//! the [`EnrollmentStore`] and [`GradeCatalog`] port traits, and per-student
//! mutual exclusion for mutating operations is provided by an in-process
//! keyed lock table.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod locks;
mod policy;
pub mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use locks::{StudentLockGuard, StudentLocks};
pub use policy::EnrollmentPolicy;
pub use store::{EnrollmentStore, GradeCatalog, StoreError};
