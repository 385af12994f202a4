// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-student keyed lock table.
//!
//! Mutating lifecycle operations for a student must run with effective
//! mutual exclusion, otherwise two concurrent enroll calls could both pass
//! the single-active-enrollment check and create two active records. The
//! table tracks which student identifiers are currently held and parks
//! contending callers on a condvar; entries exist only while held, so the
//! table stays bounded by the number of in-flight operations.

use gradetrack_domain::StudentId;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Recovers the guard from a poisoned mutex.
///
/// The held-set is a plain `HashSet`; a panic in another thread cannot
/// leave it torn, so continuing with the inner value is sound.
fn lock_unpoisoned<'a>(mutex: &'a Mutex<HashSet<i64>>) -> MutexGuard<'a, HashSet<i64>> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keyed lock table serializing mutating operations per student.
#[derive(Debug, Default)]
pub struct StudentLocks {
    /// Student identifiers currently holding their lock.
    held: Mutex<HashSet<i64>>,
    /// Signaled whenever a lock is released.
    released: Condvar,
}

impl StudentLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for a student, blocking until it is free.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn acquire(&self, student_id: StudentId) -> StudentLockGuard<'_> {
        let mut held: MutexGuard<'_, HashSet<i64>> = lock_unpoisoned(&self.held);
        while held.contains(&student_id.value()) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(student_id.value());
        drop(held);
        StudentLockGuard {
            locks: self,
            student_id: student_id.value(),
        }
    }
}

/// Guard holding a student's lock; releases it on drop.
#[derive(Debug)]
pub struct StudentLockGuard<'a> {
    /// The owning lock table.
    locks: &'a StudentLocks,
    /// The held student identifier.
    student_id: i64,
}

impl Drop for StudentLockGuard<'_> {
    fn drop(&mut self) {
        let mut held: MutexGuard<'_, HashSet<i64>> = lock_unpoisoned(&self.locks.held);
        held.remove(&self.student_id);
        drop(held);
        self.locks.released.notify_all();
    }
}
