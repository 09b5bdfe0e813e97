//! Dependency table: atomic per-task completion flags
//!
//! A `TR × TC` grid of `AtomicBool`, initially `false`, each cell
//! transitioning monotonically to `true` exactly once — set by the worker
//! that executes task `(i, j)`, after all of that task's matrix and
//! reflector writes. `set` uses release ordering and `get` uses acquire
//! ordering, so any worker that observes `get(i, j) == true` also observes
//! every write task `(i, j)` made before calling `set`.
//!
//! A second, independent `claimed` grid guards against a task descriptor
//! reaching a worker twice: because the same `(i, j)` can be pushed to the
//! wait queue both at startup and again by rule R1, exactly one of those
//! copies should actually run the kernel. [`DependencyTable::claim`] is a
//! compare-and-swap a worker performs before executing a popped task; only
//! the winner proceeds.

use std::sync::atomic::{AtomicBool, Ordering};

/// Atomic `TR × TC` grid of completion flags, plus an execution-claim grid.
pub struct DependencyTable {
    flags: Vec<AtomicBool>,
    claimed: Vec<AtomicBool>,
    tc: usize,
}

impl DependencyTable {
    /// Allocate an all-`false` table for a `tr × tc` task grid.
    pub fn new(tr: usize, tc: usize) -> Self {
        let flags = (0..tr * tc).map(|_| AtomicBool::new(false)).collect();
        let claimed = (0..tr * tc).map(|_| AtomicBool::new(false)).collect();
        Self { flags, claimed, tc }
    }

    /// Mark `(i, j)` complete (store-release). Must be called at most once
    /// per `(i, j)`, by the worker that executed that task.
    #[inline]
    pub fn set(&self, i: usize, j: usize) {
        self.flags[i * self.tc + j].store(true, Ordering::Release);
    }

    /// Read whether `(i, j)` has completed (load-acquire).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.flags[i * self.tc + j].load(Ordering::Acquire)
    }

    /// Attempt to claim `(i, j)` for execution. Returns `true` exactly once
    /// across all callers; a second caller (holding a duplicate queue entry
    /// for the same cell) gets `false` and must discard its copy unexecuted.
    #[inline]
    pub fn claim(&self, i: usize, j: usize) -> bool {
        self.claimed[i * self.tc + j]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
