//! Householder reflector storage
//!
//! Two parallel length-`M` arrays hold the scalar pair `(up, b)` produced by
//! `panel_factor` for each pivot row. Each slot has exactly one writer (the
//! panel-factor task owning that row) and many readers (every subsequent
//! `panel_update` touching that row). Unlike [`crate::matrix`], this does not
//! need raw pointers: storing the `f64` bit pattern in an `AtomicU64` gives a
//! safe single-writer/multi-reader cell with the same release/acquire
//! happens-before edge the scheduler already establishes through
//! [`crate::dependency::DependencyTable`].
//!
//! In practice a reader never observes a reflector slot before the producing
//! task's dependency flag is set (the scheduler never enqueues a reader
//! before that edge fires), so the ordering here is a belt-and-suspenders
//! match of the reference design's acquire/release discipline rather than
//! the sole source of safety.

use std::sync::atomic::{AtomicU64, Ordering};

/// Single-writer-per-index, multi-reader storage for Householder scalars.
pub struct ReflectorStore {
    up: Vec<AtomicU64>,
    b: Vec<AtomicU64>,
}

impl ReflectorStore {
    /// Allocate a zeroed store of size `m` (one slot per matrix row).
    pub fn zeros(m: usize) -> Self {
        Self {
            up: (0..m).map(|_| AtomicU64::new(0.0f64.to_bits())).collect(),
            b: (0..m).map(|_| AtomicU64::new(0.0f64.to_bits())).collect(),
        }
    }

    /// Number of rows this store covers.
    #[inline]
    pub fn len(&self) -> usize {
        self.up.len()
    }

    /// `true` if this store covers zero rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.up.is_empty()
    }

    /// Write the reflector pair for pivot row `p`. Called exactly once per
    /// row, by the panel-factor task that owns it, before it sets its
    /// dependency flag.
    #[inline]
    pub fn set(&self, p: usize, up: f64, b: f64) {
        self.up[p].store(up.to_bits(), Ordering::Release);
        self.b[p].store(b.to_bits(), Ordering::Release);
    }

    /// Read the reflector pair for pivot row `p`. Called by any update task
    /// that has observed the owning panel's dependency flag.
    #[inline]
    pub fn get(&self, p: usize) -> (f64, f64) {
        let up = f64::from_bits(self.up[p].load(Ordering::Acquire));
        let b = f64::from_bits(self.b[p].load(Ordering::Acquire));
        (up, b)
    }

    /// Copy both arrays out as plain `Vec<f64>`, e.g. for the driver to
    /// publish once the scheduler reports global completion.
    pub fn to_vecs(&self) -> (Vec<f64>, Vec<f64>) {
        let up = self.up.iter().map(|a| f64::from_bits(a.load(Ordering::Acquire))).collect();
        let b = self.b.iter().map(|a| f64::from_bits(a.load(Ordering::Acquire))).collect();
        (up, b)
    }
}
