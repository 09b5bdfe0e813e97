//! Shared row-major matrix buffer
//!
//! `MatrixView` is the one piece of O(M·N) shared mutable state in this
//! crate. Ordinary Rust aliasing rules forbid handing out a mutable
//! reference to the same buffer from more than one thread at a time, but the
//! scheduler's disjoint-write invariant (every concurrently-runnable task
//! touches a distinct `[row_start,row_end) × [col_start,col_end)` region,
//! see `scheduler` and `task_table`) makes concurrent writes sound in
//! practice. We expose that as a narrow, explicit unsafe boundary rather than
//! threading a lock through the hot path.
//!
//! This is the only module in the crate that contains `unsafe`.

use std::sync::atomic::{AtomicPtr, Ordering};

/// A fixed-size, row-major `f64` matrix, shared across worker threads.
///
/// # Safety contract
///
/// `get`/`set` perform no bounds checking and no synchronization. Callers
/// (in practice, only the kernels in [`crate::kernels`], driven by the
/// scheduler) must ensure that no two threads ever address the same cell
/// concurrently, and that any thread reading a cell written by another task
/// has first observed that task's dependency flag via
/// [`crate::dependency::DependencyTable::get`] returning `true` (which
/// establishes the acquire/release happens-before edge documented in
/// `scheduler`).
pub struct MatrixView {
    ptr: AtomicPtr<f64>,
    rows: usize,
    cols: usize,
    // Keeps the allocation alive; never read directly after construction.
    _owner: Box<[f64]>,
}

// SAFETY: access is synchronized externally by the scheduler's disjoint-write
// invariant, not by the type itself. `MatrixView` never exposes a `&mut`
// that could alias; every access goes through raw pointer arithmetic.
unsafe impl Sync for MatrixView {}

impl MatrixView {
    /// Build a zero-initialized `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_vec(vec![0.0; rows * cols], rows, cols)
    }

    /// Build a matrix from a row-major `Vec<f64>` of length `rows * cols`.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "matrix data length mismatch");
        let mut owner = data.into_boxed_slice();
        let ptr = AtomicPtr::new(owner.as_mut_ptr());
        Self { ptr, rows, cols, _owner: owner }
    }

    /// Row count.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn base(&self) -> *mut f64 {
        self.ptr.load(Ordering::Relaxed)
    }

    /// Read cell `(r, c)`. No bounds checking on the fast path.
    ///
    /// # Safety
    /// See the module-level safety contract: the caller must not race this
    /// read against an unsynchronized write to the same cell.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        debug_assert!(r < self.rows && c < self.cols, "matrix index out of bounds");
        // SAFETY: caller upholds the disjoint-write / happens-before contract
        // documented on `MatrixView`; the offset is in-bounds for `rows*cols`
        // whenever the debug_assert above would hold.
        unsafe { *self.base().add(r * self.cols + c) }
    }

    /// Write cell `(r, c)`. No bounds checking on the fast path.
    ///
    /// # Safety
    /// See the module-level safety contract.
    #[inline]
    pub fn set(&self, r: usize, c: usize, v: f64) {
        debug_assert!(r < self.rows && c < self.cols, "matrix index out of bounds");
        // SAFETY: see `get`.
        unsafe { *self.base().add(r * self.cols + c) = v };
    }

    /// Copy the matrix out into a row-major `Vec<f64>`.
    ///
    /// Only safe to call after all worker threads have joined (the driver
    /// calls this once the scheduler reports global completion).
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push(self.get(r, c));
            }
        }
        out
    }
}
