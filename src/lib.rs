//! Crate root: public surface, core aliases, and scheduler-wide invariants
//!
//! This module is the **single canonical entry-point** for downstream users of
//! the library. It centralizes the block-parameter newtypes, the shared error
//! taxonomy, and re-exports the submodules that implement the blocked
//! Householder QR factorization.
//!
//! ## Invariants
//!
//! - **Layout.** The matrix is row-major, `f64`, mutated in place. Only the
//!   Householder scalar pairs (`up`, `b`) are retained; the explicit `Q`
//!   factor is never materialized (see [`kernels`]).
//! - **Blocking.** `BETA` (panel height) must be a positive multiple of
//!   `ALPHA` (column-block width); `R = BETA / ALPHA` panel-relative
//!   column-blocks make up one panel.
//! - **Concurrency.** All shared mutable state (the matrix, the reflector
//!   store) is written under a disjoint-region invariant enforced by the
//!   scheduler ([`scheduler`]), not by runtime locks. The task table and
//!   dependency table are the only pieces of cross-thread bookkeeping.
//! - **No unsafe outside [`matrix`].** The matrix module isolates the one
//!   unsafe boundary this crate requires to share a mutable buffer across
//!   worker threads; every other module is ordinary safe Rust.

#![deny(rust_2018_idioms)]

/// Typed configuration (block sizes, worker count, scheduling mode).
pub mod config;
/// Error taxonomy for configuration, I/O, and factorization failures.
pub mod error;
/// Shared row-major matrix buffer with a documented unsafe boundary.
pub mod matrix;
/// Householder scalar (`up`, `b`) storage, single-writer-per-row.
pub mod reflectors;
/// Immutable 2D grid of task descriptors built once at startup.
pub mod task_table;
/// Atomic 2D grid of per-task completion flags.
pub mod dependency;
/// Numeric kernels: `panel_factor` and `panel_update`.
pub mod kernels;
/// Ready/wait concurrent queues used by the worker pool.
pub mod queue;
/// Worker pool, enqueue rules, and termination detection.
pub mod scheduler;
/// Driver: builds tables, runs the worker pool, publishes reflectors.
pub mod driver;
/// Whitespace-separated matrix load/save (external-collaborator surface).
pub mod io;

pub use config::Config;
pub use driver::factorize;
pub use error::FactorizeError;
pub use matrix::MatrixView;
pub use reflectors::ReflectorStore;

/// Panel row-block index `i ∈ {0..TR-1}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelIdx(pub usize);
impl PanelIdx {
    /// Access the underlying index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Column-block index `j ∈ {0..TC-1}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColBlockIdx(pub usize);
impl ColBlockIdx {
    /// Access the underlying index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}
