//! Task table: the static 2D task-dependency grid
//!
//! `TaskTable` is built once from `(M, N, alpha, beta)` and never mutated
//! again; every worker thread holds it by shared reference and only ever
//! reads it. Each cell `(i, j)` is either a panel-factor task
//! (`TaskKind::Factor`, when `j == i * R`) or a panel-update task
//! (`TaskKind::Update`, otherwise).

use crate::{ColBlockIdx, PanelIdx};

/// The two kinds of task in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Computes reflectors for a row-panel and updates its own column-block.
    Factor,
    /// Applies an already-factored panel's reflectors to a trailing
    /// column-block.
    Update,
}

/// An immutable task descriptor at grid coordinates `(i, j)`.
#[derive(Copy, Clone, Debug)]
pub struct Task {
    /// Kind of work this task performs.
    pub kind: TaskKind,
    /// Panel row-block index.
    pub i: PanelIdx,
    /// Column-block index.
    pub j: ColBlockIdx,
    /// First row touched (inclusive).
    pub row_start: usize,
    /// Last row touched (exclusive).
    pub row_end: usize,
    /// First column touched (inclusive).
    pub col_start: usize,
    /// Last column touched (exclusive).
    pub col_end: usize,
    /// Scheduling priority: larger runs first in priority mode. Panel
    /// factors outrank updates; within a kind, smaller `i` runs first.
    pub priority: i64,
    /// Set on the type-2 task immediately left of the next panel's factor
    /// task; its completion is what unblocks that factor task (rule R2/R3).
    pub enq_nxt_t1: bool,
}

/// Immutable `TR × TC` grid of [`Task`] descriptors.
pub struct TaskTable {
    tasks: Vec<Task>,
    tr: usize,
    tc: usize,
    r: usize,
}

impl TaskTable {
    /// Build the full task grid for an `m × n` matrix with the given block
    /// parameters. `r = beta / alpha` must already be validated by
    /// [`crate::Config::validate`].
    pub fn build(m: usize, n: usize, alpha: usize, beta: usize) -> Self {
        let r = beta / alpha;
        let tr = div_ceil(m, beta);
        let tc = div_ceil(n, alpha);

        let mut tasks = Vec::with_capacity(tr * tc);
        for i in 0..tr {
            let row_start = i * beta;
            let row_end = ((i + 1) * beta).min(m);
            let factor_j = i * r;
            for j in 0..tc {
                let col_start = j * alpha;
                let col_end = ((j + 1) * alpha).min(n);
                let kind = if j == factor_j { TaskKind::Factor } else { TaskKind::Update };
                let enq_nxt_t1 = kind == TaskKind::Update
                    && i + 1 < tr
                    && j + 1 == (i + 1) * r;
                let priority = (tr - i) as i64 * 2 + if kind == TaskKind::Factor { 1 } else { 0 };
                tasks.push(Task {
                    kind,
                    i: PanelIdx(i),
                    j: ColBlockIdx(j),
                    row_start,
                    row_end,
                    col_start,
                    col_end,
                    priority,
                    enq_nxt_t1,
                });
            }
        }

        Self { tasks, tr, tc, r }
    }

    /// Number of panel row-blocks (`TR`).
    #[inline]
    pub fn tr(&self) -> usize {
        self.tr
    }

    /// Number of column-blocks (`TC`).
    #[inline]
    pub fn tc(&self) -> usize {
        self.tc
    }

    /// `R = BETA / ALPHA`.
    #[inline]
    pub fn r(&self) -> usize {
        self.r
    }

    /// Fetch the descriptor at `(i, j)`. Panics if out of range — every
    /// caller in this crate derives `(i, j)` from the table's own bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &Task {
        debug_assert!(i < self.tr && j < self.tc);
        &self.tasks[i * self.tc + j]
    }

    /// The coordinates of the final task in the grid, used by the
    /// scheduler's termination predicate.
    ///
    /// This is `(TR-1, TC-1)`, not the final panel's factor task
    /// `(TR-1, R·(TR-1))`: when `N` is not aligned to the block grid,
    /// `TC` need not equal `R·TR`, and the last panel's trailing update
    /// tasks `(TR-1, j)` for `j > R·(TR-1)` complete strictly after that
    /// factor task. Terminating on the factor task would let workers exit
    /// before those trailing updates run.
    #[inline]
    pub fn final_task_coords(&self) -> (usize, usize) {
        (self.tr - 1, self.tc - 1)
    }
}

fn div_ceil(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}
