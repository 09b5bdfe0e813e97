//! Worker pool: seeding, the per-worker loop, enqueue rules, and
//! termination detection
//!
//! Every `(i, j)` cell of the task grid is seeded into a queue exactly once
//! at startup — the panel-0 factor task `(0, 0)` onto `ready`, everything
//! else onto `wait` — and each worker repeatedly drains `ready` then `wait`
//! until the termination predicate fires. A task is only actually executed
//! by the worker that wins [`DependencyTable::claim`] for its cell, since
//! rule R1 can independently push a second copy of a cell already sitting
//! in `wait`. Workers run as scoped threads borrowing everything by
//! reference; nothing here needs `Arc`.

use std::thread;

use tracing::{debug, trace};

use crate::dependency::DependencyTable;
use crate::kernels::{panel_factor, panel_update};
use crate::matrix::MatrixView;
use crate::queue::{ReadyQueue, WaitQueue};
use crate::reflectors::ReflectorStore;
use crate::task_table::{Task, TaskKind, TaskTable};

/// Everything a worker needs, borrowed for the run's duration.
struct Shared<'a> {
    n: usize,
    tasks: &'a TaskTable,
    dep: &'a DependencyTable,
    mat: &'a MatrixView,
    reflectors: &'a ReflectorStore,
    ready: &'a ReadyQueue,
    wait: &'a WaitQueue,
}

/// Push `(0, 0)` onto `ready` and every other grid cell onto `wait`.
pub fn seed(tasks: &TaskTable, ready: &ReadyQueue, wait: &WaitQueue) {
    for i in 0..tasks.tr() {
        for j in 0..tasks.tc() {
            let task = *tasks.get(i, j);
            if i == 0 && j == 0 {
                ready.push(task);
            } else {
                wait.push(task);
            }
        }
    }
}

/// Spawn `num_workers` worker threads and run them to completion, returning
/// once every thread has exited the termination predicate.
///
/// `n` is the matrix's column count (see [`crate::kernels`]).
#[allow(clippy::too_many_arguments)]
pub fn run(
    num_workers: usize,
    n: usize,
    tasks: &TaskTable,
    dep: &DependencyTable,
    mat: &MatrixView,
    reflectors: &ReflectorStore,
    ready: &ReadyQueue,
    wait: &WaitQueue,
) -> thread::Result<()> {
    let shared = Shared { n, tasks, dep, mat, reflectors, ready, wait };
    thread::scope(|scope| {
        let handles: Vec<_> = (0..num_workers)
            .map(|worker_id| {
                let shared = &shared;
                thread::Builder::new()
                    .name(format!("blockqr-worker-{worker_id}"))
                    .spawn_scoped(scope, move || worker_loop(worker_id, shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        for h in handles {
            h.join()?;
        }
        Ok(())
    })
}

fn worker_loop(worker_id: usize, shared: &Shared<'_>) {
    debug!(worker_id, "worker starting");
    loop {
        if let Some(t) = shared.ready.try_pop() {
            if shared.dep.claim(t.i.as_usize(), t.j.as_usize()) {
                execute(shared, &t);
                shared.dep.set(t.i.as_usize(), t.j.as_usize());
                enqueue_successors(shared, &t);
            }
        }

        if let Some(u) = shared.wait.try_pop() {
            let (ui, uj) = (u.i.as_usize(), u.j.as_usize());
            if uj == 0 || shared.dep.get(ui, uj - 1) {
                shared.ready.push(u);
            } else {
                shared.wait.push(u);
            }
        }

        if terminated(shared) {
            break;
        }
    }
    trace!(worker_id, "worker exiting");
}

fn execute(shared: &Shared<'_>, t: &Task) {
    match t.kind {
        TaskKind::Factor => panel_factor(shared.mat, shared.reflectors, t.row_start, t.row_end, t.col_end, shared.n),
        TaskKind::Update => {
            panel_update(shared.mat, shared.reflectors, t.row_start, t.row_end, t.col_start, t.col_end, shared.n)
        }
    }
}

/// Rule R1 (fan a completed task's column out to every lower row-block) and
/// R2 (after an update task whose `enq_nxt_t1` is set, jump straight to the
/// next panel's factor); R3 is the construction rule already baked into
/// [`TaskTable::build`].
///
/// A row-block's reflector application reaches every column to its right,
/// not just its own column-block (`apply_reflector`'s row loop runs to `n`
/// regardless of the task's own `row_end`), so a lower row-block's task on
/// column `j` can only run once every row-block above it has landed its own
/// write to column `j`. R1 fires after every task, not only factor tasks,
/// to carry that edge for both task kinds.
fn enqueue_successors(shared: &Shared<'_>, t: &Task) {
    let i = t.i.as_usize();
    let j = t.j.as_usize();
    for k in (i + 1)..shared.tasks.tr() {
        let succ = *shared.tasks.get(k, j);
        if j == 0 || shared.dep.get(k, j - 1) {
            shared.ready.push(succ);
        } else {
            shared.wait.push(succ);
        }
    }

    if t.kind == TaskKind::Update && t.enq_nxt_t1 {
        let next_j = j + 1;
        if next_j <= shared.tasks.tc() {
            let next_i = next_j / shared.tasks.r();
            shared.ready.push(*shared.tasks.get(next_i, next_j));
        }
    }
}

fn terminated(shared: &Shared<'_>) -> bool {
    let (i, j) = shared.tasks.final_task_coords();
    shared.dep.get(i, j)
}
