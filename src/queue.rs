//! Ready/wait concurrent queues for the worker pool
//!
//! The scheduler keeps two queues per run: a `ready` queue of tasks whose
//! dependencies are already satisfied, and a `wait` queue of tasks a worker
//! checked too early and is parking until the next sweep. Both are built on
//! `crossbeam-channel`'s MPMC channel; `ReadyQueue` additionally supports a
//! priority-ordered mode backed by a mutex-guarded binary heap, selected by
//! [`crate::Config::use_priority_queue`].

use std::cmp::Ordering as CmpOrdering;
use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::task_table::Task;

/// A task ordered for the priority heap: larger `priority` pops first.
#[derive(Copy, Clone)]
struct PriorityTask(Task);

impl PartialEq for PriorityTask {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority
    }
}
impl Eq for PriorityTask {}
impl PartialOrd for PriorityTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}
impl Ord for PriorityTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.0.priority.cmp(&other.0.priority)
    }
}

enum Inner {
    Fifo {
        tx: Sender<Task>,
        rx: Receiver<Task>,
    },
    Priority {
        heap: Mutex<std::collections::BinaryHeap<PriorityTask>>,
    },
}

/// The pool's ready queue: tasks whose dependencies are all satisfied.
pub struct ReadyQueue {
    inner: Inner,
}

impl ReadyQueue {
    /// Build a plain FIFO ready queue.
    pub fn fifo() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { inner: Inner::Fifo { tx, rx } }
    }

    /// Build a priority-ordered ready queue (panel factors before updates,
    /// earlier panels before later ones; see [`Task::priority`]).
    pub fn priority() -> Self {
        Self { inner: Inner::Priority { heap: Mutex::new(std::collections::BinaryHeap::new()) } }
    }

    /// Build either variant per [`crate::Config::use_priority_queue`].
    pub fn new(use_priority: bool) -> Self {
        if use_priority {
            Self::priority()
        } else {
            Self::fifo()
        }
    }

    /// Push a now-runnable task onto the queue.
    pub fn push(&self, task: Task) {
        match &self.inner {
            Inner::Fifo { tx, .. } => {
                // The channel is never closed while any worker holds a
                // `ReadyQueue` reference, so a send failure can't happen.
                let _ = tx.send(task);
            }
            Inner::Priority { heap } => {
                heap.lock().unwrap().push(PriorityTask(task));
            }
        }
    }

    /// Non-blocking pop. `None` means nothing is ready right now, not that
    /// the run is finished.
    pub fn try_pop(&self) -> Option<Task> {
        match &self.inner {
            Inner::Fifo { rx, .. } => match rx.try_recv() {
                Ok(task) => Some(task),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
            },
            Inner::Priority { heap } => heap.lock().unwrap().pop().map(|p| p.0),
        }
    }
}

/// The pool's wait queue: tasks a worker found not-yet-runnable and is
/// holding for the next sweep, rather than busy-spinning on it.
///
/// Always FIFO regardless of [`crate::Config::use_priority_queue`] — there
/// is no ordering benefit to prioritizing among not-yet-runnable tasks, and
/// plain FIFO keeps the requeue-to-ready sweep simple.
pub struct WaitQueue {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl WaitQueue {
    /// Build an empty wait queue.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Park a task that was not yet runnable.
    pub fn push(&self, task: Task) {
        let _ = self.tx.send(task);
    }

    /// Pop a single parked task, if any. Called once per worker iteration;
    /// the caller re-checks the popped task's left-neighbor dependency and
    /// either promotes it to `ready` or parks it again.
    pub fn try_pop(&self) -> Option<Task> {
        self.rx.try_recv().ok()
    }
}

impl Default for WaitQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_table::TaskTable;

    fn sample_task(priority: i64) -> Task {
        let t = TaskTable::build(4, 4, 2, 4);
        let mut task = *t.get(0, 0);
        task.priority = priority;
        task
    }

    #[test]
    fn fifo_preserves_push_order() {
        let q = ReadyQueue::fifo();
        q.push(sample_task(1));
        q.push(sample_task(2));
        assert_eq!(q.try_pop().unwrap().priority, 1);
        assert_eq!(q.try_pop().unwrap().priority, 2);
        assert!(q.try_pop().is_none());
    }

    #[test]
    fn priority_pops_highest_first() {
        let q = ReadyQueue::priority();
        q.push(sample_task(1));
        q.push(sample_task(5));
        q.push(sample_task(3));
        assert_eq!(q.try_pop().unwrap().priority, 5);
        assert_eq!(q.try_pop().unwrap().priority, 3);
        assert_eq!(q.try_pop().unwrap().priority, 1);
    }

    #[test]
    fn wait_queue_try_pop_preserves_order_then_empties() {
        let w = WaitQueue::new();
        w.push(sample_task(1));
        w.push(sample_task(2));
        assert_eq!(w.try_pop().unwrap().priority, 1);
        assert_eq!(w.try_pop().unwrap().priority, 2);
        assert!(w.try_pop().is_none());
    }
}
