//! Per-citizen task queues.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tc_core::CitizenId;

use crate::Task;

/// The task being executed plus the rest of the plan, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskQueue {
    current: Option<Task>,
    pending: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when there is neither a current nor a pending task.  The
    /// scheduler only plans for citizens whose queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Current plus pending.
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    #[inline]
    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.pending.iter()
    }

    pub fn push(&mut self, task: Task) {
        self.pending.push_back(task);
    }

    pub fn extend(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.pending.extend(tasks);
    }

    /// The current task, promoting the next pending one if there is none.
    pub fn current_or_next(&mut self) -> Option<&mut Task> {
        if self.current.is_none() {
            self.current = self.pending.pop_front();
        }
        self.current.as_mut()
    }

    /// Discard the finished current task.
    pub fn finish_current(&mut self) -> Option<Task> {
        self.current.take()
    }

    /// Abandon the whole plan.
    pub fn clear(&mut self) {
        self.current = None;
        self.pending.clear();
    }
}

/// Task queues of every citizen, kept apart from `CitizenStore` so a task can
/// hold `&mut Citizen` while its own queue is borrowed.
#[derive(Debug, Default)]
pub struct TaskQueues {
    inner: FxHashMap<CitizenId, TaskQueue>,
}

impl TaskQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue of `citizen`, created empty on first access.
    pub fn entry(&mut self, citizen: CitizenId) -> &mut TaskQueue {
        self.inner.entry(citizen).or_default()
    }

    pub fn get(&self, citizen: CitizenId) -> Option<&TaskQueue> {
        self.inner.get(&citizen)
    }

    pub fn remove(&mut self, citizen: CitizenId) -> Option<TaskQueue> {
        self.inner.remove(&citizen)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
