use tracing::debug;

use crate::task::Task;

/// Ordered in-memory task list for one session. Newest additions go first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "replacing task list");
        self.tasks = tasks;
    }

    pub fn prepend(&mut self, task: Task) {
        debug!(id = task.id, "prepending task");
        self.tasks.insert(0, task);
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn first(&self) -> Option<&Task> {
        self.tasks.first()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
