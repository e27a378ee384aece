//! Ordered in-memory task collection with 1-based positions.
//!
//! Positions are insertion-order ranks, not identities: removing a task shifts
//! every later task down by one.

use crate::error::RangeError;
use crate::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    /// Appends a task and returns its position, which equals the new length.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len()
    }

    #[allow(dead_code)]
    pub fn get(&self, position: i64) -> Result<&Task, RangeError> {
        let index = self.index_of(position)?;
        Ok(&self.tasks[index])
    }

    pub fn remove(&mut self, position: i64) -> Result<Task, RangeError> {
        let index = self.index_of(position)?;
        Ok(self.tasks.remove(index))
    }

    pub fn mark(&mut self, position: i64) -> Result<&Task, RangeError> {
        let index = self.index_of(position)?;
        self.tasks[index].mark();
        Ok(&self.tasks[index])
    }

    pub fn unmark(&mut self, position: i64) -> Result<&Task, RangeError> {
        let index = self.index_of(position)?;
        self.tasks[index].unmark();
        Ok(&self.tasks[index])
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Numbered display lines, e.g. `1.[T][ ] read book`.
    pub fn render_lines(&self) -> Vec<String> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| format!("{}.{}", idx + 1, task))
            .collect()
    }

    // Convert 1-based position to 0-based index and validate
    fn index_of(&self, position: i64) -> Result<usize, RangeError> {
        let out_of_range = RangeError::OutOfRange {
            position,
            size: self.tasks.len(),
        };
        match usize::try_from(position) {
            Ok(pos) if pos >= 1 && pos <= self.tasks.len() => Ok(pos - 1),
            _ => Err(out_of_range),
        }
    }
}
