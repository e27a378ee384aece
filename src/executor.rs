//! Command execution: parse, validate, mutate, persist, render.
//!
//! The executor owns the task list and the storage handle. Every failure is
//! turned into a [`Response`]; nothing here aborts the session.

use crate::error::PersistenceError;
use crate::parser::{parse_command, Command};
use crate::storage::Storage;
use crate::task::Task;
use crate::task_list::TaskList;
use tracing::warn;

/// How the presentation layer should treat a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
    /// The session is over; no further commands should be sent.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub message: String,
    pub outcome: Outcome,
}

impl Response {
    fn success(message: String) -> Self {
        Response {
            message,
            outcome: Outcome::Success,
        }
    }

    fn error(message: String) -> Self {
        Response {
            message,
            outcome: Outcome::Error,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.outcome == Outcome::Exit
    }
}

pub struct Executor {
    tasks: TaskList,
    storage: Storage,
}

impl Executor {
    /// Loads the existing tasks from `storage` and takes ownership of both.
    pub fn load(storage: Storage) -> Result<Self, PersistenceError> {
        let tasks = TaskList::from_tasks(storage.load()?);
        Ok(Executor { tasks, storage })
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Runs one raw input line and returns the text to show the user.
    pub fn execute(&mut self, line: &str) -> Response {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => return Response::error(e.to_string()),
        };

        match command {
            Command::Exit => Response {
                message: "Bye. Hope I can see you again soon!\nNext time bring me some cat food please!!!"
                    .to_string(),
                outcome: Outcome::Exit,
            },
            Command::List => self.list(),
            Command::Add(task) => self.add(task),
            Command::Mark(position) => self.mark(position),
            Command::Unmark(position) => self.unmark(position),
            Command::Delete(position) => self.delete(position),
        }
    }

    fn list(&self) -> Response {
        let mut lines = vec!["Meow~ Here you are!".to_string()];
        lines.extend(self.tasks.render_lines());
        Response::success(lines.join("\n"))
    }

    fn add(&mut self, task: Task) -> Response {
        let rendered = task.to_string();
        let append_result = self.storage.append(&task);
        let size = self.tasks.add(task);

        // The task stays in the list for this session even when the write fails
        if let Err(e) = append_result {
            warn!(error = %e, "failed to append task");
            return Response::error(format!(
                "File writing unsuccessful.\nThis task is not updated to hard disk, \
                 but I will keep it until you leave:\n  {}",
                rendered
            ));
        }

        Response::success(format!(
            "Okie, I added it into the list:\n  {}\nNow you have {} tasks in the list.",
            rendered, size
        ))
    }

    fn mark(&mut self, position: i64) -> Response {
        let rendered = match self.tasks.mark(position) {
            Ok(task) => task.to_string(),
            Err(e) => return Response::error(e.to_string()),
        };
        self.sync();
        Response::success(format!(
            "Well done! You have completed this task!\n  {}",
            rendered
        ))
    }

    fn unmark(&mut self, position: i64) -> Response {
        let rendered = match self.tasks.unmark(position) {
            Ok(task) => task.to_string(),
            Err(e) => return Response::error(e.to_string()),
        };
        self.sync();
        Response::success(format!(
            "Meow~ Okay we can continue this task!\n  {}",
            rendered
        ))
    }

    fn delete(&mut self, position: i64) -> Response {
        let removed = match self.tasks.remove(position) {
            Ok(task) => task,
            Err(e) => return Response::error(e.to_string()),
        };
        self.sync();
        Response::success(format!(
            "I have removed it from the list :)\n  {}\nNow you have {} tasks in the list.",
            removed,
            self.tasks.size()
        ))
    }

    /// Rewrites the backing file from the in-memory list. Failures are logged
    /// only; the in-memory list stays authoritative for the session.
    fn sync(&self) {
        if let Err(e) = self.storage.rewrite_all(self.tasks.tasks()) {
            warn!(error = %e, "failed to rewrite task file");
        }
    }
}
