//! Task model and its on-disk line encoding.
//!
//! A task is a description plus a done flag, tagged with one of three kinds.
//! Each task encodes to a single line of the backing file:
//! `{tag}~!!{done}~!!{description}~!!{timestamps...}`.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Pattern used both for user input and for the backing file (`yyyy/MM/dd HH:mm`).
pub const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Pattern used when rendering timestamps for display.
const DISPLAY_FORMAT: &str = "%b %d %Y %H:%M";

/// Field separator of the backing file.
pub const FIELD_SEPARATOR: &str = "~!!";

// chrono alone accepts one-digit fields and loose whitespace
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}/[0-9]{2}/[0-9]{2} [0-9]{2}:[0-9]{2}$").expect("valid date time regex")
});

/// Parses exactly `yyyy/MM/dd HH:mm` after trimming, rejecting impossible dates.
pub fn parse_fixed_date_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if !DATE_TIME_RE.is_match(input) {
        return None;
    }
    NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT).ok()
}

/// Variant-specific part of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { due_at: NaiveDateTime },
    Event { start_at: NaiveDateTime, end_at: NaiveDateTime },
}

impl TaskKind {
    /// One-letter tag used in both the rendered and encoded forms.
    pub fn tag(&self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

/// A single tracked task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub done: bool,
    pub kind: TaskKind,
}

impl Task {
    pub fn todo(description: String) -> Self {
        Task {
            description,
            done: false,
            kind: TaskKind::Todo,
        }
    }

    pub fn deadline(description: String, due_at: NaiveDateTime) -> Self {
        Task {
            description,
            done: false,
            kind: TaskKind::Deadline { due_at },
        }
    }

    /// Events do not require `start_at <= end_at`.
    pub fn event(description: String, start_at: NaiveDateTime, end_at: NaiveDateTime) -> Self {
        Task {
            description,
            done: false,
            kind: TaskKind::Event { start_at, end_at },
        }
    }

    pub fn mark(&mut self) {
        self.done = true;
    }

    pub fn unmark(&mut self) {
        self.done = false;
    }

    #[allow(dead_code)]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Encodes the task as one line of the backing file, without a line terminator.
    pub fn serialize(&self) -> String {
        let done = if self.done { "1" } else { "0" };
        let mut fields = vec![
            self.kind.tag().to_string(),
            done.to_string(),
            self.description.clone(),
        ];
        match &self.kind {
            TaskKind::Todo => {}
            TaskKind::Deadline { due_at } => {
                fields.push(due_at.format(DATE_TIME_FORMAT).to_string());
            }
            TaskKind::Event { start_at, end_at } => {
                fields.push(start_at.format(DATE_TIME_FORMAT).to_string());
                fields.push(end_at.format(DATE_TIME_FORMAT).to_string());
            }
        }
        fields.join(FIELD_SEPARATOR)
    }

    /// Decodes one line of the backing file.
    ///
    /// Returns `None` for any line that does not follow the grammar: an unknown
    /// tag, the wrong number of fields for the tag, a blank description, or an
    /// unparseable timestamp.
    pub fn deserialize(line: &str) -> Option<Task> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < 3 || fields[2].trim().is_empty() {
            return None;
        }

        let description = fields[2].to_string();
        let mut task = match (fields[0].trim(), fields.len()) {
            ("T", 3) => Task::todo(description),
            ("D", 4) => Task::deadline(description, parse_fixed_date_time(fields[3])?),
            ("E", 5) => Task::event(
                description,
                parse_fixed_date_time(fields[3])?,
                parse_fixed_date_time(fields[4])?,
            ),
            _ => return None,
        };

        if fields[1].trim() == "1" {
            task.mark();
        }
        Some(task)
    }
}

/// Human-readable form, e.g. `[D][X] return book (by: Mar 05 2024 18:00)`.
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let status = if self.done { 'X' } else { ' ' };
        write!(f, "[{}][{}] {}", self.kind.tag(), status, self.description)?;
        match &self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { due_at } => {
                write!(f, " (by: {})", due_at.format(DISPLAY_FORMAT))
            }
            TaskKind::Event { start_at, end_at } => write!(
                f,
                " (from: {} to: {})",
                start_at.format(DISPLAY_FORMAT),
                end_at.format(DISPLAY_FORMAT)
            ),
        }
    }
}
