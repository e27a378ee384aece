//! Error taxonomy for the task tracker.
//!
//! Every error's `Display` text is the reason shown to the user, so the
//! executor can turn any failure into a response without extra formatting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A raw input line could not be turned into a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("A deadline needs exactly one /by, e.g. deadline return book /by 2024/03/05 18:00")]
    MalformedDeadline,

    #[error("An event needs one /from and one /to, e.g. event camp /from 2024/03/05 09:00 /to 2024/03/07 17:00")]
    MalformedEvent,

    #[error("Dates must look like yyyy/MM/dd HH:mm and be a real calendar date, e.g. 2024/03/05 18:00")]
    BadDateFormat,

    #[error("The description of a task cannot be empty")]
    EmptyDescription,

    #[error("Oooops... I don't know what you want to do though... Start with todo, deadline or event")]
    UnknownTaskType,

    #[error("Burrrrr~ What is this??? I have no idea about it...")]
    UnrecognizedCommand,
}

/// A position that does not name a task in the list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("No task at position {position}. Index out of bound, you can only input integer from 1 to {size}")]
    OutOfRange { position: i64, size: usize },
}

/// The backing file could not be read or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to create {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}
