//! Command interpretation.
//!
//! Turns one raw input line into a typed [`Command`]. Keywords are detected by
//! presence anywhere in the line, checked in a fixed priority order, so
//! `unmark` must be tested before `mark`. Parsing is pure: it never touches the
//! task list or the backing file.

use crate::error::ParseError;
use crate::task::{parse_fixed_date_time, Task};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("valid number regex"));
static BY_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/by").expect("valid by regex"));
static EVENT_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/from|/to").expect("valid event regex"));

/// Position reported when a command names no number at all.
pub const NO_POSITION: i64 = -1;

/// A successfully classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    List,
    Delete(i64),
    Unmark(i64),
    Mark(i64),
    Add(Task),
}

/// Classifies a raw input line, first keyword match wins.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    if line.contains("bye") {
        Ok(Command::Exit)
    } else if line.contains("list") {
        Ok(Command::List)
    } else if line.contains("delete") {
        Ok(Command::Delete(extract_first_number(line)))
    } else if line.contains("unmark") {
        Ok(Command::Unmark(extract_first_number(line)))
    } else if line.contains("mark") {
        Ok(Command::Mark(extract_first_number(line)))
    } else if line.contains("todo") || line.contains("deadline") || line.contains("event") {
        parse_add(line).map(Command::Add)
    } else {
        Err(ParseError::UnrecognizedCommand)
    }
}

/// Returns the first run of ASCII digits in `input`, or [`NO_POSITION`] when
/// there is none or it does not fit in an `i64`.
pub fn extract_first_number(input: &str) -> i64 {
    FIRST_NUMBER_RE
        .find(input)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(NO_POSITION)
}

/// Builds a task from an add command. The first word selects the kind.
fn parse_add(line: &str) -> Result<Task, ParseError> {
    let line = line.trim();
    let (kind, body) = match line.split_once(' ') {
        Some((kind, body)) => (kind, body),
        None => (line, ""),
    };

    match kind {
        "todo" => Ok(Task::todo(description(body)?)),
        "deadline" => parse_deadline(body),
        "event" => parse_event(body),
        _ => Err(ParseError::UnknownTaskType),
    }
}

fn parse_deadline(body: &str) -> Result<Task, ParseError> {
    let parts = split_on(&BY_MARKER_RE, body);
    if parts.len() != 2 {
        return Err(ParseError::MalformedDeadline);
    }
    let due_at = parse_date_time(parts[1])?;
    Ok(Task::deadline(description(parts[0])?, due_at))
}

fn parse_event(body: &str) -> Result<Task, ParseError> {
    let parts = split_on(&EVENT_MARKER_RE, body);
    if parts.len() != 3 {
        return Err(ParseError::MalformedEvent);
    }
    let start_at = parse_date_time(parts[1])?;
    let end_at = parse_date_time(parts[2])?;
    Ok(Task::event(description(parts[0])?, start_at, end_at))
}

/// Parses a timestamp in the fixed `yyyy/MM/dd HH:mm` pattern.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, ParseError> {
    parse_fixed_date_time(input).ok_or(ParseError::BadDateFormat)
}

fn description(raw: &str) -> Result<String, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ParseError::EmptyDescription)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Splits on every marker match, dropping trailing empty segments, so a
/// marker at the very end does not count as an (empty) extra part.
fn split_on<'a>(marker: &Regex, input: &'a str) -> Vec<&'a str> {
    let mut parts: Vec<&str> = marker.split(input).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}
