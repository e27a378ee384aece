//! Flat-file persistence for the task list.
//!
//! The backing file holds one encoded task per line. New tasks are appended;
//! any change to existing content rewrites the whole file in list order. The
//! file is opened and closed within each call, never held between commands.

use crate::error::PersistenceError;
use crate::task::Task;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Storage { path: path.into() }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every well-formed task from the backing file.
    ///
    /// A missing file (and its directory) is created and yields no tasks.
    /// Lines that fail to decode are skipped.
    pub fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        if !self.path.exists() {
            self.create_empty()?;
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })?;

        // Lines are decoded one at a time so bad bytes only cost their own line
        let mut tasks = Vec::new();
        for (line_num, raw) in content.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let decoded = std::str::from_utf8(raw).ok();
            match decoded.and_then(Task::deserialize) {
                Some(task) => tasks.push(task),
                None if raw.is_empty() => {}
                None => debug!(
                    line = line_num + 1,
                    content = %String::from_utf8_lossy(raw),
                    "skipping malformed task line"
                ),
            }
        }
        debug!(count = tasks.len(), path = %self.path.display(), "loaded tasks");
        Ok(tasks)
    }

    /// Appends one task's encoded line to the end of the file.
    pub fn append(&self, task: &Task) -> Result<(), PersistenceError> {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", task.serialize()));
        result.map_err(|source| self.write_error(source))
    }

    /// Truncates the file and writes every task in list order.
    pub fn rewrite_all(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let content: String = tasks
            .iter()
            .map(|task| task.serialize() + "\n")
            .collect();
        fs::write(&self.path, content).map_err(|source| self.write_error(source))?;
        debug!(count = tasks.len(), path = %self.path.display(), "rewrote task file");
        Ok(())
    }

    fn create_empty(&self) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, "").map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::DATE_TIME_FORMAT;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut done_todo = Task::todo("read book".to_string());
        done_todo.mark();
        vec![
            done_todo,
            Task::deadline("return book".to_string(), at("2024/03/05 18:00")),
            Task::event(
                "camp".to_string(),
                at("2024/03/05 09:00"),
                at("2024/03/07 17:00"),
            ),
        ]
    }

    #[test]
    fn test_load_missing_file_creates_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("Kitty.txt");
        let storage = Storage::new(&path);

        let tasks = storage.load().unwrap();
        assert!(tasks.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_rewrite_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("Kitty.txt"));
        let tasks = sample_tasks();

        storage.rewrite_all(&tasks).unwrap();
        assert_eq!(storage.load().unwrap(), tasks);
    }

    #[test]
    fn test_rewrite_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("Kitty.txt"));

        storage.rewrite_all(&sample_tasks()).unwrap();
        storage.rewrite_all(&[Task::todo("only".to_string())]).unwrap();

        assert_eq!(
            fs::read_to_string(storage.path()).unwrap(),
            "T~!!0~!!only\n"
        );
    }

    #[test]
    fn test_append_adds_one_line() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("Kitty.txt"));
        storage.load().unwrap();

        storage.append(&Task::todo("first".to_string())).unwrap();
        storage.append(&Task::todo("second".to_string())).unwrap();

        assert_eq!(
            fs::read_to_string(storage.path()).unwrap(),
            "T~!!0~!!first\nT~!!0~!!second\n"
        );
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Kitty.txt");
        fs::write(
            &path,
            "T~!!0~!!keep me\n\
             garbage\n\
             D~!!0~!!bad date~!!someday\n\
             Q~!!1~!!unknown tag\n\
             \n\
             E~!!1~!!camp~!!2024/03/05 09:00~!!2024/03/07 17:00\n",
        )
        .unwrap();

        let tasks = Storage::new(&path).load().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "keep me");
        assert_eq!(tasks[1].description, "camp");
        assert!(tasks[1].is_done());
    }

    #[test]
    fn test_load_skips_line_with_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Kitty.txt");
        let mut content = b"T~!!0~!!keep me\n".to_vec();
        content.extend_from_slice(b"T~!!0~!!bad \xff\xfe\n");
        content.extend_from_slice(b"T~!!1~!!keep me too\r\n");
        fs::write(&path, content).unwrap();

        let tasks = Storage::new(&path).load().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].description, "keep me");
        assert_eq!(tasks[1].description, "keep me too");
        assert!(tasks[1].is_done());
    }

    #[test]
    fn test_append_to_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let storage = Storage::new(dir.path());

        let err = storage.append(&Task::todo("lost".to_string())).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
    }
}
