//! Kitty - a chatty personal task tracker
//!
//! Reads short text commands from stdin to create, list, complete and delete
//! todos, deadlines and events. Tasks are kept in a flat file between sessions.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use termion::color;
use tracing_subscriber::EnvFilter;
use xdg::BaseDirectories;

mod error;
mod executor;
mod parser;
mod storage;
mod task;
mod task_list;


use executor::{Executor, Outcome, Response};
use storage::Storage;

const DIVISION_LINE: &str = "--------------------------";

/// Command-line interface for the kitty task tracker
#[derive(Parser)]
#[command(name = "kitty")]
#[command(about = "Kitty - a chatty personal task tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// Task file to use instead of the XDG data file (e.g. data/Kitty.txt)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
    /// Print responses without colours
    #[arg(long)]
    plain: bool,
}

/// Entry point that resolves the task file, loads it and runs the chat loop.
fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the conversation
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kitty=warn")),
        )
        .init();

    let cli = Cli::parse();
    let path = match cli.file {
        Some(path) => path,
        None => BaseDirectories::with_prefix("kitty")
            .place_data_file("Kitty.txt")
            .context("Failed to create data directory")?,
    };

    let storage = Storage::new(path);
    let mut executor = Executor::load(storage).context("Failed to load tasks")?;
    tracing::debug!(count = executor.tasks().size(), "session started");

    run(&mut executor, io::stdin().lock(), io::stdout().lock(), !cli.plain)
}

/// Feeds each input line to the executor until `bye` or end of input.
fn run(executor: &mut Executor, input: impl BufRead, mut out: impl Write, colored: bool) -> Result<()> {
    writeln!(out, "Hello! I'm Kitty\nWhat can I do for you?\n\n{}", DIVISION_LINE)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let response = executor.execute(&line);
        print_response(&mut out, &response, colored)?;
        if response.is_exit() {
            break;
        }
    }

    out.flush()?;
    Ok(())
}

fn print_response(out: &mut impl Write, response: &Response, colored: bool) -> io::Result<()> {
    if colored {
        match response.outcome {
            Outcome::Success => write!(out, "{}", color::Fg(color::Green))?,
            Outcome::Error => write!(out, "{}", color::Fg(color::Red))?,
            Outcome::Exit => {}
        }
    }
    write!(out, "{}", response.message)?;
    if colored {
        write!(out, "{}", color::Fg(color::Reset))?;
    }
    writeln!(out, "\n\n{}", DIVISION_LINE)
}
