//! # todo - single-screen to-do list for the terminal
//!
//! A small task list that lives in one JSON file: add, edit, complete, and
//! delete text tasks, persisted locally on every change and restored on
//! launch.
//!
//! ## Key Features
//!
//! - **One screen**: input bar, task list with completion toggles, and a
//!   modal edit dialog - nothing to navigate.
//! - **Two Interfaces**: a CLI for scripted use + an interactive TUI.
//! - **Local File Storage**: the whole list is one JSON array under
//!   `~/.todo`, rewritten after every change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! todo ui
//!
//! # Add a task via CLI
//! todo add "Buy milk"
//!
//! # List tasks
//! todo list
//!
//! # Complete, edit, delete by id
//! todo toggle 1717171717171
//! todo edit 1717171717171 "Buy oat milk"
//! todo delete 1717171717171
//! ```
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! Data is stored in `~/.todo/tasks.json` (override the directory with
//! `--data-dir`). TUI runs append their log to `~/.todo/todo.log`; CLI runs
//! log to stderr. Set `RUST_LOG` to adjust verbosity.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use storage::FileStorage;
use store::TaskStore;

/// Keeps the non-blocking file writer alive for the life of the process.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn main() {
    let cli = Cli::parse();

    // Completions don't touch storage at all.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".todo")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    init_tracing(matches!(cli.command, Commands::Ui), &data_dir);

    let mut store = TaskStore::load(FileStorage::new(&data_dir));

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Ui => cmd_ui(store),
        Commands::Add { text } => cmd_add(&mut store, text),
        Commands::List { pending } => cmd_list(&store, pending),
        Commands::Toggle { id } => cmd_toggle(&mut store, id),
        Commands::Edit { id, text } => cmd_edit(&mut store, id, text),
        Commands::Delete { id } => cmd_delete(&mut store, id),
    }
}

/// Route logs to stderr for CLI runs and to a file under the data
/// directory for TUI runs, where the terminal is taken by the interface.
fn init_tracing(tui_mode: bool, data_dir: &std::path::Path) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::new("info"),
    };

    if tui_mode {
        let appender = tracing_appender::rolling::never(data_dir, "todo.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
