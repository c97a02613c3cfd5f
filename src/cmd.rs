//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the subcommands, from the
//! basic list operations to launching the TUI. Handlers print plain text
//! and only exit nonzero on invalid input; an unknown task id is reported
//! but is not a failure.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::storage::FileStorage;
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Task text. Rejected if it is only whitespace.
        text: String,
    },

    /// List tasks.
    List {
        /// Hide completed tasks.
        #[arg(long)]
        pending: bool,
    },

    /// Flip a task between pending and completed.
    Toggle {
        /// Task ID.
        id: i64,
    },

    /// Replace a task's text.
    Edit {
        /// Task ID.
        id: i64,
        /// New text, stored exactly as given.
        text: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: i64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: TaskStore<FileStorage>) {
    if let Err(e) = run_tui(store) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task from the command line.
pub fn cmd_add(store: &mut TaskStore<FileStorage>, text: String) {
    match store.add(&text) {
        Some(task) => println!("Added task {}", task.id),
        None => {
            eprintln!("Cannot add an empty task.");
            std::process::exit(1);
        }
    }
}

/// List tasks, optionally hiding completed ones.
pub fn cmd_list(store: &TaskStore<FileStorage>, pending: bool) {
    let tasks: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| !(pending && t.completed))
        .collect();
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&tasks);
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!("{:<15} {:<5} {}", "ID", "Done", "Text");
    for t in tasks {
        let done = if t.completed { "[x]" } else { "[ ]" };
        println!("{:<15} {:<5} {}", t.id, done, t.text);
    }
}

/// Flip a task's completion state.
pub fn cmd_toggle(store: &mut TaskStore<FileStorage>, id: i64) {
    let exists = store.get(id).is_some();
    store.toggle(id);
    if exists {
        let state = match store.get(id) {
            Some(t) if t.completed => "completed",
            _ => "pending",
        };
        println!("Task {id} is now {state}.");
    } else {
        println!("Task {id} not found.");
    }
}

/// Replace a task's text.
pub fn cmd_edit(store: &mut TaskStore<FileStorage>, id: i64, text: String) {
    let exists = store.get(id).is_some();
    store.edit(id, &text);
    if exists {
        println!("Updated task {id}");
    } else {
        println!("Task {id} not found.");
    }
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore<FileStorage>, id: i64) {
    let exists = store.get(id).is_some();
    store.delete(id);
    if exists {
        println!("Deleted task {id}");
    } else {
        println!("Task {id} not found.");
    }
}

/// Generate completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
