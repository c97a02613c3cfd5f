use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed to-do list for the terminal.
/// Storage defaults to ~/.todo or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "todo", version, about = "Single-screen to-do list with local storage")]
pub struct Cli {
    /// Directory holding the tasks file and log.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
