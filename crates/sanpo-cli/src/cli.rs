//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sanpo::SuggestionKind;

#[derive(Debug, Parser)]
#[command(name = "sanpo")]
#[command(about = "Decide where to walk and what to do there")]
pub struct Args {
    /// SQLite database URL. Falls back to SANPO_DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Local state file. Falls back to SANPO_STATE_PATH.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide where to go
    Where {
        /// Draw from this group instead of the active one
        #[arg(long)]
        group: Option<String>,
    },
    /// Decide what to do
    What {
        /// Draw from this group instead of the active one
        #[arg(long)]
        group: Option<String>,
    },
    /// Show the current where/what pair
    Current,
    /// Show past pairs
    History {
        /// Remove all history for this device
        #[arg(long)]
        clear: bool,
    },
    /// List task groups
    Groups {
        /// Only groups created on this device
        #[arg(long)]
        mine: bool,
    },
    /// Manage a task group
    #[command(subcommand)]
    Group(GroupCommand),
    /// Manage a single task
    #[command(subcommand)]
    Task(TaskCommand),
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a group
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a group and its tasks
    Delete { id: String },
    /// List the tasks in a group
    Tasks { id: String },
    /// Add a task to a group
    Add {
        id: String,
        /// "where" or "what"
        #[arg(long)]
        kind: SuggestionKind,
        content: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Draw from this group (omit the id to draw from every visible group)
    Use { id: Option<String> },
    /// Print a shareable snapshot of a group
    Export {
        id: String,
        /// Check that the snapshot fits in a QR code
        #[arg(long)]
        qr: bool,
    },
    /// Import a snapshot from a file, or stdin when omitted
    Import { file: Option<PathBuf> },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Delete a task
    Delete { id: String },
    /// Make a task drawable again
    Enable { id: String },
    /// Stop drawing a task
    Disable { id: String },
}
