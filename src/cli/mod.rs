//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Code Studio - AI pair-programming workbench for web projects
#[derive(Parser, Debug)]
#[command(name = "studio", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.codestudio)
    #[arg(long, global = true, env = "STUDIO_HOME")]
    pub home: Option<PathBuf>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a prompt to the AI and materialize the streamed files
    Chat(ChatArgs),

    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Version history (per-turn snapshots)
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Files in the active workspace
    File {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Open tabs and the active file
    Tab {
        #[command(subcommand)]
        command: TabCommands,
    },

    /// Import a folder from disk as a new project
    Import {
        /// Directory to import
        dir: PathBuf,
    },

    /// Export the current files to a directory tree
    Export {
        /// Destination directory
        dir: PathBuf,

        /// Overwrite existing files at the destination
        #[arg(long)]
        force: bool,
    },

    /// Assemble the live-preview HTML document
    Preview {
        /// Write the document here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// API settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show the workspace overview
    Status,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The request to send
    pub prompt: String,

    /// Attach an image (data URL or remote URL), repeatable
    #[arg(short, long)]
    pub image: Vec<String>,

    /// Model name override for this turn
    #[arg(short, long)]
    pub model: Option<String>,

    /// Keep a preview document refreshed at this path while streaming
    #[arg(short, long)]
    pub preview: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List saved projects
    List,

    /// Create a new empty project and switch to it
    New {
        /// Project name
        name: String,
    },

    /// Rename a project
    Rename {
        /// Project ID (defaults to the active project)
        #[arg(long)]
        id: Option<String>,

        /// New name
        name: String,
    },

    /// Delete a project
    Delete {
        /// Project ID
        id: String,
    },

    /// Load a project into the workspace
    Load {
        /// Project ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List version snapshots for the active project
    List,

    /// Restore the file set from a snapshot
    Restore {
        /// User-message ID the snapshot is keyed by
        message_id: String,
    },

    /// Delete one snapshot
    Delete {
        /// User-message ID the snapshot is keyed by
        message_id: String,
    },

    /// Delete all snapshots for the active project
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List the file tree
    List,

    /// Print a file's content
    Show {
        /// File path
        path: String,
    },

    /// Delete a file or folder (recursively)
    Delete {
        /// Path to delete
        path: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TabCommands {
    /// Open a file's tab and make it active
    Open {
        /// File path
        path: String,
    },

    /// Close a tab
    Close {
        /// File path
        path: String,
    },

    /// List open tabs and the active file
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Store the API key
    SetKey {
        /// API key
        key: String,
    },

    /// Show the effective settings (key redacted)
    Show,

    /// Clear all stored settings
    Clear,
}
