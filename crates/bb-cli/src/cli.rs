//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Blackboard admin - reconcile blackboards with their YAML mirrors
#[derive(Parser, Debug)]
#[command(name = "bbadmin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store database file (overrides config files)
    #[arg(long, global = true, env = "BBADMIN_STORE")]
    pub store: Option<String>,

    /// Directory holding the global config.toml
    #[arg(long, global = true, env = "BBADMIN_CONFIG_DIR", hide = true)]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Blackboard reconciliation commands
    Blackboard {
        #[command(subcommand)]
        action: BlackboardAction,
    },
}

/// Blackboard subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BlackboardAction {
    /// Compare a stored blackboard with a mirror folder
    ///
    /// Examples:
    ///   bbadmin blackboard diff id:<uuid> folder:boards/planner
    ///   bbadmin blackboard diff folder:boards/planner id:_ --detailed
    Diff {
        /// First endpoint (id:<uuid>, id:_ or folder:<path>)
        first: String,

        /// Second endpoint
        second: String,

        /// Show per-field values for changed records
        #[arg(long)]
        detailed: bool,

        /// Compare archived stickies too
        #[arg(long)]
        include_archived: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Mirror a stored blackboard into a folder (id -> folder only)
    Sync {
        /// Source endpoint (id:<uuid> or id:_)
        source: String,

        /// Target endpoint (folder:<path>)
        target: String,

        /// Delete stickie files with no stored counterpart
        #[arg(long)]
        delete: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Rewrite files even when they are up to date
        #[arg(long)]
        force: bool,

        /// Omit id fields in written stickie files
        #[arg(long)]
        clear_ids: bool,
    },

    /// Create a blackboard and its stickies from a folder, keeping ids
    Import {
        /// Folder to import (folder:<path> or a relative path)
        folder: String,

        /// Show per-field values in the preview diff
        #[arg(long)]
        detailed: bool,
    },

    /// List blackboards for a role
    List {
        /// Role name
        #[arg(long)]
        role: String,

        /// Maximum number of blackboards to show
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Number of blackboards to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show one stored blackboard
    Get {
        /// Blackboard endpoint (id:<uuid>) or bare id
        id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
