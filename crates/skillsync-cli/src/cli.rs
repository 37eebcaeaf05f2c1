//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Skillsync - Synchronize a skills catalog against upstream repositories
#[derive(Parser, Debug)]
#[command(name = "skillsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Catalog root directory (contains skillsync.yaml)
    #[arg(long, global = true, env = "SKILLSYNC_CATALOG", default_value = ".")]
    pub catalog: PathBuf,

    /// Fetch full history instead of shallow mirrors
    ///
    /// Some transports (notably plain local paths) do not serve shallow
    /// packs.
    #[arg(long, global = true)]
    pub full_history: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize all external skills from their upstream sources
    ///
    /// Examples:
    ///   skillsync sync                  # Sync everything
    ///   skillsync sync --dry-run        # Classify without changing anything
    ///   skillsync sync --tier 1         # Only tier-1 skills
    ///   skillsync sync --category devops
    Sync {
        /// Classify changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Only sync skills of this tier
        #[arg(long)]
        tier: Option<u8>,

        /// Only sync skills of this category
        #[arg(long)]
        category: Option<String>,

        /// Validation command to run against each synced skill
        #[arg(long, env = "SKILLSYNC_VALIDATE")]
        validate: Option<String>,
    },

    /// Re-sync a single skill by name
    Update {
        /// Name of the skill to update
        name: String,
    },

    /// List external skills and their declared sources
    ListExternal,

    /// List local (catalog-resident) skills
    ListLocal,

    /// List the distinct categories declared in the manifest
    ListCategories,

    /// Show last-synced state for every skill
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show file-level differences between the catalog and upstream
    Diff {
        /// Restrict the diff to one skill
        skill: Option<String>,
    },
}
