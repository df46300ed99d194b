use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;

pub fn version_string() -> &'static str {
    static VERSION_STRING: Lazy<String> = Lazy::new(|| {
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        const GIT_HASH: &str = env!("GIT_HASH");
        const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    });
    &VERSION_STRING
}

#[derive(Parser, Debug)]
#[command(name = "envm")]
#[command(about = "Manage environment variables across session, user and system scopes", long_about = None)]
#[command(version = version_string())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target scope: session, user or system (default: user)
    #[arg(short, long, global = true)]
    pub scope: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a variable's stored value
    #[command(alias = "g")]
    Get {
        name: String,

        /// Expand $VAR / %VAR% references against the live environment
        #[arg(long)]
        expand: bool,

        /// Also resolve references from the target scope's medium
        #[arg(long)]
        across_scopes: bool,
    },

    /// Write a variable (snapshots, verifies and rolls back by default)
    #[command(alias = "s")]
    Set {
        name: String,
        value: String,

        /// Skip the pre-mutation snapshot
        #[arg(long)]
        no_backup: bool,

        /// Skip the post-write verification read
        #[arg(long)]
        no_verify: bool,

        /// Leave the medium as written when verification fails
        #[arg(long)]
        no_rollback: bool,

        /// Report the would-be change without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a variable
    #[command(alias = "rm")]
    Unset {
        name: String,

        /// Skip the pre-mutation snapshot
        #[arg(long)]
        no_backup: bool,

        /// Skip the post-write verification read
        #[arg(long)]
        no_verify: bool,

        /// Leave the medium as written when verification fails
        #[arg(long)]
        no_rollback: bool,

        /// Report the would-be change without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List backup snapshots (all scopes unless --scope is given)
    #[command(alias = "ls")]
    Backups,

    /// Replay a backup snapshot back into its medium
    Restore {
        /// Backup id, e.g. user-PATH-2026-08-07T12-34-56-789Z.bak
        id: String,
    },

    /// Delete backups beyond the retention policy
    Purge {
        /// Keep only the N most recent backups per scope
        #[arg(long)]
        max_per_scope: Option<usize>,

        /// Drop backups older than this many days
        #[arg(long)]
        max_age_days: Option<i64>,
    },

    /// Edit a PATH-like list variable
    Path {
        #[command(subcommand)]
        action: PathCommands,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (profile-file, system-file, backup-dir,
        /// max-per-scope, max-age-days)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PathCommands {
    /// Print the list's segments, one per line
    List {
        /// Variable holding the list
        #[arg(long, default_value = "PATH")]
        name: String,
    },

    /// Append a segment if not already present
    Add {
        segment: String,

        #[arg(long, default_value = "PATH")]
        name: String,
    },

    /// Remove every occurrence of a segment
    Remove {
        segment: String,

        #[arg(long, default_value = "PATH")]
        name: String,
    },

    /// Drop duplicate segments, first occurrence wins
    Dedupe {
        #[arg(long, default_value = "PATH")]
        name: String,
    },
}
