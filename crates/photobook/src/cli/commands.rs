//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use photobook::{Bucket, PurgeTask};
use std::path::PathBuf;

/// Photobook - photo and avatar storage maintenance
#[derive(Parser, Debug)]
#[command(name = "photobook")]
#[command(about = "Photo and avatar storage with scheduled orphan collection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the bucket directories and the default avatar
    Init,

    /// List stored names in a bucket
    Ls {
        /// Bucket to list (photos or avatars)
        bucket: Bucket,
    },

    /// Run one purge pass now and print the report
    Purge {
        /// What to purge
        target: PurgeTarget,
    },

    /// Run the scheduled purge server until interrupted
    Serve,
}

/// Purge target argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PurgeTarget {
    /// Unreferenced photos
    Photos,
    /// Unreferenced avatars
    Avatars,
    /// Abandoned staged uploads
    Staging,
    /// Everything above, in order
    All,
}

impl PurgeTarget {
    /// Tasks to run for this target.
    pub fn tasks(self) -> Vec<PurgeTask> {
        match self {
            PurgeTarget::Photos => vec![PurgeTask::Photos],
            PurgeTarget::Avatars => vec![PurgeTask::Avatars],
            PurgeTarget::Staging => vec![PurgeTask::Staging],
            PurgeTarget::All => <PurgeTask as strum::IntoEnumIterator>::iter().collect(),
        }
    }
}
