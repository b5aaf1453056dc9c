//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: the full-screen wall (default)
//! - snapshot: fetch once and print lane counts
//! - simulate: drive the scheduler offline and report lane shares

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Signwall - rotating community wall for unattended displays
#[derive(Parser, Debug)]
#[command(name = "signwall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the wall display
    Run,

    /// Fetch one snapshot and show how it splits into lanes
    Snapshot,

    /// Run the rotation offline against one snapshot
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value_t = 10_000)]
        ticks: u64,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },
}
