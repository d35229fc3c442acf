//! Command-line interface definitions
//!
//! This module organizes CLI arguments by **functional usage** - each group
//! contains the options needed by a specific component.

use crate::backends::LocalOptions;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drive the asynchronous filesystem port from the command line
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Local backend configuration
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

/// Port operations exposed as subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a file's contents to stdout
    Read {
        /// File to read
        path: String,
    },
    /// Replace a file's contents with stdin (or --input)
    Write {
        /// File to write
        path: String,
        /// Read the new contents from this file instead of stdin
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Move (rename) a file or directory
    Move {
        /// Existing path
        from: String,
        /// New path
        to: String,
    },
    /// Remove a file or empty directory
    Remove {
        /// Path to remove
        path: String,
    },
    /// Print information about a path
    Stat {
        /// Path to inspect
        path: String,
    },
    /// Print the absolute form of a path
    Resolve {
        /// Relative or absolute path
        path: String,
    },
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// Local backend configuration
///
/// Used by: `LocalFileSystem::new()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Backend Options")]
pub struct BackendConfig {
    /// Directory that relative paths are resolved against
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub base_dir: PathBuf,

    /// Flush written data to storage before it becomes visible
    #[arg(long)]
    pub sync_writes: bool,

    /// Create missing parent directories when writing
    #[arg(long)]
    pub create_parents: bool,
}

impl BackendConfig {
    /// Convert to the options struct used by `LocalFileSystem`
    ///
    /// # Errors
    ///
    /// Returns an error if a relative base directory cannot be made absolute.
    pub fn to_options(&self) -> Result<LocalOptions> {
        Ok(LocalOptions::new(&self.base_dir)?
            .with_sync_writes(self.sync_writes)
            .with_create_parents(self.create_parents))
    }
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Log level implied by -v/-q
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The base directory does not exist or is not a directory
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if !self.backend.base_dir.is_dir() {
            anyhow::bail!(
                "Base directory does not exist or is not a directory: {}",
                self.backend.base_dir.display()
            );
        }

        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }
}
