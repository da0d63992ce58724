//! Command-line interface definitions for sumvalve.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, error
//! format) and subcommands for maintaining a checksums file or guarding a
//! pipe.
//!
//! # Example
//!
//! ```bash
//! # Record a file's sha256 checksum
//! sumvalve add -c sums.json ./release.tar.gz
//!
//! # Re-validate it later
//! sumvalve validate -c sums.json ./release.tar.gz
//!
//! # Forward stdin to stdout only if it matches a checksum
//! curl -sL https://example.com/release.tar.gz | sumvalve pipe $SHA256 > release.tar.gz
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::names;

/// Checksum registry and validated stream forwarding.
///
/// sumvalve keeps a JSON file of named checksums, validates files against
/// them, and guards pipes so that unvalidated data never reaches stdout.
#[derive(Debug, Parser)]
#[command(name = "sumvalve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for sumvalve.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty checksums file
    Init(InitArgs),
    /// Record a file's checksum in the checksums file
    Add(AddArgs),
    /// Remove recorded checksums by name
    Remove(RemoveArgs),
    /// List the recorded checksums
    List(ListArgs),
    /// Validate a file against its recorded checksums
    Validate(ValidateArgs),
    /// Forward stdin to stdout only if it matches a checksum
    Pipe(PipeArgs),
}

/// Arguments for the init subcommand.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path of the checksums file to create
    #[arg(short, long, value_name = "FILE")]
    pub checksums: PathBuf,
}

/// Arguments for the add subcommand.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Path to the checksums file
    #[arg(short, long, value_name = "FILE")]
    pub checksums: PathBuf,

    /// File to record a checksum for
    #[arg(value_name = "PATH")]
    pub file: PathBuf,

    /// Name to record the checksum under (default: the file name)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Hash algorithm to use (e.g., md5, sha1, sha256, sha512, blake3)
    #[arg(short, long, value_name = "ALGO", default_value = names::DEFAULT_ALGORITHM)]
    pub algorithm: String,
}

/// Arguments for the remove subcommand.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Path to the checksums file
    #[arg(short, long, value_name = "FILE")]
    pub checksums: PathBuf,

    /// Name of the checksums to remove
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Only remove the checksum for this algorithm
    ///
    /// Without this, every algorithm recorded under NAME is removed.
    #[arg(short, long, value_name = "ALGO")]
    pub algorithm: Option<String>,
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Path to the checksums file
    #[arg(short, long, value_name = "FILE")]
    pub checksums: PathBuf,
}

/// Arguments for the validate subcommand.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the checksums file
    #[arg(short, long, value_name = "FILE")]
    pub checksums: PathBuf,

    /// File to validate
    #[arg(value_name = "PATH")]
    pub file: PathBuf,

    /// Name the checksum was recorded under (default: the file name)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Only validate against this algorithm
    ///
    /// Without this, the file must match every algorithm recorded under
    /// the name.
    #[arg(short, long, value_name = "ALGO")]
    pub algorithm: Option<String>,
}

/// Arguments for the pipe subcommand.
#[derive(Debug, Args)]
pub struct PipeArgs {
    /// Expected checksum as lower-case hex
    #[arg(value_name = "CHECKSUM")]
    pub checksum: String,

    /// Hash algorithm to use (e.g., md5, sha1, sha256, sha512, blake3)
    #[arg(short, long, value_name = "ALGO", default_value = names::DEFAULT_ALGORITHM)]
    pub algorithm: String,

    /// Buffer through a temporary file instead of memory
    ///
    /// Useful when the piped data is too large to hold in memory.
    #[arg(long)]
    pub file_cache: bool,
}
