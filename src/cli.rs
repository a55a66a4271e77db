//! Command-line interface definitions for MycoScan.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Identify a mushroom photo
//! mycoscan identify ~/photos/find.jpg
//!
//! # Identify and save the result to the collection
//! mycoscan identify ~/photos/find.jpg --save --location "Black Forest"
//!
//! # List saved identifications as JSON
//! mycoscan collection list --output json
//!
//! # Verbose mode for debugging
//! mycoscan -v identify ~/photos/find.jpg
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mushroom photo identification with a personal collection.
///
/// MycoScan submits a photo to a remote classification endpoint and shows the
/// identified species with confidence, region, and safety metadata. Confirmed
/// identifications can be kept in a locally persisted collection.
#[derive(Debug, Parser)]
#[command(name = "mycoscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for MycoScan.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Identify the mushroom in a photo via the remote classifier
    Identify(IdentifyArgs),
    /// Manage the collection of saved identifications
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },
    /// Sign in against the mock backend
    Login(CredentialArgs),
    /// Create an account on the mock backend
    Register(CredentialArgs),
}

/// Arguments for the identify subcommand.
#[derive(Debug, Args)]
pub struct IdentifyArgs {
    /// Path to the photo to identify
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Save the identification to the collection on success
    #[arg(short, long)]
    pub save: bool,

    /// Where the specimen was found (stored with --save)
    #[arg(long, value_name = "PLACE", requires = "save")]
    pub location: Option<String>,

    /// When the specimen was found, e.g. 2026-08-23 (stored with --save)
    #[arg(long, value_name = "DATE", requires = "save")]
    pub found_on: Option<String>,

    /// Base URL of the classification endpoint
    ///
    /// Overrides the configured endpoint for this invocation.
    #[arg(long, value_name = "URL", env = "MYCOSCAN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format (text for humans, json for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Subcommands operating on the saved collection.
#[derive(Debug, Subcommand)]
pub enum CollectionCommands {
    /// List all saved identifications, newest first
    List(ListArgs),
    /// Delete a saved identification by its id
    Delete(DeleteArgs),
}

/// Arguments for the collection list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format (text for humans, json for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the collection delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Id of the record to delete
    #[arg(value_name = "ID")]
    pub id: u64,
}

/// Arguments for the login and register subcommands.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Account identifier (e.g. an email address)
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    /// Account secret
    #[arg(long, value_name = "SECRET", env = "MYCOSCAN_SECRET")]
    pub secret: String,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
