//! MycoScan - Mushroom Photo Identification
//!
//! A cross-platform Rust CLI application that submits a photo to a remote
//! classification endpoint and shows the identified species with confidence,
//! region, and safety metadata. Confirmed identifications can be kept in a
//! locally persisted collection served by a mock backend.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod session;
pub mod store;

use anyhow::{Context, Result};

use crate::cli::{Cli, CollectionCommands, Commands};
use crate::config::Config;
use crate::error::ExitCode;

/// Run the application with parsed CLI arguments.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    runtime.block_on(async {
        match cli.command {
            Commands::Identify(args) => commands::identify::run(args, &config).await,
            Commands::Collection { command } => match command {
                CollectionCommands::List(args) => commands::collection::list(args, &config).await,
                CollectionCommands::Delete(args) => {
                    commands::collection::delete(args, &config).await
                }
            },
            Commands::Login(args) => commands::auth::login(args, &config).await,
            Commands::Register(args) => commands::auth::register(args, &config).await,
        }
    })
}
