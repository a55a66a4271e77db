//! Collection commands: list and delete saved identifications.

use anyhow::{Context, Result};

use crate::cli::{DeleteArgs, ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output;

/// List the full collection, newest first.
pub async fn list(args: ListArgs, config: &Config) -> Result<ExitCode> {
    let store = super::open_store(config)?;
    let records = store
        .select()
        .await
        .context("Failed to load the collection")?;

    match args.output {
        OutputFormat::Text => print!("{}", output::records_text(&records)),
        OutputFormat::Json => println!("{}", output::json(&records)?),
    }

    Ok(ExitCode::Success)
}

/// Delete one record by id. Deleting an absent id is still a success.
pub async fn delete(args: DeleteArgs, config: &Config) -> Result<ExitCode> {
    let store = super::open_store(config)?;
    store
        .delete(args.id)
        .await
        .with_context(|| format!("Failed to delete record {}", args.id))?;

    log::info!("record {} is gone", args.id);
    Ok(ExitCode::Success)
}
