//! The identify command: one full identification attempt.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::{IdentifyArgs, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output;
use crate::session::{Classifier, IdentificationSession, Phase};
use crate::store::Observation;

/// Run one select-analyze cycle and optionally save the result.
pub async fn run(args: IdentifyArgs, config: &Config) -> Result<ExitCode> {
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.endpoint.clone());

    let session = IdentificationSession::new(Classifier::new(endpoint));
    session
        .select_image(&args.image)
        .with_context(|| format!("Failed to select {}", args.image.display()))?;

    let spinner = analysis_spinner();
    session.analyze().await;
    spinner.finish_and_clear();

    match session.phase() {
        Phase::Resolved => {
            let Some(result) = session.result() else {
                anyhow::bail!("session resolved without a result");
            };

            match args.output {
                OutputFormat::Text => print!("{}", output::identification_text(&result)),
                OutputFormat::Json => println!("{}", output::json(&result)?),
            }

            if args.save {
                let store = super::open_store(config)?;
                let mut observation = Observation::from_identification(result);
                if let Some(location) = &args.location {
                    observation = observation.with_location(location.clone());
                }
                if let Some(found_on) = &args.found_on {
                    observation = observation.with_found_on(found_on.clone());
                }
                let record = store
                    .insert(observation)
                    .await
                    .context("Failed to save the identification")?;
                log::info!("saved to the collection as #{}", record.id);
            }

            Ok(ExitCode::Success)
        }
        Phase::Failed => {
            let message = session
                .error()
                .unwrap_or_else(|| "analysis failed".to_string());
            eprintln!("{}", message);
            Ok(ExitCode::AnalysisFailed)
        }
        phase => anyhow::bail!("analysis ended in unexpected state {:?}", phase),
    }
}

fn analysis_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("analyzing image...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
