//! Login and register commands against the mock backend.

use anyhow::{Context, Result};

use crate::cli::CredentialArgs;
use crate::config::Config;
use crate::error::ExitCode;
use crate::store::StoreError;

/// Sign in. Empty identifier or secret is rejected by the mock backend.
pub async fn login(args: CredentialArgs, config: &Config) -> Result<ExitCode> {
    let store = super::open_store(config)?;
    match store.sign_in(&args.identifier, &args.secret).await {
        Ok(handle) => {
            println!("signed in as {} ({})", handle.identifier, handle.id);
            Ok(ExitCode::Success)
        }
        Err(StoreError::InvalidCredentials) => {
            eprintln!("invalid credentials");
            Ok(ExitCode::InvalidCredentials)
        }
        Err(e) => Err(e).context("Sign-in failed"),
    }
}

/// Create an account. The mock backend never rejects a registration.
pub async fn register(args: CredentialArgs, config: &Config) -> Result<ExitCode> {
    let store = super::open_store(config)?;
    let handle = store
        .sign_up(&args.identifier, &args.secret)
        .await
        .context("Registration failed")?;

    println!("registered {} ({})", handle.identifier, handle.id);
    Ok(ExitCode::Success)
}
