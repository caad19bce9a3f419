//! AWS MFA session credential rotator
//!
//! Exchanges an MFA code for temporary AWS credentials and stores them in a
//! destination profile, or reports how long a previously stored token stays
//! valid.
//!
//! Rotate mode:
//! 1. Resolves the MFA device (configured `mfa_serial` or the first listed device)
//! 2. Calls STS `GetSessionToken` with the source profile's long-lived keys
//! 3. Writes the temporary keys into the destination profile
//! 4. Records the expiration under the source profile in the config file
//!
//! Every error propagates to `main`, which prints it and exits with status 1.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod client;
mod credentials;
mod error;
mod mfa;
mod paths;
mod profile_file;
mod updater;
mod validity;

use cli::{Args, Command};
use client::AwsClient;
use paths::EnvPaths;
use updater::CredentialRotator;
use validity::Validity;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Quiet mode keeps warnings and errors only. RUST_LOG can still override.
    env_logger::Builder::new()
        .filter_level(if args.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    // Flags are validated before any file or network access.
    match args.into_command()? {
        Command::TimeLeft { source } => {
            let validity = validity::check_validity(&EnvPaths, &source).await?;
            match validity {
                Validity::Remaining(secs) => info!("Token valid for {secs} seconds"),
                Validity::Expired(_) => info!("Token expired."),
            }
            Ok(validity.exit_code())
        }
        Command::Rotate(rotation) => {
            let client = AwsClient::for_profile(&rotation.source).await;
            CredentialRotator::new(&EnvPaths, &client)
                .rotate(&rotation)
                .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
