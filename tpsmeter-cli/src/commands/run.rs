//! Non-interactive test run.
//!
//! Everything the form asks for is taken from flags, config and the
//! environment instead, which makes this the scriptable entry point.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::json;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tpsmeter_models::credentials::CredentialSet;
use tpsmeter_models::session::{SessionEvent, SimulationConfig, StreamingSession};
use tpsmeter_models::{ModelRegistry, Provider};
use tracing::debug;

use crate::config::TpsConfig;
use crate::output::{drive_stream, print_error};

/// Run command arguments.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Provider display name (defaults to `defaults.provider` in config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model display name (defaults to `defaults.model` in config)
    #[arg(long)]
    pub model: Option<String>,

    /// Message to send
    #[arg(long, short)]
    pub message: String,

    /// Credential value as key=value (repeatable)
    #[arg(long = "credential", value_name = "KEY=VALUE", value_parser = parse_credential)]
    pub credentials: Vec<(String, String)>,

    /// Pre-fill credentials from provider environment variables
    #[arg(long)]
    pub env_credentials: bool,

    /// Number of simulated chunks
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Pause after each chunk in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Print the final result as JSON instead of streaming text
    #[arg(long)]
    pub json: bool,
}

/// A `--credential` value that is not `key=value`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCredentialError {
    #[error("expected KEY=VALUE, got '{0}'")]
    MissingSeparator(String),
    #[error("credential key cannot be empty")]
    EmptyKey,
}

/// Parse a `key=value` pair. The value may itself contain `=`.
pub fn parse_credential(s: &str) -> Result<(String, String), ParseCredentialError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ParseCredentialError::MissingSeparator(s.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseCredentialError::EmptyKey);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Simulation parameters from config, with command-line overrides applied.
pub fn simulation_config(
    config: &TpsConfig,
    iterations: Option<u32>,
    interval_ms: Option<u64>,
) -> SimulationConfig {
    let mut simulation = config.simulation.to_simulation_config();
    if let Some(iterations) = iterations {
        simulation = simulation.iterations(iterations);
    }
    if let Some(interval_ms) = interval_ms {
        simulation = simulation.interval(Duration::from_millis(interval_ms));
    }
    simulation
}

/// Cancel `token` when the user presses Ctrl-C.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("ctrl-c received, cancelling session");
            token.cancel();
        }
    });
}

fn build_credentials(provider: Provider, args: &RunArgs) -> Result<CredentialSet> {
    let mut credentials = if args.env_credentials {
        CredentialSet::from_env(provider)
    } else {
        CredentialSet::new()
    };
    for (key, value) in &args.credentials {
        credentials.insert_for(provider, key, value.as_str())?;
    }
    Ok(credentials)
}

/// Run the test non-interactively.
pub async fn run(args: RunArgs, config: &TpsConfig) -> Result<()> {
    let provider_name = args
        .provider
        .as_deref()
        .or(config.defaults.provider.as_deref())
        .context("no provider given; pass --provider or set defaults.provider")?;
    let model_name = args
        .model
        .as_deref()
        .or(config.defaults.model.as_deref())
        .context("no model given; pass --model or set defaults.model")?;

    let resolved = ModelRegistry::builtin().resolve_names(provider_name, model_name)?;
    let credentials = build_credentials(resolved.provider, &args)?;

    let session = StreamingSession::new(resolved).with_config(simulation_config(
        config,
        args.iterations,
        args.interval_ms,
    ));
    cancel_on_ctrl_c(session.cancellation_token());

    stream_and_report(session, &credentials, &args.message, args.json).await
}

/// Validate and stream one session, printing the outcome.
///
/// Fails on rejection and on cancellation, in both text and JSON modes.
async fn stream_and_report(
    session: StreamingSession,
    credentials: &CredentialSet,
    message: &str,
    json: bool,
) -> Result<()> {
    let api_identifier = session.model().api_identifier;
    let stream = match session.run(credentials, message) {
        Ok(stream) => stream,
        Err(rejection) => {
            if json {
                let problems = rejection.messages();
                let missing = rejection.missing_fields();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "type": "rejected",
                        "problems": problems,
                        "missing_fields": missing,
                    }))?
                );
            } else {
                for message in rejection.messages() {
                    print_error(&message);
                }
            }
            bail!("validation failed");
        }
    };

    let event = if json {
        let event = drive_stream::<io::Stdout>(stream, None).await?;
        println!("{}", serde_json::to_string_pretty(&event)?);
        event
    } else {
        println!("Model ID: {api_identifier}");
        println!();
        let mut stdout = io::stdout();
        drive_stream(stream, Some(&mut stdout)).await?
    };

    if matches!(event, SessionEvent::Cancelled(_)) {
        bail!("run cancelled");
    }
    Ok(())
}
