//! Interactive test form.
//!
//! Walks the user through provider and model selection, credentials and a
//! test message, then streams the simulated response with live output.

use std::io;

use anyhow::{Context, Result, bail};
use clap::Args;
use dialoguer::console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use tpsmeter_models::credentials::{CredentialField, CredentialSet, FieldKind};
use tpsmeter_models::session::StreamingSession;
use tpsmeter_models::{ModelRegistry, Provider};

use super::run::{cancel_on_ctrl_c, simulation_config};
use crate::config::TpsConfig;
use crate::output::{drive_stream, print_error, print_header, print_section};

/// Form command arguments.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// Pre-fill credentials from provider environment variables
    #[arg(long)]
    pub env_credentials: bool,

    /// Number of simulated chunks
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Pause after each chunk in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Index of `preferred` in `items`, or the first item.
fn default_index(items: &[&str], preferred: Option<&str>) -> usize {
    preferred
        .and_then(|p| items.iter().position(|item| *item == p))
        .unwrap_or(0)
}

fn prompt_field(theme: &ColorfulTheme, field: &CredentialField) -> Result<String> {
    let value = match field.kind {
        FieldKind::Secret => Password::with_theme(theme)
            .with_prompt(field.label)
            .allow_empty_password(true)
            .interact()?,
        FieldKind::Choice(options) => {
            let index = Select::with_theme(theme)
                .with_prompt(field.label)
                .items(options)
                .default(0)
                .interact()?;
            options[index].to_string()
        }
    };
    Ok(value)
}

fn prompt_credentials(
    theme: &ColorfulTheme,
    provider: Provider,
    env_credentials: bool,
) -> Result<CredentialSet> {
    let mut credentials = if env_credentials {
        CredentialSet::from_env(provider)
    } else {
        CredentialSet::new()
    };

    for field in provider.credential_fields() {
        if credentials.is_populated(field.key) {
            println!(
                "{} {}",
                style(field.label).bold(),
                style(format!("(from {})", field.env_var)).dim()
            );
            continue;
        }
        let value = prompt_field(theme, field)?;
        credentials.insert(field.key, value);
    }

    Ok(credentials)
}

/// Run the interactive form.
pub async fn run(args: FormArgs, config: &TpsConfig) -> Result<()> {
    let theme = ColorfulTheme::default();
    let registry = ModelRegistry::builtin();

    print_header("LLM TPS Counter");
    println!("Test the tokens per second (TPS) performance of different LLM providers and models.");
    println!();

    let providers = registry.list_providers();
    if providers.is_empty() {
        bail!("no providers registered");
    }
    let provider_index = Select::with_theme(&theme)
        .with_prompt("Select Provider")
        .items(&providers)
        .default(default_index(&providers, config.defaults.provider.as_deref()))
        .interact()?;
    let provider_name = providers[provider_index];

    let models = registry.list_models(provider_name);
    if models.is_empty() {
        bail!("provider '{}' has no models", provider_name);
    }
    let model_index = Select::with_theme(&theme)
        .with_prompt("Select Model")
        .items(&models)
        .default(default_index(&models, config.defaults.model.as_deref()))
        .interact()?;
    let model_name = models[model_index];

    if let Some(api_identifier) = registry.resolve_api_identifier(provider_name, model_name) {
        println!("{}", style(format!("Model ID: {api_identifier}")).dim());
    }

    let resolved = registry
        .resolve_names(provider_name, model_name)
        .context("selected model is not in the registry")?;

    print_section("Authentication");
    let credentials = prompt_credentials(&theme, resolved.provider, args.env_credentials)?;

    print_section("Test Message");
    let message = Input::<String>::with_theme(&theme)
        .with_prompt("Enter a message to send to the LLM")
        .allow_empty(true)
        .interact_text()?;

    let session = StreamingSession::new(resolved).with_config(simulation_config(
        config,
        args.iterations,
        args.interval_ms,
    ));
    let cancel = session.cancellation_token();

    let stream = match session.run(&credentials, &message) {
        Ok(stream) => stream,
        Err(rejection) => {
            for message in rejection.messages() {
                print_error(&message);
            }
            return Ok(());
        }
    };

    // Installed after the prompts so Ctrl-C still aborts the form itself.
    cancel_on_ctrl_c(cancel);
    println!();
    let mut stdout = io::stdout();
    drive_stream(stream, Some(&mut stdout)).await?;

    Ok(())
}
