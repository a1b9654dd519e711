//! Provider and model catalog commands.
//!
//! Lists the registry and shows what a given provider/model pair needs.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tpsmeter_models::credentials::{CredentialField, FieldKind};
use tpsmeter_models::{ModelRegistry, RegistryEntry};

/// Models command arguments.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommands,
}

/// Models subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List provider/model pairs and their API identifiers
    List {
        /// Filter by provider display name (e.g. "Anthropic")
        #[arg(long)]
        provider: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the API identifier and required credentials for a pair
    Info {
        /// Provider display name
        provider: String,
        /// Model display name (e.g. "Claude 3.7 Sonnet")
        model: String,
    },
}

/// Run models command.
pub fn run(args: ModelsArgs) -> Result<()> {
    let registry = ModelRegistry::builtin();
    match args.command {
        ModelsCommands::List { provider, json } => list_models(&registry, provider, json),
        ModelsCommands::Info { provider, model } => show_model_info(&registry, &provider, &model),
    }
}

/// Entries matching an optional provider filter.
///
/// An unknown provider yields no entries rather than an error.
fn filter_entries(registry: &ModelRegistry, provider: Option<&str>) -> Vec<RegistryEntry> {
    registry
        .entries()
        .iter()
        .filter(|e| provider.is_none_or(|p| e.provider.display_name() == p))
        .copied()
        .collect()
}

fn list_models(registry: &ModelRegistry, provider_filter: Option<String>, json: bool) -> Result<()> {
    let entries = filter_entries(registry, provider_filter.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No models match the specified filters.");
        println!();
        println!("Known providers: {}", registry.list_providers().join(", "));
        return Ok(());
    }

    println!("{}", entries_table(&entries));
    Ok(())
}

fn entries_table(entries: &[RegistryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::Cyan),
        Cell::new("Model").fg(Color::Cyan),
        Cell::new("API Identifier").fg(Color::Cyan),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.provider.display_name()),
            Cell::new(entry.model.display_name()),
            Cell::new(entry.api_identifier),
        ]);
    }
    table
}

struct FieldSummary {
    key: &'static str,
    label: &'static str,
    env_var: &'static str,
    input: String,
}

fn describe_field(field: &CredentialField) -> FieldSummary {
    let input = match field.kind {
        FieldKind::Secret => "secret".to_string(),
        FieldKind::Choice(options) => format!("one of {}", options.join(", ")),
    };
    FieldSummary {
        key: field.key,
        label: field.label,
        env_var: field.env_var,
        input,
    }
}

fn show_model_info(registry: &ModelRegistry, provider: &str, model: &str) -> Result<()> {
    let resolved = registry.resolve_names(provider, model)?;

    println!("Model: {}", resolved.model);
    println!("Provider: {}", resolved.provider);
    println!("API identifier: {}", resolved.api_identifier);
    println!();
    println!("Credentials required:");
    for field in resolved.provider.credential_fields().iter().map(describe_field) {
        println!("  {} ({}) - {}, env {}", field.label, field.key, field.input, field.env_var);
    }

    Ok(())
}
