use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use tpsmeter_models::ModelRegistry;

use crate::config::{ConfigLoader, TpsConfig};
use crate::output::print_error;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
    /// Show configuration file paths and whether they exist
    Path,
}

pub fn run(args: ConfigArgs, config: &TpsConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(config),
        ConfigCommands::Path => show_paths(),
    }
}

/// A configured default pair the registry does not know, if any.
fn invalid_defaults(config: &TpsConfig) -> Option<String> {
    let provider = config.defaults.provider.as_deref()?;
    let registry = ModelRegistry::builtin();
    if !registry.is_valid_provider(provider) {
        return Some(format!("defaults.provider '{provider}' is not a known provider"));
    }
    let model = config.defaults.model.as_deref()?;
    (!registry.is_valid_model_for_provider(provider, model))
        .then(|| format!("defaults.model '{model}' is not offered by {provider}"))
}

fn show_config(config: &TpsConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    if let Some(problem) = invalid_defaults(config) {
        print_error(&problem);
    }
    Ok(())
}

fn layer_status(path: &Path) -> &'static str {
    if path.exists() { "" } else { " (not found)" }
}

fn show_paths() -> Result<()> {
    match ConfigLoader::user_config_path() {
        Some(path) => println!("User config:    {}{}", path.display(), layer_status(&path)),
        None => println!("User config:    (no home directory)"),
    }
    let project = ConfigLoader::project_config_path();
    println!("Project config: {}{}", project.display(), layer_status(&project));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_defaults(provider: Option<&str>, model: Option<&str>) -> TpsConfig {
        let mut config = TpsConfig::default();
        config.defaults.provider = provider.map(String::from);
        config.defaults.model = model.map(String::from);
        config
    }

    #[test]
    fn defaults_unset_are_valid() {
        assert_eq!(invalid_defaults(&TpsConfig::default()), None);
    }

    #[test]
    fn defaults_known_pair_is_valid() {
        let config = with_defaults(Some("Anthropic"), Some("Claude 3.5 Haiku"));
        assert_eq!(invalid_defaults(&config), None);
    }

    #[test]
    fn defaults_unknown_provider_is_reported() {
        let config = with_defaults(Some("OpenAI"), None);
        assert!(invalid_defaults(&config).unwrap().contains("OpenAI"));
    }

    #[test]
    fn defaults_model_from_other_provider_is_reported() {
        let config = with_defaults(Some("Anthropic"), Some("Nova Pro"));
        assert!(invalid_defaults(&config).unwrap().contains("Nova Pro"));
    }

    #[test]
    fn missing_layer_is_marked() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(layer_status(&dir.path().join("config.toml")), " (not found)");
        assert_eq!(layer_status(dir.path()), "");
    }
}
