//! Core types for the provider/model catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An LLM vendor or hosting platform.
///
/// Variants are declared in display order; [`Provider::ALL`] follows it.
///
/// # Examples
///
/// ```
/// use tpsmeter_models::Provider;
///
/// let provider = Provider::from_display_name("Anthropic").unwrap();
/// assert_eq!(provider, Provider::Anthropic);
/// assert_eq!(provider.to_string(), "Anthropic");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "Amazon Web Services")]
    Aws,
    #[serde(rename = "Anthropic")]
    Anthropic,
    // OpenAi => "OpenAI" once the registry table carries GPT entries.
}

impl Provider {
    /// All providers in declaration order.
    pub const ALL: [Provider; 2] = [Provider::Aws, Provider::Anthropic];

    /// Human-readable name shown in selection widgets.
    pub const fn display_name(self) -> &'static str {
        match self {
            Provider::Aws => "Amazon Web Services",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Look up a provider by its exact display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.display_name() == name)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A model variant, identified by its display name.
///
/// The same model can be offered by several providers under different
/// API identifiers; see [`crate::ModelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "Claude 3 Opus")]
    Claude3Opus,
    #[serde(rename = "Claude 3.7 Sonnet")]
    Claude37Sonnet,
    #[serde(rename = "Claude 3.5 Sonnet V2")]
    Claude35SonnetV2,
    #[serde(rename = "Claude 3.5 Sonnet")]
    Claude35Sonnet,
    #[serde(rename = "Claude 3 Sonnet")]
    Claude3Sonnet,
    #[serde(rename = "Claude 3.5 Haiku")]
    Claude35Haiku,
    #[serde(rename = "Claude 3 Haiku")]
    Claude3Haiku,
}

impl Model {
    /// All models in declaration order.
    pub const ALL: [Model; 7] = [
        Model::Claude3Opus,
        Model::Claude37Sonnet,
        Model::Claude35SonnetV2,
        Model::Claude35Sonnet,
        Model::Claude3Sonnet,
        Model::Claude35Haiku,
        Model::Claude3Haiku,
    ];

    /// Human-readable name shown in selection widgets.
    pub const fn display_name(self) -> &'static str {
        match self {
            Model::Claude3Opus => "Claude 3 Opus",
            Model::Claude37Sonnet => "Claude 3.7 Sonnet",
            Model::Claude35SonnetV2 => "Claude 3.5 Sonnet V2",
            Model::Claude35Sonnet => "Claude 3.5 Sonnet",
            Model::Claude3Sonnet => "Claude 3 Sonnet",
            Model::Claude35Haiku => "Claude 3.5 Haiku",
            Model::Claude3Haiku => "Claude 3 Haiku",
        }
    }

    /// Look up a model by its exact display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.display_name() == name)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the registry: a provider/model pair and its API identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub provider: Provider,
    pub model: Model,
    /// Vendor-specific identifier used to address the model in a request.
    pub api_identifier: &'static str,
}

/// A provider/model pair that is known to exist in the registry.
///
/// Only [`crate::ModelRegistry`] hands these out, so holding one means the
/// pair has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedModel {
    pub provider: Provider,
    pub model: Model,
    pub api_identifier: &'static str,
}

impl From<&RegistryEntry> for ResolvedModel {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            provider: entry.provider,
            model: entry.model,
            api_identifier: entry.api_identifier,
        }
    }
}

impl fmt::Display for ResolvedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} ({})", self.provider, self.model, self.api_identifier)
    }
}
