//! Model registry mapping provider/model pairs to API identifiers.
//!
//! The registry is a static, read-only table. The string-based queries
//! (`list_models`, `resolve_api_identifier`, ...) treat unknown names as
//! "nothing there" rather than as errors, so a presentation layer can feed
//! raw widget values straight in. [`ModelRegistry::resolve_names`] is the
//! strict variant for callers that want an explicit error.

use tracing::debug;

use crate::types::{Model, Provider, RegistryEntry, ResolvedModel};
use crate::{Error, Result};

const fn entry(provider: Provider, model: Model, api_identifier: &'static str) -> RegistryEntry {
    RegistryEntry {
        provider,
        model,
        api_identifier,
    }
}

/// Every known provider/model pair, grouped by provider in declaration order.
static ENTRIES: &[RegistryEntry] = &[
    entry(
        Provider::Aws,
        Model::Claude3Opus,
        "us.anthropic.claude-3-opus-20240229-v1:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude37Sonnet,
        "us.anthropic.claude-3-7-sonnet-20250219-v1:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude35SonnetV2,
        "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude35Sonnet,
        "us.anthropic.claude-3-5-sonnet-20240620-v1:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude3Sonnet,
        "us.anthropic.claude-3-sonnet-20240229-v1:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude35Haiku,
        "us.anthropic.claude-3-5-haiku-20241022-v1:0",
    ),
    entry(
        Provider::Aws,
        Model::Claude3Haiku,
        "us.anthropic.claude-3-haiku-20240307-v1:0",
    ),
    entry(Provider::Anthropic, Model::Claude3Opus, "claude-3-opus-20240229"),
    entry(
        Provider::Anthropic,
        Model::Claude37Sonnet,
        "claude-3-7-sonnet-20250219",
    ),
    entry(
        Provider::Anthropic,
        Model::Claude35SonnetV2,
        "claude-3-5-sonnet-20241022",
    ),
    entry(
        Provider::Anthropic,
        Model::Claude35Sonnet,
        "claude-3-5-sonnet-20240620",
    ),
    entry(Provider::Anthropic, Model::Claude3Sonnet, "claude-3-sonnet-20240229"),
    entry(Provider::Anthropic, Model::Claude35Haiku, "claude-3-5-haiku-20241022"),
    entry(Provider::Anthropic, Model::Claude3Haiku, "claude-3-haiku-20240307"),
];

/// Read-only catalog of provider/model combinations.
///
/// # Example
///
/// ```
/// use tpsmeter_models::ModelRegistry;
///
/// let registry = ModelRegistry::builtin();
/// assert_eq!(registry.list_providers(), vec!["Amazon Web Services", "Anthropic"]);
/// assert_eq!(
///     registry.resolve_api_identifier("Anthropic", "Claude 3 Haiku"),
///     Some("claude-3-haiku-20240307"),
/// );
/// assert_eq!(registry.resolve_api_identifier("Anthropic", "GPT 4o"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModelRegistry {
    entries: &'static [RegistryEntry],
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelRegistry {
    /// The process-wide built-in table.
    pub const fn builtin() -> Self {
        Self { entries: ENTRIES }
    }

    /// All entries in table order.
    pub fn entries(&self) -> &'static [RegistryEntry] {
        self.entries
    }

    /// Entries belonging to a single provider, in table order.
    pub fn entries_for(&self, provider: Provider) -> impl Iterator<Item = &'static RegistryEntry> {
        self.entries.iter().filter(move |e| e.provider == provider)
    }

    /// Provider display names in declaration order.
    pub fn list_providers(&self) -> Vec<&'static str> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.entries.iter().any(|e| e.provider == *p))
            .map(Provider::display_name)
            .collect()
    }

    /// Model display names offered by a provider.
    ///
    /// Returns an empty list for an unknown provider.
    pub fn list_models(&self, provider_name: &str) -> Vec<&'static str> {
        let Some(provider) = Provider::from_display_name(provider_name) else {
            debug!(provider = provider_name, "unknown provider, no models");
            return Vec::new();
        };
        self.entries_for(provider)
            .map(|e| e.model.display_name())
            .collect()
    }

    /// Whether the provider exists in the registry.
    pub fn is_valid_provider(&self, provider_name: &str) -> bool {
        Provider::from_display_name(provider_name)
            .is_some_and(|p| self.entries.iter().any(|e| e.provider == p))
    }

    /// Whether the model exists and is offered by the provider.
    pub fn is_valid_model_for_provider(&self, provider_name: &str, model_name: &str) -> bool {
        self.find(provider_name, model_name).is_some()
    }

    /// API identifier for a provider/model pair, or `None` if the pair is unknown.
    pub fn resolve_api_identifier(&self, provider_name: &str, model_name: &str) -> Option<&'static str> {
        self.find(provider_name, model_name).map(|e| e.api_identifier)
    }

    /// Typed lookup for an already-parsed pair.
    pub fn resolve(&self, provider: Provider, model: Model) -> Option<ResolvedModel> {
        self.entries
            .iter()
            .find(|e| e.provider == provider && e.model == model)
            .map(ResolvedModel::from)
    }

    /// Strict lookup by display names.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` for an unknown provider and
    /// `Error::ModelNotFound` when the provider does not offer the model.
    pub fn resolve_names(&self, provider_name: &str, model_name: &str) -> Result<ResolvedModel> {
        if !self.is_valid_provider(provider_name) {
            return Err(Error::ProviderNotFound(provider_name.to_string()));
        }
        self.find(provider_name, model_name)
            .map(ResolvedModel::from)
            .ok_or_else(|| Error::ModelNotFound {
                provider: provider_name.to_string(),
                model: model_name.to_string(),
            })
    }

    fn find(&self, provider_name: &str, model_name: &str) -> Option<&'static RegistryEntry> {
        let provider = Provider::from_display_name(provider_name)?;
        let model = Model::from_display_name(model_name)?;
        let found = self
            .entries
            .iter()
            .find(|e| e.provider == provider && e.model == model);
        if found.is_none() {
            debug!(provider = provider_name, model = model_name, "pair not in registry");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_listed_in_declaration_order() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.list_providers(),
            vec!["Amazon Web Services", "Anthropic"]
        );
    }

    #[test]
    fn models_listed_in_table_order() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.list_models("Anthropic"),
            vec![
                "Claude 3 Opus",
                "Claude 3.7 Sonnet",
                "Claude 3.5 Sonnet V2",
                "Claude 3.5 Sonnet",
                "Claude 3 Sonnet",
                "Claude 3.5 Haiku",
                "Claude 3 Haiku",
            ]
        );
    }

    #[test]
    fn unknown_provider_has_no_models() {
        let registry = ModelRegistry::builtin();
        assert!(registry.list_models("OpenAI").is_empty());
        assert!(registry.list_models("").is_empty());
    }

    #[test]
    fn resolves_provider_specific_identifiers() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.resolve_api_identifier("Amazon Web Services", "Claude 3.7 Sonnet"),
            Some("us.anthropic.claude-3-7-sonnet-20250219-v1:0")
        );
        assert_eq!(
            registry.resolve_api_identifier("Anthropic", "Claude 3.7 Sonnet"),
            Some("claude-3-7-sonnet-20250219")
        );
    }

    #[test]
    fn invalid_pairs_resolve_to_none() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.resolve_api_identifier("Anthropic", "GPT 4o"), None);
        assert_eq!(registry.resolve_api_identifier("OpenAI", "Claude 3 Opus"), None);
        assert_eq!(registry.resolve_api_identifier("", ""), None);
        assert!(!registry.is_valid_model_for_provider("Anthropic", "claude-3-opus-20240229"));
    }

    #[test]
    fn resolve_names_distinguishes_error_kinds() {
        let registry = ModelRegistry::builtin();

        let err = registry.resolve_names("NonexistentCo", "Claude 3 Opus").unwrap_err();
        assert!(matches!(err, Error::ProviderNotFound(name) if name == "NonexistentCo"));

        let err = registry.resolve_names("Anthropic", "GPT 4o").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { .. }));

        let resolved = registry.resolve_names("Anthropic", "Claude 3 Opus").unwrap();
        assert_eq!(resolved.provider, Provider::Anthropic);
        assert_eq!(resolved.model, Model::Claude3Opus);
        assert_eq!(resolved.api_identifier, "claude-3-opus-20240229");
    }

    #[test]
    fn typed_resolve_matches_string_resolve() {
        let registry = ModelRegistry::builtin();
        for entry in registry.entries() {
            let resolved = registry.resolve(entry.provider, entry.model).unwrap();
            assert_eq!(
                Some(resolved.api_identifier),
                registry.resolve_api_identifier(
                    entry.provider.display_name(),
                    entry.model.display_name()
                )
            );
        }
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = ModelRegistry { entries: &[] };
        assert!(registry.list_providers().is_empty());
        assert!(!registry.is_valid_provider("Anthropic"));
    }
}
