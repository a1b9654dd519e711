//! Properties that must hold for every entry in the built-in registry.

use std::collections::HashSet;

use tpsmeter_models::{Model, ModelRegistry, Provider};

#[test]
fn every_provider_has_distinct_models() {
    let registry = ModelRegistry::builtin();

    for provider in registry.list_providers() {
        let models = registry.list_models(provider);
        assert!(!models.is_empty(), "{provider} has no models");

        let unique: HashSet<_> = models.iter().collect();
        assert_eq!(unique.len(), models.len(), "{provider} lists a model twice");
    }
}

#[test]
fn every_listed_pair_is_valid_and_resolves() {
    let registry = ModelRegistry::builtin();

    for provider in registry.list_providers() {
        assert!(registry.is_valid_provider(provider));
        for model in registry.list_models(provider) {
            assert!(registry.is_valid_model_for_provider(provider, model));
            let id = registry
                .resolve_api_identifier(provider, model)
                .unwrap_or_else(|| panic!("{provider}/{model} did not resolve"));
            assert!(!id.is_empty());
        }
    }
}

#[test]
fn unknown_pairs_resolve_to_none() {
    let registry = ModelRegistry::builtin();
    let cases = [
        ("NonexistentCo", "Claude 3 Opus"),
        ("Anthropic", "GPT 4o"),
        ("OpenAI", "GPT 4o mini"),
        ("", ""),
        ("anthropic", "claude 3 opus"),
    ];

    for (provider, model) in cases {
        assert_eq!(registry.resolve_api_identifier(provider, model), None);
        assert!(!registry.is_valid_model_for_provider(provider, model));
    }
}

#[test]
fn invalid_provider_names() {
    let registry = ModelRegistry::builtin();
    assert!(!registry.is_valid_provider(""));
    assert!(!registry.is_valid_provider("NonexistentCo"));
}

#[test]
fn list_providers_is_idempotent() {
    let registry = ModelRegistry::builtin();
    assert_eq!(registry.list_providers(), registry.list_providers());
    assert_eq!(
        ModelRegistry::builtin().list_providers(),
        ModelRegistry::default().list_providers()
    );
}

#[test]
fn no_duplicate_keys_in_table() {
    let registry = ModelRegistry::builtin();
    let mut seen = HashSet::new();
    for entry in registry.entries() {
        assert!(
            seen.insert((entry.provider, entry.model)),
            "duplicate entry {:?}/{:?}",
            entry.provider,
            entry.model
        );
    }
}

#[test]
fn every_model_is_offered_somewhere() {
    let registry = ModelRegistry::builtin();
    for model in Model::ALL {
        assert!(
            Provider::ALL
                .into_iter()
                .any(|p| registry.resolve(p, model).is_some()),
            "{model} has no provider"
        );
    }
}

#[test]
fn bedrock_identifiers_use_cross_region_prefix() {
    let registry = ModelRegistry::builtin();
    for entry in registry.entries_for(Provider::Aws) {
        assert!(entry.api_identifier.starts_with("us.anthropic."));
    }
    for entry in registry.entries_for(Provider::Anthropic) {
        assert!(entry.api_identifier.starts_with("claude-"));
    }
}
