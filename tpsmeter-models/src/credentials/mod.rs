//! Credential requirements per provider and the values a user supplies.
//!
//! Credentials are collected fresh for every test run and never stored.
//! Values are wrapped in [`SecretString`] so they cannot leak through
//! `Debug` output or logs.
//!
//! # Example
//!
//! ```
//! use tpsmeter_models::Provider;
//! use tpsmeter_models::credentials::CredentialSet;
//!
//! let mut credentials = CredentialSet::new();
//! credentials.insert("anthropic_api_key", "sk-ant-...");
//! assert!(credentials.missing_fields(Provider::Anthropic).is_empty());
//! assert_eq!(
//!     credentials.missing_fields(Provider::Aws).len(),
//!     4,
//! );
//! ```

use std::collections::BTreeMap;
use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Provider, Result};

/// AWS regions offered in the region selector.
pub const AWS_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-1", "us-west-2", "eu-west-1"];

/// How a credential field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, masked on input.
    Secret,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
}

/// A credential field a provider requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    /// Key used in the credential set (e.g. `aws_access_key_id`).
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Conventional environment variable holding this value.
    pub env_var: &'static str,
}

const AWS_FIELDS: &[CredentialField] = &[
    CredentialField {
        key: "aws_access_key_id",
        label: "AWS Access Key ID",
        kind: FieldKind::Secret,
        env_var: "AWS_ACCESS_KEY_ID",
    },
    CredentialField {
        key: "aws_secret_access_key",
        label: "AWS Secret Access Key",
        kind: FieldKind::Secret,
        env_var: "AWS_SECRET_ACCESS_KEY",
    },
    CredentialField {
        key: "aws_session_token",
        label: "AWS Session Token",
        kind: FieldKind::Secret,
        env_var: "AWS_SESSION_TOKEN",
    },
    CredentialField {
        key: "aws_region",
        label: "AWS Region",
        kind: FieldKind::Choice(AWS_REGIONS),
        env_var: "AWS_REGION",
    },
];

const ANTHROPIC_FIELDS: &[CredentialField] = &[CredentialField {
    key: "anthropic_api_key",
    label: "Anthropic API Key",
    kind: FieldKind::Secret,
    env_var: "ANTHROPIC_API_KEY",
}];

impl Provider {
    /// Fields that must be filled in before a test run, in form order.
    pub const fn credential_fields(self) -> &'static [CredentialField] {
        match self {
            Provider::Aws => AWS_FIELDS,
            Provider::Anthropic => ANTHROPIC_FIELDS,
        }
    }

    /// Look up one of this provider's fields by key.
    pub fn credential_field(self, key: &str) -> Option<&'static CredentialField> {
        self.credential_fields().iter().find(|f| f.key == key)
    }
}

/// A credential value that is redacted from `Debug` output.
#[derive(Clone)]
pub struct CredentialValue(SecretString);

impl CredentialValue {
    /// Wrap a raw value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Expose the raw value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    fn is_blank(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for CredentialValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialValue([REDACTED])")
    }
}

impl From<String> for CredentialValue {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for CredentialValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Field name to value mapping supplied with one form submission.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    values: BTreeMap<String, CredentialValue>,
}

impl CredentialSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CredentialValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set a field value, rejecting keys the provider does not use.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCredentialField` if `key` is not one of the
    /// provider's credential fields.
    pub fn insert_for(
        &mut self,
        provider: Provider,
        key: &str,
        value: impl Into<CredentialValue>,
    ) -> Result<()> {
        if provider.credential_field(key).is_none() {
            return Err(Error::UnknownCredentialField {
                provider: provider.to_string(),
                field: key.to_string(),
            });
        }
        self.insert(key, value);
        Ok(())
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&CredentialValue> {
        self.values.get(key)
    }

    /// Whether the field has a non-empty value.
    pub fn is_populated(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|v| !v.is_blank())
    }

    /// Number of fields with a value (empty or not).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields have been set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys of the provider's required fields that are absent or empty,
    /// in form order.
    pub fn missing_fields(&self, provider: Provider) -> Vec<&'static str> {
        provider
            .credential_fields()
            .iter()
            .filter(|f| !self.is_populated(f.key))
            .map(|f| f.key)
            .collect()
    }

    /// Pre-fill from the provider's conventional environment variables.
    ///
    /// Variables that are unset or empty are skipped. The environment is
    /// only read, never written.
    pub fn from_env(provider: Provider) -> Self {
        Self::from_lookup(provider, |name| env::var(name).ok())
    }

    /// Pre-fill using an arbitrary variable lookup.
    pub fn from_lookup(provider: Provider, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut set = Self::new();
        for field in provider.credential_fields() {
            if let Some(value) = lookup(field.env_var).filter(|v| !v.is_empty()) {
                debug!(field = field.key, env_var = field.env_var, "credential from environment");
                set.insert(field.key, value);
            }
        }
        set
    }
}
