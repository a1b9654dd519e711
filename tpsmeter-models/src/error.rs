//! Error types for model lookup and session validation.

use std::fmt;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when resolving models or building credentials.
///
/// The string-based registry queries never produce these; they return empty
/// or `None` sentinels instead. These are for callers that want a hard
/// failure, such as the non-interactive CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Provider not found in registry.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// Model not offered by the provider.
    #[error("model '{model}' not found for provider '{provider}'")]
    ModelNotFound { provider: String, model: String },

    /// Credential field not used by the provider.
    #[error("provider '{provider}' has no credential field '{field}'")]
    UnknownCredentialField { provider: String, field: String },
}

/// A single reason a session refused to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The user message was empty or whitespace-only.
    EmptyMessage,
    /// A required credential field was missing or empty.
    MissingCredential { field: &'static str },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::EmptyMessage => write!(f, "Please enter a message to test."),
            Problem::MissingCredential { field } => {
                write!(f, "Please provide {}", title_case_key(field))
            }
        }
    }
}

/// Validation failure for a streaming session.
///
/// Holds every problem found, not just the first. No simulated work has
/// happened when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_problems(.problems))]
pub struct Rejection {
    problems: Vec<Problem>,
}

impl Rejection {
    pub(crate) fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    /// All problems, empty-message first, then missing fields in declaration order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Keys of the credential fields that were missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.problems
            .iter()
            .filter_map(|p| match p {
                Problem::MissingCredential { field } => Some(*field),
                Problem::EmptyMessage => None,
            })
            .collect()
    }

    /// Whether the message itself was rejected.
    pub fn has_empty_message(&self) -> bool {
        self.problems.contains(&Problem::EmptyMessage)
    }

    /// Human-readable problem lines, one per problem.
    pub fn messages(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }
}

fn join_problems(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turn a field key like `aws_access_key_id` into `Aws Access Key Id`.
pub(crate) fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
