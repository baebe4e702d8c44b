//! Resolution error taxonomy
//!
//! - [`ValidationError`]: one value failed its rule. Recovered by asking again.
//! - [`ConfigurationError`]: the prompt definitions themselves are broken. Fatal.
//! - [`ResolveError`]: what a resolution run can end with.

use crate::prompt::PromptError;

/// A prompt definition is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Prompt '{entry}' reads '{key}', which is only asked later")]
    ForwardReference { entry: String, key: String },

    #[error("Prompt '{entry}' reads '{key}', which no prompt declares")]
    UndeclaredKey { entry: String, key: String },

    #[error("Key '{0}' is declared more than once")]
    DuplicateKey(String),

    #[error("'{key}' expects a {expected} value, got {found}")]
    KindMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Default for '{key}' is not one of its choices: {value}")]
    DefaultNotAChoice { key: String, value: String },

    #[error("Prompt '{0}' has no selectable choices")]
    EmptyChoices(String),

    #[error("Computing the default for '{key}' failed: {reason}")]
    DefaultFailed { key: String, reason: String },

    #[error("Derived field '{0}' could not be computed and has no fallback")]
    UnresolvedDerived(String),
}

/// A single value was rejected; the entry is asked again
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a failed resolution run. No partial configuration survives any of these.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid prompt configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("No acceptable value for '{key}' and no more input available{}", describe_last(.last_error))]
    ValidationExhausted {
        key: String,
        last_error: Option<ValidationError>,
    },

    #[error("Setup cancelled.")]
    Cancelled,

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

fn describe_last(last_error: &Option<ValidationError>) -> String {
    match last_error {
        Some(err) => format!(" (last error: {})", err),
        None => String::new(),
    }
}

impl ResolveError {
    /// Map a collaborator failure that is not plain exhaustion
    pub(crate) fn from_prompt(err: PromptError, key: &str) -> Self {
        match err {
            PromptError::Cancelled => ResolveError::Cancelled,
            PromptError::Io(e) => ResolveError::Prompt(e),
            PromptError::Exhausted => ResolveError::ValidationExhausted {
                key: key.to_string(),
                last_error: None,
            },
        }
    }
}
