//! Error types for vetter.
//!
//! A failed rule is never an error: it becomes a message. These types cover
//! the other class of problem, where the validator itself was set up wrong.

use thiserror::Error;

/// Errors in the message template store.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse templates YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load builtin templates: {0}")]
    Load(String),
}

/// Errors reading rule-group or data files.
#[derive(Error, Debug)]
pub enum RuleFileError {
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A misconfigured validator.
///
/// Raised while building the rule table, so a constructed `Validator`
/// can only ever answer "valid" or "invalid".
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown rule '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    #[error("Rule {rule} on field '{field}' needs {expected} parameter(s), got {found}")]
    MissingParameter {
        field: String,
        rule: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Rule {rule} on field '{field}' has invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        field: String,
        rule: &'static str,
        parameter: String,
        reason: String,
    },

    #[error("Rule Regex on field '{field}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Template error: {0}")]
    Templates(#[from] TemplateError),
}
