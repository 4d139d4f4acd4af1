//! # vetter-core
//!
//! Declarative validation of loosely typed data against rule strings.
//!
//! Rules are written per field as pipe-separated expressions:
//! `"required|integer|min:18"`. Fields may be nested paths
//! (`"address.city"`, `"items.0.sku"`).
//!
//! ## Key Guarantees
//!
//! 1. **Closed rule set**: every rule name is resolved when the validator is
//!    built; an unknown name or unusable parameter is a [`ConfigError`],
//!    never a silent pass or fail.
//! 2. **Failures are data**: a failed rule produces a message, not an error.
//! 3. **Absent is not invalid**: a missing field only fails `required`.
//! 4. **Ordered**: failures are reported in field declaration order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vetter_core::{RuleGroups, Validator};
//!
//! let data = serde_json::from_str(r#"{"age": "17"}"#)?;
//! let rules: RuleGroups = [("age", "required|integer|min:18")].into_iter().collect();
//!
//! let mut validator = Validator::new(data, &rules)?;
//! if !validator.validate() {
//!     for (field, failures) in validator.messages() {
//!         for message in failures.values() {
//!             println!("{field}: {message}");
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod messages;
pub mod resolver;
pub mod rules;
pub mod validator;
pub mod value;

// Re-export main types at crate root
pub use error::{ConfigError, RuleFileError, TemplateError};
pub use messages::{format_positional, MessageTemplates};
pub use resolver::FieldResolver;
pub use rules::{RuleGroups, RuleKind, RuleTable, FORCE_RULES};
pub use validator::{Messages, Report, Validator};
pub use value::{Mapping, Value};

/// Validate `data` against `rule_groups` in one call.
///
/// Convenience wrapper for the common build-validate-report sequence.
pub fn validate(data: Mapping, rule_groups: &RuleGroups) -> Result<Report, ConfigError> {
    let mut validator = Validator::new(data, rule_groups)?;
    validator.validate();
    Ok(validator.report())
}
