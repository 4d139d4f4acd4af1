//! Rule-string parsing.
//!
//! Turns `{"age": "required|integer|min:18"}` into a [`RuleTable`]:
//! field → canonical rule → parameters. Anything about a rule that can be
//! checked without data (known name, arity, numeric bounds, regex syntax,
//! date literals) is checked here.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::ConfigError;

use super::coerce::{parse_float_str, parse_int_str};
use super::dates::{parse_datetime, translate_format};
use super::RuleKind;

/// Data-independent arguments, resolved once from the raw parameters.
#[derive(Debug, Clone)]
pub enum RuleArgs {
    /// The rule reads nothing beyond its raw parameters.
    None,
    /// Integer parameter compared exactly (`Size`).
    Exact(i64),
    /// Numeric bound (`Min`, `Max`).
    Bound(f64),
    /// Inclusive range; `None` leaves that side open.
    Range {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// A `Range` that can never pass: fewer than two slots, or both empty.
    Unsatisfiable,
    /// Compiled pattern (`Regex`).
    Pattern(Regex),
    /// Reference timestamp (`DateBefore`, `DateAfter`).
    Instant(NaiveDateTime),
    /// Format already translated to chrono items (`DateFormat`).
    Format(String),
}

/// One rule applied to one field.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    /// Raw parameters exactly as written, used for messages.
    pub params: Vec<String>,
    pub args: RuleArgs,
}

impl Rule {
    /// Resolve a rule for `field`, checking its parameters.
    pub fn new(field: &str, kind: RuleKind, params: Vec<String>) -> Result<Self, ConfigError> {
        let expected = kind.min_params();
        if params.len() < expected {
            return Err(ConfigError::MissingParameter {
                field: field.to_string(),
                rule: kind.name(),
                expected,
                found: params.len(),
            });
        }

        let invalid = |parameter: &str, reason: &str| ConfigError::InvalidParameter {
            field: field.to_string(),
            rule: kind.name(),
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        };

        let args = match kind {
            RuleKind::Size => parse_int_str(&params[0])
                .map(RuleArgs::Exact)
                .ok_or_else(|| invalid(&params[0], "expected an integer"))?,
            RuleKind::Min | RuleKind::Max => parse_float_str(&params[0])
                .map(RuleArgs::Bound)
                .ok_or_else(|| invalid(&params[0], "expected a number"))?,
            RuleKind::Range => {
                if params.len() < 2 {
                    RuleArgs::Unsatisfiable
                } else {
                    let slot = |raw: &str| -> Result<Option<f64>, ConfigError> {
                        if raw.is_empty() {
                            return Ok(None);
                        }
                        parse_float_str(raw)
                            .map(Some)
                            .ok_or_else(|| invalid(raw, "expected a number or an empty slot"))
                    };
                    match (slot(&params[0])?, slot(&params[1])?) {
                        (None, None) => RuleArgs::Unsatisfiable,
                        (lower, upper) => RuleArgs::Range { lower, upper },
                    }
                }
            }
            RuleKind::Regex => Regex::new(&params[0])
                .map(RuleArgs::Pattern)
                .map_err(|source| ConfigError::InvalidPattern {
                    field: field.to_string(),
                    pattern: params[0].clone(),
                    source,
                })?,
            RuleKind::DateBefore | RuleKind::DateAfter => parse_datetime(&params[0])
                .map(RuleArgs::Instant)
                .ok_or_else(|| invalid(&params[0], "not a recognizable date"))?,
            RuleKind::DateFormat => RuleArgs::Format(translate_format(&params[0])),
            _ => RuleArgs::None,
        };

        Ok(Self { kind, params, args })
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.params.serialize(serializer)
    }
}

/// Rules declared on a single field, keyed by kind.
pub type FieldRules = IndexMap<RuleKind, Rule>;

/// The normalized rule table: field → rules, in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RuleTable {
    fields: IndexMap<String, FieldRules>,
}

impl RuleTable {
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(field, rules)| (field.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Canonicalize a raw rule token: `date_format` → `DateFormat`.
///
/// Each underscore-separated segment gets an upper-cased first character;
/// the rest of the segment is kept as written. Resolving the result to a
/// [`RuleKind`] ignores case, so `DATE_FORMAT` and `date_FORMAT` land on
/// the same rule.
pub fn canonicalize(token: &str) -> String {
    token
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split one rule token into its raw name and parameter list.
///
/// `"range:,10"` gives `["", "10"]`; `"required"` and `"required:"` give
/// no parameters.
fn split_token(token: &str) -> (&str, Vec<String>) {
    let (name, raw_params) = token.split_once(':').unwrap_or((token, ""));
    let params = if raw_params.is_empty() {
        Vec::new()
    } else {
        raw_params.split(',').map(str::to_string).collect()
    };
    (name, params)
}

/// Parse rule groups into a [`RuleTable`].
///
/// A later rule with the same canonical name on the same field replaces
/// the earlier one.
pub fn parse_rule_groups<I, F, R>(groups: I) -> Result<RuleTable, ConfigError>
where
    I: IntoIterator<Item = (F, R)>,
    F: AsRef<str>,
    R: AsRef<str>,
{
    let mut canonical_names: HashMap<String, String> = HashMap::new();
    let mut fields: IndexMap<String, FieldRules> = IndexMap::new();

    for (field, raw_rules) in groups {
        let field = field.as_ref();
        let entry = fields.entry(field.to_string()).or_default();

        for token in raw_rules.as_ref().split('|') {
            let (raw_name, params) = split_token(token);

            let canonical = canonical_names
                .entry(raw_name.to_string())
                .or_insert_with(|| canonicalize(raw_name));

            let kind: RuleKind = canonical.parse().map_err(|_| ConfigError::UnknownRule {
                field: field.to_string(),
                rule: raw_name.to_string(),
            })?;

            tracing::trace!(field = %field, rule = %kind, params = ?params, "Parsed rule");
            entry.insert(kind, Rule::new(field, kind, params)?);
        }
    }

    Ok(RuleTable { fields })
}
