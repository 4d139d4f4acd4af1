//! Failure messages.
//!
//! Templates map a canonical rule name to a fragment such as
//! `"must be at least %s"`. A finished message is the field name followed
//! by the fragment with the rule's parameters substituted in order.
//!
//! The builtin templates are embedded at compile time and parsed once per
//! process; every validator shares them read-only.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::rules::RuleKind;

/// Embedded builtin templates.
const BUILTIN_TEMPLATES_YAML: &str = include_str!("../templates/messages.yaml");

/// Parsed builtin templates (initialized once, shared).
static BUILTIN: OnceLock<Result<Arc<MessageTemplates>, String>> = OnceLock::new();

/// A read-only rule name → template lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplates {
    templates: HashMap<String, String>,
}

impl MessageTemplates {
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// The templates shipped with the crate.
    pub fn builtin() -> Result<Arc<Self>, TemplateError> {
        let result = BUILTIN.get_or_init(|| {
            Self::from_yaml(BUILTIN_TEMPLATES_YAML)
                .map(Arc::new)
                .map_err(|e| e.to_string())
        });

        match result {
            Ok(templates) => Ok(Arc::clone(templates)),
            Err(e) => Err(TemplateError::Load(e.clone())),
        }
    }

    /// Parse templates from a YAML mapping.
    ///
    /// Keys that are not canonical rule names are kept but logged, since
    /// they can never be looked up.
    pub fn from_yaml(yaml: &str) -> Result<Self, TemplateError> {
        let templates: Self = serde_yaml::from_str(yaml)?;
        for key in templates.templates.keys() {
            if key.parse::<RuleKind>().is_err() {
                tracing::warn!(rule = %key, "Template for unknown rule will never be used");
            }
        }
        Ok(templates)
    }

    /// Parse templates from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Copy of `self` with every entry of `overrides` replacing ours.
    pub fn merged_with(&self, overrides: &MessageTemplates) -> Self {
        let mut templates = self.templates.clone();
        templates.extend(
            overrides
                .templates
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Self { templates }
    }

    pub fn get(&self, rule: &str) -> Option<&str> {
        self.templates.get(rule).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build the failure message for `rule` on `field`.
    ///
    /// Rules without a template get `"<field> field check failed"`.
    pub fn build_message(&self, rule: &str, field: &str, params: &[String]) -> String {
        match self.get(rule) {
            Some(template) => format!("{} {}", field, format_positional(template, params)),
            None => format!("{} field check failed", field),
        }
    }
}

/// Substitute `args` into a printf-style template.
///
/// Supports `%s`, `%d` (integer part of a numeric argument, else 0),
/// `%N$s`/`%N$d` (1-based explicit position) and `%%`. Missing arguments
/// render empty; extra arguments are ignored; any other `%` sequence is
/// copied through unchanged.
pub fn format_positional(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];

        if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }

        // Optional explicit position: digits followed by '$'
        let digits = spec.bytes().take_while(u8::is_ascii_digit).count();
        let (index, conv_at) = match spec[digits..].strip_prefix('$') {
            Some(_) if digits > 0 => match spec[..digits].parse::<usize>() {
                Ok(n) if n > 0 => (Some(n - 1), digits + 1),
                _ => (None, 0),
            },
            _ => (None, 0),
        };

        match spec[conv_at..].chars().next() {
            Some(conv @ ('s' | 'd')) => {
                let index = index.unwrap_or_else(|| {
                    let i = next_arg;
                    next_arg += 1;
                    i
                });
                let arg = args.get(index).map(String::as_str).unwrap_or("");
                if conv == 's' {
                    out.push_str(arg);
                } else {
                    out.push_str(&integer_part(arg).to_string());
                }
                rest = &spec[conv_at + 1..];
            }
            _ => {
                out.push('%');
                rest = spec;
            }
        }
    }

    out.push_str(rest);
    out
}

fn integer_part(arg: &str) -> i64 {
    arg.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
        .unwrap_or(0)
}
