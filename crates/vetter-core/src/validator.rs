//! The `Validator`: rule table + data in, pass/fail and messages out.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::messages::MessageTemplates;
use crate::resolver::FieldResolver;
use crate::rules::{check, parse_rule_groups, Rule, RuleContext, RuleGroups, RuleTable};
use crate::value::Mapping;

/// Parameters for a force rule failing on an absent field.
const NO_PARAMS: &[String] = &[];

/// Failure messages: field → canonical rule name → message.
pub type Messages = IndexMap<String, IndexMap<String, String>>;

/// Serializable outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub valid: bool,
    pub fails: Vec<String>,
    pub messages: Messages,
}

/// Validates one input mapping against one set of rule groups.
///
/// Intended for a single [`validate`](Validator::validate) call. Running it
/// again rewrites the same entries and never clears old ones; build a fresh
/// validator per input instead.
#[derive(Debug, Clone)]
pub struct Validator {
    data: Mapping,
    rules: RuleTable,
    templates: Arc<MessageTemplates>,
    messages: Messages,
}

impl Validator {
    /// Build a validator using the builtin message templates.
    ///
    /// Fails if any rule is unknown or has unusable parameters.
    pub fn new(data: Mapping, rule_groups: &RuleGroups) -> Result<Self, ConfigError> {
        Self::with_templates(data, rule_groups, MessageTemplates::builtin()?)
    }

    /// Build a validator with a custom template store.
    pub fn with_templates(
        data: Mapping,
        rule_groups: &RuleGroups,
        templates: Arc<MessageTemplates>,
    ) -> Result<Self, ConfigError> {
        let rules = parse_rule_groups(rule_groups)?;
        tracing::debug!(fields = rules.len(), "Built rule table");

        Ok(Self {
            data,
            rules,
            templates,
            messages: Messages::new(),
        })
    }

    /// Check every declared field. Returns `true` when nothing failed.
    ///
    /// A present field runs all of its rules. An absent field runs only
    /// force rules (`Required`), which fail without calling a predicate.
    pub fn validate(&mut self) -> bool {
        let resolver = FieldResolver::new(&self.data);

        for (field, rules) in self.rules.iter() {
            let failed: Vec<(&Rule, &[String])> = match resolver.get_field(field) {
                Some(value) => {
                    let ctx = RuleContext { data: &self.data };
                    rules
                        .values()
                        .filter(|rule| {
                            let passed = check(rule, value, &ctx);
                            tracing::trace!(field = %field, rule = %rule.kind, passed, "Checked rule");
                            !passed
                        })
                        .map(|rule| (rule, rule.params.as_slice()))
                        .collect()
                }
                // Absence is the failure; the predicate is never consulted
                None => rules
                    .values()
                    .filter(|rule| rule.kind.is_force())
                    .map(|rule| (rule, NO_PARAMS))
                    .collect(),
            };

            for (rule, params) in failed {
                let message = self.templates.build_message(rule.name(), field, params);
                tracing::debug!(field = %field, rule = %rule.kind, message = %message, "Rule failed");
                self.messages
                    .entry(field.to_string())
                    .or_default()
                    .insert(rule.name().to_string(), message);
            }
        }

        self.messages.is_empty()
    }

    /// Fields with at least one failure, in the order they first failed.
    pub fn fails(&self) -> Vec<&str> {
        self.messages.keys().map(String::as_str).collect()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// The input, unchanged.
    pub fn data(&self) -> &Mapping {
        &self.data
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn report(&self) -> Report {
        Report {
            valid: self.messages.is_empty(),
            fails: self.fails().into_iter().map(str::to_string).collect(),
            messages: self.messages.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{mapping_from_json, Value};
    use serde_json::json;

    fn run(data: serde_json::Value, rules: &[(&str, &str)]) -> Validator {
        let groups: RuleGroups = rules.iter().copied().collect();
        let mut validator = Validator::new(mapping_from_json(data).unwrap(), &groups).unwrap();
        validator.validate();
        validator
    }

    #[test]
    fn test_underage() {
        let v = run(json!({ "age": "17" }), &[("age", "required|integer|min:18")]);
        assert_eq!(v.fails(), vec!["age"]);
        let msg = &v.messages()["age"]["Min"];
        assert!(msg.contains("age"));
        assert_eq!(v.messages()["age"].len(), 1);
    }

    #[test]
    fn test_valid_email() {
        let v = run(json!({ "email": "a@b.com" }), &[("email", "required|email")]);
        assert!(v.messages().is_empty());
        assert!(v.report().valid);
    }

    #[test]
    fn test_absent_required_fails_with_message() {
        let v = run(json!({}), &[("name", "required|min:3")]);
        assert_eq!(v.fails(), vec!["name"]);
        let rules: Vec<&str> = v.messages()["name"].keys().map(String::as_str).collect();
        assert_eq!(rules, vec!["Required"]);
        assert_eq!(v.messages()["name"]["Required"], "name is required");
    }

    #[test]
    fn test_absent_upper_case_required_is_forced() {
        let v = run(json!({}), &[("name", "REQUIRED|MIN:3")]);
        assert_eq!(v.fails(), vec!["name"]);
        let rules: Vec<&str> = v.messages()["name"].keys().map(String::as_str).collect();
        assert_eq!(rules, vec!["Required"]);
    }

    #[test]
    fn test_absent_optional_is_skipped() {
        let v = run(json!({}), &[("name", "min:3")]);
        assert!(v.fails().is_empty());
    }

    #[test]
    fn test_null_present_field_runs_rules() {
        let v = run(json!({ "name": null }), &[("name", "required|nullable")]);
        assert_eq!(v.fails(), vec!["name"]);
        assert!(v.messages()["name"].contains_key("Required"));
    }

    #[test]
    fn test_fails_in_declaration_order() {
        let v = run(
            json!({ "a": "x", "b": "y" }),
            &[("b", "integer"), ("ok", "nullable"), ("a", "integer")],
        );
        assert_eq!(v.fails(), vec!["b", "a"]);
    }

    #[test]
    fn test_message_uses_parameters() {
        let v = run(json!({ "code": "abcdef" }), &[("code", "max:3|range:1,4")]);
        assert_eq!(v.messages()["code"]["Max"], "code may not be greater than 3");
        assert_eq!(v.messages()["code"]["Range"], "code must be between 1 and 4");
    }

    #[test]
    fn test_custom_templates_and_fallback() {
        let templates = Arc::new(MessageTemplates::from_yaml("Email: \"looks wrong\"").unwrap());
        let groups: RuleGroups = [("email", "email|string")].into_iter().collect();
        let data = mapping_from_json(json!({ "email": 5 })).unwrap();

        let mut v = Validator::with_templates(data, &groups, templates).unwrap();
        assert!(!v.validate());
        assert_eq!(v.messages()["email"]["Email"], "email looks wrong");
        assert_eq!(v.messages()["email"]["String"], "email field check failed");
    }

    #[test]
    fn test_config_errors_surface_at_construction() {
        let groups: RuleGroups = [("age", "integer|older_than:18")].into_iter().collect();
        let err = Validator::new(Mapping::new(), &groups).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn test_data_is_returned_unchanged() {
        let data = mapping_from_json(json!({ "name": "Ada", "extra": [1, 2] })).unwrap();
        let groups: RuleGroups = [("name", "integer")].into_iter().collect();
        let mut v = Validator::new(data.clone(), &groups).unwrap();
        v.validate();
        assert_eq!(v.data(), &data);
        assert_eq!(v.data()["extra"], Value::from(json!([1, 2])));
    }

    #[test]
    fn test_rerun_is_stable() {
        let groups: RuleGroups = [("age", "integer")].into_iter().collect();
        let data = mapping_from_json(json!({ "age": "x" })).unwrap();
        let mut v = Validator::new(data, &groups).unwrap();
        assert!(!v.validate());
        let first = v.report();
        assert!(!v.validate());
        assert_eq!(v.report(), first);
    }
}
