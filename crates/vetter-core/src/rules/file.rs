//! Rule groups: the raw `field → "rule|rule:param"` input, loadable from
//! YAML or JSON files.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RuleFileError;

/// Raw rule strings keyed by field path, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleGroups(IndexMap<String, String>);

impl RuleGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule string for `field`.
    pub fn insert(&mut self, field: impl Into<String>, rules: impl Into<String>) -> &mut Self {
        self.0.insert(field.into(), rules.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, r)| (f.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse rule groups from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RuleFileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse rule groups from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RuleFileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse rule groups from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse rule groups from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl<F: Into<String>, R: Into<String>> FromIterator<(F, R)> for RuleGroups {
    fn from_iter<I: IntoIterator<Item = (F, R)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, rules)| (field.into(), rules.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RuleGroups {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
