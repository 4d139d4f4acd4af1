//! Loading data and rule files.
//!
//! `.json` files are read as JSON; everything else as YAML.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use vetter_core::{Mapping, RuleGroups, Value};

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load the input data. The top level must be a mapping.
pub fn load_data(path: &Path) -> Result<Mapping> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let value: Value = if is_json(path) {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?
    };

    match value {
        Value::Mapping(map) => Ok(map),
        other => bail!(
            "Data file {} must contain a mapping at the top level, found {}",
            path.display(),
            other.type_name()
        ),
    }
}

/// Load rule groups from a rule file.
pub fn load_rules(path: &Path) -> Result<RuleGroups> {
    let groups = if is_json(path) {
        RuleGroups::from_json_file(path)
    } else {
        RuleGroups::from_yaml_file(path)
    };
    groups.with_context(|| format!("Failed to load rule file {}", path.display()))
}
