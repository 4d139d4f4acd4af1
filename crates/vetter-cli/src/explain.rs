//! The `explain` command.

use std::path::Path;

use anyhow::Result;
use vetter_core::rules::parse_rule_groups;

use crate::input::load_rules;

/// Print the normalized rule table (field → rule → parameters) as YAML.
pub fn run_explain(rules: &Path) -> Result<()> {
    let groups = load_rules(rules)?;
    let table = parse_rule_groups(&groups)?;
    print!("{}", serde_yaml::to_string(&table)?);
    Ok(())
}
