//! The closed set of validation rules.
//!
//! Rule strings are parsed once into a [`RuleTable`]. Every rule name is
//! resolved to a [`RuleKind`] at that point, so evaluation never looks up
//! predicates by name.

mod coerce;
mod dates;
mod file;
mod parser;
mod predicates;
mod size;

pub use coerce::{parse_float, parse_int};
pub use dates::{parse_datetime, parse_with_format};
pub use file::RuleGroups;
pub use parser::{canonicalize, parse_rule_groups, FieldRules, Rule, RuleArgs, RuleTable};
pub use predicates::{check, RuleContext};
pub use size::{size_of, Size};

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Every rule the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    Accept,
    Numeric,
    Integer,
    Float,
    Boolean,
    String,
    Array,
    Url,
    Email,
    Ip,
    Date,
    DateFormat,
    DateBefore,
    DateAfter,
    Json,
    Nullable,
    Confirm,
    Size,
    Min,
    Max,
    Range,
    /// Unanchored match against parameter 0. Parameters are split on `,`
    /// before the pattern is compiled, so a pattern cannot contain a comma:
    /// `regex:^[0-9]{2,4}$` compiles `^[0-9]{2` and is rejected.
    Regex,
    In,
}

/// Rules checked even when their field is absent.
pub const FORCE_RULES: &[RuleKind] = &[RuleKind::Required];

impl RuleKind {
    pub const ALL: [RuleKind; 24] = [
        RuleKind::Required,
        RuleKind::Accept,
        RuleKind::Numeric,
        RuleKind::Integer,
        RuleKind::Float,
        RuleKind::Boolean,
        RuleKind::String,
        RuleKind::Array,
        RuleKind::Url,
        RuleKind::Email,
        RuleKind::Ip,
        RuleKind::Date,
        RuleKind::DateFormat,
        RuleKind::DateBefore,
        RuleKind::DateAfter,
        RuleKind::Json,
        RuleKind::Nullable,
        RuleKind::Confirm,
        RuleKind::Size,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Range,
        RuleKind::Regex,
        RuleKind::In,
    ];

    /// Canonical name, used as the message template key.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Required => "Required",
            RuleKind::Accept => "Accept",
            RuleKind::Numeric => "Numeric",
            RuleKind::Integer => "Integer",
            RuleKind::Float => "Float",
            RuleKind::Boolean => "Boolean",
            RuleKind::String => "String",
            RuleKind::Array => "Array",
            RuleKind::Url => "Url",
            RuleKind::Email => "Email",
            RuleKind::Ip => "Ip",
            RuleKind::Date => "Date",
            RuleKind::DateFormat => "DateFormat",
            RuleKind::DateBefore => "DateBefore",
            RuleKind::DateAfter => "DateAfter",
            RuleKind::Json => "Json",
            RuleKind::Nullable => "Nullable",
            RuleKind::Confirm => "Confirm",
            RuleKind::Size => "Size",
            RuleKind::Min => "Min",
            RuleKind::Max => "Max",
            RuleKind::Range => "Range",
            RuleKind::Regex => "Regex",
            RuleKind::In => "In",
        }
    }

    /// Minimum number of parameters the rule needs.
    ///
    /// `Range` and `In` accept any count: a short `Range` simply fails and
    /// an empty `In` matches nothing.
    pub fn min_params(&self) -> usize {
        match self {
            RuleKind::DateFormat
            | RuleKind::DateBefore
            | RuleKind::DateAfter
            | RuleKind::Confirm
            | RuleKind::Size
            | RuleKind::Min
            | RuleKind::Max
            | RuleKind::Regex => 1,
            _ => 0,
        }
    }

    pub fn is_force(&self) -> bool {
        FORCE_RULES.contains(self)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleKind {
    type Err = ();

    /// Resolve a canonical name such as `DateFormat`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl Serialize for RuleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
