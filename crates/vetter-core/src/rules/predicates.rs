//! Rule predicates.
//!
//! Each predicate receives the resolved value and the rule (raw parameters
//! plus pre-resolved arguments) and answers pass/fail. Predicates never
//! error: anything that could be misconfigured was rejected when the rule
//! table was built.

use validator::{ValidateEmail, ValidateIp, ValidateUrl};

use crate::value::{Mapping, Value};

use super::coerce::{parse_float, parse_int};
use super::dates::{matches_translated, parse_datetime};
use super::parser::{Rule, RuleArgs};
use super::size::size_of;
use super::RuleKind;

const ACCEPTED: &[&str] = &["yes", "on", "1", "true"];

/// What a predicate may see besides its own value.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The whole top-level input, for rules that compare across fields.
    pub data: &'a Mapping,
}

/// Run `rule` against `value`.
pub fn check(rule: &Rule, value: &Value, ctx: &RuleContext<'_>) -> bool {
    match rule.kind {
        RuleKind::Required => !value.is_null(),
        RuleKind::Accept => accept(value),
        RuleKind::Numeric => parse_int(value).is_some() || parse_float(value).is_some(),
        RuleKind::Integer => parse_int(value).is_some(),
        RuleKind::Float => parse_float(value).is_some(),
        RuleKind::Boolean => boolean(value),
        RuleKind::String => matches!(value, Value::String(_)),
        RuleKind::Array => value.is_container(),
        RuleKind::Url => value.as_str().is_some_and(|s| !s.is_empty() && s.validate_url()),
        RuleKind::Email => value.as_str().is_some_and(|s| s.validate_email()),
        RuleKind::Ip => value.as_str().is_some_and(|s| s.validate_ip()),
        RuleKind::Date => value.as_str().and_then(parse_datetime).is_some(),
        RuleKind::DateFormat => date_format(value, &rule.args),
        RuleKind::DateBefore => compare_date(value, &rule.args, |v, limit| v < limit),
        RuleKind::DateAfter => compare_date(value, &rule.args, |v, limit| v > limit),
        RuleKind::Json => json_object(value),
        RuleKind::Nullable => true,
        RuleKind::Confirm => confirm(value, &rule.params, ctx),
        RuleKind::Size => size(value, &rule.args),
        RuleKind::Min => bound(value, &rule.args, |size, min| size >= min),
        RuleKind::Max => bound(value, &rule.args, |size, max| size <= max),
        RuleKind::Range => range(value, &rule.args),
        RuleKind::Regex => regex(value, &rule.args),
        RuleKind::In => value
            .as_str()
            .is_some_and(|s| rule.params.iter().any(|choice| choice == s)),
    }
}

fn accept(value: &Value) -> bool {
    value
        .as_text()
        .is_some_and(|text| ACCEPTED.contains(&text.to_lowercase().as_str()))
}

fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Int(n) => *n == 0 || *n == 1,
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
}

fn date_format(value: &Value, args: &RuleArgs) -> bool {
    match (value.as_str(), args) {
        (Some(s), RuleArgs::Format(format)) => matches_translated(s, format),
        _ => false,
    }
}

fn compare_date(
    value: &Value,
    args: &RuleArgs,
    cmp: impl Fn(&chrono::NaiveDateTime, &chrono::NaiveDateTime) -> bool,
) -> bool {
    let RuleArgs::Instant(limit) = args else {
        return false;
    };
    value
        .as_str()
        .and_then(parse_datetime)
        .is_some_and(|parsed| cmp(&parsed, limit))
}

fn json_object(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        matches!(
            serde_json::from_str::<serde_json::Value>(s),
            Ok(serde_json::Value::Object(_))
        )
    })
}

/// A missing confirmation target fails rather than erroring: the data is
/// incomplete, the rule is fine.
fn confirm(value: &Value, params: &[String], ctx: &RuleContext<'_>) -> bool {
    params
        .first()
        .and_then(|target| ctx.data.get(target))
        .is_some_and(|other| identical(other, value))
}

/// Strict equality. Unlike `PartialEq` for `IndexMap`, mappings only match
/// when their entries appear in the same order.
fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Sequence(a), Value::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| identical(x, y))
        }
        (Value::Mapping(a), Value::Mapping(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|((ka, va), (kb, vb))| ka == kb && identical(va, vb))
        }
        _ => a == b,
    }
}

fn size(value: &Value, args: &RuleArgs) -> bool {
    let RuleArgs::Exact(expected) = args else {
        return false;
    };
    size_of(value).as_integer() == Some(*expected)
}

fn bound(value: &Value, args: &RuleArgs, cmp: impl Fn(f64, f64) -> bool) -> bool {
    let RuleArgs::Bound(limit) = args else {
        return false;
    };
    cmp(size_of(value).as_f64(), *limit)
}

fn range(value: &Value, args: &RuleArgs) -> bool {
    match args {
        RuleArgs::Range { lower, upper } => {
            let size = size_of(value).as_f64();
            lower.map_or(true, |l| size >= l) && upper.map_or(true, |u| size <= u)
        }
        _ => false,
    }
}

fn regex(value: &Value, args: &RuleArgs) -> bool {
    match (value.as_text(), args) {
        (Some(text), RuleArgs::Pattern(pattern)) => pattern.is_match(&text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse_rule_groups;
    use serde_json::json;

    fn passes(rules: &str, value: impl Into<Value>) -> bool {
        passes_with(rules, value.into(), &Mapping::new())
    }

    fn passes_with(rules: &str, value: Value, data: &Mapping) -> bool {
        let table = parse_rule_groups([("field", rules)]).unwrap();
        let ctx = RuleContext { data };
        table
            .get("field")
            .unwrap()
            .values()
            .all(|rule| check(rule, &value, &ctx))
    }

    fn json_value(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_required() {
        assert!(passes("required", ""));
        assert!(passes("required", 0));
        assert!(!passes("required", Value::Null));
    }

    #[test]
    fn test_accept() {
        for v in ["yes", "YES", "on", "1", "true", "True"] {
            assert!(passes("accept", v), "{v} should be accepted");
        }
        assert!(passes("accept", true));
        assert!(passes("accept", 1));
        assert!(!passes("accept", "no"));
        assert!(!passes("accept", false));
        assert!(!passes("accept", 2));
        assert!(!passes("accept", json_value(json!(["yes"]))));
    }

    #[test]
    fn test_numeric_kinds() {
        assert!(passes("integer", "42"));
        assert!(passes("integer", 42));
        assert!(!passes("integer", "4.2"));
        assert!(passes("float", "4.2"));
        assert!(passes("float", "42"));
        assert!(!passes("float", "four"));
        assert!(passes("numeric", "1e3"));
        assert!(passes("numeric", 3.5));
        assert!(!passes("numeric", "12abc"));
        assert!(!passes("numeric", Value::Null));
    }

    #[test]
    fn test_boolean_is_strict() {
        assert!(passes("boolean", true));
        assert!(passes("boolean", false));
        assert!(passes("boolean", 0));
        assert!(passes("boolean", 1));
        assert!(passes("boolean", "0"));
        assert!(passes("boolean", "1"));
        assert!(!passes("boolean", "true"));
        assert!(!passes("boolean", 2));
        assert!(!passes("boolean", 1.0));
    }

    #[test]
    fn test_string_and_array() {
        assert!(passes("string", "x"));
        assert!(!passes("string", 5));
        assert!(passes("array", json_value(json!([1, 2]))));
        assert!(passes("array", json_value(json!({ "a": 1 }))));
        assert!(!passes("array", "[1, 2]"));
    }

    #[test]
    fn test_url_email_ip() {
        assert!(passes("url", "https://example.com/path?q=1"));
        assert!(!passes("url", "not a url"));
        assert!(!passes("url", ""));
        assert!(passes("email", "a@b.com"));
        assert!(!passes("email", "a@"));
        assert!(!passes("email", 42));
        assert!(passes("ip", "192.168.0.1"));
        assert!(passes("ip", "::1"));
        assert!(!passes("ip", "300.1.1.1"));
    }

    #[test]
    fn test_dates() {
        assert!(passes("date", "2024-03-15"));
        assert!(!passes("date", "someday"));
        assert!(passes("date_format:Y-m-d", "2024-03-15"));
        assert!(!passes("date_format:Y-m-d", "15/03/2024"));
        assert!(passes("date_before:2024-01-01", "2023-12-31"));
        assert!(!passes("date_before:2024-01-01", "2024-01-01"));
        assert!(passes("date_after:2024-01-01", "2024-01-02"));
        assert!(!passes("date_after:2024-01-01", "garbage"));
        assert!(passes("date_after:yesterday", "tomorrow"));
    }

    #[test]
    fn test_json_requires_object() {
        assert!(passes("json", r#"{"a": 1}"#));
        assert!(passes("json", "{}"));
        assert!(!passes("json", "[1, 2]"));
        assert!(!passes("json", "42"));
        assert!(!passes("json", "{broken"));
    }

    #[test]
    fn test_nullable_always_passes() {
        assert!(passes("nullable", Value::Null));
        assert!(passes("nullable", "anything"));
    }

    #[test]
    fn test_confirm() {
        let mut data = Mapping::new();
        data.insert("password".into(), Value::from("s3cret"));
        data.insert("pin".into(), Value::Int(1234));

        assert!(passes_with("confirm:password", Value::from("s3cret"), &data));
        assert!(!passes_with("confirm:password", Value::from("other"), &data));
        // Strict: same digits, different type
        assert!(!passes_with("confirm:pin", Value::from("1234"), &data));
        assert!(!passes_with("confirm:missing", Value::from("s3cret"), &data));
    }

    #[test]
    fn test_confirm_mapping_order_matters() {
        let mut data = Mapping::new();
        data.insert("origin".into(), json_value(json!({ "x": 1, "y": 2 })));
        data.insert("path".into(), json_value(json!([{ "x": 1, "y": 2 }])));

        assert!(passes_with("confirm:origin", json_value(json!({ "x": 1, "y": 2 })), &data));
        assert!(!passes_with("confirm:origin", json_value(json!({ "y": 2, "x": 1 })), &data));
        assert!(!passes_with("confirm:origin", json_value(json!({ "x": 1 })), &data));
        assert!(passes_with("confirm:path", json_value(json!([{ "x": 1, "y": 2 }])), &data));
        assert!(!passes_with("confirm:path", json_value(json!([{ "y": 2, "x": 1 }])), &data));
    }

    #[test]
    fn test_size_min_max_use_numeric_value() {
        assert!(passes("size:42", "42"));
        assert!(!passes("size:2", "42"));
        assert!(passes("min:18", "42"));
        assert!(!passes("max:10", "42"));
        assert!(passes("size:5", "hello"));
        assert!(passes("size:3", json_value(json!(["a", "b", "c"]))));
        // Float sizes never equal an integer
        assert!(!passes("size:3", "3.0"));
        assert!(passes("min:2.5|max:2.5", "2.5"));
    }

    #[test]
    fn test_range() {
        assert!(!passes("range:,", 7));
        assert!(passes("range:,10", 10));
        assert!(!passes("range:,10", 11));
        assert!(passes("range:5,", 5));
        assert!(!passes("range:5,", 4));
        assert!(passes("range:5,10", 7));
        assert!(!passes("range:5,10", 11));
        assert!(!passes("range:5,10", 4));
        assert!(!passes("range:5", 7));
        assert!(!passes("range", 7));
    }

    #[test]
    fn test_regex_is_unanchored() {
        assert!(passes("regex:[0-9]{3}", "abc123def"));
        assert!(!passes("regex:^[0-9]+$", "abc123"));
        assert!(passes("regex:^4", 42));
        assert!(!passes("regex:.", json_value(json!([1]))));
    }

    #[test]
    fn test_in_is_strict() {
        assert!(passes("in:red,green,blue", "green"));
        assert!(!passes("in:red,green,blue", "Green"));
        assert!(!passes("in:1,2,3", 2));
        assert!(passes("in:1,2,3", "2"));
    }
}
