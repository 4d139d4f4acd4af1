//! Number coercion for loosely typed values.
//!
//! Strings are accepted the way form input arrives: surrounding whitespace
//! is ignored, integers may not carry leading zeros, floats may use an
//! exponent. `inf` and `NaN` spellings are never numbers.

use lazy_static::lazy_static;
use regex::Regex;

use crate::value::Value;

lazy_static! {
    static ref INT_PATTERN: Regex = Regex::new(r"^[+-]?(?:0|[1-9][0-9]*)$").unwrap();

    static ref FLOAT_PATTERN: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap();
}

/// Largest float magnitude whose integral value still counts as an integer.
const MAX_INTEGRAL_FLOAT: f64 = 1e15;

fn trim_input(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\0'))
}

/// Parse a string as an integer.
pub fn parse_int_str(s: &str) -> Option<i64> {
    let s = trim_input(s);
    if !INT_PATTERN.is_match(s) {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Parse a string as a float.
pub fn parse_float_str(s: &str) -> Option<f64> {
    let s = trim_input(s);
    if !FLOAT_PATTERN.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Interpret a value as an integer.
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Bool(true) => Some(1),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_FLOAT => {
            Some(*f as i64)
        }
        Value::String(s) => parse_int_str(s),
        _ => None,
    }
}

/// Interpret a value as a float.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Bool(true) => Some(1.0),
        Value::Float(f) if f.is_finite() => Some(*f),
        Value::String(s) => parse_float_str(s),
        _ => None,
    }
}
