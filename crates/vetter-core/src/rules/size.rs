//! The unified "size" of a value, shared by Size, Min, Max and Range.

use crate::value::Value;

use super::coerce::{parse_float, parse_int};

/// Magnitude of a value.
///
/// Containers are measured by element count, numeric scalars by value, and
/// everything else by character length. The order matters: `"42"` has
/// size 42, not 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    Count(usize),
    Int(i64),
    Float(f64),
    Length(usize),
}

impl Size {
    pub fn as_f64(&self) -> f64 {
        match self {
            Size::Count(n) | Size::Length(n) => *n as f64,
            Size::Int(n) => *n as f64,
            Size::Float(f) => *f,
        }
    }

    /// Integral sizes only; a float size never equals an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Size::Count(n) | Size::Length(n) => i64::try_from(*n).ok(),
            Size::Int(n) => Some(*n),
            Size::Float(_) => None,
        }
    }
}

/// Compute the size of a value.
pub fn size_of(value: &Value) -> Size {
    if let Some(count) = value.element_count() {
        return Size::Count(count);
    }
    if let Some(n) = parse_int(value) {
        return Size::Int(n);
    }
    if let Some(f) = parse_float(value) {
        return Size::Float(f);
    }
    let length = value.as_text().map(|text| text.chars().count()).unwrap_or(0);
    Size::Length(length)
}
