//! Dot-path field resolution.
//!
//! `"address.city"` walks `data["address"]["city"]`. A path is absent as
//! soon as one segment is missing, and also when it tries to step through a
//! scalar (`"name.first"` where `name` is a string): absent fields skip
//! every rule except `Required`, so this never raises.

use crate::value::{Mapping, Value};

/// Resolves field paths against one input mapping.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    data: &'a Mapping,
}

impl<'a> FieldResolver<'a> {
    pub fn new(data: &'a Mapping) -> Self {
        Self { data }
    }

    /// Whether `path` resolves to a value (which may itself be `Null`).
    pub fn has_field(&self, path: &str) -> bool {
        self.get_field(path).is_some()
    }

    /// The value at `path`, or `None` when any segment is missing.
    pub fn get_field(&self, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.data.get(first)?;

        for segment in segments {
            current = current.child(segment)?;
        }

        Some(current)
    }
}
