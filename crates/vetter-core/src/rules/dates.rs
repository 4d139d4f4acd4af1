//! Date parsing for the Date, DateFormat, DateBefore and DateAfter rules.
//!
//! All timestamps are compared as naive UTC date-times.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn relative(keyword: &str) -> Option<NaiveDateTime> {
    let now = Utc::now();
    match keyword {
        "now" => Some(now.naive_utc()),
        "today" | "midnight" => midnight(now.date_naive()),
        "tomorrow" => now.date_naive().succ_opt().and_then(midnight),
        "yesterday" => now.date_naive().pred_opt().and_then(midnight),
        _ => None,
    }
}

/// Parse a free-form date/time string.
///
/// Accepts the relative keywords `now`, `today`, `tomorrow`, `yesterday`,
/// `@<unix seconds>`, RFC 3339, RFC 2822, and a fixed list of numeric and
/// English-month layouts.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(dt) = relative(&s.to_ascii_lowercase()) {
        return Some(dt);
    }

    if let Some(seconds) = s.strip_prefix('@') {
        return seconds
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(midnight)
        })
}

/// Translate a PHP-style date format (`Y-m-d H:i:s`) into chrono items.
///
/// Supported letters: `d j m n Y y H G h g i s D l M F A a U O P`. Anything
/// else is matched literally, including the letters `S e T N z t` and the
/// parse modifiers `! | * ?`. A backslash makes the next character literal.
pub fn translate_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let item = match c {
            'd' | 'j' => "%d",
            'm' | 'n' => "%m",
            'Y' => "%Y",
            'y' => "%y",
            'H' | 'G' => "%H",
            'h' | 'g' => "%I",
            'i' => "%M",
            's' => "%S",
            'D' => "%a",
            'l' => "%A",
            'M' => "%b",
            'F' => "%B",
            'A' | 'a' => "%p",
            'U' => "%s",
            'O' => "%z",
            'P' => "%:z",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_literal(&mut out, escaped);
                }
                continue;
            }
            other => {
                push_literal(&mut out, other);
                continue;
            }
        };
        out.push_str(item);
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Check that `input` matches a PHP-style `format` exactly.
///
/// Only the shape is checked: every format item must consume input and no
/// input may be left over. Calendar consistency (February 30th) is not.
pub fn parse_with_format(input: &str, format: &str) -> bool {
    matches_translated(input, &translate_format(format))
}

/// Like [`parse_with_format`] for a format already run through
/// [`translate_format`].
pub(crate) fn matches_translated(input: &str, translated: &str) -> bool {
    let mut parsed = Parsed::new();
    parse(&mut parsed, input, StrftimeItems::new(translated)).is_ok()
}
