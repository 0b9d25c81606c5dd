//! Benchmark label parsing.
//!
//! Labels are free text written by whoever wrote the benchmark, e.g.
//! `string -> (10)`, `knitting → 100` or `echo (1000)`. The count embedded in
//! the label is the x-axis key shared across sources; the text before it is
//! the category (a payload type in the types benchmark).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Arrow followed by a parenthesized integer: `string -> (10)`.
static ARROW_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:->|→)\s*\(\s*(\d+)\s*\)").expect("pattern is valid"));

/// Trailing parenthesized integer: `echo (100)`.
static TRAILING_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*(\d+)\s*\)\s*$").expect("pattern is valid"));

/// Arrow followed by a bare integer: `knitting → 100`.
static ARROW_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:->|→)\s*(\d+)\b").expect("pattern is valid"));

static EXTRA_THREADS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)main\s*\+\s*(\d+)\s*extra\s*threads").expect("pattern is valid")
});

/// A label split into its category and optional count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    pub category: String,
    pub count: Option<u64>,
}

impl ParsedLabel {
    fn uncounted(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            count: None,
        }
    }

    /// Parse a label taken straight from a document.
    ///
    /// Strings go through [`parse`]. Anything else keeps its JSON string form
    /// as the category and has no count; `null` becomes the empty string.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => parse(s),
            Value::Null => Self::uncounted(""),
            other => Self::uncounted(other.to_string()),
        }
    }
}

/// Split a label into `(category, count)`.
///
/// Notations are tried in order: arrow + parenthesized integer, trailing
/// parenthesized integer, arrow + bare integer. The first notation that
/// matches decides; a count too large for `u64` counts as no match.
pub fn parse(label: &str) -> ParsedLabel {
    let trimmed = label.trim();

    for re in [&*ARROW_PAREN_RE, &*TRAILING_PAREN_RE, &*ARROW_BARE_RE] {
        let Some(caps) = re.captures(trimmed) else {
            continue;
        };
        let Ok(count) = caps[1].parse::<u64>() else {
            continue;
        };
        let start = caps.get(0).map_or(0, |m| m.start());
        return ParsedLabel {
            category: clean_category(&trimmed[..start]),
            count: Some(count),
        };
    }

    ParsedLabel::uncounted(trimmed)
}

fn clean_category(prefix: &str) -> String {
    let mut category = prefix.trim_end();
    loop {
        let stripped = category
            .strip_suffix("->")
            .or_else(|| category.strip_suffix('→'))
            .map(str::trim_end);
        match stripped {
            Some(rest) => category = rest,
            None => break,
        }
    }
    category.trim().to_string()
}

/// Total thread count encoded in a "with load" label.
///
/// `main` alone is one thread; `main + 3 extra threads` is four.
pub fn parse_thread_count(label: &str) -> Option<u64> {
    if label.trim().eq_ignore_ascii_case("main") {
        return Some(1);
    }
    let caps = EXTRA_THREADS_RE.captures(label)?;
    let extra: u64 = caps[1].parse().ok()?;
    extra.checked_add(1)
}
