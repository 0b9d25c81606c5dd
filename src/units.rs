//! Latency unit canonicalization.
//!
//! Producers disagree on how they report an average: mitata dumps plain
//! nanosecond numbers, other harnesses print strings such as `"12.4 µs"` or
//! `"3ms"`. Everything is normalized to nanoseconds (`f64`), with `NaN` as the
//! "no data" sentinel.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A latency in nanoseconds. `NaN` means absent or unparsable.
pub type CanonicalValue = f64;

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([-+]?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?)\s*(ns|us|ms|s)\b")
        .expect("unit pattern is valid")
});

/// Convert a raw `stats.avg`-style value into nanoseconds.
///
/// Numbers are taken as nanoseconds already. Strings go through
/// [`parse_duration_ns`]. Any other JSON type yields `NaN`.
pub fn to_canonical_ns(value: &Value) -> CanonicalValue {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_duration_ns(s),
        _ => f64::NAN,
    }
}

/// Parse a unit-annotated duration string into nanoseconds.
///
/// The first `<number> <unit>` token wins. Without a unit token the whole
/// trimmed string must be a bare number, read as nanoseconds.
pub fn parse_duration_ns(text: &str) -> CanonicalValue {
    let normalized = text.replace(['µ', 'μ'], "u");

    let Some(caps) = UNIT_RE.captures(&normalized) else {
        return normalized.trim().parse::<f64>().unwrap_or(f64::NAN);
    };

    let Ok(number) = caps[1].parse::<f64>() else {
        return f64::NAN;
    };
    match TimeUnit::from_suffix(&caps[2]) {
        Some(unit) => number * unit.nanos(),
        None => f64::NAN,
    }
}

/// A display unit for latencies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimeUnit {
    #[default]
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    /// Nanoseconds per one of this unit.
    pub fn nanos(self) -> f64 {
        match self {
            TimeUnit::Ns => 1.0,
            TimeUnit::Us => 1_000.0,
            TimeUnit::Ms => 1_000_000.0,
            TimeUnit::S => 1_000_000_000.0,
        }
    }

    /// Express a canonical nanosecond value in this unit.
    pub fn from_ns(self, ns: CanonicalValue) -> f64 {
        ns / self.nanos()
    }

    /// Symbol used in axis labels.
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "µs",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "ns" => Some(TimeUnit::Ns),
            "us" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }
}
