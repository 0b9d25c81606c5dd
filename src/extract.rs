//! Group extraction: from a loaded document to per-group, per-count series.
//!
//! A document maps group names (`knitting`, `worker`, ...) to lists of rows.
//! Sequences of sections are merged, so a group that only shows up in a later
//! section is still picked up. Unknown keys are ignored.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::document::Document;
use crate::label::{ParsedLabel, parse_thread_count};
use crate::units::{CanonicalValue, to_canonical_ns};

/// Category given to rows whose label carries only a count.
pub const DEFAULT_CATEGORY: &str = "default";

/// Count -> canonical value, sorted by count.
pub type CountSeries = BTreeMap<u64, CanonicalValue>;

/// Count -> category -> canonical value.
pub type TypedSeries = BTreeMap<u64, BTreeMap<String, CanonicalValue>>;

/// How a document key is matched against a declared group.
///
/// Keys are trimmed and lowercased before matching.
#[derive(Debug, Clone)]
pub enum GroupMatcher {
    /// Key equals the group name.
    Exact,
    /// Key starts with the group name. Among several matching prefixes the
    /// longest wins, so `knitting fast` beats `knitting`.
    Prefix,
    /// Key matches a case-insensitive pattern.
    Pattern(Regex),
}

/// A group the extractor recognizes.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    name: String,
    matcher: GroupMatcher,
}

impl GroupSpec {
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: normalize_key(&name.into()),
            matcher: GroupMatcher::Exact,
        }
    }

    pub fn prefix(name: impl Into<String>) -> Self {
        Self {
            name: normalize_key(&name.into()),
            matcher: GroupMatcher::Prefix,
        }
    }

    pub fn pattern(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: normalize_key(&name.into()),
            matcher: GroupMatcher::Pattern(Regex::new(&format!("(?i){pattern}"))?),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Match strength for a normalized key; higher wins.
    fn score(&self, key: &str) -> Option<usize> {
        match &self.matcher {
            GroupMatcher::Exact => (key == self.name).then_some(usize::MAX),
            GroupMatcher::Pattern(re) => re.is_match(key).then_some(usize::MAX - 1),
            GroupMatcher::Prefix => key.starts_with(&self.name).then_some(self.name.len()),
        }
    }
}

/// Where a row's count and category come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelShape {
    /// Only the count matters; every row gets [`DEFAULT_CATEGORY`].
    Count,
    /// Category and count from the label (`string -> (10)`).
    Typed,
    /// Total thread count from `main + N extra threads` labels.
    Threads,
}

/// The groups a report recognizes, and how their rows are read.
#[derive(Debug, Clone)]
pub struct GroupSet {
    groups: Vec<GroupSpec>,
    pooled_keys: Vec<String>,
    shape: LabelShape,
}

impl GroupSet {
    pub fn new(shape: LabelShape) -> Self {
        Self {
            groups: Vec::new(),
            pooled_keys: Vec::new(),
            shape,
        }
    }

    /// Exact-match groups, the common case.
    pub fn exact<I, S>(shape: LabelShape, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::new(shape), |set, name| set.group(GroupSpec::exact(name)))
    }

    pub fn group(mut self, spec: GroupSpec) -> Self {
        self.groups.push(spec);
        self
    }

    /// A key whose rows name their own group (via `group`/`mode` fields or
    /// the label text) instead of inheriting it from the key.
    pub fn pooled(mut self, key: impl Into<String>) -> Self {
        self.pooled_keys.push(normalize_key(&key.into()));
        self
    }


    /// Index of the declared group a document key belongs to.
    fn resolve(&self, key: &str) -> Option<usize> {
        let key = normalize_key(key);
        let mut best: Option<(usize, usize)> = None;
        for (idx, spec) in self.groups.iter().enumerate() {
            if let Some(score) = spec.score(&key)
                && best.is_none_or(|(_, s)| score > s)
            {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn is_pooled(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.pooled_keys.iter().any(|k| *k == key)
    }

    /// Group of a row under a pooled key.
    fn route(&self, row: &Map<String, Value>) -> Option<usize> {
        for field in ["group", "mode"] {
            if let Some(hint) = row.get(field).and_then(Value::as_str)
                && let Some(idx) = self.resolve(hint)
            {
                return Some(idx);
            }
        }
        let label = row_label(row).as_str().unwrap_or_default().to_lowercase();
        self.groups.iter().position(|g| label.contains(g.name()))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Values of one group, keyed by count.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupSeries {
    /// Count-only labels.
    PerSize(CountSeries),
    /// Category + count labels.
    PerType(TypedSeries),
}

impl GroupSeries {
    fn from_points(points: TypedSeries) -> Self {
        let per_size = points
            .values()
            .all(|by_cat| by_cat.keys().all(|c| c == DEFAULT_CATEGORY));
        if per_size {
            GroupSeries::PerSize(
                points
                    .into_iter()
                    .filter_map(|(count, mut by_cat)| {
                        by_cat.remove(DEFAULT_CATEGORY).map(|v| (count, v))
                    })
                    .collect(),
            )
        } else {
            GroupSeries::PerType(points)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GroupSeries::PerSize(s) => s.is_empty(),
            GroupSeries::PerType(s) => s.is_empty(),
        }
    }

    /// Counts present in this group, ascending.
    pub fn counts(&self) -> Vec<u64> {
        match self {
            GroupSeries::PerSize(s) => s.keys().copied().collect(),
            GroupSeries::PerType(s) => s.keys().copied().collect(),
        }
    }

    /// The count-keyed values, if this is a per-size group.
    pub fn per_size(&self) -> Option<&CountSeries> {
        match self {
            GroupSeries::PerSize(s) => Some(s),
            GroupSeries::PerType(_) => None,
        }
    }

    /// Category -> value at one count. Per-size groups report their value
    /// under [`DEFAULT_CATEGORY`].
    pub fn at_count(&self, count: u64) -> BTreeMap<String, CanonicalValue> {
        match self {
            GroupSeries::PerSize(s) => s
                .get(&count)
                .map(|v| BTreeMap::from([(DEFAULT_CATEGORY.to_string(), *v)]))
                .unwrap_or_default(),
            GroupSeries::PerType(s) => s.get(&count).cloned().unwrap_or_default(),
        }
    }
}

/// Rows dropped while building a dataset, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Label carried no count.
    pub no_count: usize,
    /// Average could not be canonicalized.
    pub no_value: usize,
    /// Row was not a mapping, or a pooled row matched no group.
    pub unroutable: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.no_count + self.no_value + self.unroutable
    }
}

/// All groups extracted from one source's document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    groups: IndexMap<String, GroupSeries>,
    skipped: SkipCounts,
}

impl Dataset {
    pub fn get(&self, group: &str) -> Option<&GroupSeries> {
        self.groups.get(group)
    }

    /// Groups with data, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupSeries)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(GroupSeries::is_empty)
    }

    pub fn skipped(&self) -> SkipCounts {
        self.skipped
    }

    /// Every count present in any group, ascending.
    pub fn all_counts(&self) -> BTreeSet<u64> {
        self.groups.values().flat_map(GroupSeries::counts).collect()
    }
}

struct Collector<'a> {
    set: &'a GroupSet,
    points: Vec<TypedSeries>,
    skipped: SkipCounts,
}

impl Collector<'_> {
    fn push_row(&mut self, group: usize, row: &Map<String, Value>) {
        let label_value = row_label(row);
        let (category, count) = match self.set.shape {
            LabelShape::Count => (
                DEFAULT_CATEGORY.to_string(),
                ParsedLabel::from_value(label_value).count,
            ),
            LabelShape::Typed => {
                let parsed = ParsedLabel::from_value(label_value);
                let category = if parsed.category.is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    parsed.category
                };
                (category, parsed.count)
            }
            LabelShape::Threads => (
                DEFAULT_CATEGORY.to_string(),
                label_value.as_str().and_then(parse_thread_count),
            ),
        };

        let Some(count) = count else {
            self.skipped.no_count += 1;
            return;
        };
        let value = row_average(row).map_or(f64::NAN, to_canonical_ns);
        if value.is_nan() {
            self.skipped.no_value += 1;
            return;
        }

        // Last write wins for duplicate (count, category) pairs
        self.points[group]
            .entry(count)
            .or_default()
            .insert(category, value);
    }
}

/// Bucket a document's rows into the groups of `set`.
pub fn extract(document: &Document, set: &GroupSet) -> Dataset {
    let mut collector = Collector {
        set,
        points: vec![TypedSeries::new(); set.groups.len()],
        skipped: SkipCounts::default(),
    };

    for section in document.sections() {
        for (key, value) in section {
            let pooled = set.is_pooled(key);
            let group = if pooled { None } else { set.resolve(key) };
            if !pooled && group.is_none() {
                continue;
            }
            let Some(rows) = value.as_array() else {
                log::debug!("Ignoring non-list value under '{key}'");
                continue;
            };

            for entry in rows {
                let Some(row) = entry.as_object() else {
                    collector.skipped.unroutable += 1;
                    continue;
                };
                match group.or_else(|| set.route(row)) {
                    Some(idx) => collector.push_row(idx, row),
                    None => collector.skipped.unroutable += 1,
                }
            }
        }
    }

    let Collector {
        points, skipped, ..
    } = collector;

    if skipped.total() > 0 {
        log::debug!(
            "Dropped {} rows ({} without count, {} without value, {} unroutable)",
            skipped.total(),
            skipped.no_count,
            skipped.no_value,
            skipped.unroutable
        );
    }

    let groups = set
        .groups
        .iter()
        .zip(points)
        .filter(|(_, points)| !points.is_empty())
        .map(|(spec, points)| (spec.name.clone(), GroupSeries::from_points(points)))
        .collect();

    Dataset { groups, skipped }
}

/// The label of a row: `label`, else `name`, else null.
fn row_label(row: &Map<String, Value>) -> &Value {
    ["label", "name"]
        .into_iter()
        .filter_map(|k| row.get(k))
        .find(|v| is_truthy(v))
        .unwrap_or(&Value::Null)
}

/// The average latency of a row: `stats.avg`, else `avg`, `average` or `mean`.
fn row_average(row: &Map<String, Value>) -> Option<&Value> {
    row.get("stats")
        .and_then(Value::as_object)
        .and_then(|stats| stats.get("avg"))
        .filter(|v| !v.is_null())
        .or_else(|| {
            ["avg", "average", "mean"]
                .into_iter()
                .filter_map(|k| row.get(k))
                .find(|v| !v.is_null())
        })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
