//! Cross-series alignment.
//!
//! Charts compare series point by point, so every series must be expressed
//! over the same count axis. The primary policy keeps only the counts every
//! series has. When the series share no count at all, they are paired by
//! position instead; that result is flagged as degraded because nothing
//! guarantees the paired points measured the same case.

use std::collections::{BTreeMap, BTreeSet};

use crate::extract::CountSeries;
use crate::units::CanonicalValue;

/// How an [`AlignedSeries`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Axis is the intersection of every series' counts.
    SharedCounts,
    /// Axis holds 1-based ordinal positions; series were truncated to the
    /// shortest and paired by position.
    Positional,
    /// Axis is the union of counts; missing values are `NaN`.
    Union,
}

/// Several series over one common, ascending axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    /// Axis keys: counts, or ordinals for [`Alignment::Positional`].
    pub counts: Vec<u64>,
    /// One value vector per input series, each `counts.len()` long.
    pub values: Vec<Vec<CanonicalValue>>,
    pub alignment: Alignment,
}

impl AlignedSeries {
    fn empty(series: usize, alignment: Alignment) -> Self {
        Self {
            counts: Vec::new(),
            values: vec![Vec::new(); series],
            alignment,
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// True when points were paired by position rather than by count.
    pub fn is_degraded(&self) -> bool {
        self.alignment == Alignment::Positional
    }

    /// Whether the axis carries real counts that include `count`.
    pub fn has_count(&self, count: u64) -> bool {
        !self.is_degraded() && self.counts.contains(&count)
    }
}

/// Keys with a usable (non-NaN) value.
fn usable(series: &CountSeries) -> impl Iterator<Item = (u64, CanonicalValue)> + '_ {
    series
        .iter()
        .filter(|(_, v)| !v.is_nan())
        .map(|(k, v)| (*k, *v))
}

/// Align series on the counts they all share, falling back to positional
/// pairing when they share none.
pub fn align(series_list: &[&CountSeries]) -> AlignedSeries {
    let Some((first, rest)) = series_list.split_first() else {
        return AlignedSeries::empty(0, Alignment::SharedCounts);
    };

    let mut shared: BTreeSet<u64> = usable(first).map(|(k, _)| k).collect();
    for series in rest {
        let keys: BTreeSet<u64> = usable(series).map(|(k, _)| k).collect();
        shared.retain(|k| keys.contains(k));
    }

    if !shared.is_empty() {
        let counts: Vec<u64> = shared.into_iter().collect();
        let values = series_list
            .iter()
            .map(|series| counts.iter().map(|c| series[c]).collect())
            .collect();
        return AlignedSeries {
            counts,
            values,
            alignment: Alignment::SharedCounts,
        };
    }

    align_positional(series_list)
}

fn align_positional(series_list: &[&CountSeries]) -> AlignedSeries {
    let columns: Vec<Vec<CanonicalValue>> = series_list
        .iter()
        .map(|series| usable(series).map(|(_, v)| v).collect())
        .collect();
    let len = columns.iter().map(Vec::len).min().unwrap_or(0);
    if len == 0 {
        return AlignedSeries::empty(series_list.len(), Alignment::Positional);
    }

    log::debug!(
        "No shared counts across {} series; pairing {len} points by position",
        series_list.len()
    );

    AlignedSeries {
        counts: (1..=len as u64).collect(),
        values: columns
            .into_iter()
            .map(|mut column| {
                column.truncate(len);
                column
            })
            .collect(),
        alignment: Alignment::Positional,
    }
}

/// Align series on the union of their counts; gaps are `NaN`.
pub fn align_union(series_list: &[&CountSeries]) -> AlignedSeries {
    let counts: Vec<u64> = series_list
        .iter()
        .flat_map(|series| usable(series).map(|(k, _)| k))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let values = series_list
        .iter()
        .map(|series| {
            counts
                .iter()
                .map(|c| series.get(c).copied().unwrap_or(f64::NAN))
                .collect()
        })
        .collect();
    AlignedSeries {
        counts,
        values,
        alignment: Alignment::Union,
    }
}

/// Ordered union of category names across several category maps.
///
/// Categories listed in `preferred` come first, in that order; the rest
/// follow sorted.
pub fn category_axis<'a, I>(preferred: &[&str], maps: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a BTreeMap<String, CanonicalValue>>,
{
    let all: BTreeSet<&str> = maps
        .into_iter()
        .flat_map(|m| m.keys().map(String::as_str))
        .collect();
    let mut axis: Vec<String> = preferred
        .iter()
        .filter(|p| all.contains(**p))
        .map(|p| p.to_string())
        .collect();
    axis.extend(
        all.iter()
            .filter(|c| !preferred.contains(c))
            .map(|c| c.to_string()),
    );
    axis
}
