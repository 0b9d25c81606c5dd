//! Chart composition: aligned data in, renderable chart description out.
//!
//! No canonicalization or alignment happens here. The composer only decides
//! how each (source, group) line looks so overlays stay distinguishable:
//! markers vary by source, dash patterns vary by group.

use crate::align::{AlignedSeries, Alignment};
use crate::chart::theme::{Rgb, Theme};
use crate::units::TimeUnit;

/// Vertical axis scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Linear,
    Log,
    /// Logarithmic beyond `±linthresh`, linear inside it.
    SymLog { linthresh: f64 },
}

impl Scale {
    /// Map a data value onto the linear axis the renderer draws.
    ///
    /// Values a log scale cannot show (zero, negative) map to `NaN`.
    pub fn forward(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log if v > 0.0 => v.log10(),
            Scale::Log => f64::NAN,
            Scale::SymLog { linthresh } => v.signum() * (1.0 + v.abs() / linthresh).log10(),
        }
    }

    /// Inverse of [`Scale::forward`], used to label ticks.
    pub fn inverse(self, t: f64) -> f64 {
        match self {
            Scale::Linear => t,
            Scale::Log => 10f64.powf(t),
            Scale::SymLog { linthresh } => t.signum() * linthresh * (10f64.powf(t.abs()) - 1.0),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Scale::Linear => "",
            Scale::Log => ", log scale",
            Scale::SymLog { .. } => ", symlog scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

/// Marker cycle for overlays, one per source.
pub const MARKERS: [Marker; 5] = [
    Marker::Circle,
    Marker::Square,
    Marker::Triangle,
    Marker::Diamond,
    Marker::Cross,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

/// Dash cycle for overlays, one per group.
pub const DASHES: [Dash; 4] = [Dash::Solid, Dash::Dashed, Dash::Dotted, Dash::DashDot];

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub label: String,
    /// One value per x tick, already in display units. `NaN` is a gap.
    pub values: Vec<f64>,
    pub color: Rgb,
    pub marker: Marker,
    pub dash: Dash,
}

/// A horizontal guide line, in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: Option<String>,
}

impl ReferenceLine {
    /// The 100 µs guide drawn on latency charts.
    pub fn hundred_micros(unit: TimeUnit) -> Self {
        Self {
            value: unit.from_ns(100_000.0),
            label: Some("100 µs".to_string()),
        }
    }
}

/// Everything the renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// One label per x position.
    pub ticks: Vec<String>,
    pub lines: Vec<LineSpec>,
    pub scale: Scale,
    pub references: Vec<ReferenceLine>,
}

impl ChartRequest {
    pub fn new(title: impl Into<String>, ticks: Vec<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            ticks,
            lines: Vec::new(),
            scale: Scale::Linear,
            references: Vec::new(),
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Add a line unless every value is missing.
    pub fn line(mut self, line: LineSpec) -> Self {
        if line.values.iter().any(|v| !v.is_nan()) {
            self.lines.push(line);
        }
        self
    }

    pub fn lines(self, lines: impl IntoIterator<Item = LineSpec>) -> Self {
        lines.into_iter().fold(self, Self::line)
    }

    pub fn reference(mut self, reference: ReferenceLine) -> Self {
        self.references.push(reference);
        self
    }

    /// True when there is nothing to draw.
    pub fn is_blank(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Identifies the source and group behind one aligned value vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub source: String,
    pub source_index: usize,
    pub group: String,
    pub group_index: usize,
}

impl SeriesKey {
    pub fn new(
        source: impl Into<String>,
        source_index: usize,
        group: impl Into<String>,
        group_index: usize,
    ) -> Self {
        Self {
            source: source.into(),
            source_index,
            group: group.into(),
            group_index,
        }
    }
}

/// Where line colors come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBy {
    /// Group color; sources differ by marker.
    Group,
    /// Source color for the first group, the source accent for the others.
    Source,
}

/// X tick labels for an aligned axis.
///
/// Real counts get `suffix` appended (`"10 msgs"`); positional ordinals are
/// shown as `#1`, `#2`, ... so they cannot be mistaken for counts.
pub fn count_ticks(aligned: &AlignedSeries, suffix: &str) -> Vec<String> {
    aligned
        .counts
        .iter()
        .map(|c| match aligned.alignment {
            Alignment::Positional => format!("#{c}"),
            _ => format!("{c}{suffix}"),
        })
        .collect()
}

/// Lines for a single-source chart: one per group, colored by group.
pub fn group_lines(
    aligned: &AlignedSeries,
    groups: &[&str],
    unit: TimeUnit,
    theme: &Theme,
) -> Vec<LineSpec> {
    aligned
        .values
        .iter()
        .zip(groups)
        .enumerate()
        .map(|(idx, (values, group))| LineSpec {
            label: (*group).to_string(),
            values: values.iter().map(|v| unit.from_ns(*v)).collect(),
            color: theme.group_color(group, idx),
            marker: Marker::Circle,
            dash: Dash::Solid,
        })
        .collect()
}

/// Lines for a cross-source overlay, one per key.
///
/// `keys[i]` describes `aligned.values[i]`.
pub fn overlay_lines(
    aligned: &AlignedSeries,
    keys: &[SeriesKey],
    unit: TimeUnit,
    theme: &Theme,
    color_by: ColorBy,
) -> Vec<LineSpec> {
    aligned
        .values
        .iter()
        .zip(keys)
        .map(|(values, key)| {
            let color = match color_by {
                ColorBy::Group => theme.group_color(&key.group, key.group_index),
                ColorBy::Source if key.group_index == 0 => {
                    theme.source_color(&key.source, key.source_index)
                }
                ColorBy::Source => theme.source_accent(&key.source, key.source_index),
            };
            LineSpec {
                label: format!("{} {}", key.source, key.group),
                values: values.iter().map(|v| unit.from_ns(*v)).collect(),
                color,
                marker: MARKERS[key.source_index % MARKERS.len()],
                dash: DASHES[key.group_index % DASHES.len()],
            }
        })
        .collect()
}

/// Capitalize each word of a group name for legends (`knitting fast` -> `Knitting Fast`).
pub fn display_name(group: &str) -> String {
    group
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
