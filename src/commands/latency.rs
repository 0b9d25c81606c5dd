//! `benchplot latency` and `benchplot multi`: worker vs knitting, every runtime
//! overlaid on one chart.

use benchplot::align::{AlignedSeries, align};
use benchplot::chart::compose::{count_ticks, overlay_lines};
use benchplot::chart::{ChartRequest, ColorBy, ReferenceLine, Scale, SeriesKey};
use benchplot::config::ChartConfig;
use benchplot::extract::{CountSeries, GroupSet, LabelShape};
use benchplot::path::format_path_for_display;
use benchplot::styling::{eprintln, warn};
use benchplot::table::{self, Column};
use benchplot::units::TimeUnit;

use super::{Loaded, hint_input, load_sources, print_table, write_chart};
use crate::cli::ReportArgs;

const GROUPS: [&str; 2] = ["worker", "knitting"];
const GROUP_LABELS: [&str; 2] = ["Worker", "Knitting"];
const X_LABEL: &str = "Messages";

/// The two overlay reports. They share everything but their presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlay {
    Latency,
    Multi,
}

impl Overlay {
    fn kind(self) -> &'static str {
        match self {
            Overlay::Latency => "latency",
            Overlay::Multi => "multi",
        }
    }

    fn default_out(self) -> &'static str {
        match self {
            Overlay::Latency => "./charts/latency_line.png",
            Overlay::Multi => "./charts/multi_line.png",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Overlay::Latency => "Latency Benchmark: Worker vs Knitting",
            Overlay::Multi => "Multi Benchmark (4 threads): Worker vs Knitting",
        }
    }

    fn scale(self, config: &ChartConfig) -> Scale {
        match self {
            Overlay::Latency => Scale::SymLog {
                linthresh: config.symlog_threshold,
            },
            Overlay::Multi => Scale::Log,
        }
    }

    fn default_unit(self) -> TimeUnit {
        match self {
            Overlay::Latency => TimeUnit::Ns,
            Overlay::Multi => TimeUnit::Us,
        }
    }
}

pub(crate) fn group_set() -> GroupSet {
    GroupSet::exact(LabelShape::Count, GROUPS).pooled("entries")
}

pub(crate) fn handle_overlay(
    overlay: Overlay,
    args: &ReportArgs,
    config: &ChartConfig,
) -> anyhow::Result<()> {
    let loaded = load_sources(&args.input, config, overlay.kind(), &group_set());
    let sources: Vec<SourcePair<'_>> = loaded.iter().filter_map(SourcePair::new).collect();
    if sources.is_empty() {
        warn(format!("No {} results to plot", overlay.kind()));
        if loaded.is_empty() {
            hint_input();
        }
        return Ok(());
    }

    let (request, aligned) = compose(overlay, &sources, config);
    if aligned.is_degraded() {
        warn("No message count is shared by every series; points are paired by position");
    }
    if args.table {
        let unit = config.unit_or(overlay.default_unit());
        for source in &sources {
            eprintln!("{}", source.table(unit));
        }
        print_table(&request, X_LABEL);
    }
    write_chart(&request, config, args.out_or(overlay.default_out()))?;
    Ok(())
}

/// Worker and knitting series of one runtime.
pub(crate) struct SourcePair<'a> {
    name: &'a str,
    index: usize,
    series: [&'a CountSeries; 2],
    /// Worker against knitting for this runtime alone.
    own: AlignedSeries,
}

impl<'a> SourcePair<'a> {
    /// Both groups of a runtime, or a warning when they do not line up.
    fn new(loaded: &'a Loaded<'a>) -> Option<Self> {
        let group = |name: &str| loaded.dataset.get(name).and_then(|g| g.per_size());
        let (Some(worker), Some(knitting)) = (group(GROUPS[0]), group(GROUPS[1])) else {
            warn(format!(
                "{}: needs both worker and knitting results; skipping",
                loaded.source.name
            ));
            return None;
        };

        let own = align(&[worker, knitting]);
        if own.is_empty() {
            warn(format!(
                "{}: no aligned points in {}",
                loaded.source.name,
                format_path_for_display(&loaded.path)
            ));
            return None;
        }
        log::debug!(
            "{}: {} aligned points ({:?})",
            loaded.source.name,
            own.len(),
            own.alignment
        );

        Some(Self {
            name: &loaded.source.name,
            index: loaded.index,
            series: [worker, knitting],
            own,
        })
    }

    /// This runtime's own worker/knitting points, in `unit`.
    fn table(&self, unit: TimeUnit) -> String {
        let columns: Vec<Column> = GROUP_LABELS
            .iter()
            .zip(&self.own.values)
            .map(|(label, values)| {
                Column::new(*label, values.iter().map(|v| unit.from_ns(*v)).collect())
            })
            .collect();
        table::render(
            &format!("{} [{}]", self.name, unit.symbol()),
            X_LABEL,
            &count_ticks(&self.own, ""),
            &columns,
        )
    }
}

/// All (runtime, group) series aligned together, so every runtime shares the
/// same x positions.
pub(crate) fn compose(
    overlay: Overlay,
    sources: &[SourcePair<'_>],
    config: &ChartConfig,
) -> (ChartRequest, AlignedSeries) {
    let unit = config.unit_or(overlay.default_unit());
    let scale = overlay.scale(config);

    let mut keys = Vec::new();
    let mut series = Vec::new();
    for source in sources {
        for (group_index, values) in source.series.iter().enumerate() {
            keys.push(SeriesKey::new(
                source.name,
                source.index,
                GROUP_LABELS[group_index],
                group_index,
            ));
            series.push(*values);
        }
    }
    let aligned = align(&series);

    let mut request = ChartRequest::new(overlay.title(), count_ticks(&aligned, " msgs"))
        .x_label(X_LABEL)
        .y_label(format!(
            "Average latency ({}{})",
            unit.symbol(),
            scale.describe()
        ))
        .scale(scale)
        .lines(overlay_lines(
            &aligned,
            &keys,
            unit,
            &config.theme,
            ColorBy::Source,
        ));
    if overlay == Overlay::Latency && aligned.has_count(100) {
        request = request.reference(ReferenceLine::hundred_micros(unit));
    }
    (request, aligned)
}
