//! `benchplot ipc`: knitting vs worker vs websocket vs http, per runtime.

use std::path::Path;

use benchplot::align::align_union;
use benchplot::chart::compose::{count_ticks, group_lines, overlay_lines};
use benchplot::chart::{ChartRequest, ColorBy, ReferenceLine, Scale, SeriesKey};
use benchplot::config::ChartConfig;
use benchplot::document::load_file;
use benchplot::extract::{CountSeries, Dataset, GroupSet, LabelShape, extract};
use benchplot::locate::source_title_from_path;
use benchplot::montage::stitch_horizontal;
use benchplot::path::{chart_path_for, file_stem, format_path_for_display};
use benchplot::styling::{success, warn};
use benchplot::units::TimeUnit;

use super::{hint_input, load_sources, print_table, warn_skip, write_chart};
use crate::cli::IpcArgs;

pub(crate) const GROUPS: [&str; 4] = ["knitting", "worker", "websocket", "http"];

const KIND: &str = "ipc";
const DEFAULT_OUT: &str = "./charts";
const X_LABEL: &str = "Message count";

pub(crate) fn group_set() -> GroupSet {
    GroupSet::exact(LabelShape::Count, GROUPS)
}

pub(crate) fn handle_ipc(args: &IpcArgs, config: &ChartConfig) -> anyhow::Result<()> {
    let report = &args.report;
    let out = report.out_or(DEFAULT_OUT);

    if report.input.is_file() {
        return plot_single(&report.input, out, config, report.table);
    }

    let loaded = load_sources(&report.input, config, KIND, &group_set());
    if loaded.is_empty() {
        warn(format!(
            "No IPC results found under {}",
            format_path_for_display(&report.input)
        ));
        hint_input();
        return Ok(());
    }

    let mut written = Vec::new();
    for item in &loaded {
        let path = out.join(format!("{}.png", file_stem(&item.path)));
        if plot_one(&item.source.name, &item.dataset, &path, config, report.table)? {
            written.push(path);
        }
    }

    if loaded.len() > 1 {
        let items: Vec<(&str, usize, &Dataset)> = loaded
            .iter()
            .map(|item| (item.source.name.as_str(), item.index, &item.dataset))
            .collect();
        plot_combined(&items, &out.join("ipc_combined.png"), config, report.table)?;
    }

    if args.montage && !written.is_empty() {
        let montage = out.join("ipc_montage.png");
        if stitch_horizontal(&written, &montage, config.theme.background)? {
            success(format!("Wrote {}", format_path_for_display(&montage)));
        }
    }
    Ok(())
}

/// A single result file given with `--input`.
fn plot_single(input: &Path, out: &Path, config: &ChartConfig, table: bool) -> anyhow::Result<()> {
    let title = source_title_from_path(input, &config.sources);
    let document = match load_file(input) {
        Ok(document) => document,
        Err(err) => {
            warn_skip(&err, &title);
            return Ok(());
        }
    };
    let dataset = extract(&document, &group_set());
    plot_one(&title, &dataset, &chart_path_for(input, out), config, table)?;
    Ok(())
}

fn latency_axis(unit: TimeUnit) -> String {
    format!("Average latency ({}{})", unit.symbol(), Scale::Log.describe())
}

fn present_groups(dataset: &Dataset) -> Vec<(usize, &'static str, &CountSeries)> {
    GROUPS
        .iter()
        .enumerate()
        .filter_map(|(idx, group)| {
            dataset
                .get(group)
                .and_then(|series| series.per_size())
                .map(|series| (idx, *group, series))
        })
        .collect()
}

/// One runtime's chart. Sparse groups are drawn with gaps.
pub(crate) fn compose_one(title: &str, dataset: &Dataset, config: &ChartConfig) -> ChartRequest {
    let unit = config.unit_or(TimeUnit::Ns);
    let groups = present_groups(dataset);
    let names: Vec<&str> = groups.iter().map(|(_, name, _)| *name).collect();
    let series: Vec<&CountSeries> = groups.iter().map(|(_, _, series)| *series).collect();
    let aligned = align_union(&series);

    let mut request = ChartRequest::new(
        format!("IPC Benchmark: {title}"),
        count_ticks(&aligned, ""),
    )
    .x_label(X_LABEL)
    .y_label(latency_axis(unit))
    .scale(Scale::Log)
    .lines(group_lines(&aligned, &names, unit, &config.theme));
    if aligned.has_count(100) {
        request = request.reference(ReferenceLine::hundred_micros(unit));
    }
    request
}

fn plot_one(
    title: &str,
    dataset: &Dataset,
    path: &Path,
    config: &ChartConfig,
    table: bool,
) -> anyhow::Result<bool> {
    let request = compose_one(title, dataset, config);
    if request.ticks.is_empty() {
        warn(format!("{title}: no counts found"));
        return Ok(false);
    }
    if table {
        print_table(&request, X_LABEL);
    }
    write_chart(&request, config, path)
}

/// All runtimes on one chart: marker per runtime, dash per group.
pub(crate) fn compose_combined(
    items: &[(&str, usize, &Dataset)],
    config: &ChartConfig,
) -> ChartRequest {
    let unit = config.unit_or(TimeUnit::Ns);
    let mut keys = Vec::new();
    let mut series = Vec::new();
    for (name, source_index, dataset) in items {
        for (group_index, group, values) in present_groups(dataset) {
            keys.push(SeriesKey::new(*name, *source_index, group, group_index));
            series.push(values);
        }
    }
    let aligned = align_union(&series);

    let mut request = ChartRequest::new("IPC Benchmark: Combined", count_ticks(&aligned, ""))
        .x_label(X_LABEL)
        .y_label(latency_axis(unit))
        .scale(Scale::Log)
        .lines(overlay_lines(
            &aligned,
            &keys,
            unit,
            &config.theme,
            ColorBy::Group,
        ));
    if aligned.has_count(100) {
        request = request.reference(ReferenceLine::hundred_micros(unit));
    }
    request
}

fn plot_combined(
    items: &[(&str, usize, &Dataset)],
    path: &Path,
    config: &ChartConfig,
    table: bool,
) -> anyhow::Result<bool> {
    let request = compose_combined(items, config);
    if request.ticks.is_empty() {
        warn("Combined chart has no data");
        return Ok(false);
    }
    if table {
        print_table(&request, X_LABEL);
    }
    write_chart(&request, config, path)
}
