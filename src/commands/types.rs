//! `benchplot types`: payload types on the x axis, one chart per message
//! count and result file.

use std::collections::BTreeMap;
use std::path::Path;

use benchplot::align::category_axis;
use benchplot::chart::compose::{Dash, LineSpec, Marker, display_name};
use benchplot::chart::{ChartRequest, Scale};
use benchplot::config::ChartConfig;
use benchplot::document::load_file;
use benchplot::extract::{Dataset, GroupSet, GroupSpec, LabelShape, extract};
use benchplot::locate::files_with_suffix;
use benchplot::path::{file_stem, format_path_for_display};
use benchplot::styling::warn;
use benchplot::units::TimeUnit;

use super::{hint_input, print_table, warn_skip, write_chart};
use crate::cli::ReportArgs;

const SUFFIX: &str = "_types.json";
const DEFAULT_OUT: &str = "./charts";
const X_LABEL: &str = "Payload type";

/// Plot order; differs from matching order, where the longer prefix must come first.
const PLOT_ORDER: [&str; 3] = ["worker", "knitting", "knitting fast"];

/// Stable, human-friendly order for the payload types the benchmark emits.
const PREFERRED_TYPE_ORDER: [&str; 12] = [
    "string",
    "large string",
    "number",
    "min bigint",
    "max bigint",
    "boolean true",
    "boolean false",
    "void",
    "small array",
    "big Array",
    "object",
    "big object",
];

pub(crate) fn group_set() -> GroupSet {
    GroupSet::new(LabelShape::Typed)
        .group(GroupSpec::prefix("knitting fast"))
        .group(GroupSpec::prefix("knitting"))
        .group(GroupSpec::prefix("worker"))
}

pub(crate) fn handle_types(args: &ReportArgs, config: &ChartConfig) -> anyhow::Result<()> {
    let files = files_with_suffix(&args.input, SUFFIX).unwrap_or_else(|e| {
        log::debug!("Failed to list {}: {e}", args.input.display());
        Vec::new()
    });
    if files.is_empty() {
        warn(format!(
            "No *{SUFFIX} found in {}",
            format_path_for_display(&args.input)
        ));
        hint_input();
        return Ok(());
    }

    let out = args.out_or(DEFAULT_OUT);
    for path in &files {
        process_file(path, out, config, args.table)?;
    }
    Ok(())
}

fn process_file(path: &Path, out: &Path, config: &ChartConfig, table: bool) -> anyhow::Result<()> {
    let base = file_stem(path);
    let title = display_name(&base.replace('_', " "));
    let document = match load_file(path) {
        Ok(document) => document,
        Err(err) => {
            warn_skip(&err, &title);
            return Ok(());
        }
    };
    let dataset = extract(&document, &group_set());

    let mut plotted = false;
    for count in dataset.all_counts() {
        let Some(request) = compose(&title, count, &dataset, config) else {
            continue;
        };
        if table {
            print_table(&request, X_LABEL);
        }
        let chart = out.join(format!("{base}_count{count}.png"));
        plotted |= write_chart(&request, config, &chart)?;
    }

    if !plotted {
        warn(format!(
            "{}: nothing plotted (no counts found)",
            format_path_for_display(path)
        ));
    }
    Ok(())
}

/// The chart for one message count, or `None` when no group measured it.
pub(crate) fn compose(
    title: &str,
    count: u64,
    dataset: &Dataset,
    config: &ChartConfig,
) -> Option<ChartRequest> {
    let unit = config.unit_or(TimeUnit::Us);
    let groups: Vec<(usize, &str, BTreeMap<String, f64>)> = PLOT_ORDER
        .iter()
        .enumerate()
        .filter_map(|(idx, group)| {
            let values = dataset.get(group)?.at_count(count);
            (!values.is_empty()).then_some((idx, *group, values))
        })
        .collect();
    if groups.is_empty() {
        return None;
    }

    let types = category_axis(&PREFERRED_TYPE_ORDER, groups.iter().map(|(_, _, m)| m));
    let lines = groups.iter().map(|(idx, group, values)| LineSpec {
        label: display_name(group),
        values: types
            .iter()
            .map(|t| values.get(t).map_or(f64::NAN, |v| unit.from_ns(*v)))
            .collect(),
        color: config.theme.group_color(group, *idx),
        marker: Marker::Circle,
        dash: Dash::Solid,
    });

    Some(
        ChartRequest::new(format!("{title}: Types Benchmark (count={count})"), types.clone())
            .x_label(X_LABEL)
            .y_label(format!(
                "Average latency ({}{})",
                unit.symbol(),
                Scale::Log.describe()
            ))
            .scale(Scale::Log)
            .lines(lines),
    )
}

#[cfg(test)]
mod tests {
    use benchplot::document::load;
    use serde_json::json;

    use super::*;

    fn row(name: &str, avg: f64) -> serde_json::Value {
        json!({"name": name, "stats": {"avg": avg}})
    }

    fn dataset() -> Dataset {
        let doc = json!({
            "Worker (structured clone)": [row("number -> (1)", 2000.0), row("zeta -> (1)", 5000.0)],
            "knitting": [row("string -> (1)", 1000.0), row("number -> (10)", 3000.0)],
            "Knitting fast": [row("string -> (1)", 500.0)],
        });
        extract(&load(&doc.to_string()).unwrap(), &group_set())
    }

    #[test]
    fn test_chart_per_count() {
        let ds = dataset();
        let request = compose("Node Types", 1, &ds, &ChartConfig::default()).unwrap();

        assert_eq!(request.title, "Node Types: Types Benchmark (count=1)");
        assert_eq!(request.ticks, ["string", "number", "zeta"]);
        let labels: Vec<&str> = request.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Worker", "Knitting", "Knitting Fast"]);
        assert!(request.lines[0].values[0].is_nan());
        assert_eq!(request.lines[0].values[1], 2.0);
        assert_eq!(request.lines[2].values[0], 0.5);
    }

    #[test]
    fn test_count_without_data() {
        let ds = dataset();
        assert!(compose("Node Types", 100, &ds, &ChartConfig::default()).is_none());
        let only_knitting = compose("Node Types", 10, &ds, &ChartConfig::default()).unwrap();
        assert_eq!(only_knitting.lines.len(), 1);
        assert_eq!(only_knitting.ticks, ["number"]);
    }
}
