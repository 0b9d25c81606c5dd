//! `benchplot withload`: how the primes benchmark scales with extra threads.

use benchplot::align::align_union;
use benchplot::chart::compose::{DASHES, Dash, LineSpec, MARKERS, Marker, count_ticks};
use benchplot::chart::{ChartRequest, ReferenceLine, Scale};
use benchplot::config::ChartConfig;
use benchplot::extract::{CountSeries, GroupSet, GroupSpec, LabelShape};
use benchplot::styling::warn;

use super::{hint_input, load_sources, print_table, write_chart};
use crate::cli::ReportArgs;

const KIND: &str = "withload";
const GROUP: &str = "knitting: primes";
const DEFAULT_OUT: &str = "./charts";
const X_LABEL: &str = "Total threads (main + extra)";

pub(crate) fn group_set() -> Result<GroupSet, regex::Error> {
    Ok(GroupSet::new(LabelShape::Threads).group(GroupSpec::pattern(GROUP, r"^knitting:\s*primes")?))
}

/// Speedup over the single-thread baseline, keyed by total thread count.
///
/// `None` when there is no baseline. A non-positive time yields `NaN`.
pub(crate) fn speedup(times: &CountSeries) -> Option<CountSeries> {
    let t1 = *times.get(&1)?;
    Some(
        times
            .iter()
            .map(|(n, tn)| (*n, if *tn > 0.0 { t1 / tn } else { f64::NAN }))
            .collect(),
    )
}

/// Parallel efficiency in percent: speedup divided by thread count.
pub(crate) fn efficiency(speedup: &CountSeries) -> CountSeries {
    speedup
        .iter()
        .map(|(n, s)| (*n, s / *n as f64 * 100.0))
        .collect()
}

struct Scaling<'a> {
    name: &'a str,
    index: usize,
    speedup: CountSeries,
    efficiency: CountSeries,
}

pub(crate) fn handle_withload(args: &ReportArgs, config: &ChartConfig) -> anyhow::Result<()> {
    let loaded = load_sources(&args.input, config, KIND, &group_set()?);

    let runs: Vec<Scaling<'_>> = loaded
        .iter()
        .filter_map(|item| {
            let times = item.dataset.get(GROUP).and_then(|g| g.per_size())?;
            let Some(speedup) = speedup(times) else {
                warn(format!(
                    "{}: no 'main' baseline found (threads=1); skipping",
                    item.source.name
                ));
                return None;
            };
            Some(Scaling {
                name: &item.source.name,
                index: item.index,
                efficiency: efficiency(&speedup),
                speedup,
            })
        })
        .collect();

    if runs.is_empty() {
        warn("No speedup data to plot");
        if loaded.is_empty() {
            hint_input();
        }
        return Ok(());
    }

    let out = args.out_or(DEFAULT_OUT);
    let charts = [
        (compose_speedup(&runs, config), "withload_speedup.png"),
        (compose_efficiency(&runs, config), "withload_efficiency.png"),
    ];
    for (request, file) in &charts {
        if args.table {
            print_table(request, X_LABEL);
        }
        write_chart(request, config, &out.join(file))?;
    }
    Ok(())
}

/// Lines over the union of thread counts; `series` picks the metric.
fn compose_lines(
    runs: &[Scaling<'_>],
    config: &ChartConfig,
    series: for<'r> fn(&'r Scaling<'_>) -> &'r CountSeries,
) -> (Vec<String>, Vec<u64>, Vec<LineSpec>) {
    let all: Vec<&CountSeries> = runs.iter().map(series).collect();
    let aligned = align_union(&all);
    let lines = runs
        .iter()
        .zip(aligned.values.iter())
        .map(|(run, values)| LineSpec {
            label: run.name.to_string(),
            values: values.clone(),
            color: config.theme.source_color(run.name, run.index),
            marker: MARKERS[run.index % MARKERS.len()],
            dash: DASHES[0],
        })
        .collect();
    (count_ticks(&aligned, ""), aligned.counts, lines)
}

fn compose_speedup(runs: &[Scaling<'_>], config: &ChartConfig) -> ChartRequest {
    let (ticks, threads, lines) = compose_lines(runs, config, |r| &r.speedup);
    let ideal = LineSpec {
        label: "Ideal linear".to_string(),
        values: threads.iter().map(|n| *n as f64).collect(),
        color: config.theme.reference,
        marker: Marker::Cross,
        dash: Dash::Dashed,
    };
    ChartRequest::new("With Load: Speedup vs Threads (primes benchmark)", ticks)
        .x_label(X_LABEL)
        .y_label("Speedup vs 1 thread (×)")
        .scale(Scale::Linear)
        .lines(lines)
        .line(ideal)
}

fn compose_efficiency(runs: &[Scaling<'_>], config: &ChartConfig) -> ChartRequest {
    let (ticks, _, lines) = compose_lines(runs, config, |r| &r.efficiency);
    ChartRequest::new("With Load: Efficiency vs Threads (primes benchmark)", ticks)
        .x_label(X_LABEL)
        .y_label("Parallel efficiency (%)")
        .scale(Scale::Linear)
        .lines(lines)
        .reference(ReferenceLine {
            value: 100.0,
            label: Some("100 %".to_string()),
        })
}
