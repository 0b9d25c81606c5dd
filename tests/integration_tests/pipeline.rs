//! Load, extract and align result files from disk, the way reports do.

use benchplot::align::{Alignment, align, align_union, category_axis};
use benchplot::chart::compose::{ColorBy, SeriesKey, count_ticks, overlay_lines};
use benchplot::config::{ChartConfig, SourceConfig};
use benchplot::document::load_file;
use benchplot::extract::{CountSeries, GroupSet, GroupSpec, LabelShape, extract};
use benchplot::locate::{files_with_suffix, resolve_source_path, source_title_from_path};
use benchplot::units::TimeUnit;
use rstest::rstest;
use serde_json::json;

use crate::common::{Results, results, row};

fn latency_groups() -> GroupSet {
    GroupSet::exact(LabelShape::Count, ["worker", "knitting"])
}

#[rstest]
fn test_sources_align_on_shared_counts(results: Results) {
    results.write(
        "ms/node/node_latency.json",
        &format!(
            "clk: ~3.1 GHz\ncpu: test\n\n{}",
            json!({
                "worker": [row("worker -> (1)", "2 us"), row("worker -> (10)", "4 us")],
                "knitting": [row("knitting -> (1)", 500), row("knitting -> (10)", 900)],
            })
        ),
    );
    results.write_json(
        "deno_latency.json",
        &json!([
            {"worker": [row("worker → 10", "1.5 ms"), row("worker → 100", "3 ms")]},
            {"knitting": [row("knitting → 10", 700), row("knitting → 100", 800)]},
        ]),
    );

    let node = SourceConfig::new("Node.js", "node");
    let deno = SourceConfig::new("Deno", "deno");
    let mut series: Vec<CountSeries> = Vec::new();
    for source in [&node, &deno] {
        let path = resolve_source_path(results.path(), source, &source.file_name("latency"))
            .unwrap();
        let dataset = extract(&load_file(&path).unwrap(), &latency_groups());
        for group in ["worker", "knitting"] {
            series.push(dataset.get(group).unwrap().per_size().unwrap().clone());
        }
    }

    let refs: Vec<&CountSeries> = series.iter().collect();
    let aligned = align(&refs);
    assert_eq!(aligned.alignment, Alignment::SharedCounts);
    assert_eq!(aligned.counts, vec![10]);
    assert_eq!(
        aligned.values,
        vec![vec![4_000.0], vec![900.0], vec![1_500_000.0], vec![700.0]]
    );
    assert_eq!(count_ticks(&aligned, " msgs"), vec!["10 msgs"]);

    let keys = [
        SeriesKey::new("Node.js", 0, "Worker", 0),
        SeriesKey::new("Node.js", 0, "Knitting", 1),
        SeriesKey::new("Deno", 1, "Worker", 0),
        SeriesKey::new("Deno", 1, "Knitting", 1),
    ];
    let config = ChartConfig::default();
    let lines = overlay_lines(&aligned, &keys, TimeUnit::Us, &config.theme, ColorBy::Source);
    let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Node.js Worker", "Node.js Knitting", "Deno Worker", "Deno Knitting"]
    );
    assert_eq!(lines[2].values, vec![1_500.0]);
}

#[rstest]
fn test_disjoint_counts_fall_back_to_positions(results: Results) {
    let path = results.write_json(
        "results/bun_multi.json",
        &json!({
            "worker": [row("worker (1)", 10), row("worker (2)", 20)],
            "knitting": [row("knitting (5)", 1), row("knitting (6)", 2), row("knitting (7)", 3)],
        }),
    );

    let dataset = extract(&load_file(&path).unwrap(), &latency_groups());
    let worker = dataset.get("worker").unwrap().per_size().unwrap();
    let knitting = dataset.get("knitting").unwrap().per_size().unwrap();

    let aligned = align(&[worker, knitting]);
    assert!(aligned.is_degraded());
    assert_eq!(aligned.values, vec![vec![10.0, 20.0], vec![1.0, 2.0]]);
    assert_eq!(count_ticks(&aligned, " msgs"), vec!["#1", "#2"]);

    let union = align_union(&[worker, knitting]);
    assert_eq!(union.counts, vec![1, 2, 5, 6, 7]);
    assert!(union.values[0][2].is_nan());
}

#[rstest]
fn test_types_files_are_discovered_and_titled(results: Results) {
    results.write_json(
        "results/node_types.json",
        &json!({
            "worker": [row("string -> (1)", 10), row("number -> (1)", 5)],
            "knitting fast (inline)": [row("string -> (1)", 3), row("bigint -> (1)", 4)],
        }),
    );
    results.write_json("results/workerd_types.json", &json!({}));
    results.write("results/notes.txt", "not a result");

    let files = files_with_suffix(&results.path().join("results"), "_types.json").unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["node_types.json", "workerd_types.json"]);

    let sources = ChartConfig::default().sources;
    assert_eq!(source_title_from_path(&files[0], &sources), "Node.js");
    assert_eq!(source_title_from_path(&files[1], &sources), "Workerd Types");

    let set = GroupSet::new(LabelShape::Typed)
        .group(GroupSpec::prefix("knitting fast"))
        .group(GroupSpec::prefix("knitting"))
        .group(GroupSpec::prefix("worker"));
    let dataset = extract(&load_file(&files[0]).unwrap(), &set);
    let at_one: Vec<_> = ["worker", "knitting fast"]
        .iter()
        .map(|g| dataset.get(g).unwrap().at_count(1))
        .collect();

    let axis = category_axis(&["number", "string"], &at_one);
    assert_eq!(axis, ["number", "string", "bigint"]);
    assert!(dataset.get("knitting").is_none());
}
