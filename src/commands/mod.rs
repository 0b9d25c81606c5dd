pub(crate) mod ipc;
pub(crate) mod latency;
mod montage;
pub(crate) mod types;
pub(crate) mod withload;

pub(crate) use ipc::handle_ipc;
pub(crate) use latency::{Overlay, handle_overlay};
pub(crate) use montage::handle_montage;
pub(crate) use types::handle_types;
pub(crate) use withload::handle_withload;

use std::path::{Path, PathBuf};

use benchplot::chart::{ChartRequest, render_png};
use benchplot::config::{ChartConfig, SourceConfig};
use benchplot::document::load_file;
use benchplot::error::ReportError;
use benchplot::extract::{Dataset, GroupSet, extract};
use benchplot::locate::resolve_source_path;
use benchplot::path::format_path_for_display;
use benchplot::styling::{eprintln, hint, success, warn};
use benchplot::table::{self, Column};

/// One source's results, extracted.
pub(crate) struct Loaded<'a> {
    pub source: &'a SourceConfig,
    /// Position in the configured source list; drives markers and colors.
    pub index: usize,
    pub path: PathBuf,
    pub dataset: Dataset,
}

/// Load `<slug>_<kind>.json` for every configured source.
///
/// Sources that are missing, malformed or empty are warned about and left
/// out; the rest of the batch continues.
pub(crate) fn load_sources<'a>(
    input: &Path,
    config: &'a ChartConfig,
    kind: &str,
    groups: &GroupSet,
) -> Vec<Loaded<'a>> {
    config
        .sources
        .iter()
        .enumerate()
        .filter_map(|(index, source)| {
            let file_name = source.file_name(kind);
            match load_one(input, source, &file_name, groups) {
                Ok((path, dataset)) => Some(Loaded {
                    source,
                    index,
                    path,
                    dataset,
                }),
                Err(err) => {
                    warn_skip(&err, &source.name);
                    None
                }
            }
        })
        .collect()
}

fn load_one(
    input: &Path,
    source: &SourceConfig,
    file_name: &str,
    groups: &GroupSet,
) -> Result<(PathBuf, Dataset), ReportError> {
    let path = resolve_source_path(input, source, file_name)?;
    let dataset = extract(&load_file(&path)?, groups);
    if dataset.is_empty() {
        return Err(ReportError::EmptyResult {
            what: file_name.to_string(),
        });
    }
    Ok((path, dataset))
}

/// Hint printed when a report found no result files at all.
pub(crate) fn hint_input() {
    hint("Pass the results directory with --input");
}

/// Warn that something was skipped because of `err`.
pub(crate) fn warn_skip(err: &ReportError, what: &str) {
    match err {
        ReportError::MissingInput { file, searched } => warn(format!(
            "Missing {file} under {}, skipping {what}",
            format_path_for_display(searched)
        )),
        other => warn(format!("{}, skipping {what}", capitalize(&other.to_string()))),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a chart, or warn and skip it when it has nothing to draw.
///
/// Returns whether a file was written.
pub(crate) fn write_chart(
    request: &ChartRequest,
    config: &ChartConfig,
    path: &Path,
) -> anyhow::Result<bool> {
    if request.is_blank() {
        warn_skip(
            &ReportError::EmptyResult {
                what: request.title.clone(),
            },
            &format_path_for_display(path),
        );
        return Ok(false);
    }
    render_png(request, config, path)?;
    success(format!("Wrote {}", format_path_for_display(path)));
    Ok(true)
}

/// Print the lines of a chart as a table on stderr.
pub(crate) fn print_table(request: &ChartRequest, x_header: &str) {
    let columns: Vec<Column> = request
        .lines
        .iter()
        .map(|line| Column::new(line.label.clone(), line.values.clone()))
        .collect();
    let title = if request.y_label.is_empty() {
        request.title.clone()
    } else {
        format!("{} [{}]", request.title, request.y_label)
    };
    eprintln!(
        "{}",
        table::render(&title, x_header, &request.ticks, &columns)
    );
}

#[cfg(test)]
mod tests {
    use benchplot::extract::LabelShape;

    use super::*;

    #[test]
    fn test_load_sources_skips_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let node_dir = dir.path().join("node");
        std::fs::create_dir_all(&node_dir).unwrap();
        std::fs::write(
            node_dir.join("node_ipc.json"),
            r#"{"worker": [{"name": "w (1)", "stats": {"avg": 5}}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("deno_ipc.json"), r#"{"other": []}"#).unwrap();
        std::fs::write(dir.path().join("bun_ipc.json"), "not json").unwrap();

        let config = ChartConfig::default();
        let groups = GroupSet::exact(LabelShape::Count, ["worker"]);
        let loaded = load_sources(dir.path(), &config, "ipc", &groups);

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source.name, "Node.js");
        assert_eq!(loaded[0].index, 0);
        assert_eq!(loaded[0].path, node_dir.join("node_ipc.json"));
    }

    #[test]
    fn test_blank_chart_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        let request = ChartRequest::new("nothing", vec![]);
        assert!(!write_chart(&request, &ChartConfig::default(), &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("no usable data"), "No usable data");
        assert_eq!(capitalize(""), "");
    }
}
