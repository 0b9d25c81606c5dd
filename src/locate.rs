//! Result file lookup under an input directory.

use std::path::{Path, PathBuf};

use crate::chart::compose::display_name;
use crate::config::SourceConfig;
use crate::error::ReportError;

/// Candidate locations for a source's result file, in lookup order.
pub fn candidates(input: &Path, source: &SourceConfig, file_name: &str) -> [PathBuf; 4] {
    let dir = source.dir();
    [
        input.join("ms").join(dir).join(file_name),
        input.join("json").join(dir).join(file_name),
        input.join(dir).join(file_name),
        input.join(file_name),
    ]
}

/// First existing candidate for a source's result file.
pub fn resolve_source_path(
    input: &Path,
    source: &SourceConfig,
    file_name: &str,
) -> Result<PathBuf, ReportError> {
    let found = candidates(input, source, file_name)
        .into_iter()
        .find(|path| path.is_file());
    match found {
        Some(path) => {
            log::debug!("{}: using {}", source.name, path.display());
            Ok(path)
        }
        None => Err(ReportError::MissingInput {
            file: file_name.to_string(),
            searched: input.to_path_buf(),
        }),
    }
}

/// Source name for a result file given directly on the command line.
///
/// `node_ipc.json` maps to the configured `Node.js`; unknown prefixes are
/// title-cased from the file stem (`workerd_ipc` -> `Workerd Ipc`).
pub fn source_title_from_path(path: &Path, sources: &[SourceConfig]) -> String {
    let stem = crate::path::file_stem(path).to_lowercase();
    if let Some(source) = sources
        .iter()
        .find(|s| stem.starts_with(&format!("{}_", s.slug.to_lowercase())))
    {
        return source.name.clone();
    }
    display_name(&stem.replace('_', " "))
}

/// Files in `dir` (not recursive) whose name ends with `suffix`, sorted.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let node = SourceConfig::new("Node.js", "node");

        touch(&root.join("node_ipc.json"));
        assert_eq!(
            resolve_source_path(root, &node, "node_ipc.json").unwrap(),
            root.join("node_ipc.json")
        );

        touch(&root.join("node").join("node_ipc.json"));
        touch(&root.join("json").join("node").join("node_ipc.json"));
        assert_eq!(
            resolve_source_path(root, &node, "node_ipc.json").unwrap(),
            root.join("json").join("node").join("node_ipc.json")
        );

        touch(&root.join("ms").join("node").join("node_ipc.json"));
        assert_eq!(
            resolve_source_path(root, &node, "node_ipc.json").unwrap(),
            root.join("ms").join("node").join("node_ipc.json")
        );
    }

    #[test]
    fn test_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SourceConfig::new("Workerd", "workerd");
        source.dir = Some("cf".into());
        touch(&dir.path().join("cf").join("workerd_ipc.json"));
        assert!(resolve_source_path(dir.path(), &source, "workerd_ipc.json").is_ok());
    }

    #[test]
    fn test_missing_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_source_path(dir.path(), &SourceConfig::new("Bun", "bun"), "bun_ipc.json")
            .unwrap_err();
        assert!(
            matches!(err, ReportError::MissingInput { ref file, .. } if file == "bun_ipc.json")
        );
    }

    #[rstest]
    #[case("results/node_ipc.json", "Node.js")]
    #[case("BUN_ipc.json", "Bun")]
    #[case("workerd_ipc.json", "Workerd Ipc")]
    #[case("deno.json", "Deno")]
    fn test_source_title_from_path(#[case] path: &str, #[case] expected: &str) {
        let sources = [
            SourceConfig::new("Node.js", "node"),
            SourceConfig::new("Bun", "bun"),
        ];
        assert_eq!(source_title_from_path(Path::new(path), &sources), expected);
    }

    #[test]
    fn test_files_with_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("node_types.json"));
        touch(&dir.path().join("bun_types.json"));
        touch(&dir.path().join("bun_ipc.json"));
        touch(&dir.path().join("nested").join("deno_types.json"));
        let files = files_with_suffix(dir.path(), "_types.json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["bun_types.json", "node_types.json"]);
    }
}
