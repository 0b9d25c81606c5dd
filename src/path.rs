use std::path::{Path, PathBuf};

/// Get the user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    home::home_dir()
}

/// Format a filesystem path for user-facing output.
///
/// Replaces home directory prefix with `~` (e.g., `/Users/alex/results/node_ipc.json`
/// -> `~/results/node_ipc.json`). Paths outside home are returned unchanged.
pub fn format_path_for_display(path: &Path) -> String {
    if let Some(home) = home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }

        let mut display_path = PathBuf::from("~");
        display_path.push(stripped);
        return display_path.display().to_string();
    }

    path.display().to_string()
}

/// File name without directory or extension (`results/node_ipc.json` -> `node_ipc`).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether `out` names an image file rather than a directory.
pub fn is_png_path(out: &Path) -> bool {
    out.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Where to write the chart for a single input document.
///
/// An `out` ending in `.png` is used verbatim; anything else is treated as a
/// directory and receives `<input stem>.png`.
pub fn chart_path_for(input: &Path, out: &Path) -> PathBuf {
    if is_png_path(out) {
        out.to_path_buf()
    } else {
        out.join(format!("{}.png", file_stem(input)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn shortens_path_under_home() {
        let Some(home) = home_dir() else {
            // Skip if HOME/USERPROFILE is not set in the environment
            return;
        };

        let path = home.join("results").join("node_ipc.json");
        let formatted = format_path_for_display(&path);

        assert!(
            formatted.starts_with("~"),
            "Expected tilde prefix, got {formatted}"
        );
        assert!(formatted.ends_with("node_ipc.json"));
    }

    #[test]
    fn leaves_non_home_paths_unchanged() {
        let path = PathBuf::from("/tmp/benchplot-non-home-path");
        assert_eq!(format_path_for_display(&path), path.display().to_string());
    }

    #[test]
    fn chart_path_uses_png_verbatim() {
        let out = chart_path_for(Path::new("r/node_ipc.json"), Path::new("charts/x.PNG"));
        assert_eq!(out, PathBuf::from("charts/x.PNG"));
    }

    #[test]
    fn chart_path_joins_directory() {
        let out = chart_path_for(Path::new("r/deno_ipc.json"), Path::new("charts"));
        assert_eq!(out, PathBuf::from("charts/deno_ipc.png"));
    }
}
