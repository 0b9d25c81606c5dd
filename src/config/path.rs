//! Config file location.
//!
//! Priority:
//! 1. `--config <path>`
//! 2. `BENCHPLOT_CONFIG_PATH`
//! 3. Platform config directory (`~/.config/benchplot/config.toml` on Linux)

use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};

pub const CONFIG_PATH_ENV: &str = "BENCHPLOT_CONFIG_PATH";

/// Where the config file is expected, and whether the user asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Set only for `--config`. The environment variable is not explicit: it is
    /// commonly pointed at a not-yet-existing file for isolation in CI.
    pub explicit: bool,
}

/// Resolve the config location from the CLI flag and the environment.
pub fn config_location(cli: Option<&Path>) -> Option<ConfigLocation> {
    resolve(cli, std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

fn resolve(cli: Option<&Path>, env: Option<PathBuf>) -> Option<ConfigLocation> {
    if let Some(path) = cli {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Some(ConfigLocation {
            path,
            explicit: false,
        });
    }

    // XDG on Linux and macOS, %APPDATA% on Windows
    let strategy = choose_base_strategy().ok()?;
    Some(ConfigLocation {
        path: strategy.config_dir().join("benchplot").join("config.toml"),
        explicit: false,
    })
}
