//! Chart configuration.
//!
//! Everything here is optional; a missing config file means built-in
//! defaults. The loaded [`ChartConfig`] is passed by reference to every
//! report and never mutated.
//!
//! ```toml
//! width = 1600
//! display-unit = "us"
//!
//! [theme]
//! background = "#ffffff"
//!
//! [[sources]]
//! name = "Node.js"
//! slug = "node"
//! ```

mod path;

use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

pub use path::{CONFIG_PATH_ENV, ConfigLocation, config_location};

use crate::chart::theme::Theme;
use crate::units::TimeUnit;

/// One producer of result documents, such as a JavaScript runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Display name used in titles and legends.
    pub name: String,
    /// File prefix: `<slug>_<kind>.json`.
    pub slug: String,
    /// Directory name under the input root; defaults to the slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            dir: None,
        }
    }

    pub fn dir(&self) -> &str {
        self.dir.as_deref().unwrap_or(&self.slug)
    }

    /// Result file name for a benchmark kind (`ipc`, `latency`, ...).
    pub fn file_name(&self, kind: &str) -> String {
        format!("{}_{kind}.json", self.slug)
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("Node.js", "node"),
        SourceConfig::new("Deno", "deno"),
        SourceConfig::new("Bun", "bun"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChartConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Overrides the unit each report labels its latency axis in.
    pub display_unit: Option<TimeUnit>,
    /// Linear range around zero on symlog charts, in display units.
    pub symlog_threshold: f64,
    pub theme: Theme,
    pub sources: Vec<SourceConfig>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            display_unit: None,
            symlog_threshold: 1.0,
            theme: Theme::default(),
            sources: default_sources(),
        }
    }
}

impl ChartConfig {
    /// Load from the resolved config location.
    ///
    /// A missing file is only an error when it was named with `--config`.
    pub fn load(cli: Option<&Path>) -> anyhow::Result<Self> {
        let Some(location) = config_location(cli) else {
            log::debug!("No config directory available; using defaults");
            return Ok(Self::default());
        };

        if !location.path.exists() {
            if location.explicit {
                bail!("Config file not found: {}", location.path.display());
            }
            log::debug!(
                "No config at {}; using defaults",
                location.path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&location.path)
            .with_context(|| format!("Failed to read {}", location.path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse {}", location.path.display()))?;
        log::debug!("Loaded config from {}", location.path.display());
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("width and height must be positive");
        }
        if !(self.symlog_threshold.is_finite() && self.symlog_threshold > 0.0) {
            bail!("symlog-threshold must be a positive number");
        }
        if self.sources.is_empty() {
            bail!("at least one [[sources]] entry is required");
        }
        Ok(())
    }

    /// The report's default unit unless the config overrides it.
    pub fn unit_or(&self, default: TimeUnit) -> TimeUnit {
        self.display_unit.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::theme::Rgb;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ChartConfig::from_toml("").unwrap(), ChartConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ChartConfig::from_toml(
            r##"
width = 1600
display-unit = "us"
symlog-threshold = 10.0

[theme]
background = "#ffffff"
group-colors = { knitting = "#000000" }

[[sources]]
name = "Workerd"
slug = "workerd"
dir = "cf"
"##,
        )
        .unwrap();

        assert_eq!(config.width, 1600);
        assert_eq!(config.height, 960);
        assert_eq!(config.display_unit, Some(TimeUnit::Us));
        assert_eq!(config.unit_or(TimeUnit::Ns), TimeUnit::Us);
        assert_eq!(config.theme.background, Rgb(255, 255, 255));
        assert_eq!(config.theme.group_color("knitting", 0), Rgb(0, 0, 0));
        // Untouched theme fields keep their defaults
        assert_eq!(config.theme.text, Theme::default().text);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].dir(), "cf");
        assert_eq!(config.sources[0].file_name("ipc"), "workerd_ipc.json");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(ChartConfig::from_toml("width = 0").is_err());
        assert!(ChartConfig::from_toml("symlog-threshold = -1.0").is_err());
        assert!(ChartConfig::from_toml("sources = []").is_err());
        assert!(ChartConfig::from_toml("display-unit = \"weeks\"").is_err());
        assert!(ChartConfig::from_toml("[theme]\nbackground = \"blue\"").is_err());
        assert!(ChartConfig::from_toml("colour = 1").is_err());
    }

    #[test]
    fn test_source_dir_defaults_to_slug() {
        assert_eq!(SourceConfig::new("Deno", "deno").dir(), "deno");
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChartConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "height = 500\n").unwrap();
        assert_eq!(ChartConfig::load(Some(&path)).unwrap().height, 500);

        std::fs::write(&path, "height = \"tall\"\n").unwrap();
        let err = ChartConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }
}
