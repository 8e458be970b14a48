//! Analytics configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::{BandThresholds, DistributionOptions};
use crate::insights::{InsightThresholds, DEFAULT_MAX_INSIGHTS};
use crate::quality::QualityChecks;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "resultlens.toml";

/// Top-level resultlens configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Number of histogram bins.
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,
    /// Insights kept after sorting.
    #[serde(default = "default_max_insights")]
    pub max_insights: usize,
    /// Record fields correlated when none are given on the command line.
    #[serde(default = "default_correlation_variables")]
    pub correlation_variables: Vec<String>,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Low / medium / high performance band boundaries.
    #[serde(default)]
    pub bands: BandThresholds,
    /// Cut-offs for the insight rules.
    #[serde(default)]
    pub insights: InsightThresholds,
    /// Fields checked by the data-quality scorer.
    #[serde(default)]
    pub quality: QualityChecks,
}

fn default_bins() -> usize {
    10
}
fn default_max_insights() -> usize {
    DEFAULT_MAX_INSIGHTS
}
fn default_correlation_variables() -> Vec<String> {
    vec!["percentage".to_string(), "cgpa".to_string()]
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./resultlens-output")
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            histogram_bins: default_bins(),
            max_insights: default_max_insights(),
            correlation_variables: default_correlation_variables(),
            output_dir: default_output_dir(),
            bands: BandThresholds::default(),
            insights: InsightThresholds::default(),
            quality: QualityChecks::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn distribution_options(&self) -> DistributionOptions {
        DistributionOptions {
            bins: self.histogram_bins,
            bands: self.bands,
        }
    }

    /// Render as TOML, for writing a starter config.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `resultlens.toml` in the current directory
/// 2. `~/.config/resultlens/config.toml`
///
/// Environment variable overrides: `RESULTLENS_BINS`, `RESULTLENS_MAX_INSIGHTS`.
pub fn load_config() -> Result<AnalyticsConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AnalyticsConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AnalyticsConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut AnalyticsConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(bins) = parse_override(&lookup, "RESULTLENS_BINS") {
        config.histogram_bins = bins;
    }
    if let Some(max) = parse_override(&lookup, "RESULTLENS_MAX_INSIGHTS") {
        config.max_insights = max;
    }
}

fn parse_override(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(name, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("resultlens"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.max_insights, 6);
        assert_eq!(config.bands.low, 40.0);
        assert_eq!(config.insights.target_pass_rate, 70.0);
        assert_eq!(config.correlation_variables, vec!["percentage", "cgpa"]);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
histogram_bins = 20
correlation_variables = ["percentage", "cgpa", "attendance"]

[bands]
medium = 65.0

[insights]
backlog_rate = 10.0
"#;
        let config: AnalyticsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.bands.low, 40.0);
        assert_eq!(config.bands.medium, 65.0);
        assert_eq!(config.insights.backlog_rate, 10.0);
        assert_eq!(config.insights.excellent_pass_rate, 90.0);
        assert_eq!(config.correlation_variables.len(), 3);
        assert_eq!(config.quality, QualityChecks::default());
    }

    #[test]
    fn starter_toml_round_trips() {
        let config = AnalyticsConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: AnalyticsConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/resultlens.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "max_insights = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_insights, 3);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "histogram_bins = \"many\"\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AnalyticsConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            "RESULTLENS_BINS" => Some("25".into()),
            "RESULTLENS_MAX_INSIGHTS" => Some("not-a-number".into()),
            _ => None,
        });
        assert_eq!(config.histogram_bins, 25);
        assert_eq!(config.max_insights, 6);
    }
}
