use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Kairos configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KairosConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Train/test split settings.
    #[serde(default)]
    pub split: SplitToml,

    /// Order search settings.
    #[serde(default)]
    pub search: SearchToml,

    /// Estimator settings.
    #[serde(default)]
    pub fit: FitToml,

    /// Comparison settings.
    #[serde(default)]
    pub compare: CompareToml,
}

impl KairosConfig {
    /// Reads a config file, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    pub report: Option<PathBuf>,
    pub forecasts: Option<PathBuf>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            date_column: default_date_column(),
            value_column: default_value_column(),
            date_format: default_date_format(),
            report: None,
            forecasts: None,
        }
    }
}

fn default_date_column() -> String {
    "Date".to_string()
}
fn default_value_column() -> String {
    "Demand_rbc".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitToml {
    #[serde(default = "default_train_ratio")]
    pub train_ratio: f64,
}

impl Default for SplitToml {
    fn default() -> Self {
        Self {
            train_ratio: default_train_ratio(),
        }
    }
}

fn default_train_ratio() -> f64 {
    0.8
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchToml {
    #[serde(default = "default_bound")]
    pub max_p: usize,
    #[serde(default = "default_bound")]
    pub max_d: usize,
    #[serde(default = "default_bound")]
    pub max_q: usize,
    #[serde(default = "default_bound")]
    pub max_seasonal_p: usize,
    #[serde(default = "default_bound")]
    pub max_seasonal_d: usize,
    #[serde(default = "default_bound")]
    pub max_seasonal_q: usize,
    #[serde(default = "default_ceiling")]
    pub ceiling: usize,
    #[serde(default)]
    pub d: Option<usize>,
    #[serde(default)]
    pub seasonal_d: Option<usize>,
    /// `[p, q, P, Q]` starting points.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<[usize; 4]>,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_kpss_critical_value")]
    pub kpss_critical_value: f64,
    #[serde(default = "default_seasonal_strength_threshold")]
    pub seasonal_strength_threshold: f64,
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub trace: bool,
}

impl Default for SearchToml {
    fn default() -> Self {
        Self {
            max_p: default_bound(),
            max_d: default_bound(),
            max_q: default_bound(),
            max_seasonal_p: default_bound(),
            max_seasonal_d: default_bound(),
            max_seasonal_q: default_bound(),
            ceiling: default_ceiling(),
            d: None,
            seasonal_d: None,
            seeds: default_seeds(),
            max_steps: default_max_steps(),
            kpss_critical_value: default_kpss_critical_value(),
            seasonal_strength_threshold: default_seasonal_strength_threshold(),
            parallel: true,
            trace: false,
        }
    }
}

fn default_bound() -> usize {
    10
}
fn default_ceiling() -> usize {
    5
}
fn default_seeds() -> Vec<[usize; 4]> {
    vec![[2, 2, 1, 1], [0, 0, 0, 0], [1, 0, 1, 0], [0, 1, 0, 1]]
}
fn default_max_steps() -> usize {
    100
}
fn default_kpss_critical_value() -> f64 {
    0.463
}
fn default_seasonal_strength_threshold() -> f64 {
    0.64
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default)]
    pub include_mean: Option<bool>,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            include_mean: None,
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
        }
    }
}

fn default_max_iters() -> u64 {
    1000
}
fn default_sd_tolerance() -> f64 {
    1e-8
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareToml {
    #[serde(default = "default_period")]
    pub period: usize,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for CompareToml {
    fn default() -> Self {
        Self {
            period: default_period(),
            parallel: true,
        }
    }
}

fn default_period() -> usize {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: KairosConfig = toml::from_str("").unwrap();
        assert!(config.io.input.is_none());
        assert_eq!(config.io.value_column, "Demand_rbc");
        assert_eq!(config.split.train_ratio, 0.8);
        assert_eq!(config.search.max_p, 10);
        assert_eq!(config.search.ceiling, 5);
        assert_eq!(config.search.seeds.len(), 4);
        assert_eq!(config.fit.max_iters, 1000);
        assert_eq!(config.compare.period, 12);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: KairosConfig = toml::from_str(
            r#"
            [io]
            input = "rbc_data.csv"

            [search]
            ceiling = 3
            seeds = [[1, 1, 0, 0]]
            d = 1

            [compare]
            period = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.io.input, Some(PathBuf::from("rbc_data.csv")));
        assert_eq!(config.io.date_column, "Date");
        assert_eq!(config.search.ceiling, 3);
        assert_eq!(config.search.seeds, vec![[1, 1, 0, 0]]);
        assert_eq!(config.search.d, Some(1));
        assert_eq!(config.search.max_steps, 100);
        assert_eq!(config.compare.period, 4);
        assert!(config.compare.parallel);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<KairosConfig>("[search]\nmax_order = 3\n").unwrap_err();
        assert!(err.to_string().contains("max_order"));
    }

    #[test]
    fn load_without_path_is_default() {
        let config = KairosConfig::load(None).unwrap();
        assert_eq!(config.split.train_ratio, 0.8);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kairos.toml");
        std::fs::write(&path, "[split]\ntrain_ratio = 0.7\n").unwrap();
        let config = KairosConfig::load(Some(&path)).unwrap();
        assert_eq!(config.split.train_ratio, 0.7);
    }

    #[test]
    fn sample_config_parses() {
        let config: KairosConfig =
            toml::from_str(include_str!("../kairos.toml")).unwrap();
        assert_eq!(config.io.input, Some(PathBuf::from("rbc_data.csv")));
        assert_eq!(config.search.seeds[0], [2, 2, 1, 1]);
        assert_eq!(config.fit.sd_tolerance, 1e-8);
        assert_eq!(config.compare.period, 12);
    }

    #[test]
    fn load_missing_file_has_context() {
        let err = KairosConfig::load(Some(Path::new("/nonexistent/kairos.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
