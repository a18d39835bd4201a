//! Compare command: ARIMA vs SARIMA on a chronological split.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use kairos_evaluate::compare_models;
use kairos_io::{read_csv, write_forecasts};
use kairos_series::split;

use crate::cli::CompareArgs;
use crate::config::KairosConfig;
use crate::convert;

/// Header line above the comparison table, e.g. `=== ARIMA vs SARIMA (80/20 Split) ===`.
pub fn header(train_ratio: f64) -> String {
    let train_pct = (train_ratio * 100.0).round();
    format!(
        "=== ARIMA vs SARIMA ({train_pct:.0}/{:.0} Split) ===",
        100.0 - train_pct
    )
}

/// Resolves the input path: CLI flag first, then `[io].input`.
pub fn input_path(cli: Option<PathBuf>, config: &KairosConfig) -> Result<PathBuf> {
    cli.or_else(|| config.io.input.clone())
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))
}

/// Run the comparison pipeline.
pub fn run(args: CompareArgs) -> Result<()> {
    let _cmd = info_span!("compare").entered();
    // 1. Load project TOML
    let config = KairosConfig::load(args.config.as_deref())?;
    let compare_cfg = convert::build_compare_config(&config)?;
    let train_ratio = args.train_ratio.unwrap_or(config.split.train_ratio);

    // 2. Read and split the series
    let input = input_path(args.input, &config)?;
    let series = read_csv(&input, &convert::build_csv_config(&config.io))
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;
    let (train, test) = split(&series, train_ratio).context("failed to split series")?;
    info!(train = train.len(), test = test.len(), "series split");

    // 3. Select, fit, forecast and score
    let comparison =
        compare_models(&train, &test, &compare_cfg).context("model comparison failed")?;

    println!("\n{}\n", header(train_ratio));
    print!("{}", comparison.table);

    // 4. Optional outputs
    if let Some(path) = args.output.or_else(|| config.io.report.clone()) {
        let json = comparison.table.to_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    if let Some(path) = args.forecasts.or_else(|| config.io.forecasts.clone()) {
        write_forecasts(
            &path,
            &train,
            &test,
            &comparison.arima.forecast,
            &comparison.sarima.forecast,
        )
        .with_context(|| format!("failed to write forecasts: {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_reflects_ratio() {
        assert_eq!(header(0.8), "=== ARIMA vs SARIMA (80/20 Split) ===");
        assert_eq!(header(0.75), "=== ARIMA vs SARIMA (75/25 Split) ===");
    }

    #[test]
    fn cli_input_wins_over_config() {
        let mut config = KairosConfig::default();
        config.io.input = Some(PathBuf::from("from_config.csv"));
        let path = input_path(Some(PathBuf::from("from_cli.csv")), &config).unwrap();
        assert_eq!(path, PathBuf::from("from_cli.csv"));
        let path = input_path(None, &config).unwrap();
        assert_eq!(path, PathBuf::from("from_config.csv"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = input_path(None, &KairosConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no input path"));
    }
}
