//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use kairos_arima::{FitOptions, SearchBounds, SearchConfig, Seed};
use kairos_evaluate::CompareConfig;
use kairos_io::CsvConfig;

/// Builds a [`CsvConfig`] from the TOML I/O configuration.
pub fn build_csv_config(io: &IoToml) -> CsvConfig {
    CsvConfig::default()
        .with_date_column(&io.date_column)
        .with_value_column(&io.value_column)
        .with_date_format(&io.date_format)
}

/// Builds [`FitOptions`] from the TOML estimator configuration.
pub fn build_fit_options(fit: &FitToml) -> Result<FitOptions> {
    if fit.max_iters == 0 {
        bail!("fit.max_iters must be at least 1");
    }
    if fit.sd_tolerance.is_nan() || fit.sd_tolerance <= 0.0 {
        bail!("fit.sd_tolerance must be positive, got {}", fit.sd_tolerance);
    }
    let mut options = FitOptions::default()
        .with_max_iters(fit.max_iters)
        .with_sd_tolerance(fit.sd_tolerance);
    if let Some(include) = fit.include_mean {
        options = options.with_include_mean(include);
    }
    Ok(options)
}

/// Builds a [`SearchConfig`] from the TOML search and estimator sections.
pub fn build_search_config(search: &SearchToml, fit: &FitToml) -> Result<SearchConfig> {
    let bounds = SearchBounds {
        max_p: search.max_p,
        max_d: search.max_d,
        max_q: search.max_q,
        max_seasonal_p: search.max_seasonal_p,
        max_seasonal_d: search.max_seasonal_d,
        max_seasonal_q: search.max_seasonal_q,
    };
    let seeds = search
        .seeds
        .iter()
        .map(|&[p, q, sp, sq]| Seed::new(p, q, sp, sq))
        .collect();
    let mut cfg = SearchConfig::default()
        .with_bounds(bounds)
        .with_ceiling(search.ceiling)
        .with_seeds(seeds)
        .with_max_steps(search.max_steps)
        .with_kpss_critical_value(search.kpss_critical_value)
        .with_seasonal_strength_threshold(search.seasonal_strength_threshold)
        .with_parallel(search.parallel)
        .with_trace(search.trace)
        .with_fit_options(build_fit_options(fit)?);
    if let Some(d) = search.d {
        cfg = cfg.with_d(d);
    }
    if let Some(seasonal_d) = search.seasonal_d {
        cfg = cfg.with_seasonal_d(seasonal_d);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`CompareConfig`] from the full TOML configuration.
pub fn build_compare_config(config: &KairosConfig) -> Result<CompareConfig> {
    let cfg = CompareConfig::default()
        .with_search(build_search_config(&config.search, &config.fit)?)
        .with_period(config.compare.period)
        .with_parallel(config.compare.parallel);
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let config = KairosConfig::default();
        let search = build_search_config(&config.search, &config.fit).unwrap();
        assert_eq!(search, SearchConfig::default());
        let compare = build_compare_config(&config).unwrap();
        assert_eq!(compare, CompareConfig::default());
        assert_eq!(build_csv_config(&config.io), CsvConfig::default());
    }

    #[test]
    fn overrides_flow_through() {
        let mut config = KairosConfig::default();
        config.search.ceiling = 2;
        config.search.d = Some(1);
        config.search.seeds = vec![[1, 0, 0, 0]];
        config.fit.include_mean = Some(false);
        config.compare.period = 4;

        let compare = build_compare_config(&config).unwrap();
        let search = compare.search();
        assert_eq!(search.ceiling, 2);
        assert_eq!(search.d, Some(1));
        assert_eq!(search.seeds, vec![Seed::new(1, 0, 0, 0)]);
        assert_eq!(search.fit_options.include_mean, Some(false));
        assert_eq!(compare.period(), 4);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = KairosConfig::default();
        config.search.max_steps = 0;
        assert!(build_compare_config(&config).is_err());

        let mut config = KairosConfig::default();
        config.compare.period = 1;
        assert!(build_compare_config(&config).is_err());

        let fit = FitToml {
            sd_tolerance: 0.0,
            ..FitToml::default()
        };
        assert!(build_fit_options(&fit).is_err());
    }

    #[test]
    fn csv_columns_flow_through() {
        let io = IoToml {
            value_column: "units".to_string(),
            ..IoToml::default()
        };
        assert_eq!(build_csv_config(&io).value_column(), "units");
    }
}
