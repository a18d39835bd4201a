//! Select command: one order search on the training part.

use anyhow::{Context, Result};
use tracing::info_span;

use kairos_arima::{OrderSearch, Visited};
use kairos_io::read_csv;
use kairos_series::split;

use crate::cli::SelectArgs;
use crate::compare_cmd::input_path;
use crate::config::KairosConfig;
use crate::convert;

/// One line per fitted candidate, in generation order. Failed fits show
/// `AIC=inf`.
pub fn trace_lines(visited: &[Visited]) -> Vec<String> {
    let mut ordered: Vec<&Visited> = visited.iter().collect();
    ordered.sort_by_key(|v| v.generation);
    ordered
        .into_iter()
        .map(|v| format!(" {:<28} : AIC={:.3}", v.model.to_string(), v.aic))
        .collect()
}

/// Run a single order search and print the selected model.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let config = KairosConfig::load(args.config.as_deref())?;
    let mut search_cfg = convert::build_search_config(&config.search, &config.fit)?;
    if args.trace {
        search_cfg = search_cfg.with_trace(true);
    }
    let period = args.period.unwrap_or(config.compare.period);
    let train_ratio = args.train_ratio.unwrap_or(config.split.train_ratio);

    let input = input_path(args.input, &config)?;
    let series = read_csv(&input, &convert::build_csv_config(&config.io))
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;
    let (train, _) = split(&series, train_ratio).context("failed to split series")?;

    let outcome = OrderSearch::new(search_cfg)
        .search(train.values(), args.seasonal, period)
        .context("order search failed")?;

    if args.trace {
        for line in trace_lines(&outcome.visited) {
            println!("{line}");
        }
    }
    println!("Selected: {}", outcome.model);
    println!("AIC:      {:.4}", outcome.aic);
    println!(
        "Searched: {} candidates in {} steps{}",
        outcome.visited.len(),
        outcome.steps,
        if outcome.hit_step_cap {
            " (step cap reached)"
        } else {
            ""
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_arima::{CandidateModel, Order, SeasonalOrder};

    fn visited(model: CandidateModel, aic: f64, generation: usize) -> Visited {
        Visited {
            model,
            aic,
            generation,
        }
    }

    #[test]
    fn trace_lists_every_candidate_in_generation_order() {
        let seasonal = CandidateModel::new(Order::new(1, 0, 0), Some(SeasonalOrder::new(0, 1, 1, 12)));
        let lines = trace_lines(&[
            visited(CandidateModel::arima(0, 0, 0), 412.25, 1),
            visited(seasonal, 398.5, 0),
            visited(CandidateModel::arima(2, 0, 2), f64::INFINITY, 2),
        ]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ARIMA(1,0,0)(0,1,1)[12]"));
        assert!(lines[0].ends_with("AIC=398.500"));
        assert!(lines[1].contains("ARIMA(0,0,0)"));
        assert!(lines[1].ends_with("AIC=412.250"));
        assert!(lines[2].ends_with("AIC=inf"));
    }

    #[test]
    fn empty_trace_prints_nothing() {
        assert!(trace_lines(&[]).is_empty());
    }
}
