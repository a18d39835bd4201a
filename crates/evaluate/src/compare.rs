//! ARIMA vs SARIMA comparison pipeline.

use kairos_arima::{ArimaError, CandidateModel, OrderSearch, SearchOutcome};
use kairos_series::TimeSeries;
use tracing::info;

use crate::config::CompareConfig;
use crate::error::EvaluateError;
use crate::metrics::{mape, rmse};
use crate::output::{ComparisonTable, ScoreRow};

/// Label of the non-seasonal row.
pub const ARIMA_LABEL: &str = "ARIMA";
/// Label of the seasonal row.
pub const SARIMA_LABEL: &str = "SARIMA";

/// One model family's selection and forecast.
#[derive(Debug, Clone)]
pub struct ModelRun {
    /// Selected model.
    pub model: CandidateModel,
    /// Training AIC reported by the search.
    pub aic: f64,
    /// Forecast aligned with the test timestamps.
    pub forecast: TimeSeries,
    /// Number of candidates the search fitted.
    pub candidates: usize,
}

/// Output of [`compare_models`].
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Score rows in `ARIMA`, `SARIMA` order.
    pub table: ComparisonTable,
    /// Non-seasonal run.
    pub arima: ModelRun,
    /// Seasonal run.
    pub sarima: ModelRun,
}

/// Select, fit, forecast and score ARIMA and SARIMA on a train/test split.
///
/// Both searches run on the training values only. Each selected model is
/// refitted on the full training data and forecast `test.len()` steps.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`EvaluateError::InvalidParameter`] | period below 2 |
/// | [`EvaluateError::Arima`] | invalid search config, search failure, or a refit that does not converge |
/// | [`EvaluateError::EmptyInput`] | `test` is empty |
#[tracing::instrument(skip_all, fields(train = train.len(), test = test.len()))]
pub fn compare_models(
    train: &TimeSeries,
    test: &TimeSeries,
    config: &CompareConfig,
) -> Result<Comparison, EvaluateError> {
    config.validate()?;
    if test.is_empty() {
        return Err(EvaluateError::EmptyInput);
    }

    let search = OrderSearch::new(config.search().clone());
    let values = train.values();
    let period = config.period();
    let (arima, sarima) = if config.parallel() {
        rayon::join(
            || search.search(values, false, period),
            || search.search(values, true, period),
        )
    } else {
        (
            search.search(values, false, period),
            search.search(values, true, period),
        )
    };
    let (arima, sarima) = (arima?, sarima?);

    let (arima_row, arima) = score(ARIMA_LABEL, &arima, train, test, config)?;
    let (sarima_row, sarima) = score(SARIMA_LABEL, &sarima, train, test, config)?;

    Ok(Comparison {
        table: ComparisonTable::new(vec![arima_row, sarima_row]),
        arima,
        sarima,
    })
}

fn score(
    label: &str,
    outcome: &SearchOutcome,
    train: &TimeSeries,
    test: &TimeSeries,
    config: &CompareConfig,
) -> Result<(ScoreRow, ModelRun), EvaluateError> {
    let model = outcome.model;
    let fit = model.fit_with(train.values(), &config.search().fit_options)?;
    if !fit.converged() {
        return Err(ArimaError::NonConvergence {
            model: model.to_string(),
            attempts: 1,
        }
        .into());
    }

    let predicted = fit.forecast(test.len()).into_values();
    let forecast = test.with_values(predicted)?;
    let row = ScoreRow {
        label: label.to_string(),
        order: model.order(),
        seasonal_order: model.seasonal_order(),
        aic: outcome.aic,
        rmse: rmse(test.values(), forecast.values())?,
        mape: mape(test.values(), forecast.values())?,
    };
    info!(
        label,
        model = %model,
        aic = row.aic,
        rmse = row.rmse,
        mape = row.mape,
        "model scored"
    );

    let run = ModelRun {
        model,
        aic: outcome.aic,
        forecast,
        candidates: outcome.visited.len(),
    };
    Ok((row, run))
}
