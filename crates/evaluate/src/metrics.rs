//! Point forecast accuracy metrics.

use crate::error::EvaluateError;

/// Guards the MAPE denominator against zero truth values.
pub const MAPE_EPSILON: f64 = 1e-9;

fn check(truth: &[f64], forecast: &[f64]) -> Result<(), EvaluateError> {
    if truth.len() != forecast.len() {
        return Err(EvaluateError::LengthMismatch {
            truth: truth.len(),
            forecast: forecast.len(),
        });
    }
    if truth.is_empty() {
        return Err(EvaluateError::EmptyInput);
    }
    Ok(())
}

/// Root mean squared error, `sqrt(mean((truth - forecast)^2))`.
///
/// # Errors
///
/// [`EvaluateError::LengthMismatch`] if the slices differ in length,
/// [`EvaluateError::EmptyInput`] if both are empty.
pub fn rmse(truth: &[f64], forecast: &[f64]) -> Result<f64, EvaluateError> {
    check(truth, forecast)?;
    let sse: f64 = truth
        .iter()
        .zip(forecast)
        .map(|(t, f)| (t - f) * (t - f))
        .sum();
    Ok((sse / truth.len() as f64).sqrt())
}

/// Mean absolute percentage error in percent,
/// `mean(|truth - forecast| / (|truth| + 1e-9)) * 100`.
///
/// Near-zero truth values produce very large but finite terms.
///
/// # Errors
///
/// Same as [`rmse`].
pub fn mape(truth: &[f64], forecast: &[f64]) -> Result<f64, EvaluateError> {
    check(truth, forecast)?;
    let total: f64 = truth
        .iter()
        .zip(forecast)
        .map(|(t, f)| (t - f).abs() / (t.abs() + MAPE_EPSILON))
        .sum();
    Ok(total / truth.len() as f64 * 100.0)
}
