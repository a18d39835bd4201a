//! Recursive multi-step point forecasts.

use tracing::debug;

use crate::diff;
use crate::fit::FitResult;

/// Point forecasts for consecutive future steps.
///
/// Owns no reference back to the model that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    values: Vec<f64>,
}

impl Forecast {
    /// Predicted values, one per step.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Forecast horizon.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` for a zero-step forecast.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the forecast, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Produces `horizon` point forecasts from a fitted model.
///
/// The final predicted state is propagated with no new observations, so
/// each step treats the previous predictions as realized. The intercept is
/// added back on the differenced scale, then the differencing is undone by
/// recursion over `(1 - B)^d (1 - B^m)^D` seeded with the training tail.
/// The state covariance is propagated alongside.
///
/// ```ignore
/// let fit = CandidateModel::arima(1, 0, 0).fit(&data)?;
/// let fc = forecast(&fit, 12);
/// assert_eq!(fc.len(), 12);
/// ```
pub fn forecast(fit: &FitResult, horizon: usize) -> Forecast {
    let (diffed, variances) = propagate(fit, horizon);
    if let Some(last) = variances.last() {
        debug!(horizon, variance = last, "forecast state propagated");
    }
    let values = diff::integrate(
        &diffed,
        &fit.differencing.history,
        &fit.differencing.poly,
    );
    Forecast { values }
}

/// Forecasts on the differenced scale with their prediction-error variances.
fn propagate(fit: &FitResult, horizon: usize) -> (Vec<f64>, Vec<f64>) {
    let ss = &fit.state_space;
    let mean = fit.intercept().unwrap_or(0.0);
    let mut a = fit.filter.state.clone();
    let mut p = fit.filter.covariance.clone();
    let mut values = Vec::with_capacity(horizon);
    let mut variances = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        values.push(a[0] + mean);
        variances.push(fit.sigma2() * p[[0, 0]]);
        a = ss.predict_state(&a);
        p = ss.predict_covariance(&p);
    }
    (values, variances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CandidateModel, Order, SeasonalOrder};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};
    use std::f64::consts::PI;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| {
                let t = t as f64;
                50.0 + 5.0 * (2.0 * PI * t / 12.0).sin() + (1.7 * t).sin()
            })
            .collect()
    }

    /// ARMA(1,1) with phi = 0.5, theta = 0.3 around a level of 20.
    fn arma11(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut prev_y = 0.0;
        let mut prev_e = 0.0;
        (0..n)
            .map(|_| {
                let e = normal.sample(&mut rng);
                let y = 0.5 * prev_y + e + 0.3 * prev_e;
                prev_y = y;
                prev_e = e;
                20.0 + y
            })
            .collect()
    }

    #[test]
    fn zero_horizon_is_empty() {
        let fit = CandidateModel::arima(1, 0, 0).fit(&wave(60)).unwrap();
        let fc = forecast(&fit, 0);
        assert!(fc.is_empty());
        assert_eq!(fc.len(), 0);
    }

    #[test]
    fn horizon_length() {
        let fit = CandidateModel::arima(1, 0, 0).fit(&wave(60)).unwrap();
        for h in [1, 5, 24] {
            assert_eq!(fit.forecast(h).len(), h);
        }
    }

    #[test]
    fn deterministic() {
        let fit = CandidateModel::arima(1, 0, 1).fit(&arma11(200, 5)).unwrap();
        assert_eq!(forecast(&fit, 10), forecast(&fit, 10));
    }

    #[test]
    fn white_noise_forecasts_the_mean() {
        let data = wave(60);
        let fit = CandidateModel::arima(0, 0, 0).fit(&data).unwrap();
        let mean = kairos_stats::mean(&data);
        for v in forecast(&fit, 5).values() {
            assert_abs_diff_eq!(*v, mean, epsilon = 1e-9);
        }
    }

    #[test]
    fn random_walk_repeats_last_value() {
        let data = wave(40);
        let fit = CandidateModel::arima(0, 1, 0).fit(&data).unwrap();
        for v in forecast(&fit, 4).values() {
            assert_abs_diff_eq!(*v, data[39], epsilon = 1e-9);
        }
    }

    #[test]
    fn seasonal_naive_repeats_last_cycle() {
        let data = wave(48);
        let model = CandidateModel::new(Order::new(0, 0, 0), Some(SeasonalOrder::new(0, 1, 0, 12)));
        let fit = model.fit(&data).unwrap();
        let fc = forecast(&fit, 24);
        for (h, v) in fc.values().iter().enumerate() {
            assert_abs_diff_eq!(*v, data[36 + h % 12], epsilon = 1e-9);
        }
    }

    #[test]
    fn ar1_forecast_decays_to_mean() {
        let data = wave(120);
        let fit = CandidateModel::arima(1, 0, 0).fit(&data).unwrap();
        let mean = fit.intercept().unwrap();
        let fc = forecast(&fit, 200);
        assert_abs_diff_eq!(fc.values()[199], mean, epsilon = 1e-6);
    }

    #[test]
    fn variance_grows_with_horizon() {
        let fit = CandidateModel::arima(1, 0, 0).fit(&wave(120)).unwrap();
        let (_, variances) = propagate(&fit, 10);
        assert!(variances.windows(2).all(|w| w[1] >= w[0] - 1e-12));
        assert_abs_diff_eq!(variances[0], fit.sigma2(), epsilon = 1e-9);
    }
}
