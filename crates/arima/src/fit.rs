//! Fitted (S)ARIMA model results.

use crate::forecast::Forecast;
use crate::kalman::KalmanOutput;
use crate::order::{CandidateModel, Order, SeasonalOrder};
use crate::params::Coefficients;
use crate::state_space::StateSpace;

/// Differencing polynomial and the training tail that seeds its inversion.
#[derive(Clone, Debug)]
pub(crate) struct Differencing {
    /// Coefficients of `(1 - B)^d (1 - B^m)^D`, ascending powers.
    pub(crate) poly: Vec<f64>,
    /// Last `poly.len() - 1` training observations.
    pub(crate) history: Vec<f64>,
}

/// A fitted model produced by [`CandidateModel::fit()`].
///
/// Contains estimated AR, MA, seasonal AR and seasonal MA coefficients,
/// innovation variance (`sigma2`), the optional intercept, log-likelihood,
/// one-step residuals and the final filter state used by
/// [`FitResult::forecast()`]. Immutable once returned.
///
/// ```mermaid
/// graph LR
///     B["FitResult"] --> C[".ar() / .ma() - coefficients"]
///     B --> D[".sigma2() - innovation variance"]
///     B --> E[".aic() - Akaike Information Criterion"]
///     B --> F[".forecast(h)"]
/// ```
#[derive(Clone, Debug)]
pub struct FitResult {
    model: CandidateModel,
    coeffs: Coefficients,
    intercept: Option<f64>,
    converged: bool,
    sigma2: f64,
    log_likelihood: f64,
    residuals: Vec<f64>,
    pub(crate) filter: KalmanOutput,
    pub(crate) state_space: StateSpace,
    pub(crate) differencing: Differencing,
}

impl FitResult {
    pub(crate) fn new(
        model: CandidateModel,
        coeffs: Coefficients,
        intercept: Option<f64>,
        converged: bool,
        mut filter: KalmanOutput,
        state_space: StateSpace,
        differencing: Differencing,
    ) -> Self {
        let residuals = std::mem::take(&mut filter.residuals);
        Self {
            model,
            coeffs,
            intercept,
            converged,
            sigma2: filter.sigma2,
            log_likelihood: filter.log_likelihood,
            residuals,
            filter,
            state_space,
            differencing,
        }
    }

    /// Returns the [`CandidateModel`] that produced this fit.
    pub fn model(&self) -> CandidateModel {
        self.model
    }

    /// Returns the non-seasonal order.
    pub fn order(&self) -> Order {
        self.model.order()
    }

    /// Returns the seasonal order, if any.
    pub fn seasonal_order(&self) -> Option<SeasonalOrder> {
        self.model.seasonal_order()
    }

    /// Returns the AR coefficients (`phi`).
    pub fn ar(&self) -> &[f64] {
        &self.coeffs.ar
    }

    /// Returns the MA coefficients (`theta`).
    pub fn ma(&self) -> &[f64] {
        &self.coeffs.ma
    }

    /// Returns the seasonal AR coefficients (`Phi`).
    pub fn seasonal_ar(&self) -> &[f64] {
        &self.coeffs.sar
    }

    /// Returns the seasonal MA coefficients (`Theta`).
    pub fn seasonal_ma(&self) -> &[f64] {
        &self.coeffs.sma
    }

    /// Returns the innovation variance (`sigma2`).
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Returns the mean of the differenced series, if an intercept was fitted.
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Returns the maximised log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Whether the optimizer met its tolerance before the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the one-step-ahead prediction errors of the differenced series.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Number of estimated parameters `k = p + q + P + Q + (intercept) + 1`.
    pub fn n_params(&self) -> usize {
        self.model.n_coefficients() + usize::from(self.intercept.is_some()) + 1
    }

    /// Computes the Akaike Information Criterion, `2k - 2 * log_likelihood`.
    ///
    /// Lower AIC indicates a better trade-off between fit and complexity.
    pub fn aic(&self) -> f64 {
        2.0 * self.n_params() as f64 - 2.0 * self.log_likelihood
    }

    /// Point forecasts for the next `horizon` steps; see [`crate::forecast()`].
    pub fn forecast(&self, horizon: usize) -> Forecast {
        crate::forecast::forecast(self, horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CandidateModel;
    use approx::assert_abs_diff_eq;

    fn toy_fit() -> FitResult {
        let data = [1.0, 2.5, 1.5, 3.0, 2.0, 2.8, 1.9, 2.6, 2.2, 2.4];
        CandidateModel::arima(1, 0, 0).fit(&data).unwrap()
    }

    #[test]
    fn fit_accessors() {
        let fit = toy_fit();
        assert_eq!(fit.order(), Order::new(1, 0, 0));
        assert!(fit.seasonal_order().is_none());
        assert_eq!(fit.ar().len(), 1);
        assert!(fit.ma().is_empty());
        assert!(fit.seasonal_ar().is_empty());
        assert!(fit.seasonal_ma().is_empty());
        assert!(fit.sigma2() > 0.0);
        assert_eq!(fit.residuals().len(), 10);
        assert!(fit.intercept().is_some());
    }

    #[test]
    fn fit_aic_computation() {
        let fit = toy_fit();
        // k = p + intercept + sigma2 = 3
        assert_eq!(fit.n_params(), 3);
        assert_abs_diff_eq!(fit.aic(), 6.0 - 2.0 * fit.log_likelihood(), epsilon = 1e-12);
    }

    #[test]
    fn fit_is_clone_send_sync() {
        fn assert_impl<T: Clone + Send + Sync>() {}
        assert_impl::<FitResult>();
    }
}
