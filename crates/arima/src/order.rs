//! Model orders and the unfitted candidate model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArimaError;
use crate::fit::FitResult;

/// Non-seasonal order `(p, d, q)`.
///
/// Displays as `(p, d, q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Order {
    p: usize,
    d: usize,
    q: usize,
}

impl Order {
    /// Creates an order with AR lags `p`, differencing degree `d` and MA lags `q`.
    ///
    /// ```
    /// use kairos_arima::Order;
    ///
    /// let order = Order::new(2, 1, 1);
    /// assert_eq!((order.p(), order.d(), order.q()), (2, 1, 1));
    /// assert_eq!(order.to_string(), "(2, 1, 1)");
    /// ```
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// AR order.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Differencing degree.
    pub fn d(&self) -> usize {
        self.d
    }

    /// MA order.
    pub fn q(&self) -> usize {
        self.q
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Seasonal order `(P, D, Q, m)`.
///
/// The period `m` must be at least 2; this is checked when the model is
/// fitted or searched, not at construction. Displays as `(P, D, Q, m)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonalOrder {
    p: usize,
    d: usize,
    q: usize,
    period: usize,
}

impl SeasonalOrder {
    /// Creates a seasonal order with seasonal AR lags `p`, seasonal
    /// differencing degree `d`, seasonal MA lags `q` and period `period`.
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    /// Seasonal AR order (`P`).
    pub fn p(&self) -> usize {
        self.p
    }

    /// Seasonal differencing degree (`D`).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Seasonal MA order (`Q`).
    pub fn q(&self) -> usize {
        self.q
    }

    /// Seasonal period (`m`).
    pub fn period(&self) -> usize {
        self.period
    }
}

impl fmt::Display for SeasonalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.p, self.d, self.q, self.period)
    }
}

/// Estimation options for [`CandidateModel::fit_with()`].
#[derive(Clone, Debug, PartialEq)]
pub struct FitOptions {
    /// Force the intercept on or off. `None` includes it iff `d + D == 0`.
    pub include_mean: Option<bool>,
    /// Nelder-Mead iteration cap per starting point.
    pub max_iters: u64,
    /// Nelder-Mead simplex standard-deviation tolerance.
    pub sd_tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            include_mean: None,
            max_iters: 1000,
            sd_tolerance: 1e-8,
        }
    }
}

impl FitOptions {
    /// Forces the intercept on or off.
    pub fn with_include_mean(mut self, include: bool) -> Self {
        self.include_mean = Some(include);
        self
    }

    /// Sets the iteration cap per starting point.
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the simplex standard-deviation tolerance.
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }
}

/// An unfitted ARIMA or seasonal ARIMA model: the unit of search and comparison.
///
/// Create one with [`CandidateModel::new()`] (or the [`arima`](Self::arima)
/// shorthand), then call [`CandidateModel::fit()`] to obtain a
/// [`FitResult`].
///
/// ```mermaid
/// graph LR
///     A["CandidateModel::new(order, seasonal)"] -->|".fit(&data)?"| B["FitResult"]
///     B -->|".forecast(h)"| C["Forecast"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateModel {
    order: Order,
    seasonal: Option<SeasonalOrder>,
}

impl CandidateModel {
    /// Creates a model from a non-seasonal order and an optional seasonal order.
    pub fn new(order: Order, seasonal: Option<SeasonalOrder>) -> Self {
        Self { order, seasonal }
    }

    /// Shorthand for a non-seasonal ARIMA(p,d,q).
    ///
    /// ```
    /// use kairos_arima::CandidateModel;
    ///
    /// assert_eq!(CandidateModel::arima(1, 0, 0).to_string(), "ARIMA(1,0,0)");
    /// ```
    pub fn arima(p: usize, d: usize, q: usize) -> Self {
        Self::new(Order::new(p, d, q), None)
    }

    /// Non-seasonal order.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Seasonal order, `None` for a non-seasonal model.
    pub fn seasonal_order(&self) -> Option<SeasonalOrder> {
        self.seasonal
    }

    /// Number of ARMA coefficients `p + q + P + Q`.
    pub fn n_coefficients(&self) -> usize {
        let (sp, sq) = self.seasonal.map_or((0, 0), |s| (s.p, s.q));
        self.order.p + self.order.q + sp + sq
    }

    /// Total differencing degree `d + D`.
    pub fn total_differencing(&self) -> usize {
        self.order.d + self.seasonal.map_or(0, |s| s.d)
    }

    /// Observation count the series must exceed: `p + q + P*m + Q*m + d + D*m`.
    pub fn min_observations(&self) -> usize {
        let seasonal = self
            .seasonal
            .map_or(0, |s| (s.p + s.q + s.d) * s.period);
        self.order.p + self.order.q + self.order.d + seasonal
    }

    /// Fits this model to `data` by exact maximum likelihood with default
    /// [`FitOptions`].
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaError::EmptyData`] | `data` is empty |
    /// | [`ArimaError::NonFiniteData`] | any element is NaN or infinite |
    /// | [`ArimaError::InvalidParameter`] | seasonal period below 2 |
    /// | [`ArimaError::InsufficientData`] | `data.len() <= min_observations()` |
    /// | [`ArimaError::ConstantData`] | differenced series has zero variance |
    /// | [`ArimaError::NonConvergence`] | no starting point reached a feasible optimum |
    pub fn fit(&self, data: &[f64]) -> Result<FitResult, ArimaError> {
        self.fit_with(data, &FitOptions::default())
    }

    /// Like [`fit()`](Self::fit) with explicit options.
    pub fn fit_with(&self, data: &[f64], options: &FitOptions) -> Result<FitResult, ArimaError> {
        crate::optimizer::fit_model(self, data, options)
    }
}

impl fmt::Display for CandidateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.order.p, self.order.d, self.order.q)?;
        if let Some(s) = self.seasonal {
            write!(f, "({},{},{})[{}]", s.p, s.d, s.q, s.period)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_accessors_and_display() {
        let order = Order::new(2, 1, 0);
        assert_eq!(order.p(), 2);
        assert_eq!(order.d(), 1);
        assert_eq!(order.q(), 0);
        assert_eq!(order.to_string(), "(2, 1, 0)");
    }

    #[test]
    fn seasonal_order_display() {
        let s = SeasonalOrder::new(1, 1, 0, 12);
        assert_eq!(s.period(), 12);
        assert_eq!(s.to_string(), "(1, 1, 0, 12)");
    }

    #[test]
    fn candidate_display() {
        let plain = CandidateModel::arima(1, 1, 1);
        assert_eq!(plain.to_string(), "ARIMA(1,1,1)");
        let seasonal = CandidateModel::new(Order::new(0, 1, 1), Some(SeasonalOrder::new(0, 1, 1, 12)));
        assert_eq!(seasonal.to_string(), "ARIMA(0,1,1)(0,1,1)[12]");
    }

    #[test]
    fn candidate_counts() {
        let model = CandidateModel::new(Order::new(2, 1, 1), Some(SeasonalOrder::new(1, 1, 1, 12)));
        assert_eq!(model.n_coefficients(), 5);
        assert_eq!(model.total_differencing(), 2);
        // 2 + 1 + 1 + (1 + 1 + 1) * 12
        assert_eq!(model.min_observations(), 40);
    }

    #[test]
    fn fit_options_builder() {
        let opts = FitOptions::default()
            .with_include_mean(false)
            .with_max_iters(50)
            .with_sd_tolerance(1e-6);
        assert_eq!(opts.include_mean, Some(false));
        assert_eq!(opts.max_iters, 50);
        assert_eq!(opts.sd_tolerance, 1e-6);
    }

    #[test]
    fn candidate_serializes() {
        let model = CandidateModel::arima(1, 0, 2);
        let json = serde_json::to_string(&model).unwrap();
        let back: CandidateModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }

    #[test]
    fn fit_empty_data() {
        let err = CandidateModel::arima(1, 0, 0).fit(&[]).unwrap_err();
        assert!(matches!(err, ArimaError::EmptyData));
    }

    #[test]
    fn fit_insufficient_data() {
        let err = CandidateModel::arima(2, 0, 0).fit(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ArimaError::InsufficientData { n: 2, min: 2, .. }));
    }

    #[test]
    fn fit_nan_data() {
        let err = CandidateModel::arima(1, 0, 0)
            .fit(&[1.0, f64::NAN, 3.0])
            .unwrap_err();
        assert!(matches!(err, ArimaError::NonFiniteData));
    }

    #[test]
    fn fit_constant_data() {
        let err = CandidateModel::arima(1, 0, 0)
            .fit(&[5.0, 5.0, 5.0, 5.0, 5.0])
            .unwrap_err();
        assert!(matches!(err, ArimaError::ConstantData { .. }));
    }

    #[test]
    fn fit_rejects_short_period() {
        let model = CandidateModel::new(Order::new(0, 0, 0), Some(SeasonalOrder::new(1, 0, 0, 1)));
        let data: Vec<f64> = (0..30).map(|i| (i as f64).sin()).collect();
        assert!(matches!(
            model.fit(&data),
            Err(ArimaError::InvalidParameter { name: "m", value: 1, .. })
        ));
    }
}
