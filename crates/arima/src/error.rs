//! Error types for the kairos-arima crate.

/// Error type for all fallible operations in the kairos-arima crate.
///
/// Covers input validation, order/configuration mistakes, and optimization
/// failures during (S)ARIMA fitting and order search. Variants that concern
/// a specific model carry its display form (e.g. `ARIMA(1,1,1)(0,1,1)[12]`).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArimaError {
    /// Returned when the input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the differenced working series has zero variance.
    #[error("working series for {model} is constant (zero variance)")]
    ConstantData {
        /// Model being fitted.
        model: String,
    },

    /// Returned when the series is too short for the requested order.
    #[error("insufficient data for {model}: got {n} observations, need more than {min}")]
    InsufficientData {
        /// Model being fitted.
        model: String,
        /// Number of observations provided.
        n: usize,
        /// `p + q + P*m + Q*m + d + D*m` for the requested model.
        min: usize,
    },

    /// Returned for a bad seasonal period or search setting.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending setting.
        name: &'static str,
        /// Value that was supplied.
        value: usize,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// Returned when no optimizer attempt ends at a feasible point.
    #[error("{model}: no feasible optimum after {attempts} attempts")]
    NonConvergence {
        /// Model being fitted.
        model: String,
        /// Number of starting points tried.
        attempts: usize,
    },

    /// Returned when every candidate of an order search fails to fit.
    #[error("no convergent model among {candidates} candidates")]
    NoConvergentModel {
        /// Number of distinct candidates fitted.
        candidates: usize,
    },
}
