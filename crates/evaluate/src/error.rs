//! Evaluation error types.

use kairos_arima::ArimaError;
use kairos_series::SeriesError;

/// Errors that can occur during scoring and comparison.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluateError {
    /// Truth and forecast have different lengths.
    #[error("length mismatch: {truth} truth values but {forecast} forecast values")]
    LengthMismatch { truth: usize, forecast: usize },

    /// A metric was asked to score zero values.
    #[error("cannot score an empty series")]
    EmptyInput,

    /// The comparison configuration is unusable.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Order search or model fitting failed.
    #[error(transparent)]
    Arima(#[from] ArimaError),

    /// Building or splitting a series failed.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
