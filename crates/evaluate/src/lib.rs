//! Kairos evaluation: score point forecasts and compare ARIMA against SARIMA
//! on a chronological train/test split.
//!
//! ```ignore
//! let (train, test) = kairos_series::split(&series, 0.8)?;
//! let comparison = compare_models(&train, &test, &CompareConfig::default())?;
//! println!("{}", comparison.table);
//! ```

mod compare;
mod config;
mod error;
mod metrics;
mod output;

pub use compare::{ARIMA_LABEL, Comparison, ModelRun, SARIMA_LABEL, compare_models};
pub use config::CompareConfig;
pub use error::EvaluateError;
pub use metrics::{MAPE_EPSILON, mape, rmse};
pub use output::{ComparisonTable, ScoreRow};
