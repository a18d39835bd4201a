//! # kairos-arima
//!
//! ARIMA and seasonal ARIMA fitting, forecasting and order selection via
//! state-space maximum likelihood (Kalman filter).
//!
//! ## Workflow
//!
//! ```mermaid
//! graph LR
//!     A["CandidateModel::new(order, seasonal)"] -->|".fit(&train)?"| B["FitResult"]
//!     B --> C[".ar() / .ma() / .seasonal_ar() / .seasonal_ma()"]
//!     B --> D[".sigma2() - innovation variance"]
//!     B --> E[".aic() - Akaike Information Criterion"]
//!     B -->|".forecast(h)"| F["Forecast"]
//!     H["OrderSearch::search(&train, seasonal, m)?"] -->|"stepwise AIC"| B
//! ```
//!
//! ## Two Usage Paths
//!
//! **Direct fit** (known orders):
//! ```ignore
//! let model = CandidateModel::new(Order::new(1, 1, 1), Some(SeasonalOrder::new(0, 1, 1, 12)));
//! let forecast = model.fit(&train)?.forecast(24);
//! ```
//!
//! **Stepwise search** (unknown orders):
//! ```ignore
//! let outcome = OrderSearch::new(SearchConfig::default()).search(&train, true, 12)?;
//! let forecast = outcome.fit.forecast(24);
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | phi | [`FitResult::ar()`] | AR coefficients: weights on past observations |
//! | theta | [`FitResult::ma()`] | MA coefficients: weights on past forecast errors |
//! | Phi | [`FitResult::seasonal_ar()`] | Seasonal AR coefficients at lags `k * m` |
//! | Theta | [`FitResult::seasonal_ma()`] | Seasonal MA coefficients at lags `k * m` |
//! | sigma2 | [`FitResult::sigma2()`] | Innovation (white-noise) variance |
//! | AIC | [`FitResult::aic()`] | `-2 ln L + 2k` (lower = better) |

mod error;
mod fit;
mod forecast;
mod order;
mod selection;

pub(crate) mod diff;
pub(crate) mod kalman;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod small_linalg;
pub(crate) mod state_space;

pub use error::ArimaError;
pub use fit::FitResult;
pub use forecast::{Forecast, forecast};
pub use order::{CandidateModel, FitOptions, Order, SeasonalOrder};
pub use selection::{OrderSearch, SearchBounds, SearchConfig, SearchOutcome, Seed, Visited};
