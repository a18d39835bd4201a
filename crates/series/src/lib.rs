//! # kairos-series
//!
//! Time-indexed demand series and the order-preserving train/test split.
//!
//! ```mermaid
//! graph LR
//!     A["TimeSeries::new(dates, values)?"] -->|"split(&series, 0.8)?"| B["(train, test)"]
//!     B --> C["train.values() -> &[f64]"]
//!     B --> D["test.timestamps() -> &[NaiveDate]"]
//! ```
//!
//! Every transformation produces a new [`TimeSeries`]; nothing here mutates
//! a series in place.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use kairos_series::{TimeSeries, split};
//!
//! let dates: Vec<NaiveDate> = (1..=10)
//!     .map(|m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap())
//!     .collect();
//! let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
//! let series = TimeSeries::new(dates, values).unwrap();
//!
//! let (train, test) = split(&series, 0.8).unwrap();
//! assert_eq!(train.len(), 8);
//! assert_eq!(test.len(), 2);
//! ```

mod error;
mod series;
mod split;

pub use error::SeriesError;
pub use series::TimeSeries;
pub use split::split;
