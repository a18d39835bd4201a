//! # kairos-io
//!
//! Read demand series from CSV files and write aligned forecasts back to
//! CSV. Bridges external files into the validated
//! [`TimeSeries`](kairos_series::TimeSeries) container.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{CsvConfig, read_csv};
pub use writer::write_forecasts;
