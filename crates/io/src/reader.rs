//! CSV reader configuration and loading.

use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use kairos_series::TimeSeries;
use tracing::{debug, info};

use crate::error::IoError;

/// Configuration for reading a demand series from CSV.
///
/// The [`Default`] implementation matches the RBC demand export: a `Date`
/// column in `%Y-%m-%d` format and a `Demand_rbc` value column.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvConfig {
    /// Header name of the date column.
    date_column: String,
    /// Header name of the value column.
    value_column: String,
    /// `chrono` format string for the date column.
    date_format: String,
    /// Field delimiter.
    delimiter: u8,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            date_column: "Date".into(),
            value_column: "Demand_rbc".into(),
            date_format: "%Y-%m-%d".into(),
            delimiter: b',',
        }
    }
}

impl CsvConfig {
    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the value column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns the date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Returns the value column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Returns the date format.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every failed check.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.date_column.is_empty() {
            problems.push("date_column is empty".to_string());
        }
        if self.value_column.is_empty() {
            problems.push("value_column is empty".to_string());
        }
        if !self.date_column.is_empty() && self.date_column == self.value_column {
            problems.push(format!(
                "date_column and value_column are both '{}'",
                self.date_column
            ));
        }
        if self.date_format.is_empty() {
            problems.push("date_format is empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

/// Read a demand series from a CSV file.
///
/// Rows are sorted by date; the file itself may be in any order. Extra
/// columns are ignored.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::Validation`] | inconsistent `config` |
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Csv`] | malformed CSV |
/// | [`IoError::MissingColumn`] | a configured column is absent |
/// | [`IoError::Parse`] | unparseable date, unparseable or non-finite value |
/// | [`IoError::DuplicateDate`] | two rows share a date |
/// | [`IoError::Empty`] | no data rows |
pub fn read_csv(path: &Path, config: &CsvConfig) -> Result<TimeSeries, IoError> {
    config.validate()?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let csv_err = |e: csv::Error| IoError::Csv {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::MissingColumn {
                name: name.to_string(),
                path: path.to_path_buf(),
            })
    };
    let date_idx = position(config.date_column.as_str())?;
    let value_idx = position(config.value_column.as_str())?;

    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let row = i + 1;
        let parse_err = |column: &str, value: &str, reason: String| IoError::Parse {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        };

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, &config.date_format)
            .map_err(|e| parse_err(config.date_column.as_str(), raw_date, e.to_string()))?;

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value: f64 = raw_value
            .parse()
            .map_err(|e: std::num::ParseFloatError| {
                parse_err(config.value_column.as_str(), raw_value, e.to_string())
            })?;
        if !value.is_finite() {
            return Err(parse_err(
                config.value_column.as_str(),
                raw_value,
                "value is not finite".to_string(),
            ));
        }
        rows.push((date, value));
    }

    if rows.is_empty() {
        return Err(IoError::Empty {
            path: path.to_path_buf(),
        });
    }

    if !rows.windows(2).all(|w| w[0].0 <= w[1].0) {
        debug!(path = %path.display(), "rows out of order, sorting by date");
        rows.sort_by_key(|(date, _)| *date);
    }
    if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(IoError::DuplicateDate {
            date: w[0].0.to_string(),
            path: path.to_path_buf(),
        });
    }

    let (dates, values): (Vec<NaiveDate>, Vec<f64>) = rows.into_iter().unzip();
    let series = TimeSeries::new(dates, values)?;
    info!(
        path = %path.display(),
        n = series.len(),
        start = ?series.start(),
        end = ?series.end(),
        "series loaded"
    );
    Ok(series)
}
