//! Time-indexed series container.

use chrono::NaiveDate;

use crate::error::SeriesError;

/// A regularly-sampled univariate series indexed by calendar dates.
///
/// Timestamps are strictly increasing and every value is finite. Both
/// invariants are checked once by [`TimeSeries::new`]; afterwards the series
/// is read-only and every derived series is a fresh allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a new `TimeSeries` after validating inputs.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::LengthMismatch`] | `timestamps.len() != values.len()` |
    /// | [`SeriesError::UnsortedTimestamps`] | a timestamp is not after its predecessor |
    /// | [`SeriesError::NonFiniteValue`] | any value is NaN or infinite |
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        if let Some(index) = timestamps
            .windows(2)
            .position(|w| w[1] <= w[0])
            .map(|i| i + 1)
        {
            return Err(SeriesError::UnsortedTimestamps { index });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue { index });
        }
        Ok(Self { timestamps, values })
    }

    /// Returns the timestamps.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Returns the observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the first timestamp, if any.
    pub fn start(&self) -> Option<NaiveDate> {
        self.timestamps.first().copied()
    }

    /// Returns the last timestamp, if any.
    pub fn end(&self) -> Option<NaiveDate> {
        self.timestamps.last().copied()
    }

    /// Iterates over `(timestamp, value)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Builds a new series sharing this series' timestamps but carrying
    /// `values` instead.
    ///
    /// Used to attach forecasts to the dates of a held-out partition.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TimeSeries::new`].
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, SeriesError> {
        Self::new(self.timestamps.clone(), values)
    }

    /// Copies the observations in `start..end` into a new series.
    ///
    /// Indices are clamped to the series length.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}
