//! Error types for kairos-io.

use std::path::PathBuf;

use kairos_series::SeriesError;

/// Error type for all fallible operations in the kairos-io crate.
///
/// Row numbers count data rows from 1, excluding the header.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the CSV reader or writer.
    #[error("csv error in {}: {reason}", path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Returned when a configured column is not in the header.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a cell cannot be parsed as a date or a finite number.
    #[error("{}: row {row}, column '{column}': cannot parse '{value}': {reason}", path.display())]
    Parse {
        /// File being read.
        path: PathBuf,
        /// Data row number.
        row: usize,
        /// Column name.
        column: String,
        /// Raw cell content.
        value: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when two rows carry the same date.
    #[error("duplicate date {date} in {}", path.display())]
    DuplicateDate {
        /// The repeated date.
        date: String,
        /// File being read.
        path: PathBuf,
    },

    /// Returned when a file contains a header but no data rows.
    #[error("no observations in {}", path.display())]
    Empty {
        /// File being read.
        path: PathBuf,
    },

    /// Returned when one or more configuration checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a forecast does not line up with the test partition.
    #[error("'{name}' misaligned with the test partition: {reason}")]
    Misaligned {
        /// Which forecast is misaligned.
        name: String,
        /// What differs.
        reason: String,
    },

    /// Wraps a series construction failure.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
