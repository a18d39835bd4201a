//! Error types for the kairos-series crate.

/// Error type for all fallible operations in the kairos-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a numeric parameter lies outside its valid range.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// Returned when a split would leave one side without observations.
    #[error("empty {partition} partition: splitting {len} observations at index {split_at}")]
    EmptyPartition {
        /// Which side came out empty (`"train"` or `"test"`).
        partition: &'static str,
        /// Length of the series being split.
        len: usize,
        /// Computed split index.
        split_at: usize,
    },

    /// Returned when timestamps and values differ in length.
    #[error("length mismatch: {timestamps} timestamps but {values} values")]
    LengthMismatch {
        /// Number of timestamps supplied.
        timestamps: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Returned when a value is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value.
        index: usize,
    },

    /// Returned when timestamps are not strictly increasing.
    #[error("timestamps not strictly increasing at index {index}")]
    UnsortedTimestamps {
        /// Position of the first timestamp that is not after its predecessor.
        index: usize,
    },
}
