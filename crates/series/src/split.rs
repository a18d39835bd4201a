//! Order-preserving train/test split.

use tracing::debug;

use crate::error::SeriesError;
use crate::series::TimeSeries;

/// Splits `series` into a training prefix and a test suffix.
///
/// The split index is `round(len * train_ratio)` with ties rounded to even.
/// No shuffling takes place: every training timestamp precedes every test
/// timestamp.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SeriesError::InvalidParameter`] | `train_ratio` is not in the open interval (0, 1) |
/// | [`SeriesError::EmptyPartition`] | the test (or training) side would be empty |
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use kairos_series::{TimeSeries, split};
///
/// let dates: Vec<NaiveDate> = (1..=5)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
///     .collect();
/// let series = TimeSeries::new(dates, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let (train, test) = split(&series, 0.6).unwrap();
/// assert_eq!(train.values(), &[1.0, 2.0, 3.0]);
/// assert_eq!(test.values(), &[4.0, 5.0]);
/// ```
pub fn split(
    series: &TimeSeries,
    train_ratio: f64,
) -> Result<(TimeSeries, TimeSeries), SeriesError> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(SeriesError::InvalidParameter {
            name: "train_ratio",
            value: train_ratio,
            reason: "must satisfy 0 < r < 1",
        });
    }

    let len = series.len();
    let split_at = (len as f64 * train_ratio).round_ties_even() as usize;

    if split_at >= len {
        return Err(SeriesError::EmptyPartition {
            partition: "test",
            len,
            split_at,
        });
    }
    if split_at == 0 {
        return Err(SeriesError::EmptyPartition {
            partition: "train",
            len,
            split_at,
        });
    }

    debug!(len, split_at, train_ratio, "splitting series");
    Ok((series.slice(0, split_at), series.slice(split_at, len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(n: usize) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let dates = (0..n)
            .map(|i| start + chrono::Months::new(i as u32))
            .collect();
        let values = (0..n).map(|i| 10.0 + i as f64).collect();
        TimeSeries::new(dates, values).unwrap()
    }

    #[test]
    fn split_80_20() {
        let (train, test) = split(&series(120), 0.8).unwrap();
        assert_eq!(train.len(), 96);
        assert_eq!(test.len(), 24);
    }

    #[test]
    fn split_rounds_half_to_even() {
        // 5 * 0.5 = 2.5 -> 2 ; 7 * 0.5 = 3.5 -> 4
        let (train, _) = split(&series(5), 0.5).unwrap();
        assert_eq!(train.len(), 2);
        let (train, _) = split(&series(7), 0.5).unwrap();
        assert_eq!(train.len(), 4);
    }

    #[test]
    fn split_rejects_bad_ratios() {
        let s = series(10);
        for r in [0.0, 1.0, -0.1, 1.1, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(split(&s, r), Err(SeriesError::InvalidParameter { .. })),
                "ratio {r} accepted"
            );
        }
    }

    #[test]
    fn split_empty_test() {
        // round(10 * 0.97) = 10
        let err = split(&series(10), 0.97).unwrap_err();
        assert_eq!(
            err,
            SeriesError::EmptyPartition {
                partition: "test",
                len: 10,
                split_at: 10
            }
        );
    }

    #[test]
    fn split_empty_train() {
        let err = split(&series(10), 0.01).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::EmptyPartition {
                partition: "train",
                ..
            }
        ));
    }

    #[test]
    fn split_empty_series() {
        let empty = TimeSeries::new(vec![], vec![]).unwrap();
        assert!(matches!(
            split(&empty, 0.5),
            Err(SeriesError::EmptyPartition { .. })
        ));
    }

    #[test]
    fn split_does_not_touch_input() {
        let s = series(10);
        let before = s.clone();
        let _ = split(&s, 0.7).unwrap();
        assert_eq!(s, before);
    }
}
