//! Forecast CSV export.

use std::path::Path;

use csv::Writer;
use kairos_series::TimeSeries;
use tracing::info;

use crate::error::IoError;

const HEADER: [&str; 5] = [
    "Date",
    "Segment",
    "Actual",
    "ARIMA_Forecast",
    "SARIMA_Forecast",
];

fn check_aligned(name: &str, test: &TimeSeries, forecast: &TimeSeries) -> Result<(), IoError> {
    if forecast.len() != test.len() {
        return Err(IoError::Misaligned {
            name: name.to_string(),
            reason: format!("{} values for {} test dates", forecast.len(), test.len()),
        });
    }
    if let Some(i) = test
        .timestamps()
        .iter()
        .zip(forecast.timestamps())
        .position(|(a, b)| a != b)
    {
        return Err(IoError::Misaligned {
            name: name.to_string(),
            reason: format!(
                "date {} at position {i}, expected {}",
                forecast.timestamps()[i],
                test.timestamps()[i]
            ),
        });
    }
    Ok(())
}

/// Write training data, test data and both forecasts to one CSV file.
///
/// Every observation becomes a row tagged `train` or `test`; forecast
/// columns are empty on training rows. Dates are written as `%Y-%m-%d`.
///
/// # Errors
///
/// Returns [`IoError::Misaligned`] if a forecast does not carry exactly the
/// test dates, or [`IoError::Csv`] if writing fails.
pub fn write_forecasts(
    path: &Path,
    train: &TimeSeries,
    test: &TimeSeries,
    arima: &TimeSeries,
    sarima: &TimeSeries,
) -> Result<(), IoError> {
    check_aligned("ARIMA", test, arima)?;
    check_aligned("SARIMA", test, sarima)?;

    let csv_err = |reason: String| IoError::Csv {
        path: path.to_path_buf(),
        reason,
    };
    let mut writer = Writer::from_path(path).map_err(|e| csv_err(e.to_string()))?;
    writer
        .write_record(HEADER)
        .map_err(|e| csv_err(e.to_string()))?;

    for (date, actual) in train.iter() {
        writer
            .write_record([
                date.to_string(),
                "train".to_string(),
                actual.to_string(),
                String::new(),
                String::new(),
            ])
            .map_err(|e| csv_err(e.to_string()))?;
    }
    let forecasts = arima.values().iter().zip(sarima.values());
    for ((date, actual), (a, s)) in test.iter().zip(forecasts) {
        writer
            .write_record([
                date.to_string(),
                "test".to_string(),
                actual.to_string(),
                a.to_string(),
                s.to_string(),
            ])
            .map_err(|e| csv_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| csv_err(e.to_string()))?;

    info!(
        path = %path.display(),
        rows = train.len() + test.len(),
        "forecasts written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(start_day: u32, values: &[f64]) -> TimeSeries {
        let dates = (0..values.len() as u32)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, start_day + i).unwrap())
            .collect();
        TimeSeries::new(dates, values.to_vec()).unwrap()
    }

    #[test]
    fn aligned_forecast_passes() {
        let test = series(5, &[1.0, 2.0]);
        assert!(check_aligned("ARIMA", &test, &series(5, &[0.0, 0.0])).is_ok());
    }

    #[test]
    fn wrong_length_is_misaligned() {
        let test = series(5, &[1.0, 2.0]);
        let err = check_aligned("ARIMA", &test, &series(5, &[0.0])).unwrap_err();
        assert!(err.to_string().contains("1 values for 2 test dates"));
    }

    #[test]
    fn shifted_dates_are_misaligned() {
        let test = series(5, &[1.0, 2.0]);
        let err = check_aligned("SARIMA", &test, &series(6, &[0.0, 0.0])).unwrap_err();
        assert!(matches!(err, IoError::Misaligned { ref name, .. } if name == "SARIMA"));
        assert!(err.to_string().contains("position 0"));
    }
}
