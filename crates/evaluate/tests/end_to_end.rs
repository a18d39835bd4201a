use std::f64::consts::PI;

use chrono::{Months, NaiveDate};
use kairos_arima::{SearchBounds, SearchConfig};
use kairos_evaluate::{
    ARIMA_LABEL, CompareConfig, EvaluateError, SARIMA_LABEL, compare_models,
};
use kairos_series::{TimeSeries, split};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Monthly demand with a yearly cycle, starting January 2012.
fn monthly_demand(n: usize, seed: u64) -> TimeSeries {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let start = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| start.checked_add_months(Months::new(i as u32)).unwrap())
        .collect();
    let values: Vec<f64> = (0..n)
        .map(|t| 100.0 + 10.0 * (2.0 * PI * t as f64 / 12.0).sin() + normal.sample(&mut rng))
        .collect();
    TimeSeries::new(dates, values).unwrap()
}

fn config() -> CompareConfig {
    let bounds = SearchBounds {
        max_p: 2,
        max_q: 2,
        max_seasonal_p: 1,
        max_seasonal_q: 1,
        ..SearchBounds::default()
    };
    CompareConfig::default().with_search(SearchConfig::default().with_bounds(bounds))
}

#[test]
fn test_seasonal_model_wins_on_seasonal_demand() {
    let series = monthly_demand(120, 2024);
    let (train, test) = split(&series, 0.8).unwrap();
    assert_eq!((train.len(), test.len()), (96, 24));

    let comparison = compare_models(&train, &test, &config()).unwrap();
    let table = &comparison.table;
    let labels: Vec<&str> = table.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec![ARIMA_LABEL, SARIMA_LABEL]);

    let arima = table.row(ARIMA_LABEL).unwrap();
    let sarima = table.row(SARIMA_LABEL).unwrap();
    assert!(arima.seasonal_order.is_none());
    let seasonal = sarima.seasonal_order.unwrap();
    assert_eq!(seasonal.period(), 12);
    assert!(seasonal.d() >= 1);
    assert!(
        sarima.rmse < arima.rmse,
        "SARIMA rmse {} vs ARIMA rmse {}",
        sarima.rmse,
        arima.rmse
    );
    assert!(sarima.mape < arima.mape);
    assert!(arima.aic.is_finite() && sarima.aic.is_finite());

    for run in [&comparison.arima, &comparison.sarima] {
        assert_eq!(run.forecast.len(), test.len());
        assert_eq!(run.forecast.timestamps(), test.timestamps());
        assert!(run.candidates >= 1);
    }
    assert_eq!(comparison.arima.model.order(), arima.order);

    let text = table.to_string();
    assert!(text.contains("Seasonal_Order"));
    assert!(text.contains(&seasonal.to_string()));
    let json = table.to_json().unwrap();
    assert!(json.contains("\"SARIMA\""));
}

#[test]
fn test_parallel_and_sequential_agree() {
    let series = monthly_demand(96, 7);
    let (train, test) = split(&series, 0.75).unwrap();
    let parallel = compare_models(&train, &test, &config()).unwrap();
    let sequential = compare_models(
        &train,
        &test,
        &config().with_parallel(false).with_search(
            config().search().clone().with_parallel(false),
        ),
    )
    .unwrap();
    assert_eq!(parallel.table, sequential.table);
}

#[test]
fn test_empty_test_partition_is_rejected() {
    let series = monthly_demand(60, 1);
    let empty = TimeSeries::new(vec![], vec![]).unwrap();
    let err = compare_models(&series, &empty, &config()).unwrap_err();
    assert_eq!(err, EvaluateError::EmptyInput);
}

#[test]
fn test_invalid_period_is_rejected() {
    let series = monthly_demand(60, 1);
    let (train, test) = split(&series, 0.8).unwrap();
    let err = compare_models(&train, &test, &config().with_period(1)).unwrap_err();
    assert!(matches!(
        err,
        EvaluateError::InvalidParameter { name: "period", .. }
    ));
}
