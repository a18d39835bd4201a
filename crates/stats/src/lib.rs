//! Statistical helper functions for the kairos order search.
//!
//! Everything here works on plain `&[f64]` slices so the estimator can call
//! it on differenced working series without wrapping them in a
//! `TimeSeries`.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator (matching R's `var()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator (matching R's `sd()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Biased sample autocovariance at `lag` (denominator N, matching R's `acf()`).
///
/// Returns 0.0 when `lag >= data.len()`.
pub fn autocovariance(data: &[f64], lag: usize) -> f64 {
    let n = data.len();
    if lag >= n {
        return 0.0;
    }
    let m = mean(data);
    let sum: f64 = data[lag..]
        .iter()
        .zip(data.iter())
        .map(|(&a, &b)| (a - m) * (b - m))
        .sum();
    sum / n as f64
}

/// Sample autocorrelations for lags `0..=max_lag`.
///
/// A constant series has zero variance; every lag beyond 0 is reported as 0.0.
pub fn acf(data: &[f64], max_lag: usize) -> Vec<f64> {
    let gamma0 = autocovariance(data, 0);
    (0..=max_lag)
        .map(|k| {
            if k == 0 {
                1.0
            } else if gamma0 > 0.0 {
                autocovariance(data, k) / gamma0
            } else {
                0.0
            }
        })
        .collect()
}

/// Short Bartlett truncation lag used by [`kpss_statistic`]: `trunc(3 sqrt(n) / 13)`.
pub fn kpss_short_lags(n: usize) -> usize {
    (3.0 * (n as f64).sqrt() / 13.0) as usize
}

/// KPSS level-stationarity statistic with a Bartlett long-run variance.
///
/// Large values reject level stationarity; the 5% critical value is 0.463.
/// Returns 0.0 for fewer than 2 observations or a constant series.
pub fn kpss_statistic(data: &[f64], lags: usize) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    let resid: Vec<f64> = data.iter().map(|&x| x - m).collect();

    let mut partial = 0.0;
    let mut eta = 0.0;
    for &e in &resid {
        partial += e;
        eta += partial * partial;
    }
    let nf = n as f64;
    eta /= nf * nf;

    let mut s2 = resid.iter().map(|e| e * e).sum::<f64>() / nf;
    for l in 1..=lags.min(n - 1) {
        let weight = 1.0 - l as f64 / (lags as f64 + 1.0);
        let cross: f64 = resid[l..].iter().zip(&resid).map(|(a, b)| a * b).sum();
        s2 += 2.0 * weight * cross / nf;
    }

    if s2 <= 0.0 { 0.0 } else { eta / s2 }
}

/// Centered moving average of order `period` (a 2x`period` average for even
/// periods). Entries without a full window are `None`.
fn centered_moving_average(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = data.len();
    let half = period / 2;
    let mut out = vec![None; n];
    if n <= 2 * half {
        return out;
    }
    for (t, slot) in out.iter_mut().enumerate().take(n - half).skip(half) {
        let window = &data[t - half..=t + half];
        *slot = Some(if period % 2 == 0 {
            let inner: f64 = window[1..period].iter().sum();
            (inner + 0.5 * (window[0] + window[period])) / period as f64
        } else {
            window.iter().sum::<f64>() / period as f64
        });
    }
    out
}

/// Strength of seasonality from a classical additive decomposition:
/// `max(0, 1 - Var(remainder) / Var(seasonal + remainder))`.
///
/// Returns `None` when `period < 2` or there are fewer than two full cycles.
pub fn seasonal_strength(data: &[f64], period: usize) -> Option<f64> {
    if period < 2 || data.len() < 2 * period {
        return None;
    }
    let trend = centered_moving_average(data, period);

    let mut phase_sum = vec![0.0; period];
    let mut phase_count = vec![0usize; period];
    let mut detrended = Vec::with_capacity(data.len());
    for (t, (&y, tr)) in data.iter().zip(&trend).enumerate() {
        if let Some(tr) = tr {
            let value = y - tr;
            phase_sum[t % period] += value;
            phase_count[t % period] += 1;
            detrended.push((t % period, value));
        }
    }

    let mut seasonal: Vec<f64> = phase_sum
        .iter()
        .zip(&phase_count)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let offset = mean(&seasonal);
    seasonal.iter_mut().for_each(|s| *s -= offset);

    let combined: Vec<f64> = detrended.iter().map(|&(_, v)| v).collect();
    let remainder: Vec<f64> = detrended
        .iter()
        .map(|&(phase, v)| v - seasonal[phase])
        .collect();

    let total = variance(&combined);
    // detrended part is numerically zero (constant or linear input)
    if total <= 1e-12 * variance(data) || total == 0.0 {
        return Some(0.0);
    }
    Some((1.0 - variance(&remainder) / total).max(0.0))
}
