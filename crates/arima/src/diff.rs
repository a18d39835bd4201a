//! Differencing, its inverse, and the differencing-degree tests.
//!
//! **Not part of the public API.**

use kairos_stats::{kpss_short_lags, kpss_statistic, seasonal_strength};

/// Lag-`lag` difference `x[t] - x[t - lag]`. Shorter than `x` by `lag`.
pub(crate) fn difference(x: &[f64], lag: usize) -> Vec<f64> {
    if lag >= x.len() {
        return Vec::new();
    }
    x[lag..].iter().zip(x).map(|(a, b)| a - b).collect()
}

/// Applies `D` seasonal differences at lag `period`, then `d` first differences.
pub(crate) fn apply(x: &[f64], d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut out = x.to_vec();
    for _ in 0..seasonal_d {
        out = difference(&out, period);
    }
    for _ in 0..d {
        out = difference(&out, 1);
    }
    out
}

/// Coefficients of `(1 - B)^d (1 - B^period)^D` in ascending powers of `B`.
pub(crate) fn polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = crate::params::poly_mul(&poly, &[1.0, -1.0]);
    }
    if seasonal_d > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = crate::params::poly_mul(&poly, &seasonal);
        }
    }
    poly
}

/// Inverts differencing: solves `delta(B) y[t] = w[t]` forward, seeding the
/// recursion with the last `poly.len() - 1` values of `history`.
pub(crate) fn integrate(diffed: &[f64], history: &[f64], poly: &[f64]) -> Vec<f64> {
    let order = poly.len().saturating_sub(1);
    let seed = &history[history.len().saturating_sub(order)..];
    let mut level = seed.to_vec();
    let mut out = Vec::with_capacity(diffed.len());
    for &w in diffed {
        let t = level.len();
        let carried: f64 = (1..=order.min(t))
            .map(|k| poly[k] * level[t - k])
            .sum();
        let y = w - carried;
        level.push(y);
        out.push(y);
    }
    out
}

/// Number of seasonal differences applied while the seasonal strength of
/// the working series exceeds `threshold`, capped at `max`.
pub(crate) fn seasonal_diffs(x: &[f64], period: usize, max: usize, threshold: f64) -> usize {
    let mut work = x.to_vec();
    let mut count = 0;
    while count < max {
        match seasonal_strength(&work, period) {
            Some(strength) if strength > threshold => {
                work = difference(&work, period);
                count += 1;
            }
            _ => break,
        }
    }
    count
}

/// Number of first differences applied while the KPSS level statistic
/// exceeds `critical`, capped at `max`.
pub(crate) fn regular_diffs(x: &[f64], max: usize, critical: f64) -> usize {
    let mut work = x.to_vec();
    let mut count = 0;
    while count < max && work.len() > 2 {
        let stat = kpss_statistic(&work, kpss_short_lags(work.len()));
        if stat <= critical {
            break;
        }
        work = difference(&work, 1);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn first_difference() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 1), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn difference_longer_than_series() {
        assert!(difference(&[1.0, 2.0], 2).is_empty());
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let x = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let w = apply(&x, 2, 0, 1);
        assert_eq!(w, vec![1.0, 1.0, 1.0]);
        assert_eq!(x, vec![1.0, 3.0, 6.0, 10.0, 15.0]);
    }

    #[test]
    fn polynomial_expansion() {
        // (1 - B)(1 - B^4) = 1 - B - B^4 + B^5
        assert_eq!(polynomial(1, 1, 4), vec![1.0, -1.0, 0.0, 0.0, -1.0, 1.0]);
        // (1 - B)^2 = 1 - 2B + B^2
        assert_eq!(polynomial(2, 0, 12), vec![1.0, -2.0, 1.0]);
        assert_eq!(polynomial(0, 0, 12), vec![1.0]);
    }

    #[test]
    fn integrate_inverts_apply() {
        let y: Vec<f64> = (0..40)
            .map(|t| 0.3 * t as f64 + (t as f64 * 0.7).sin() * 5.0)
            .collect();
        let (d, sd, period) = (1, 1, 4);
        let w = apply(&y, d, sd, period);
        let lost = d + sd * period;
        let split = 30;
        let rebuilt = integrate(&w[split - lost..], &y[..split], &polynomial(d, sd, period));
        assert_eq!(rebuilt.len(), y.len() - split);
        for (a, b) in rebuilt.iter().zip(&y[split..]) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn integrate_without_differencing_is_identity() {
        assert_eq!(integrate(&[1.0, 2.0], &[9.0], &[1.0]), vec![1.0, 2.0]);
    }

    #[test]
    fn seasonal_cycle_needs_one_seasonal_difference() {
        let y: Vec<f64> = (0..96)
            .map(|t| {
                let t = t as f64;
                100.0 + 10.0 * (2.0 * PI * t / 12.0).sin() + 0.5 * (1.3 * t).sin()
            })
            .collect();
        assert_eq!(seasonal_diffs(&y, 12, 2, 0.64), 1);
    }

    #[test]
    fn seasonal_diffs_respects_cap() {
        let y: Vec<f64> = (0..96)
            .map(|t| (2.0 * PI * t as f64 / 12.0).sin())
            .collect();
        assert_eq!(seasonal_diffs(&y, 12, 0, 0.64), 0);
    }

    #[test]
    fn trend_needs_first_difference() {
        let y: Vec<f64> = (0..100)
            .map(|t| t as f64 + if t % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        assert_eq!(regular_diffs(&y, 2, 0.463), 1);
    }

    #[test]
    fn stationary_series_needs_no_difference() {
        let y: Vec<f64> = (0..100).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert_eq!(regular_diffs(&y, 2, 0.463), 0);
    }
}
