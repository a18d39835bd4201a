//! ARMA state-space representation (Harvey form).
//!
//! Converts expanded ARMA(p,q) coefficients into state-space form:
//!
//! ```text
//! x[t+1] = T * x[t] + R * e[t+1]    (state transition)
//! y[t]   = Z' * x[t]                (observation, Z = e1)
//! ```
//!
//! where `T` is the companion transition matrix (first column `phi`,
//! ones on the super-diagonal), `R = [1, theta_1, ..., theta_{r-1}]` and
//! `e[t] ~ N(0, sigma2)`. The state dimension is `r = max(p, q + 1)`.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2, Axis};

use crate::small_linalg;

/// State-space representation of an ARMA(p,q) model.
///
/// `T` is never materialized: the structured updates only need the
/// padded AR column `phi` and the precomputed `R·Rᵀ`.
#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    r: usize,
    ar: Vec<f64>,
    ma: Vec<f64>,
    phi: Array1<f64>,
    rrt: Array2<f64>,
}

impl StateSpace {
    /// Builds a state-space representation from expanded AR and MA coefficients.
    pub(crate) fn new(ar: &[f64], ma: &[f64]) -> Self {
        let p = ar.len();
        let q = ma.len();
        let r = p.max(q + 1).max(1);

        let mut phi = Array1::zeros(r);
        for (i, &c) in ar.iter().enumerate() {
            phi[i] = c;
        }

        let mut r_vec = Array1::zeros(r);
        r_vec[0] = 1.0;
        for (j, &c) in ma.iter().enumerate() {
            r_vec[j + 1] = c;
        }

        let r_col = r_vec.view().insert_axis(Axis(1));
        let r_row = r_vec.view().insert_axis(Axis(0));
        let rrt = r_col.dot(&r_row);

        Self {
            r,
            ar: ar.to_vec(),
            ma: ma.to_vec(),
            phi,
            rrt,
        }
    }

    /// State dimension `r = max(p, q+1)`, minimum 1.
    pub(crate) fn r(&self) -> usize {
        self.r
    }

    /// Dense transition matrix `T` (r×r) in companion form.
    #[cfg(test)]
    pub(crate) fn t(&self) -> Array2<f64> {
        let r = self.r;
        let mut t = Array2::zeros((r, r));
        t.column_mut(0).assign(&self.phi);
        for i in 0..r.saturating_sub(1) {
            t[[i, i + 1]] = 1.0;
        }
        t
    }

    /// Noise input vector `R = [1, theta_1, ..., 0]` (length r).
    #[cfg(test)]
    pub(crate) fn r_vec(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.r, |j| self.theta(j))
    }

    /// `T * a`, using the companion structure.
    pub(crate) fn predict_state(&self, a: &Array1<f64>) -> Array1<f64> {
        let r = self.r;
        Array1::from_shape_fn(r, |i| {
            self.phi[i] * a[0] + if i + 1 < r { a[i + 1] } else { 0.0 }
        })
    }

    /// `T * P * T' + R * R'` in O(r²).
    pub(crate) fn predict_covariance(&self, p: &Array2<f64>) -> Array2<f64> {
        let r = self.r;
        let tp = Array2::from_shape_fn((r, r), |(i, j)| {
            self.phi[i] * p[[0, j]] + if i + 1 < r { p[[i + 1, j]] } else { 0.0 }
        });
        Array2::from_shape_fn((r, r), |(i, j)| {
            self.phi[j] * tp[[i, 0]]
                + if j + 1 < r { tp[[i, j + 1]] } else { 0.0 }
                + self.rrt[[i, j]]
        })
    }

    /// MA weights `theta_j` with `theta_0 = 1` and zero beyond `q`.
    fn theta(&self, j: usize) -> f64 {
        match j {
            0 => 1.0,
            j if j <= self.ma.len() => self.ma[j - 1],
            _ => 0.0,
        }
    }

    /// Autocovariances `gamma(0..len)` of the unit-variance ARMA process and
    /// its psi weights `psi(0..len)`.
    ///
    /// `gamma(0..=p)` solves the `(p+1)`-dimensional system
    /// `gamma(k) - sum phi_i gamma(|k-i|) = sum_{j>=k} theta_j psi_{j-k}`;
    /// higher lags follow from the same relation by recursion.
    pub(crate) fn autocovariances(&self, len: usize) -> Option<(Vec<f64>, Vec<f64>)> {
        let p = self.ar.len();
        let q = self.ma.len();
        let n_psi = len.max(q + 1);

        let mut psi = vec![0.0; n_psi];
        psi[0] = 1.0;
        for j in 1..n_psi {
            psi[j] = self.theta(j)
                + (1..=j.min(p))
                    .map(|i| self.ar[i - 1] * psi[j - i])
                    .sum::<f64>();
        }
        let forcing =
            |k: usize| -> f64 { (k..=q).map(|j| self.theta(j) * psi[j - k]).sum() };

        let mut a = Array2::zeros((p + 1, p + 1));
        let mut b = Array1::zeros(p + 1);
        for k in 0..=p {
            a[[k, k]] += 1.0;
            for i in 1..=p {
                a[[k, k.abs_diff(i)]] -= self.ar[i - 1];
            }
            b[k] = forcing(k);
        }
        let head = small_linalg::solve(a, b)?;

        let mut gamma = head.to_vec();
        for k in gamma.len()..len {
            let value = (1..=p).map(|i| self.ar[i - 1] * gamma[k - i]).sum::<f64>() + forcing(k);
            gamma.push(value);
        }
        gamma.truncate(len);
        psi.truncate(len);
        Some((gamma, psi))
    }

    /// Stationary state covariance `P0` solving `P = T P T' + R R'`
    /// (in units of the innovation variance).
    ///
    /// Built from the covariance of the forecast vector
    /// `f_i = E_t[y(t+i)]`, `Cov(f_i, f_j) = gamma(|i-j|) - sum_{k<min(i,j)} psi_k psi_{k+|i-j|}`,
    /// mapped to the Harvey state by `x_i = f_i - sum_{k=1..i} phi_k f_{i-k}`.
    /// Returns `None` when the autocovariance system is singular or the
    /// result is not finite.
    pub(crate) fn stationary_covariance(&self) -> Option<Array2<f64>> {
        let r = self.r;
        let (gamma, psi) = self.autocovariances(r)?;

        let mut pf = Array2::zeros((r, r));
        for i in 0..r {
            for j in i..r {
                let value = if i == 0 {
                    gamma[j]
                } else {
                    pf[[i - 1, j - 1]] - psi[i - 1] * psi[j - 1]
                };
                pf[[i, j]] = value;
                pf[[j, i]] = value;
            }
        }

        // phi is indexed from lag 1 at position 0
        let mut l = Array2::eye(r);
        for i in 1..r {
            for k in 1..=i {
                l[[i, i - k]] = -self.phi[k - 1];
            }
        }

        let p0 = l.dot(&pf).dot(&l.t());
        p0.iter().all(|v| v.is_finite()).then_some(p0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_lyapunov(ss: &StateSpace) {
        let p0 = ss.stationary_covariance().unwrap();
        let next = ss.t().dot(&p0).dot(&ss.t().t())
            + ss
                .r_vec()
                .view()
                .insert_axis(Axis(1))
                .dot(&ss.r_vec().view().insert_axis(Axis(0)));
        for (a, b) in p0.iter().zip(next.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn ar1() {
        let ss = StateSpace::new(&[0.5], &[]);
        assert_eq!(ss.r(), 1);
        assert_abs_diff_eq!(ss.t()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.r_vec()[0], 1.0, epsilon = 1e-12);
        let p0 = ss.stationary_covariance().unwrap();
        assert_abs_diff_eq!(p0[[0, 0]], 1.0 / (1.0 - 0.25), epsilon = 1e-12);
    }

    #[test]
    fn ma1() {
        let ss = StateSpace::new(&[], &[0.8]);
        assert_eq!(ss.r(), 2);
        // T = [[0, 1], [0, 0]]
        assert_abs_diff_eq!(ss.t()[[0, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[1, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.r_vec()[1], 0.8, epsilon = 1e-12);

        // x = (y_t, theta e_t)
        let p0 = ss.stationary_covariance().unwrap();
        assert_abs_diff_eq!(p0[[0, 0]], 1.64, epsilon = 1e-12);
        assert_abs_diff_eq!(p0[[0, 1]], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(p0[[1, 1]], 0.64, epsilon = 1e-12);
    }

    #[test]
    fn arma22_companion() {
        let ss = StateSpace::new(&[0.5, -0.3], &[0.4, 0.2]);
        assert_eq!(ss.r(), 3);
        // T = [[0.5, 1, 0], [-0.3, 0, 1], [0, 0, 0]]
        assert_abs_diff_eq!(ss.t()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[1, 0]], -0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[1, 2]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[2, 0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.r_vec()[2], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn arma00() {
        let ss = StateSpace::new(&[], &[]);
        assert_eq!(ss.r(), 1);
        let p0 = ss.stationary_covariance().unwrap();
        assert_abs_diff_eq!(p0[[0, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn arma11_variance() {
        let (phi, theta) = (0.7, 0.3);
        let ss = StateSpace::new(&[phi], &[theta]);
        let p0 = ss.stationary_covariance().unwrap();
        let gamma0 = (1.0 + 2.0 * phi * theta + theta * theta) / (1.0 - phi * phi);
        assert_abs_diff_eq!(p0[[0, 0]], gamma0, epsilon = 1e-12);
    }

    #[test]
    fn stationary_covariance_is_fixed_point() {
        assert_lyapunov(&StateSpace::new(&[0.7], &[0.3]));
        assert_lyapunov(&StateSpace::new(&[0.6, -0.2], &[]));
        assert_lyapunov(&StateSpace::new(&[], &[0.4, 0.2]));
        assert_lyapunov(&StateSpace::new(&[0.5, -0.3, 0.1], &[0.4]));
        let ar = crate::params::expand_ar(&[0.4], &[0.5], 4);
        let ma = crate::params::expand_ma(&[0.3], &[-0.4], 4);
        assert_lyapunov(&StateSpace::new(&ar, &ma));
    }

    #[test]
    fn structured_prediction_matches_dense() {
        let ss = StateSpace::new(&[0.5, -0.3], &[0.4, 0.2]);
        let a = Array1::from(vec![1.0, -2.0, 0.5]);
        let dense = ss.t().dot(&a);
        for (x, y) in ss.predict_state(&a).iter().zip(dense.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }

        let p = Array2::from_shape_fn((3, 3), |(i, j)| 1.0 / (1.0 + i as f64 + j as f64));
        let dense = ss.t().dot(&p).dot(&ss.t().t()) + &ss.rrt;
        for (x, y) in ss.predict_covariance(&p).iter().zip(dense.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateSpace>();
    }
}
