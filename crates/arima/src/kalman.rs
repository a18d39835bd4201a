//! Kalman filter for ARMA likelihood evaluation.
//!
//! Implements a univariate Kalman filter operating on the state-space
//! representation from [`crate::state_space`], initialized with the exact
//! stationary covariance. The innovation variance is concentrated out:
//!
//! ```text
//! sigma2 = (1/n) * sum v_t^2 / F_t
//! loglik = -n/2 ln(2 pi) - n/2 ln(sigma2) - n/2 - 1/2 sum ln F_t
//! ```
//!
//! Once the predicted covariance stops changing, the covariance updates are
//! skipped for the rest of the series.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

use crate::state_space::StateSpace;

/// Relative change in the predicted covariance below which the filter is
/// considered to be in steady state.
const STEADY_STATE_TOL: f64 = 1e-10;

/// Output of a full filter pass.
#[derive(Clone, Debug)]
pub(crate) struct KalmanOutput {
    /// Concentrated innovation variance.
    pub(crate) sigma2: f64,
    /// Exact Gaussian log-likelihood at `sigma2`.
    pub(crate) log_likelihood: f64,
    /// One-step prediction errors `v_t`.
    pub(crate) residuals: Vec<f64>,
    /// Predicted state `a[n+1|n]`.
    pub(crate) state: Array1<f64>,
    /// Predicted state covariance `P[n+1|n]`, in units of `sigma2`.
    pub(crate) covariance: Array2<f64>,
}

struct Pass {
    ssq: f64,
    sum_log_f: f64,
    residuals: Vec<f64>,
    state: Array1<f64>,
    covariance: Array2<f64>,
}

fn run(ss: &StateSpace, data: &[f64], keep_residuals: bool) -> Option<Pass> {
    let r = ss.r();
    let mut a = Array1::zeros(r);
    let mut p = ss.stationary_covariance()?;
    let mut ssq = 0.0;
    let mut sum_log_f = 0.0;
    let mut residuals = Vec::with_capacity(if keep_residuals { data.len() } else { 0 });
    let mut steady = false;

    for &y in data {
        let f = p[[0, 0]];
        if !(f.is_finite() && f > 0.0) {
            return None;
        }
        let v = y - a[0];
        ssq += v * v / f;
        sum_log_f += f.ln();
        if keep_residuals {
            residuals.push(v);
        }

        // update with Z = e1: gain is the first column of P over F
        let pz = p.column(0).to_owned();
        a.scaled_add(v / f, &pz);
        a = ss.predict_state(&a);

        if !steady {
            let mut filtered = p.clone();
            for i in 0..r {
                for j in 0..r {
                    filtered[[i, j]] -= pz[i] * pz[j] / f;
                }
            }
            let next = ss.predict_covariance(&filtered);
            let change = next
                .iter()
                .zip(p.iter())
                .fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs()));
            steady = change < STEADY_STATE_TOL * f;
            p = next;
        }
    }

    Some(Pass {
        ssq,
        sum_log_f,
        residuals,
        state: a,
        covariance: p,
    })
}

fn concentrate(n: usize, ssq: f64, sum_log_f: f64) -> Option<(f64, f64)> {
    let nf = n as f64;
    let sigma2 = ssq / nf;
    if !(sigma2.is_finite() && sigma2 > 0.0) {
        return None;
    }
    let loglik = -0.5 * nf * ((2.0 * std::f64::consts::PI).ln() + sigma2.ln() + 1.0)
        - 0.5 * sum_log_f;
    loglik.is_finite().then_some((sigma2, loglik))
}

/// Concentrated log-likelihood only; `None` when the filter breaks down.
pub(crate) fn kalman_concentrated_loglik(ss: &StateSpace, data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let pass = run(ss, data, false)?;
    concentrate(data.len(), pass.ssq, pass.sum_log_f).map(|(_, ll)| ll)
}

/// Full pass keeping residuals and the final predicted state.
pub(crate) fn kalman_full(ss: &StateSpace, data: &[f64]) -> Option<KalmanOutput> {
    if data.is_empty() {
        return None;
    }
    let pass = run(ss, data, true)?;
    let (sigma2, log_likelihood) = concentrate(data.len(), pass.ssq, pass.sum_log_f)?;
    Some(KalmanOutput {
        sigma2,
        log_likelihood,
        residuals: pass.residuals,
        state: pass.state,
        covariance: pass.covariance,
    })
}
