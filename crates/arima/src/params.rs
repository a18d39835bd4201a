//! Coefficient parametrization and polynomial helpers.
//!
//! The optimizer works on unconstrained parameters. Each block (AR, MA,
//! seasonal AR, seasonal MA) is mapped through `tanh` to partial
//! autocorrelations in (-1, 1) and then through the Levinson-Durbin
//! recursion to polynomial coefficients (Jones 1980, Monahan 1984), so
//! every trial point is stationary and invertible.
//!
//! **Not part of the public API.**

use crate::order::CandidateModel;

/// Modulus every root of the expanded AR and MA polynomials must reach.
pub(crate) const ROOT_THRESHOLD: f64 = 1.01;

/// Partial autocorrelations are clipped to this magnitude before `atanh`
/// when deriving starting values.
pub(crate) const MAX_START_PARTIAL: f64 = 0.95;

/// Maps unconstrained parameters to stationary AR coefficients
/// (`y[t] = sum phi[i] y[t-1-i] + ...`).
///
/// Step 1: `r_k = tanh(alpha_k)` maps each parameter to (-1, 1).
/// Step 2: Levinson-Durbin recursion converts partial autocorrelations
///         to polynomial coefficients.
pub(crate) fn unconstrained_to_coeffs(alpha: &[f64]) -> Vec<f64> {
    let r: Vec<f64> = alpha.iter().map(|a| a.tanh()).collect();
    partials_to_coeffs(&r)
}

fn partials_to_coeffs(r: &[f64]) -> Vec<f64> {
    let p = r.len();
    if p == 0 {
        return Vec::new();
    }
    let mut phi = vec![0.0; p];
    let mut prev = vec![0.0; p];
    phi[0] = r[0];
    for k in 1..p {
        prev.copy_from_slice(&phi);
        phi[k] = r[k];
        for j in 0..k {
            phi[j] = prev[j] - r[k] * prev[k - 1 - j];
        }
    }
    phi
}

/// Inverse Levinson-Durbin (step-down) recursion: AR coefficients back to
/// partial autocorrelations. Returns `None` if any partial reaches `|r| >= 1`,
/// i.e. the polynomial `1 - sum phi[i] z^(i+1)` has a root on or inside the
/// unit circle.
pub(crate) fn coeffs_to_partials(phi: &[f64]) -> Option<Vec<f64>> {
    let mut current = phi.to_vec();
    let mut partials = vec![0.0; phi.len()];
    for k in (0..phi.len()).rev() {
        let rk = current[k];
        if !rk.is_finite() || rk.abs() >= 1.0 {
            return None;
        }
        partials[k] = rk;
        let denom = 1.0 - rk * rk;
        let next: Vec<f64> = (0..k)
            .map(|j| (current[j] + rk * current[k - 1 - j]) / denom)
            .collect();
        current = next;
    }
    Some(partials)
}

/// Unconstrained parameters whose image under [`unconstrained_to_coeffs`]
/// approximates `phi`. Non-stationary input falls back to zeros.
pub(crate) fn coeffs_to_unconstrained(phi: &[f64]) -> Vec<f64> {
    match coeffs_to_partials(phi) {
        Some(r) => r
            .iter()
            .map(|rk| rk.clamp(-MAX_START_PARTIAL, MAX_START_PARTIAL).atanh())
            .collect(),
        None => vec![0.0; phi.len()],
    }
}

/// Whether every root of `1 - sum phi[i] z^(i+1)` has modulus `>= threshold`.
///
/// Substituting `z = threshold * w` scales the coefficients by
/// `threshold^(i+1)`; the scaled polynomial is stable iff the step-down
/// recursion keeps every partial inside (-1, 1).
pub(crate) fn roots_outside(phi: &[f64], threshold: f64) -> bool {
    let scaled: Vec<f64> = phi
        .iter()
        .enumerate()
        .map(|(i, c)| c * threshold.powi(i as i32 + 1))
        .collect();
    coeffs_to_partials(&scaled).is_some()
}

/// Product of two polynomials given by their coefficients in ascending powers.
pub(crate) fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Polynomial `1 + sign * sum c[i] B^((i+1)*lag)` in ascending powers.
fn lag_polynomial(coeffs: &[f64], lag: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coeffs.len() * lag + 1];
    poly[0] = 1.0;
    for (i, &c) in coeffs.iter().enumerate() {
        poly[(i + 1) * lag] = sign * c;
    }
    poly
}

/// Full-lag AR coefficients of `(1 - sum phi B^i)(1 - sum Phi B^(i m))`.
pub(crate) fn expand_ar(ar: &[f64], sar: &[f64], period: usize) -> Vec<f64> {
    let product = poly_mul(&lag_polynomial(ar, 1, -1.0), &lag_polynomial(sar, period, -1.0));
    product[1..].iter().map(|c| -c).collect()
}

/// Full-lag MA coefficients of `(1 + sum theta B^i)(1 + sum Theta B^(i m))`.
pub(crate) fn expand_ma(ma: &[f64], sma: &[f64], period: usize) -> Vec<f64> {
    let product = poly_mul(&lag_polynomial(ma, 1, 1.0), &lag_polynomial(sma, period, 1.0));
    product[1..].to_vec()
}

/// ARMA coefficient blocks of one model.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Coefficients {
    pub(crate) ar: Vec<f64>,
    pub(crate) ma: Vec<f64>,
    pub(crate) sar: Vec<f64>,
    pub(crate) sma: Vec<f64>,
}

impl Coefficients {
    /// Expanded (full-lag) AR polynomial coefficients.
    pub(crate) fn full_ar(&self, period: usize) -> Vec<f64> {
        expand_ar(&self.ar, &self.sar, period)
    }

    /// Expanded (full-lag) MA polynomial coefficients.
    pub(crate) fn full_ma(&self, period: usize) -> Vec<f64> {
        expand_ma(&self.ma, &self.sma, period)
    }

    /// Every root of both expanded polynomials has modulus `>= ROOT_THRESHOLD`.
    pub(crate) fn is_feasible(&self, period: usize) -> bool {
        let neg_ma: Vec<f64> = self.full_ma(period).iter().map(|c| -c).collect();
        roots_outside(&self.full_ar(period), ROOT_THRESHOLD)
            && roots_outside(&neg_ma, ROOT_THRESHOLD)
    }
}

/// Block layout `[ar(p) | ma(q) | sar(P) | sma(Q)]` of the optimizer vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) p: usize,
    pub(crate) q: usize,
    pub(crate) sp: usize,
    pub(crate) sq: usize,
    pub(crate) period: usize,
}

impl Layout {
    pub(crate) fn new(model: &CandidateModel) -> Self {
        let order = model.order();
        let (sp, sq, period) = model
            .seasonal_order()
            .map_or((0, 0, 1), |s| (s.p(), s.q(), s.period()));
        Self {
            p: order.p(),
            q: order.q(),
            sp,
            sq,
            period,
        }
    }

    pub(crate) fn dim(&self) -> usize {
        self.p + self.q + self.sp + self.sq
    }

    /// Maps an unconstrained vector to coefficient blocks. MA blocks are the
    /// negated transform so that `1 + sum theta z^i` is invertible.
    pub(crate) fn coefficients(&self, x: &[f64]) -> Coefficients {
        let (ar, rest) = x.split_at(self.p);
        let (ma, rest) = rest.split_at(self.q);
        let (sar, sma) = rest.split_at(self.sp);
        let negate = |v: Vec<f64>| -> Vec<f64> { v.into_iter().map(|c| -c).collect() };
        Coefficients {
            ar: unconstrained_to_coeffs(ar),
            ma: negate(unconstrained_to_coeffs(ma)),
            sar: unconstrained_to_coeffs(sar),
            sma: negate(unconstrained_to_coeffs(sma)),
        }
    }

    /// Inverse of [`coefficients`](Self::coefficients), used for starting values.
    pub(crate) fn unconstrained(&self, coeffs: &Coefficients) -> Vec<f64> {
        let neg = |v: &[f64]| v.iter().map(|c| -c).collect::<Vec<_>>();
        let mut x = Vec::with_capacity(self.dim());
        x.extend(coeffs_to_unconstrained(&coeffs.ar));
        x.extend(coeffs_to_unconstrained(&neg(&coeffs.ma)));
        x.extend(coeffs_to_unconstrained(&coeffs.sar));
        x.extend(coeffs_to_unconstrained(&neg(&coeffs.sma)));
        x
    }
}
