//! Nelder-Mead optimizer for (S)ARIMA maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimize the negative concentrated
//! log-likelihood over unconstrained PACF parameters, retrying from
//! alternate starting points until one ends at a feasible optimum.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, warn};

use crate::diff;
use crate::error::ArimaError;
use crate::fit::{Differencing, FitResult};
use crate::kalman;
use crate::order::{CandidateModel, FitOptions};
use crate::params::{Coefficients, Layout};
use crate::state_space::StateSpace;

/// Offset used by the last starting point.
const START_OFFSET: f64 = 0.1;

/// Edge length of the initial simplex.
const SIMPLEX_STEP: f64 = 0.5;

/// Fits a candidate model to data via exact MLE.
///
/// This is the full pipeline:
/// 1. Validate data and order
/// 2. Difference, check the working series, remove the intercept
/// 3. Optimize the concentrated log-likelihood from successive starting points
/// 4. Extract final parameters via a full Kalman pass
#[tracing::instrument(level = "debug", skip(data, options), fields(model = %model, n = data.len()))]
pub(crate) fn fit_model(
    model: &CandidateModel,
    data: &[f64],
    options: &FitOptions,
) -> Result<FitResult, ArimaError> {
    // 1. Validate
    if data.is_empty() {
        return Err(ArimaError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(ArimaError::NonFiniteData);
    }
    if let Some(s) = model.seasonal_order()
        && s.period() < 2
    {
        return Err(ArimaError::InvalidParameter {
            name: "m",
            value: s.period(),
            reason: "seasonal period must be at least 2",
        });
    }
    let min = model.min_observations();
    if data.len() <= min {
        return Err(ArimaError::InsufficientData {
            model: model.to_string(),
            n: data.len(),
            min,
        });
    }

    // 2. Difference and center
    let order = model.order();
    let (seasonal_d, period) = model
        .seasonal_order()
        .map_or((0, 1), |s| (s.d(), s.period()));
    let working = diff::apply(data, order.d(), seasonal_d, period);
    if is_constant(&working, data) {
        return Err(ArimaError::ConstantData {
            model: model.to_string(),
        });
    }

    let include_mean = options
        .include_mean
        .unwrap_or(model.total_differencing() == 0);
    let intercept = include_mean.then(|| kairos_stats::mean(&working));
    let centered: Vec<f64> = working
        .iter()
        .map(|x| x - intercept.unwrap_or(0.0))
        .collect();

    // 3. Optimize
    let layout = Layout::new(model);
    let (coeffs, converged) = if layout.dim() == 0 {
        (layout.coefficients(&[]), true)
    } else {
        optimize(model, &layout, &centered, options)?
    };

    // 4. Full Kalman pass
    let ss = StateSpace::new(&coeffs.full_ar(period), &coeffs.full_ma(period));
    let output = kalman::kalman_full(&ss, &centered).ok_or_else(|| ArimaError::NonConvergence {
        model: model.to_string(),
        attempts: 1,
    })?;

    let poly = diff::polynomial(order.d(), seasonal_d, period);
    let differencing = Differencing {
        history: data[data.len() - (poly.len() - 1)..].to_vec(),
        poly,
    };

    debug!(
        log_likelihood = output.log_likelihood,
        sigma2 = output.sigma2,
        converged,
        "fit complete"
    );

    Ok(FitResult::new(
        *model,
        coeffs,
        intercept,
        converged,
        output,
        ss,
        differencing,
    ))
}

/// Zero spread after differencing, relative to the scale of the input.
fn is_constant(working: &[f64], data: &[f64]) -> bool {
    let scale = data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let min = working.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = working.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    max - min <= 1e-12 * scale
}

/// Runs Nelder-Mead from each starting point in turn and returns the first
/// feasible optimum with its convergence flag.
fn optimize(
    model: &CandidateModel,
    layout: &Layout,
    data: &[f64],
    options: &FitOptions,
) -> Result<(Coefficients, bool), ArimaError> {
    let starts = starting_points(layout, data);
    let attempts = starts.len();

    for (attempt, x0) in starts.into_iter().enumerate() {
        let Some((best, converged)) = run_nelder_mead(layout, data, x0, options) else {
            debug!(attempt, "optimizer produced no usable point");
            continue;
        };
        let coeffs = layout.coefficients(&best);
        if !coeffs.is_feasible(layout.period) {
            debug!(attempt, "optimum has a root inside the feasibility margin");
            continue;
        }
        if !converged {
            warn!(
                model = %model,
                max_iters = options.max_iters,
                "optimizer hit its iteration cap; keeping the best feasible point"
            );
        }
        return Ok((coeffs, converged));
    }

    Err(ArimaError::NonConvergence {
        model: model.to_string(),
        attempts,
    })
}

fn run_nelder_mead(
    layout: &Layout,
    data: &[f64],
    x0: Vec<f64>,
    options: &FitOptions,
) -> Option<(Vec<f64>, bool)> {
    let dim = x0.len();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(x0.clone());
    for i in 0..dim {
        let mut vertex = x0.clone();
        vertex[i] += SIMPLEX_STEP;
        simplex.push(vertex);
    }

    let cost = ArimaCost {
        data,
        layout: *layout,
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(options.sd_tolerance)
        .ok()?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(options.max_iters))
        .run()
        .ok()?;

    let state = result.state();
    if !(state.get_best_cost() < f64::MAX) {
        return None;
    }
    let best = state.get_best_param()?.clone();
    let converged = state.get_termination_reason() == Some(&TerminationReason::SolverConverged);
    Some((best, converged))
}

/// Starting points in order: Yule-Walker estimates, zeros, a small offset.
fn starting_points(layout: &Layout, data: &[f64]) -> Vec<Vec<f64>> {
    let dim = layout.dim();
    let max_lag = layout.p.max(layout.sp * layout.period);
    let rho = kairos_stats::acf(data, max_lag);

    let seasonal_rho: Vec<f64> = (1..=layout.sp).map(|k| rho[k * layout.period]).collect();
    let yule_walker = Coefficients {
        ar: yule_walker_coeffs(&rho[1..=layout.p]),
        ma: vec![0.0; layout.q],
        sar: yule_walker_coeffs(&seasonal_rho),
        sma: vec![0.0; layout.sq],
    };

    vec![
        layout.unconstrained(&yule_walker),
        vec![0.0; dim],
        vec![START_OFFSET; dim],
    ]
}

/// Yule-Walker AR coefficients from autocorrelations `rho[0] = rho(1), ...`
/// by the Durbin-Levinson recursion. If the recursion degenerates the
/// remaining coefficients stay zero.
fn yule_walker_coeffs(rho: &[f64]) -> Vec<f64> {
    let k_max = rho.len();
    let mut phi: Vec<f64> = Vec::with_capacity(k_max);
    for k in 0..k_max {
        let num = rho[k] - (0..k).map(|j| phi[j] * rho[k - 1 - j]).sum::<f64>();
        let den = 1.0 - (0..k).map(|j| phi[j] * rho[j]).sum::<f64>();
        if !(den > 0.0) {
            break;
        }
        let pkk = num / den;
        if !pkk.is_finite() || pkk.abs() >= 1.0 {
            break;
        }
        let prev = phi.clone();
        for j in 0..k {
            phi[j] = prev[j] - pkk * prev[k - 1 - j];
        }
        phi.push(pkk);
    }
    phi.resize(k_max, 0.0);
    phi
}

/// Cost function for argmin: negative concentrated log-likelihood.
struct ArimaCost<'a> {
    data: &'a [f64],
    layout: Layout,
}

impl CostFunction for ArimaCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let coeffs = self.layout.coefficients(x);
        let period = self.layout.period;
        let ss = StateSpace::new(&coeffs.full_ar(period), &coeffs.full_ma(period));

        match kalman::kalman_concentrated_loglik(&ss, self.data) {
            Some(loglik) => Ok(-loglik),
            None => Ok(f64::MAX),
        }
    }
}
