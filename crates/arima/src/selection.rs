//! Stepwise AIC order search (Hyndman-Khandakar style).
//!
//! Differencing degrees are chosen first by tests (seasonal strength for
//! `D`, KPSS for `d`), since AIC values of differently differenced series
//! are not comparable. The ARMA orders are then found by local search:
//! fit a few seeds, then repeatedly fit the +/-1 neighbours of the current
//! best and move while AIC strictly improves.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::diff;
use crate::error::ArimaError;
use crate::fit::FitResult;
use crate::order::{CandidateModel, FitOptions, Order, SeasonalOrder};

/// Upper bounds on each order component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBounds {
    /// Maximum AR order `p`.
    pub max_p: usize,
    /// Maximum differencing degree `d`.
    pub max_d: usize,
    /// Maximum MA order `q`.
    pub max_q: usize,
    /// Maximum seasonal AR order `P`.
    pub max_seasonal_p: usize,
    /// Maximum seasonal differencing degree `D`.
    pub max_seasonal_d: usize,
    /// Maximum seasonal MA order `Q`.
    pub max_seasonal_q: usize,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            max_p: 10,
            max_d: 10,
            max_q: 10,
            max_seasonal_p: 10,
            max_seasonal_d: 10,
            max_seasonal_q: 10,
        }
    }
}

/// Starting `(p, q, P, Q)` of the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seed {
    /// AR order.
    pub p: usize,
    /// MA order.
    pub q: usize,
    /// Seasonal AR order, ignored for non-seasonal searches.
    pub seasonal_p: usize,
    /// Seasonal MA order, ignored for non-seasonal searches.
    pub seasonal_q: usize,
}

impl Seed {
    /// Creates a seed `(p, q, P, Q)`.
    pub fn new(p: usize, q: usize, seasonal_p: usize, seasonal_q: usize) -> Self {
        Self {
            p,
            q,
            seasonal_p,
            seasonal_q,
        }
    }
}

/// Configuration for [`OrderSearch`].
///
/// Every tunable of the search lives here; see [`SearchConfig::default()`]
/// for the values used by the `kairos` binary.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Per-component upper bounds.
    pub bounds: SearchBounds,
    /// Practical cap applied on top of every bound.
    pub ceiling: usize,
    /// Fixed differencing degree; chosen by the KPSS test when `None`.
    pub d: Option<usize>,
    /// Fixed seasonal differencing degree; chosen by seasonal strength when `None`.
    pub seasonal_d: Option<usize>,
    /// Starting candidates.
    pub seeds: Vec<Seed>,
    /// Maximum number of neighbourhood steps.
    pub max_steps: usize,
    /// KPSS critical value above which another first difference is taken.
    pub kpss_critical_value: f64,
    /// Seasonal strength above which another seasonal difference is taken.
    pub seasonal_strength_threshold: f64,
    /// Fit the candidates of one step in parallel.
    pub parallel: bool,
    /// Log every fitted candidate at `info` level.
    pub trace: bool,
    /// Options passed to every fit.
    pub fit_options: FitOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bounds: SearchBounds::default(),
            ceiling: 5,
            d: None,
            seasonal_d: None,
            seeds: vec![
                Seed::new(2, 2, 1, 1),
                Seed::new(0, 0, 0, 0),
                Seed::new(1, 0, 1, 0),
                Seed::new(0, 1, 0, 1),
            ],
            max_steps: 100,
            kpss_critical_value: 0.463,
            seasonal_strength_threshold: 0.64,
            parallel: true,
            trace: false,
            fit_options: FitOptions::default(),
        }
    }
}

impl SearchConfig {
    /// Sets the per-component bounds.
    pub fn with_bounds(mut self, bounds: SearchBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the practical ceiling.
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Fixes the differencing degree `d`.
    pub fn with_d(mut self, d: usize) -> Self {
        self.d = Some(d);
        self
    }

    /// Fixes the seasonal differencing degree `D`.
    pub fn with_seasonal_d(mut self, seasonal_d: usize) -> Self {
        self.seasonal_d = Some(seasonal_d);
        self
    }

    /// Replaces the starting candidates.
    pub fn with_seeds(mut self, seeds: Vec<Seed>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Sets the step cap.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the KPSS critical value.
    pub fn with_kpss_critical_value(mut self, value: f64) -> Self {
        self.kpss_critical_value = value;
        self
    }

    /// Sets the seasonal strength threshold.
    pub fn with_seasonal_strength_threshold(mut self, value: f64) -> Self {
        self.seasonal_strength_threshold = value;
        self
    }

    /// Enables or disables parallel candidate fits.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables per-candidate `info` logging.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Sets the options passed to every fit.
    pub fn with_fit_options(mut self, fit_options: FitOptions) -> Self {
        self.fit_options = fit_options;
        self
    }

    /// Checks the settings that would make the search meaningless.
    ///
    /// # Errors
    ///
    /// [`ArimaError::InvalidParameter`] if `ceiling`, `max_steps` or the
    /// seed list is zero/empty.
    pub fn validate(&self) -> Result<(), ArimaError> {
        if self.ceiling == 0 {
            return Err(ArimaError::InvalidParameter {
                name: "ceiling",
                value: 0,
                reason: "must be at least 1",
            });
        }
        if self.max_steps == 0 {
            return Err(ArimaError::InvalidParameter {
                name: "max_steps",
                value: 0,
                reason: "must be at least 1",
            });
        }
        if self.seeds.is_empty() {
            return Err(ArimaError::InvalidParameter {
                name: "seeds",
                value: 0,
                reason: "at least one seed is required",
            });
        }
        Ok(())
    }
}

/// One fitted candidate of a search, in generation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Visited {
    /// Candidate model.
    pub model: CandidateModel,
    /// AIC, `f64::INFINITY` when the fit failed or did not converge.
    pub aic: f64,
    /// Position in the order candidates were generated.
    pub generation: usize,
}

/// Result of [`OrderSearch::search()`].
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Selected model.
    pub model: CandidateModel,
    /// AIC of the selected model.
    pub aic: f64,
    /// Fit of the selected model on the searched series.
    pub fit: FitResult,
    /// Every candidate fitted, in generation order.
    pub visited: Vec<Visited>,
    /// Number of neighbourhood steps taken.
    pub steps: usize,
    /// Whether the search stopped at `max_steps`.
    pub hit_step_cap: bool,
}

/// Effective bounds after the ceiling, for one search.
#[derive(Clone, Copy, Debug)]
struct Limits {
    p: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_q: usize,
}

/// Orders candidates: lower AIC, then fewer parameters, then earlier generation.
fn rank(a: (f64, usize, usize), b: (f64, usize, usize)) -> Ordering {
    a.0.total_cmp(&b.0)
        .then(a.1.cmp(&b.1))
        .then(a.2.cmp(&b.2))
}

/// Stepwise AIC search over ARIMA or seasonal ARIMA orders.
///
/// ```ignore
/// let outcome = OrderSearch::new(SearchConfig::default()).search(&train, true, 12)?;
/// println!("{} AIC={:.2}", outcome.model, outcome.aic);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrderSearch {
    config: SearchConfig,
}

impl OrderSearch {
    /// Creates a search with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches the order space for the AIC-minimizing model of `train`.
    ///
    /// Candidates that fail to fit, fail to converge or end outside the
    /// stationarity/invertibility region count as AIC = +infinity.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaError::InvalidParameter`] | invalid config, or seasonal with `period < 2` |
    /// | [`ArimaError::EmptyData`] | `train` is empty |
    /// | [`ArimaError::NonFiniteData`] | `train` has NaN or infinite values |
    /// | [`ArimaError::NoConvergentModel`] | every candidate failed |
    #[tracing::instrument(skip(self, train), fields(n = train.len()))]
    pub fn search(
        &self,
        train: &[f64],
        seasonal: bool,
        period: usize,
    ) -> Result<SearchOutcome, ArimaError> {
        let config = &self.config;
        config.validate()?;
        if seasonal && period < 2 {
            return Err(ArimaError::InvalidParameter {
                name: "m",
                value: period,
                reason: "seasonal period must be at least 2",
            });
        }
        if train.is_empty() {
            return Err(ArimaError::EmptyData);
        }
        if train.iter().any(|x| !x.is_finite()) {
            return Err(ArimaError::NonFiniteData);
        }

        let cap = |bound: usize| bound.min(config.ceiling);
        let bounds = config.bounds;
        let limits = if seasonal {
            Limits {
                p: cap(bounds.max_p),
                q: cap(bounds.max_q),
                seasonal_p: cap(bounds.max_seasonal_p),
                seasonal_q: cap(bounds.max_seasonal_q),
            }
        } else {
            Limits {
                p: cap(bounds.max_p),
                q: cap(bounds.max_q),
                seasonal_p: 0,
                seasonal_q: 0,
            }
        };

        let seasonal_d = if seasonal {
            let max = cap(bounds.max_seasonal_d);
            config.seasonal_d.map_or_else(
                || diff::seasonal_diffs(train, period, max, config.seasonal_strength_threshold),
                |fixed| fixed.min(max),
            )
        } else {
            0
        };
        let max_d = cap(bounds.max_d);
        let d = config.d.map_or_else(
            || {
                let work = diff::apply(train, 0, seasonal_d, period);
                diff::regular_diffs(&work, max_d, config.kpss_critical_value)
            },
            |fixed| fixed.min(max_d),
        );
        info!(d, seasonal_d, "differencing selected");

        let make = |s: Seed| {
            let order = Order::new(s.p, d, s.q);
            let seasonal_order =
                seasonal.then(|| SeasonalOrder::new(s.seasonal_p, seasonal_d, s.seasonal_q, period));
            CandidateModel::new(order, seasonal_order)
        };

        let mut seeds: Vec<Seed> = Vec::with_capacity(config.seeds.len());
        for seed in &config.seeds {
            let clamped = clamp_seed(*seed, &limits);
            if !seeds.contains(&clamped) {
                seeds.push(clamped);
            }
        }

        let mut seen: BTreeSet<Seed> = BTreeSet::new();
        let mut visited: Vec<Visited> = Vec::new();

        let seed_fits = self.evaluate(train, &seeds, &make);
        let mut best = self.absorb(&mut visited, &mut seen, &seeds, seed_fits, &make);

        let mut steps = 0;
        let mut hit_step_cap = false;
        while let Some(incumbent) = best.as_ref() {
            if steps >= config.max_steps {
                warn!(
                    max_steps = config.max_steps,
                    best = %make(incumbent.seed),
                    "order search hit its step cap"
                );
                hit_step_cap = true;
                break;
            }
            let batch: Vec<Seed> = neighbours(incumbent.seed, &limits)
                .into_iter()
                .filter(|s| !seen.contains(s))
                .collect();
            if batch.is_empty() {
                break;
            }
            steps += 1;

            let incumbent_aic = incumbent.fit.aic();
            let fits = self.evaluate(train, &batch, &make);
            match self.absorb(&mut visited, &mut seen, &batch, fits, &make) {
                Some(challenger) if challenger.fit.aic() < incumbent_aic => {
                    debug!(
                        step = steps,
                        from = incumbent_aic,
                        to = challenger.fit.aic(),
                        "moved to neighbour"
                    );
                    best = Some(challenger);
                }
                _ => break,
            }
        }

        let Some(Incumbent { seed, fit, .. }) = best else {
            return Err(ArimaError::NoConvergentModel {
                candidates: visited.len(),
            });
        };
        let model = make(seed);
        let aic = fit.aic();
        info!(model = %model, aic, candidates = visited.len(), steps, "order search complete");
        Ok(SearchOutcome {
            model,
            aic,
            fit,
            visited,
            steps,
            hit_step_cap,
        })
    }

    /// Fits a batch of candidates; failures and non-converged fits become `None`.
    fn evaluate(
        &self,
        train: &[f64],
        batch: &[Seed],
        make: &(dyn Fn(Seed) -> CandidateModel + Sync),
    ) -> Vec<Option<FitResult>> {
        let options = &self.config.fit_options;
        let fit_one = |seed: &Seed| {
            let model = make(*seed);
            match model.fit_with(train, options) {
                Ok(fit) if fit.converged() => Some(fit),
                Ok(_) => {
                    debug!(model = %model, "candidate did not converge");
                    None
                }
                Err(err) => {
                    debug!(model = %model, error = %err, "candidate failed");
                    None
                }
            }
        };
        if self.config.parallel {
            batch.par_iter().map(fit_one).collect()
        } else {
            batch.iter().map(fit_one).collect()
        }
    }

    /// Records a fitted batch in the trace and returns its best member.
    fn absorb(
        &self,
        visited: &mut Vec<Visited>,
        seen: &mut BTreeSet<Seed>,
        batch: &[Seed],
        fits: Vec<Option<FitResult>>,
        make: &(dyn Fn(Seed) -> CandidateModel + Sync),
    ) -> Option<Incumbent> {
        let mut best: Option<Incumbent> = None;
        for (seed, fit) in batch.iter().zip(fits) {
            seen.insert(*seed);
            let model = make(*seed);
            let generation = visited.len();
            let aic = fit.as_ref().map_or(f64::INFINITY, FitResult::aic);
            if self.config.trace {
                info!(model = %model, aic, "candidate");
            } else {
                debug!(model = %model, aic, "candidate");
            }
            visited.push(Visited {
                model,
                aic,
                generation,
            });

            let Some(fit) = fit else { continue };
            let candidate = Incumbent {
                seed: *seed,
                fit,
                generation,
            };
            let replace = best
                .as_ref()
                .is_none_or(|b| rank(candidate.key(), b.key()) == Ordering::Less);
            if replace {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Best candidate of a batch or of the search so far.
#[derive(Clone, Debug)]
struct Incumbent {
    seed: Seed,
    fit: FitResult,
    generation: usize,
}

impl Incumbent {
    fn key(&self) -> (f64, usize, usize) {
        (self.fit.aic(), self.fit.n_params(), self.generation)
    }
}

fn clamp_seed(seed: Seed, limits: &Limits) -> Seed {
    Seed::new(
        seed.p.min(limits.p),
        seed.q.min(limits.q),
        seed.seasonal_p.min(limits.seasonal_p),
        seed.seasonal_q.min(limits.seasonal_q),
    )
}

/// The +/-1 neighbours of `seed` on each of `p`, `q`, `P`, `Q`, within `limits`.
fn neighbours(seed: Seed, limits: &Limits) -> Vec<Seed> {
    let mut out = Vec::with_capacity(8);
    let mut push = |s: Seed| {
        if s != seed && !out.contains(&s) {
            out.push(s);
        }
    };
    let Seed {
        p,
        q,
        seasonal_p: sp,
        seasonal_q: sq,
    } = seed;
    if p > 0 {
        push(Seed::new(p - 1, q, sp, sq));
    }
    if p < limits.p {
        push(Seed::new(p + 1, q, sp, sq));
    }
    if q > 0 {
        push(Seed::new(p, q - 1, sp, sq));
    }
    if q < limits.q {
        push(Seed::new(p, q + 1, sp, sq));
    }
    if sp > 0 {
        push(Seed::new(p, q, sp - 1, sq));
    }
    if sp < limits.seasonal_p {
        push(Seed::new(p, q, sp + 1, sq));
    }
    if sq > 0 {
        push(Seed::new(p, q, sp, sq - 1));
    }
    if sq < limits.seasonal_q {
        push(Seed::new(p, q, sp, sq + 1));
    }
    out
}
