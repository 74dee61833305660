//! Multicomponent cascade solver.
//!
//! Binary enrichment relations only track one key isotope. A real feed
//! carries several isotopes, all of which pass through the same stage
//! geometry, each with its own effective separation factor
//! `alphastar_i(alpha, mstar, M_i)`. This module finds the geometry that
//! satisfies the key-isotope targets for every isotope at once.
//!
//! # Solution Procedure
//!
//! The solve is split into two nested problems:
//!
//! 1. **Stage counts.** For a fixed cut mass `mstar`, find the enriching and
//!    stripping stage counts `(n, m)` such that the renormalized key
//!    concentrations at the product and tails ends equal their targets.
//!    Both strategies share the same residual routine:
//!    - [`SolverMethod::Numeric`]: Newton-Raphson on `(n, m)` with a
//!      finite-difference Jacobian.
//!    - [`SolverMethod::Symbolic`]: `m` is eliminated algebraically as a
//!      closed-form function of `n`, leaving one equation solved by Newton's
//!      method with exact forward-mode derivatives.
//! 2. **Cut mass.** The stage equations have a solution for a whole range of
//!    cut masses between the key isotope masses. The solver picks the one
//!    minimizing the total stage flow per unit feed, found by a bracketing
//!    golden-section search.
//!
//! Once converged, product and tails masses come from the binary mass
//! balance on the key isotope. Total flow and separative work count every
//! isotope, each weighted by the separative power a stage has for it.
//!
//! # Usage Pattern
//!
//! ```
//! use isocascade::cascade::default_uranium_cascade;
//! use isocascade::solvers::{multicomponent, SolverMethod};
//! use isocascade::nucname::U235;
//!
//! let feed = default_uranium_cascade();
//! let solved = multicomponent(&feed, SolverMethod::Numeric, 1e-11, 100).unwrap();
//!
//! assert!((solved.mat_prod.fraction(U235) - 0.05).abs() < 1e-9);
//! assert!((solved.mat_prod.mass() - 0.0989474).abs() < 1e-6);
//! // the input record is left untouched
//! assert_eq!(feed.mstar, 236.5);
//! ```

mod numeric;
mod profile;
mod search;
mod symbolic;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::binary::{self, MassAnchor};
use crate::cascade::Cascade;
use crate::data::{AtomicData, NuclideData};
use crate::error::{EnrichmentError, EnrichmentResult};
use crate::material::Material;

use profile::StageModel;
use search::GoldenSection;

/// Update rule used for the stage counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SolverMethod {
    /// Newton-Raphson on both stage counts with a finite-difference Jacobian (default)
    #[default]
    Numeric,
    /// Algebraic elimination of the stripping stages with exact derivatives
    Symbolic,
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMethod::Numeric => write!(f, "numeric"),
            SolverMethod::Symbolic => write!(f, "symbolic"),
        }
    }
}

impl FromStr for SolverMethod {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(SolverMethod::Numeric),
            "symbolic" => Ok(SolverMethod::Symbolic),
            other => Err(EnrichmentError::invalid(format!("unknown solver method '{other}'"))),
        }
    }
}

/// Configuration for the multicomponent solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Update rule for the stage counts
    pub method: SolverMethod,
    /// Convergence tolerance; relative on the key concentrations, absolute
    /// (plus machine precision) on the cut mass
    pub tolerance: f64,
    /// Iteration bound applied to each inner solve and to the cut-mass search
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig { method: SolverMethod::Numeric, tolerance: 1e-7, max_iterations: 100 }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the update rule.
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the maximum iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> EnrichmentResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EnrichmentError::invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(EnrichmentError::invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Statistics from a solver run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeStats {
    /// Steps of the cut-mass search
    pub outer_iterations: usize,
    /// Stage-count iterations summed over every cut mass tried
    pub inner_iterations: usize,
    /// Stage-count solves performed
    pub stage_solves: usize,
    /// Relative key-concentration residual of the returned cascade
    pub final_residual: f64,
    /// Final width of the cut-mass bracket
    pub mstar_bracket: f64,
    /// True if the initial cut mass lay outside the key masses and was
    /// replaced by their midpoint
    pub mstar_reset: bool,
}

/// Converged stage counts at one cut mass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageSolution {
    pub n: f64,
    pub m: f64,
    pub iterations: usize,
    pub residual: f64,
}

/// Multicomponent cascade solver bound to a nuclide data provider.
pub struct MulticomponentSolver<'d, D: NuclideData + ?Sized = AtomicData> {
    /// Solver settings
    pub config: SolverConfig,
    data: &'d D,
}

impl MulticomponentSolver<'static, AtomicData> {
    /// Creates a solver using the process-wide nuclide table.
    pub fn new(config: SolverConfig) -> Self {
        MulticomponentSolver { config, data: AtomicData::global() }
    }
}

impl Default for MulticomponentSolver<'static, AtomicData> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<'d, D: NuclideData + ?Sized> MulticomponentSolver<'d, D> {
    /// Creates a solver reading masses from `data`.
    pub fn with_data(config: SolverConfig, data: &'d D) -> Self {
        MulticomponentSolver { config, data }
    }

    /// Solves the cascade, returning a new record with every output set.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: unphysical cascade inputs or solver settings
    /// - `DataUnavailable`: a feed isotope has no atomic mass
    /// - `NonConvergence`: the iteration budget ran out
    pub fn solve(&self, cascade: &Cascade) -> EnrichmentResult<Cascade> {
        self.solve_with_stats(cascade).map(|(solved, _)| solved)
    }

    /// Solves the cascade and returns solver statistics alongside the result.
    pub fn solve_with_stats(&self, cascade: &Cascade) -> EnrichmentResult<(Cascade, CascadeStats)> {
        self.config.validate()?;
        cascade.validate()?;

        let model = StageModel::new(cascade, self.data)?;
        let xf = model.key_feed_fraction();
        if (xf - cascade.x_feed_j).abs() > 1e-9 * xf {
            log::warn!(
                "x_feed_j = {} differs from the feed fraction {xf} of {}; using the feed",
                cascade.x_feed_j,
                cascade.j
            );
        }

        let mut stats = CascadeStats::default();
        let (lower, upper) = model.cut_mass_bounds();
        let start = if cascade.mstar > lower && cascade.mstar < upper {
            cascade.mstar
        } else {
            log::warn!(
                "initial mstar {} outside [{lower}, {upper}]; restarting from the midpoint",
                cascade.mstar
            );
            stats.mstar_reset = true;
            0.5 * (lower + upper)
        };
        log::debug!(
            "solving {} -> {} cascade ({} isotopes, {} update) from mstar = {start}",
            cascade.j,
            cascade.k,
            model.isotopes.len(),
            self.config.method
        );

        let mut guess = (cascade.n, cascade.m);
        let search = GoldenSection {
            lower,
            upper,
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
        };
        let outcome = search.minimize(start, |mstar| {
            let sol = self.solve_stages(&model, mstar, guess)?;
            stats.stage_solves += 1;
            stats.inner_iterations += sol.iterations;
            guess = (sol.n, sol.m);
            let streams = model.streams(mstar, sol.n, sol.m);
            Ok(model.performance(mstar, &streams).total_flow)
        })?;

        let mstar = outcome.x;
        let sol = self.solve_stages(&model, mstar, guess)?;
        stats.stage_solves += 1;
        stats.inner_iterations += sol.iterations;
        stats.outer_iterations = outcome.iterations;
        stats.final_residual = sol.residual;
        stats.mstar_bracket = outcome.width;

        let solved = self.assemble(cascade, &model, mstar, sol)?;
        log::debug!(
            "converged: mstar = {mstar}, n = {}, m = {}, L/F = {} after {} search steps",
            solved.n,
            solved.m,
            solved.l_t_per_feed,
            stats.outer_iterations
        );
        Ok((solved, stats))
    }

    fn solve_stages(
        &self,
        model: &StageModel,
        mstar: f64,
        guess: (f64, f64),
    ) -> EnrichmentResult<StageSolution> {
        let SolverConfig { method, tolerance, max_iterations } = self.config;
        let sol = match method {
            SolverMethod::Numeric => numeric::solve(model, mstar, guess, tolerance, max_iterations),
            SolverMethod::Symbolic => symbolic::solve(model, mstar, guess, tolerance, max_iterations),
        }?;
        if sol.n < 0.0 || sol.m < 0.0 {
            return Err(EnrichmentError::NonConvergence {
                iterations: sol.iterations,
                residual: sol.residual,
            });
        }
        Ok(sol)
    }

    /// Builds the result record from converged stage counts.
    fn assemble(
        &self,
        cascade: &Cascade,
        model: &StageModel,
        mstar: f64,
        sol: StageSolution,
    ) -> EnrichmentResult<Cascade> {
        let streams = model.streams(mstar, sol.n, sol.m);
        let xf = model.key_feed_fraction();
        let xp = streams.prod_comp[model.key];
        let xt = streams.tail_comp[model.key];

        let feed_mass = cascade.mat_feed.mass();
        let anchor = MassAnchor::Feed(feed_mass);
        let prod_mass = binary::product(xf, xp, xt, anchor)?;
        let tail_mass = binary::tails(xf, xp, xt, anchor)?;
        let perf = model.performance(mstar, &streams);

        let swu_per_prod = perf.separative_work / streams.prod_per_feed;
        let isotopes = model.isotopes.iter().copied();
        let mat_prod = Material::new(isotopes.clone().zip(streams.prod_comp), prod_mass);
        let mat_tail = Material::new(isotopes.zip(streams.tail_comp), tail_mass);

        Ok(Cascade {
            mstar,
            n: sol.n,
            m: sol.m,
            x_feed_j: xf,
            x_prod_j: xp,
            x_tail_j: xt,
            mat_prod,
            mat_tail,
            l_t_per_feed: perf.total_flow,
            swu_per_feed: perf.separative_work,
            swu_per_prod,
            ..cascade.clone()
        })
    }
}

/// Solves `cascade` against the process-wide nuclide table.
///
/// # Arguments
///
/// * `cascade` - Physical inputs plus initial guesses for `mstar`, `n` and `m`
/// * `method` - Update rule for the stage counts
/// * `tolerance` - Convergence tolerance
/// * `max_iter` - Iteration bound for each inner solve and for the cut-mass search
pub fn multicomponent(
    cascade: &Cascade,
    method: SolverMethod,
    tolerance: f64,
    max_iter: usize,
) -> EnrichmentResult<Cascade> {
    let config = SolverConfig { method, tolerance, max_iterations: max_iter };
    MulticomponentSolver::new(config).solve(cascade)
}
