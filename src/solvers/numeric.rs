//! Numeric update: Newton-Raphson on `(n, m)` with a finite-difference Jacobian.

use nalgebra::{Matrix2, Vector2};

use super::profile::StageModel;
use super::StageSolution;
use crate::autodiff::jacobian_forward_difference;
use crate::error::{EnrichmentError, EnrichmentResult};

/// Relative forward-difference step.
const FD_STEP: f64 = 1e-7;

/// Solves the two key-concentration equations for the stage counts at a
/// fixed cut mass.
///
/// Stage counts that step below zero are clamped back to zero and the
/// iteration continues from there.
pub(crate) fn solve(
    model: &StageModel,
    mstar: f64,
    guess: (f64, f64),
    tolerance: f64,
    max_iterations: usize,
) -> EnrichmentResult<StageSolution> {
    let (mut n, mut m) = guess;
    let mut norm = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let residual = model.residual(mstar, n, m);
        norm = model.residual_norm(&residual);
        log::trace!("numeric iteration {iteration}: n = {n}, m = {m}, residual = {norm:e}");
        if norm < tolerance {
            return Ok(StageSolution { n, m, iterations: iteration, residual: norm });
        }

        let f = |x: &[f64]| model.residual(mstar, x[0], x[1]).to_vec();
        let jac = jacobian_forward_difference(f, &[n, m], &residual, FD_STEP);
        let j_mat = Matrix2::new(jac[(0, 0)], jac[(0, 1)], jac[(1, 0)], jac[(1, 1)]);
        let r_vec = Vector2::new(residual[0], residual[1]);

        // Solve J * dx = -F
        let dx = j_mat.lu().solve(&(-r_vec)).ok_or(EnrichmentError::NonConvergence {
            iterations: iteration,
            residual: norm,
        })?;

        n += dx[0];
        m += dx[1];
        if n < 0.0 || m < 0.0 {
            log::debug!("clamping negative stage counts n = {n}, m = {m}");
            n = n.max(0.0);
            m = m.max(0.0);
        }
        if !(n.is_finite() && m.is_finite()) {
            return Err(EnrichmentError::NonConvergence { iterations: iteration, residual: norm });
        }
    }

    Err(EnrichmentError::NonConvergence { iterations: max_iterations, residual: norm })
}
