//! Symbolic update: eliminate `m`, then Newton on `n` with exact derivatives.
//!
//! The binary mass balance fixes the product cut `P/F` from the key
//! concentrations alone, and with it the recovery `p_j = (P/F)·xp_j/xf_j`
//! of the key isotope in the product. Writing `X = β_j^(m+1)` and
//! `Y = β_j^(-n)`, the key recovery `p_j = (X - 1)/(X - Y)` rearranges to
//!
//! ```text
//! X = (1 - p_j·Y) / (1 - p_j)
//! m = ln(X) / ln(β_j) - 1
//! ```
//!
//! so `m` is a closed-form function of `n`. What remains is the single
//! equation `x_prod_j(n, m(n)) = target`, solved by Newton's method with the
//! slope taken by forward-mode differentiation through the elimination.
//! Once the product composition hits its target the tails composition
//! follows from the mass balance.

use num_dual::*;

use super::profile::StageModel;
use super::StageSolution;
use crate::autodiff::derivative;
use crate::binary::prod_per_feed;
use crate::error::{EnrichmentError, EnrichmentResult};

/// Step halvings tried when a Newton step leaves the domain of `m(n)`.
const MAX_STEP_HALVINGS: usize = 30;

/// Closed-form stripping stages as a function of enriching stages.
struct Elimination {
    ln_beta: f64,
    /// Key recovery in the product
    prod_recovery: f64,
    /// Key recovery in the tails
    tail_recovery: f64,
}

impl Elimination {
    fn new(model: &StageModel, mstar: f64) -> EnrichmentResult<Self> {
        let xf = model.key_feed_fraction();
        let cut = prod_per_feed(xf, model.target_prod, model.target_tail)?;
        let prod_recovery = cut * model.target_prod / xf;
        if !(prod_recovery > 0.0 && prod_recovery < 1.0) {
            return Err(EnrichmentError::invalid(format!(
                "key recovery {prod_recovery} in the product is not a fraction"
            )));
        }
        Ok(Elimination {
            ln_beta: model.ln_beta(model.key, mstar),
            prod_recovery,
            tail_recovery: 1.0 - prod_recovery,
        })
    }

    /// `m(n)`, or `None` outside its domain.
    fn stripping(&self, n: Dual64) -> Option<Dual64> {
        let one = Dual64::from(1.0);
        let p = Dual64::from(self.prod_recovery);
        let t = Dual64::from(self.tail_recovery);
        let m = if self.ln_beta.abs() < 1e-12 {
            // key isotope on the cut mass: p = (m + 1) / (n + m + 1)
            (p * n - t) / t
        } else {
            let lb = Dual64::from(self.ln_beta);
            let x = (one - p * (-(n * lb)).exp()) / t;
            if x.re <= 0.0 {
                return None;
            }
            x.ln() / lb - one
        };
        (m.re.is_finite() && m.eps.is_finite()).then_some(m)
    }

    fn stripping_value(&self, n: f64) -> Option<f64> {
        self.stripping(Dual64::from(n)).map(|m| m.re)
    }
}

pub(crate) fn solve(
    model: &StageModel,
    mstar: f64,
    guess: (f64, f64),
    tolerance: f64,
    max_iterations: usize,
) -> EnrichmentResult<StageSolution> {
    let elimination = Elimination::new(model, mstar)?;
    let mut n = guess.0;
    let mut norm = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let fail = |residual| EnrichmentError::NonConvergence { iterations: iteration, residual };

        let m = elimination.stripping_value(n).ok_or(fail(norm))?;
        let residual = model.residual(mstar, n, m);
        norm = model.residual_norm(&residual);
        log::trace!("symbolic iteration {iteration}: n = {n}, m = {m}, residual = {norm:e}");
        if norm < tolerance {
            if m < 0.0 {
                return Err(fail(norm));
            }
            return Ok(StageSolution { n, m, iterations: iteration, residual: norm });
        }

        let g = |n: Dual64| match elimination.stripping(n) {
            Some(m) => model.key_fractions(mstar, n, m).0 - Dual64::from(model.target_prod),
            None => Dual64::from(f64::NAN),
        };
        let (value, slope) = derivative(g, n);
        if !(slope.is_finite() && slope != 0.0) {
            return Err(fail(norm));
        }

        let mut next = (n - value / slope).max(0.0);
        let mut halvings = 0;
        while elimination.stripping_value(next).is_none() {
            halvings += 1;
            if halvings > MAX_STEP_HALVINGS {
                return Err(fail(norm));
            }
            next = n + (next - n) / 2.0;
        }
        n = next;
    }

    Err(EnrichmentError::NonConvergence { iterations: max_iterations, residual: norm })
}
