//! One-dimensional minimization of the cascade flow over the cut mass.
//!
//! The search first walks downhill from the starting point with growing
//! steps until the objective turns up, which brackets a minimum, then
//! narrows the bracket by golden-section steps. Points where the objective
//! cannot be evaluated count as +∞, so the bracket never extends into a
//! region where the stage equations have no solution.

use crate::error::{EnrichmentError, EnrichmentResult};

/// Inverse golden ratio.
const INV_PHI: f64 = 0.618_033_988_749_894_9;
/// Step growth while bracketing.
const GROWTH: f64 = 1.618034;
/// Initial step as a fraction of the search interval.
const INITIAL_STEP: f64 = 0.01;

/// Golden-section minimizer on a closed interval.
pub(crate) struct GoldenSection {
    pub lower: f64,
    pub upper: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// Location of the minimum and the work spent finding it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchOutcome {
    pub x: f64,
    pub iterations: usize,
    /// Final bracket width
    pub width: f64,
}

impl GoldenSection {
    fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lower, self.upper)
    }

    /// Minimizes `f` starting from `start`.
    ///
    /// A failure at `start` is returned as is; failures elsewhere are
    /// treated as infinitely bad points.
    pub fn minimize<F>(&self, start: f64, mut f: F) -> EnrichmentResult<SearchOutcome>
    where
        F: FnMut(f64) -> EnrichmentResult<f64>,
    {
        let mut iterations = 0;
        let exhausted = |iterations: usize, width: f64| EnrichmentError::NonConvergence {
            iterations,
            residual: width,
        };

        // bracket
        let mut a = self.clamp(start);
        let mut fa = f(a)?;
        if !fa.is_finite() {
            return Err(exhausted(0, f64::INFINITY));
        }
        let mut eval = |x: f64| match f(x) {
            Ok(v) if v.is_finite() => v,
            Ok(_) => f64::INFINITY,
            Err(err) => {
                log::trace!("objective unavailable at {x}: {err}");
                f64::INFINITY
            }
        };
        let mut b = self.clamp(a + INITIAL_STEP * (self.upper - self.lower));
        let mut fb = eval(b);
        if fb > fa {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
        let mut c = self.clamp(b + GROWTH * (b - a));
        let mut fc = eval(c);
        while fc < fb {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(exhausted(self.max_iterations, (c - a).abs()));
            }
            (a, fa, b, fb) = (b, fb, c, fc);
            c = self.clamp(b + GROWTH * (b - a));
            fc = eval(c);
        }
        log::debug!("cut mass bracketed in [{}, {}] (f = {fa}, {fb}, {fc})", a.min(c), a.max(c));

        // golden-section reduction
        let (mut x0, mut x3) = (a.min(c), a.max(c));
        let mut x1 = x3 - INV_PHI * (x3 - x0);
        let mut x2 = x0 + INV_PHI * (x3 - x0);
        let mut f1 = eval(x1);
        let mut f2 = eval(x2);
        while x3 - x0 > 2.0 * (f64::EPSILON.sqrt() * x1.abs() + self.tolerance) {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(exhausted(self.max_iterations, x3 - x0));
            }
            if f1 < f2 {
                x3 = x2;
                x2 = x1;
                f2 = f1;
                x1 = x3 - INV_PHI * (x3 - x0);
                f1 = eval(x1);
            } else {
                x0 = x1;
                x1 = x2;
                f1 = f2;
                x2 = x0 + INV_PHI * (x3 - x0);
                f2 = eval(x2);
            }
        }

        Ok(SearchOutcome { x: 0.5 * (x0 + x3), iterations, width: x3 - x0 })
    }
}
