//! Ideal-cascade stage model shared by every update strategy.
//!
//! For an isotope `i` the effective stage factor is
//! `β_i = alphastar_i(alpha, mstar, M_i)`. With `n` enriching and `m`
//! stripping stages, the fraction of that isotope leaving with the product
//! and with the tails is
//!
//! ```text
//! p_i = (β_i^(m+1) - 1) / (β_i^(m+1) - β_i^(-n))
//! t_i = (1 - β_i^(-n))  / (β_i^(m+1) - β_i^(-n))
//! ```
//!
//! so `p_i + t_i = 1` and every isotope is conserved by construction.
//! Stream compositions follow by weighting with the feed fractions and
//! normalizing each end.
//!
//! Flow and separative work are measured against the key pair. Each stage
//! has a separative power for isotope `i` of
//!
//! ```text
//! δU_i / G = ln β_j · (β_i - 1) / (β_i + 1)
//! ```
//!
//! and the balance of `x_i · ln(x_j / x_k)` between the feed and the two
//! ends, divided by that power and summed over isotopes, is the total stage
//! flow per unit feed.

use num_dual::DualNum;

use crate::binary::alphastar_i;
use crate::cascade::Cascade;
use crate::data::NuclideData;
use crate::error::{EnrichmentError, EnrichmentResult};
use crate::nucname::Nuclide;

/// Below this |ln β| an isotope is treated as sitting on the cut mass.
const CUT_MASS_LIMIT: f64 = 1e-12;

/// Stage flow and separative work of a solved cascade, per unit feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Performance {
    pub total_flow: f64,
    pub separative_work: f64,
}

/// Feed description and key targets prepared for repeated evaluation.
#[derive(Debug, Clone)]
pub(crate) struct StageModel {
    pub isotopes: Vec<Nuclide>,
    /// Normalized feed mass fractions
    pub fractions: Vec<f64>,
    /// Atomic masses
    pub masses: Vec<f64>,
    /// Index of the key isotope `j`
    pub key: usize,
    /// Index of the partner `k`
    pub partner: usize,
    pub alpha: f64,
    pub target_prod: f64,
    pub target_tail: f64,
}

/// Product and tails streams per unit feed.
///
/// Compositions are indexed like [`StageModel::isotopes`].
#[derive(Debug, Clone)]
pub(crate) struct Streams {
    pub prod_per_feed: f64,
    pub tail_per_feed: f64,
    pub prod_comp: Vec<f64>,
    pub tail_comp: Vec<f64>,
}

impl StageModel {
    pub fn new<D>(cascade: &Cascade, data: &D) -> EnrichmentResult<Self>
    where
        D: NuclideData + ?Sized,
    {
        let mut isotopes = Vec::with_capacity(cascade.mat_feed.len());
        let mut fractions = Vec::with_capacity(cascade.mat_feed.len());
        let mut masses = Vec::with_capacity(cascade.mat_feed.len());
        for (nuc, frac) in cascade.mat_feed.iter() {
            isotopes.push(nuc);
            fractions.push(frac);
            masses.push(data.atomic_mass(nuc)?);
        }

        let position = |nuc: Nuclide| {
            isotopes
                .iter()
                .position(|&iso| iso == nuc)
                .ok_or_else(|| EnrichmentError::invalid(format!("feed contains no {nuc}")))
        };
        let key = position(cascade.j)?;
        let partner = position(cascade.k)?;

        Ok(StageModel {
            isotopes,
            fractions,
            masses,
            key,
            partner,
            alpha: cascade.alpha,
            target_prod: cascade.x_prod_j,
            target_tail: cascade.x_tail_j,
        })
    }

    /// Feed fraction of the key isotope.
    pub fn key_feed_fraction(&self) -> f64 {
        self.fractions[self.key]
    }

    /// Range in which the cut mass must lie: between the key masses.
    pub fn cut_mass_bounds(&self) -> (f64, f64) {
        let (a, b) = (self.masses[self.key], self.masses[self.partner]);
        (a.min(b), a.max(b))
    }

    /// ln β_i for isotope `i`.
    pub fn ln_beta(&self, i: usize, mstar: f64) -> f64 {
        alphastar_i(self.alpha, mstar, self.masses[i]).ln()
    }

    /// Key-isotope concentrations at the product and tails ends.
    ///
    /// Generic over the number type so the same routine yields values or
    /// exact derivatives.
    pub fn key_fractions<D>(&self, mstar: f64, n: D, m: D) -> (D, D)
    where
        D: DualNum<f64> + Copy,
    {
        let zero = D::from(0.0);
        let (mut prod, mut tail) = (zero, zero);
        let (mut prod_j, mut tail_j) = (zero, zero);
        for i in 0..self.isotopes.len() {
            let (p, t) = recoveries(self.ln_beta(i, mstar), n, m);
            let x = D::from(self.fractions[i]);
            prod = prod + x * p;
            tail = tail + x * t;
            if i == self.key {
                prod_j = x * p;
                tail_j = x * t;
            }
        }
        (prod_j / prod, tail_j / tail)
    }

    /// Deviation of the key concentrations from their targets.
    pub fn residual(&self, mstar: f64, n: f64, m: f64) -> [f64; 2] {
        let (xp, xt) = self.key_fractions(mstar, n, m);
        [xp - self.target_prod, xt - self.target_tail]
    }

    /// Largest residual relative to its target.
    pub fn residual_norm(&self, residual: &[f64; 2]) -> f64 {
        let norm = (residual[0] / self.target_prod).abs().max((residual[1] / self.target_tail).abs());
        if norm.is_nan() {
            f64::INFINITY
        } else {
            norm
        }
    }

    /// Full product and tails streams.
    pub fn streams(&self, mstar: f64, n: f64, m: f64) -> Streams {
        let mut prod_comp = Vec::with_capacity(self.isotopes.len());
        let mut tail_comp = Vec::with_capacity(self.isotopes.len());
        for (i, &x) in self.fractions.iter().enumerate() {
            let (p, t) = recoveries(self.ln_beta(i, mstar), n, m);
            prod_comp.push(x * p);
            tail_comp.push(x * t);
        }
        let prod_per_feed: f64 = prod_comp.iter().sum();
        let tail_per_feed: f64 = tail_comp.iter().sum();
        prod_comp.iter_mut().for_each(|x| *x /= prod_per_feed);
        tail_comp.iter_mut().for_each(|x| *x /= tail_per_feed);
        Streams { prod_per_feed, tail_per_feed, prod_comp, tail_comp }
    }

    /// Separative power of one stage for isotope `i`, per unit stage flow.
    pub fn stage_separative_power(&self, i: usize, mstar: f64) -> f64 {
        let beta = alphastar_i(self.alpha, mstar, self.masses[i]);
        self.ln_beta(self.key, mstar) * (beta - 1.0) / (beta + 1.0)
    }

    /// Total stage flow and separative work per unit feed.
    ///
    /// The flow is infinite when an isotope sits exactly on the cut mass.
    pub fn performance(&self, mstar: f64, streams: &Streams) -> Performance {
        let key_ratio = |comp: &[f64]| (comp[self.key] / comp[self.partner]).ln();
        let feed_ratio = key_ratio(&self.fractions[..]);
        let prod_ratio = key_ratio(&streams.prod_comp[..]);
        let tail_ratio = key_ratio(&streams.tail_comp[..]);

        let total_flow: f64 = self
            .fractions
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let balance = streams.prod_per_feed * streams.prod_comp[i] * prod_ratio
                    + streams.tail_per_feed * streams.tail_comp[i] * tail_ratio
                    - x * feed_ratio;
                balance / self.stage_separative_power(i, mstar)
            })
            .sum();
        // compositions sum to one, so the isotope balances sum to minus this
        let separative_work =
            feed_ratio - streams.prod_per_feed * prod_ratio - streams.tail_per_feed * tail_ratio;

        Performance { total_flow, separative_work }
    }
}

/// Fractions of one isotope recovered in the product and in the tails.
pub(crate) fn recoveries<D>(ln_beta: f64, n: D, m: D) -> (D, D)
where
    D: DualNum<f64> + Copy,
{
    let one = D::from(1.0);
    if ln_beta.abs() < CUT_MASS_LIMIT {
        let total = n + m + one;
        return ((m + one) / total, n / total);
    }
    let lb = D::from(ln_beta);
    let up = ((m + one) * lb).exp();
    let down = (-(n * lb)).exp();
    let span = up - down;
    ((up - one) / span, (one - down) / span)
}
