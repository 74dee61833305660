//! The cascade record: physical inputs, solver guesses and solved outputs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::material::Material;
use crate::nucname::{Nuclide, U234, U235, U238};

/// Configuration and result of an ideal multicomponent cascade.
///
/// Before solving, `alpha`, `j`, `k`, the concentration targets and
/// `mat_feed` describe the problem, while `mstar`, `n` and `m` hold initial
/// guesses. The solver never mutates its input; it returns a new record
/// with the converged geometry, product and tails materials and performance
/// figures filled in.
///
/// The default value has every number at zero and empty materials. It is
/// a valid placeholder but cannot be solved.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cascade {
    /// Stage separation factor, greater than one
    pub alpha: f64,
    /// Key cut mass (g/mol)
    pub mstar: f64,
    /// Key isotope whose concentrations are targeted
    pub j: Nuclide,
    /// Reference partner of the key isotope
    pub k: Nuclide,
    /// Number of enriching stages
    pub n: f64,
    /// Number of stripping stages
    pub m: f64,
    /// Mass fraction of `j` in the feed
    pub x_feed_j: f64,
    /// Mass fraction of `j` in the product
    pub x_prod_j: f64,
    /// Mass fraction of `j` in the tails
    pub x_tail_j: f64,
    /// Feed isotopes and mass; the feed mass scales both outlet masses
    pub mat_feed: Material,
    /// Product stream, set by the solver
    pub mat_prod: Material,
    /// Tails stream, set by the solver
    pub mat_tail: Material,
    /// Total flow rate through all stages per unit feed
    pub l_t_per_feed: f64,
    /// Separative work per unit feed
    pub swu_per_feed: f64,
    /// Separative work per unit product
    pub swu_per_prod: f64,
}

impl Cascade {
    /// Creates a cascade with all fields zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Natural uranium enriched on U-235 against U-238 to 5 % with 0.25 % tails.
    pub fn default_uranium() -> Self {
        Cascade {
            alpha: 1.05,
            mstar: 236.5,
            j: U235,
            k: U238,
            n: 30.0,
            m: 10.0,
            x_feed_j: 0.0072,
            x_prod_j: 0.05,
            x_tail_j: 0.0025,
            mat_feed: Material::new([(U234, 5.5e-5), (U235, 0.0072), (U238, 0.992745)], 1.0),
            ..Self::default()
        }
    }

    /// Checks the physical inputs needed to solve the cascade.
    pub fn validate(&self) -> EnrichmentResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 1.0) {
            return Err(EnrichmentError::invalid(format!(
                "stage separation factor must exceed 1, got {}",
                self.alpha
            )));
        }
        if self.j == self.k {
            return Err(EnrichmentError::invalid(format!(
                "key isotopes must differ, both are {}",
                self.j
            )));
        }
        for key in [self.j, self.k] {
            if key.is_element() {
                return Err(EnrichmentError::invalid(format!("key {key} is not an isotope")));
            }
        }
        for (name, x) in [("x_prod_j", self.x_prod_j), ("x_tail_j", self.x_tail_j)] {
            if !(x > 0.0 && x < 1.0) {
                return Err(EnrichmentError::invalid(format!(
                    "{name} must lie strictly between 0 and 1, got {x}"
                )));
            }
        }
        if self.x_tail_j >= self.x_prod_j {
            return Err(EnrichmentError::invalid(format!(
                "tails target {} must be below product target {}",
                self.x_tail_j, self.x_prod_j
            )));
        }
        for (name, v) in [("n", self.n), ("m", self.m)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(EnrichmentError::invalid(format!(
                    "initial {name} must be non-negative, got {v}"
                )));
            }
        }
        if !self.mstar.is_finite() {
            return Err(EnrichmentError::invalid("initial mstar must be finite"));
        }

        self.mat_feed.validate()?;
        if self.mat_feed.mass() <= 0.0 {
            return Err(EnrichmentError::invalid("feed mass must be positive"));
        }
        for key in [self.j, self.k] {
            if !self.mat_feed.contains(key) {
                return Err(EnrichmentError::invalid(format!("feed contains no {key}")));
            }
        }
        let xf = self.mat_feed.fraction(self.j);
        if !(xf > self.x_tail_j && xf < self.x_prod_j) {
            return Err(EnrichmentError::invalid(format!(
                "feed fraction {xf} of {} must lie between the tails and product targets",
                self.j
            )));
        }
        Ok(())
    }

    /// Largest per-isotope mass imbalance between feed and product plus
    /// tails, relative to the feed mass.
    pub fn mass_balance_error(&self) -> f64 {
        let feed = self.mat_feed.mass();
        if feed <= 0.0 {
            return 0.0;
        }
        self.mat_feed
            .iter()
            .map(|(nuc, _)| {
                let out = self.mat_prod.mass_of(nuc) + self.mat_tail.mass_of(nuc);
                (self.mat_feed.mass_of(nuc) - out).abs() / feed
            })
            .fold(0.0, f64::max)
    }
}

/// Natural uranium cascade with the usual LEU targets.
pub fn default_uranium_cascade() -> Cascade {
    Cascade::default_uranium()
}
