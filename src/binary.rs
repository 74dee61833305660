//! Two-isotope enrichment relations.
//!
//! All functions here work on the concentrations of a single key isotope
//! in the feed (`xf`), product (`xp`) and tails (`xt`) streams, tied
//! together by the steady-state mass balance
//!
//! ```text
//! F = P + T
//! F·xf = P·xp + T·xt
//! ```
//!
//! Stream masses are derived from exactly one known mass, the
//! [`MassAnchor`]. Every function either returns a fully valid value or the
//! precise input error; nothing is clamped.
//!
//! # Example
//!
//! ```
//! use isocascade::binary::{feed, swu, MassAnchor};
//!
//! // Natural uranium to 5 % with 0.25 % tails, 1.5 kg of product
//! let f = feed(0.0072, 0.05, 0.0025, MassAnchor::Product(1.5)).unwrap();
//! assert!((f - 15.1596).abs() < 1e-3);
//!
//! let work = swu(0.0072, 0.05, 0.0025, MassAnchor::Product(1.5)).unwrap();
//! assert!((work - 11.765).abs() < 1e-3);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EnrichmentError, EnrichmentResult};

/// The one stream mass a binary relation is anchored on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MassAnchor {
    Feed(f64),
    Product(f64),
    Tails(f64),
}

impl MassAnchor {
    fn mass(self) -> f64 {
        match self {
            MassAnchor::Feed(m) | MassAnchor::Product(m) | MassAnchor::Tails(m) => m,
        }
    }

    fn validate(self) -> EnrichmentResult<Self> {
        let m = self.mass();
        if m.is_finite() && m >= 0.0 {
            Ok(self)
        } else {
            Err(EnrichmentError::invalid(format!("stream mass must be non-negative, got {m}")))
        }
    }
}

/// Checks that the three concentrations are in [0, 1] and that product and
/// tails differ.
fn check(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<()> {
    for (name, x) in [("xf", xf), ("xp", xp), ("xt", xt)] {
        if !(x.is_finite() && (0.0..=1.0).contains(&x)) {
            return Err(EnrichmentError::invalid(format!("{name} must lie in [0, 1], got {x}")));
        }
    }
    if xp == xt {
        return Err(EnrichmentError::invalid("product and tails concentrations are equal"));
    }
    Ok(())
}

fn ratio(numerator: f64, denominator: f64, what: &str) -> EnrichmentResult<f64> {
    if denominator == 0.0 {
        return Err(EnrichmentError::invalid(format!("{what} is undefined: zero denominator")));
    }
    Ok(numerator / denominator)
}

/// Product mass per unit feed: `(xf - xt) / (xp - xt)`.
pub fn prod_per_feed(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xf - xt, xp - xt, "product per feed")
}

/// Tails mass per unit feed: `(xf - xp) / (xt - xp)`.
pub fn tail_per_feed(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xf - xp, xt - xp, "tails per feed")
}

/// Tails mass per unit product: `(xf - xp) / (xt - xf)`.
pub fn tail_per_prod(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xf - xp, xt - xf, "tails per product")
}

/// Feed mass per unit product: `(xp - xt) / (xf - xt)`.
pub fn feed_per_prod(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xp - xt, xf - xt, "feed per product")
}

/// Feed mass per unit tails: `(xt - xp) / (xf - xp)`.
pub fn feed_per_tail(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xt - xp, xf - xp, "feed per tails")
}

/// Product mass per unit tails: `(xt - xf) / (xf - xp)`.
pub fn prod_per_tail(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    check(xf, xp, xt)?;
    ratio(xt - xf, xf - xp, "product per tails")
}

/// Product mass from a feed or tails anchor.
pub fn product(xf: f64, xp: f64, xt: f64, anchor: MassAnchor) -> EnrichmentResult<f64> {
    match anchor.validate()? {
        MassAnchor::Feed(f) => Ok(f * prod_per_feed(xf, xp, xt)?),
        MassAnchor::Tails(t) => Ok(t * prod_per_tail(xf, xp, xt)?),
        MassAnchor::Product(_) => {
            Err(EnrichmentError::invalid("product mass needs a feed or tails anchor"))
        }
    }
}

/// Feed mass from a product or tails anchor.
pub fn feed(xf: f64, xp: f64, xt: f64, anchor: MassAnchor) -> EnrichmentResult<f64> {
    match anchor.validate()? {
        MassAnchor::Product(p) => Ok(p * feed_per_prod(xf, xp, xt)?),
        MassAnchor::Tails(t) => Ok(t * feed_per_tail(xf, xp, xt)?),
        MassAnchor::Feed(_) => {
            Err(EnrichmentError::invalid("feed mass needs a product or tails anchor"))
        }
    }
}

/// Tails mass from a feed or product anchor.
pub fn tails(xf: f64, xp: f64, xt: f64, anchor: MassAnchor) -> EnrichmentResult<f64> {
    match anchor.validate()? {
        MassAnchor::Feed(f) => Ok(f * tail_per_feed(xf, xp, xt)?),
        MassAnchor::Product(p) => Ok(p * tail_per_prod(xf, xp, xt)?),
        MassAnchor::Tails(_) => {
            Err(EnrichmentError::invalid("tails mass needs a feed or product anchor"))
        }
    }
}

/// Value function `V(x) = (2x - 1)·ln(x / (1 - x))`.
///
/// Only defined on the open interval (0, 1); the boundary and anything
/// beyond it yield [`EnrichmentError::DomainError`].
pub fn value_func(x: f64) -> EnrichmentResult<f64> {
    if !(x > 0.0 && x < 1.0) {
        return Err(EnrichmentError::DomainError(x));
    }
    Ok((2.0 * x - 1.0) * (x / (1.0 - x)).ln())
}

/// Separative work `P·V(xp) + T·V(xt) - F·V(xf)`.
///
/// Any of the three stream masses may serve as the anchor.
pub fn swu(xf: f64, xp: f64, xt: f64, anchor: MassAnchor) -> EnrichmentResult<f64> {
    let (f, p, t) = match anchor.validate()? {
        MassAnchor::Feed(f) => (f, product(xf, xp, xt, anchor)?, tails(xf, xp, xt, anchor)?),
        MassAnchor::Product(p) => (feed(xf, xp, xt, anchor)?, p, tails(xf, xp, xt, anchor)?),
        MassAnchor::Tails(t) => (feed(xf, xp, xt, anchor)?, product(xf, xp, xt, anchor)?, t),
    };
    Ok(p * value_func(xp)? + t * value_func(xt)? - f * value_func(xf)?)
}

/// Separative work per unit feed.
pub fn swu_per_feed(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    swu(xf, xp, xt, MassAnchor::Feed(1.0))
}

/// Separative work per unit product.
pub fn swu_per_prod(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    swu(xf, xp, xt, MassAnchor::Product(1.0))
}

/// Separative work per unit tails.
pub fn swu_per_tail(xf: f64, xp: f64, xt: f64) -> EnrichmentResult<f64> {
    swu(xf, xp, xt, MassAnchor::Tails(1.0))
}

/// Effective stage separation factor of an isotope of mass `mi` in a
/// cascade with stage factor `alpha` and cut mass `mstar`.
pub fn alphastar_i(alpha: f64, mstar: f64, mi: f64) -> f64 {
    alpha.powf(mstar - mi)
}
