//! # Isocascade: Multicomponent Isotope Separation Cascades
//!
//! Steady-state calculations for ideal enrichment cascades. The binary
//! relations in [`binary`] size a cascade from the concentration of a single
//! key isotope; the solver in [`solvers`] extends this to feeds with any
//! number of isotopes, finding the stage counts and cut mass at which the
//! key isotope reaches its product and tails targets.
//!
//! ## Example
//!
//! ```
//! use isocascade::binary::{self, MassAnchor};
//! use isocascade::cascade::Cascade;
//! use isocascade::nucname::{U235, U238};
//! use isocascade::solvers::{multicomponent, SolverMethod};
//!
//! // Binary sizing: feed needed for 1 kg of 5 % product from natural uranium
//! let feed = binary::feed(0.0072, 0.05, 0.0025, MassAnchor::Product(1.0)).unwrap();
//! assert!((feed - 10.1064).abs() < 1e-3);
//!
//! // Multicomponent: every isotope of the feed is followed through the stages
//! let casc = Cascade::default_uranium();
//! let solved = multicomponent(&casc, SolverMethod::Symbolic, 1e-10, 100).unwrap();
//!
//! assert!(solved.mstar > 235.0 && solved.mstar < 238.0);
//! assert!(solved.mat_prod.fraction(U235) > solved.mat_feed.fraction(U235));
//! assert!(solved.mat_tail.fraction(U238) > solved.mat_feed.fraction(U238));
//! ```
//!
//! Nuclides are named by integer identifiers `Z·10^7 + A·10^4 + S` and can be
//! parsed from symbols:
//!
//! ```
//! use isocascade::nucname::Nuclide;
//!
//! let u235: Nuclide = "U-235".parse().unwrap();
//! assert_eq!(u235.id(), 922350000);
//! assert_eq!(u235.to_string(), "U235");
//! ```
//!
//! ## Optional Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Nuclide`], [`Material`],
//!   [`Cascade`] and [`SolverConfig`]
//!
//! ```toml
//! [dependencies]
//! isocascade = { version = "0.1", features = ["serde"] }
//! ```

pub mod autodiff;
pub mod binary;
pub mod cascade;
pub mod data;
pub mod error;
pub mod material;
pub mod nucname;
pub mod solvers;

pub use cascade::{default_uranium_cascade, Cascade};
pub use data::{AtomicData, NuclideData};
pub use error::{EnrichmentError, EnrichmentResult};
pub use material::Material;
pub use nucname::Nuclide;
pub use solvers::{multicomponent, CascadeStats, MulticomponentSolver, SolverConfig, SolverMethod};
