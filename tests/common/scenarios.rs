//! Reference cascades and their solved figures
//!
//! Each scenario carries published reference figures together with the
//! relative band each figure is known to. Stage counts of the recycled
//! uranium and tungsten references were only loosely converged, so their
//! bands are wide.

use isocascade::nucname::{Nuclide, U232, U234, U235, U236, U238};
use isocascade::{Cascade, Material};

/// Relative bands for one scenario
#[derive(Debug, Clone, Copy)]
pub struct Bands {
    pub stages: f64,
    pub mstar: f64,
    /// Total flow and separative work
    pub figures: f64,
}

/// Solved figures for one scenario
#[derive(Debug, Clone, Copy)]
pub struct Expected {
    pub mstar: f64,
    pub n: f64,
    pub m: f64,
    pub prod_mass: f64,
    pub tail_mass: f64,
    pub l_t_per_feed: f64,
    pub swu_per_feed: f64,
    pub swu_per_prod: f64,
    /// Solver tolerance the figures were produced with
    pub tolerance: f64,
    pub bands: Bands,
}

fn uranium(feed: &[(Nuclide, f64)], x_prod_j: f64) -> Cascade {
    let mat_feed = Material::new(feed.iter().copied(), 1.0);
    Cascade {
        x_feed_j: mat_feed.fraction(U235),
        x_prod_j,
        mat_feed,
        ..Cascade::default_uranium()
    }
}

/// Natural uranium to 5 % with 0.25 % tails
pub fn natural_uranium() -> (Cascade, Expected) {
    let feed = [(U234, 0.000055), (U235, 0.00720), (U238, 0.992745)];
    let expected = Expected {
        mstar: 236.5621860655,
        n: 27.183583424704818,
        m: 13.387464890476533,
        prod_mass: 0.0989473684211,
        tail_mass: 0.901052631579,
        l_t_per_feed: 288.62731727645644,
        swu_per_feed: 0.761263453429,
        swu_per_prod: 7.69362000806,
        tolerance: 1e-11,
        bands: Bands { stages: 1e-4, mstar: 1e-5, figures: 1e-5 },
    };
    (uranium(&feed, 0.05), expected)
}

/// Reprocessed uranium carrying U-232 and U-236, enriched to 6 %
pub fn sample_uranium() -> (Cascade, Expected) {
    let feed = [
        (U232, 1.1e-9),
        (U234, 0.00021),
        (U235, 0.0092),
        (U236, 0.0042),
        (U238, 0.9863899989),
    ];
    let expected = Expected {
        mstar: 236.57708506549994,
        n: 26.864660071132583,
        m: 16.637884564470365,
        prod_mass: 0.11652173913043479,
        tail_mass: 0.88347826086956527,
        l_t_per_feed: 357.3888391866117,
        swu_per_feed: 0.9322804173594426,
        swu_per_prod: 8.000914029577306,
        tolerance: 1e-11,
        bands: Bands { stages: 1e-5, mstar: 1e-5, figures: 1e-5 },
    };
    (uranium(&feed, 0.06), expected)
}

/// Recycled uranium from a fuel-cycle study, enriched to 5.5 %
pub fn recycled_uranium() -> (Cascade, Expected) {
    let feed = [
        (U234, 0.000183963025893197),
        (U235, 0.00818576605617839),
        (U236, 0.00610641667100979),
        (U238, 0.985523854246919),
    ];
    let expected = Expected {
        mstar: 236.58177606549995,
        n: 27.38162850698868,
        m: 15.09646512546496,
        prod_mass: 0.10830030583196934,
        tail_mass: 0.89169969416803063,
        l_t_per_feed: 326.8956175003255,
        swu_per_feed: 0.85102089049,
        swu_per_prod: 7.85797310499,
        tolerance: 1e-11,
        bands: Bands { stages: 1e-2, mstar: 1e-4, figures: 1e-4 },
    };
    (uranium(&feed, 0.055), expected)
}

/// Natural tungsten enriched on W-180 against W-186
///
/// After von Halle (1987), matched abundance ratio cascades of stages with
/// large separation factors.
pub fn tungsten() -> (Cascade, Expected) {
    let w = |a| Nuclide::new(74, a).unwrap();
    let mat_feed = Material::new(
        [(w(180), 0.0014), (w(182), 0.26416), (w(183), 0.14409), (w(184), 0.30618), (w(186), 0.28417)],
        1.0,
    );
    let casc = Cascade {
        alpha: 1.16306,
        mstar: 181.3,
        j: w(180),
        k: w(186),
        n: 30.0,
        m: 10.0,
        x_feed_j: mat_feed.fraction(w(180)),
        x_prod_j: 0.5109,
        x_tail_j: 0.00014,
        mat_feed,
        ..Cascade::new()
    };
    let expected = Expected {
        mstar: 181.16425540249995,
        n: 43.557515688533513,
        m: 11.49556481009056,
        prod_mass: 0.0024669120526274574,
        tail_mass: 0.99753308794737272,
        l_t_per_feed: 96.81774564292206,
        swu_per_feed: 2.22221945305,
        swu_per_prod: 900.810164953,
        tolerance: 1e-7,
        bands: Bands { stages: 1e-2, mstar: 1e-4, figures: 1e-3 },
    };
    (casc, expected)
}
