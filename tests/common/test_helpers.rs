//! Helper functions for integration tests

use isocascade::Cascade;

/// Relative error, falling back to absolute error near zero
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Assert that a value is within a relative tolerance of its expected value
pub fn assert_close(actual: f64, expected: f64, tolerance: f64, message: &str) {
    let err = relative_error(actual, expected);
    assert!(
        err < tolerance,
        "{}: got {}, expected {} (relative error {:e}, tolerance {:e})",
        message,
        actual,
        expected,
        err,
        tolerance
    );
}

/// Assert that every feed isotope leaves in the product and tails
pub fn assert_mass_conserved(solved: &Cascade, tolerance: f64) {
    let feed = &solved.mat_feed;
    for (nuc, frac) in feed.iter() {
        let into = feed.mass() * frac;
        let out = solved.mat_prod.mass_of(nuc) + solved.mat_tail.mass_of(nuc);
        assert!(
            (into - out).abs() <= tolerance * feed.mass(),
            "{}: feed {} vs product + tails {}",
            nuc,
            into,
            out
        );
    }
    assert!(solved.mass_balance_error() <= tolerance);
}
