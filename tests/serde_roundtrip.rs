//! JSON round trips for the serializable records
#![cfg(feature = "serde")]

use isocascade::solvers::{multicomponent, SolverConfig, SolverMethod};
use isocascade::{Cascade, Nuclide};

#[test]
fn test_solved_cascade_round_trip() {
    let solved = multicomponent(&Cascade::default_uranium(), SolverMethod::Numeric, 1e-10, 100).unwrap();
    let json = serde_json::to_string(&solved).unwrap();
    let back: Cascade = serde_json::from_str(&json).unwrap();
    assert_eq!(back, solved);
}

#[test]
fn test_partial_cascade_uses_defaults() {
    let json = r#"{ "alpha": 1.05, "j": 922350000, "k": 922380000 }"#;
    let casc: Cascade = serde_json::from_str(json).unwrap();
    assert_eq!(casc.alpha, 1.05);
    assert_eq!(casc.j, Nuclide::from_id(922350000));
    assert_eq!(casc.n, 0.0);
    assert!(casc.mat_feed.is_empty());
}

#[test]
fn test_solver_config_from_json() {
    let config: SolverConfig = serde_json::from_str(r#"{ "method": "symbolic" }"#).unwrap();
    assert_eq!(config.method, SolverMethod::Symbolic);
    assert_eq!(config.tolerance, SolverConfig::default().tolerance);
}
