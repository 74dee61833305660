//! Nuclide reference data: atomic masses and natural abundances.
//!
//! The built-in table carries atomic masses (in g/mol) from the 2016 Atomic
//! Mass Evaluation and natural isotopic abundances for the elements commonly
//! met in enrichment work. Element entries (`A = 0`) are derived from their
//! isotopes as abundance-weighted standard atomic weights.
//!
//! The process-wide table is built exactly once, on first use, and is
//! immutable afterwards:
//!
//! ```
//! use isocascade::data::{AtomicData, NuclideData};
//! use isocascade::nucname::U235;
//!
//! let data = AtomicData::global();
//! let mass = data.atomic_mass(U235).unwrap();
//! assert!((mass - 235.0439299).abs() < 1e-6);
//! ```
//!
//! Solvers take any [`NuclideData`] implementation, so callers may inject
//! their own table built with [`AtomicData::from_entries`].

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::nucname::Nuclide;

/// Lookup interface for nuclide reference data.
pub trait NuclideData {
    /// Atomic mass in g/mol.
    fn atomic_mass(&self, nuc: Nuclide) -> EnrichmentResult<f64>;

    /// Natural abundance as an atom fraction in [0, 1]; elements report 1.
    fn natural_abund(&self, nuc: Nuclide) -> EnrichmentResult<f64>;
}

/// One row of reference data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuclideEntry {
    pub nuclide: Nuclide,
    /// Atomic mass in g/mol
    pub mass: f64,
    /// Natural abundance as an atom fraction
    pub abundance: f64,
}

/// Immutable nuclide mass and abundance table.
#[derive(Debug, Clone)]
pub struct AtomicData {
    masses: HashMap<Nuclide, f64>,
    abundances: HashMap<Nuclide, f64>,
}

// (Z, A, atomic mass [g/mol], natural abundance [atom %])
const ISOTOPES: &[(u32, u32, f64, f64)] = &[
    (1, 1, 1.00782503224, 99.9885),
    (1, 2, 2.01410177812, 0.0115),
    (1, 3, 3.01604927791, 0.0),
    (2, 3, 3.01602932008, 0.000134),
    (2, 4, 4.00260325413, 99.999866),
    (3, 6, 6.0151228874, 7.59),
    (3, 7, 7.0160034366, 92.41),
    (4, 9, 9.012183065, 100.0),
    (5, 10, 10.01293695, 19.9),
    (5, 11, 11.00930536, 80.1),
    (6, 12, 12.0, 98.93),
    (6, 13, 13.00335483507, 1.07),
    (6, 14, 14.0032419884, 0.0),
    (7, 14, 14.00307400443, 99.636),
    (7, 15, 15.00010889888, 0.364),
    (8, 16, 15.99491461957, 99.757),
    (8, 17, 16.9991317565, 0.038),
    (8, 18, 17.99915961286, 0.205),
    (9, 19, 18.99840316273, 100.0),
    (10, 20, 19.9924401762, 90.48),
    (10, 21, 20.993846685, 0.27),
    (10, 22, 21.991385114, 9.25),
    (17, 35, 34.968852682, 75.76),
    (17, 37, 36.965902602, 24.24),
    (18, 36, 35.967545105, 0.3365),
    (18, 38, 37.96273211, 0.0632),
    (18, 40, 39.9623831237, 99.6003),
    (30, 64, 63.92914201, 49.17),
    (30, 66, 65.92603381, 27.73),
    (30, 67, 66.92712775, 4.04),
    (30, 68, 67.92484455, 18.45),
    (30, 70, 69.9253192, 0.61),
    (36, 78, 77.92036494, 0.355),
    (36, 80, 79.91637808, 2.286),
    (36, 82, 81.91348273, 11.593),
    (36, 83, 82.91412716, 11.5),
    (36, 84, 83.9114977282, 56.987),
    (36, 86, 85.9106106269, 17.279),
    (42, 92, 91.90680796, 14.53),
    (42, 94, 93.9050849, 9.15),
    (42, 95, 94.90583877, 15.84),
    (42, 96, 95.90467612, 16.67),
    (42, 97, 96.90601812, 9.6),
    (42, 98, 97.90540482, 24.39),
    (42, 100, 99.9074718, 9.82),
    (54, 124, 123.905892, 0.095),
    (54, 126, 125.9042983, 0.089),
    (54, 128, 127.903531, 1.91),
    (54, 129, 128.9047808611, 26.401),
    (54, 130, 129.903509349, 4.071),
    (54, 131, 130.90508406, 21.232),
    (54, 132, 131.9041550856, 26.909),
    (54, 134, 133.90539466, 10.436),
    (54, 136, 135.907214484, 8.857),
    (74, 180, 179.94671, 0.12),
    (74, 182, 181.9482042, 26.5),
    (74, 183, 182.9502229, 14.31),
    (74, 184, 183.9509312, 30.64),
    (74, 186, 185.9543628, 28.43),
    (90, 232, 232.0380558, 100.0),
    (92, 232, 232.0371562, 0.0),
    (92, 233, 233.0396355, 0.0),
    (92, 234, 234.0409521, 0.0054),
    (92, 235, 235.0439299, 0.7204),
    (92, 236, 236.045568, 0.0),
    (92, 238, 238.0507882, 99.2742),
    (94, 238, 238.0495601, 0.0),
    (94, 239, 239.0521636, 0.0),
    (94, 240, 240.0538138, 0.0),
    (94, 241, 241.0568517, 0.0),
    (94, 242, 242.0587428, 0.0),
];

static GLOBAL: OnceLock<AtomicData> = OnceLock::new();

impl AtomicData {
    /// Builds the table from the built-in isotope list.
    pub fn new() -> Self {
        let entries = ISOTOPES.iter().map(|&(z, a, mass, percent)| NuclideEntry {
            nuclide: Nuclide::from_id(z * 10_000_000 + a * 10_000),
            mass,
            abundance: percent / 100.0,
        });
        Self::build(entries)
    }

    /// Returns the process-wide table, building it on first call.
    ///
    /// Concurrent first calls block until a single initialization finishes;
    /// later calls return the same reference.
    pub fn global() -> &'static AtomicData {
        GLOBAL.get_or_init(AtomicData::new)
    }

    /// Builds a table from caller-supplied isotope rows.
    ///
    /// Element rows are derived from the isotopes; rows for elements in the
    /// input are rejected, as are non-positive masses and abundances outside [0, 1].
    pub fn from_entries<I>(entries: I) -> EnrichmentResult<Self>
    where
        I: IntoIterator<Item = NuclideEntry>,
    {
        let entries: Vec<NuclideEntry> = entries.into_iter().collect();
        for entry in &entries {
            if entry.nuclide.is_element() {
                return Err(EnrichmentError::invalid(format!(
                    "{} is an element; element data is derived from its isotopes",
                    entry.nuclide
                )));
            }
            if !(entry.mass.is_finite() && entry.mass > 0.0) {
                return Err(EnrichmentError::invalid(format!(
                    "atomic mass of {} must be positive, got {}",
                    entry.nuclide, entry.mass
                )));
            }
            if !(0.0..=1.0).contains(&entry.abundance) {
                return Err(EnrichmentError::invalid(format!(
                    "abundance of {} must lie in [0, 1], got {}",
                    entry.nuclide, entry.abundance
                )));
            }
        }
        Ok(Self::build(entries))
    }

    fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = NuclideEntry>,
    {
        let mut masses = HashMap::new();
        let mut abundances = HashMap::new();
        // element -> (sum of abundance * mass, sum of abundance)
        let mut weights: HashMap<Nuclide, (f64, f64)> = HashMap::new();

        for entry in entries {
            masses.insert(entry.nuclide, entry.mass);
            abundances.insert(entry.nuclide, entry.abundance);
            if entry.abundance > 0.0 {
                let acc = weights.entry(entry.nuclide.to_element()).or_insert((0.0, 0.0));
                acc.0 += entry.abundance * entry.mass;
                acc.1 += entry.abundance;
            }
        }

        for (element, (weighted, total)) in weights {
            masses.insert(element, weighted / total);
            abundances.insert(element, 1.0);
        }

        log::debug!("Nuclide table built with {} entries", masses.len());
        AtomicData { masses, abundances }
    }

    /// Number of nuclides (isotopes and derived elements) in the table.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn contains(&self, nuc: Nuclide) -> bool {
        self.masses.contains_key(&nuc)
    }

    /// Naturally occurring isotopes of element `z` with their atom fractions,
    /// sorted by nuclide id.
    pub fn natural_isotopes(&self, z: u32) -> Vec<(Nuclide, f64)> {
        let mut isotopes: Vec<(Nuclide, f64)> = self
            .abundances
            .iter()
            .filter(|&(nuc, &abund)| nuc.znum() == z && !nuc.is_element() && abund > 0.0)
            .map(|(&nuc, &abund)| (nuc, abund))
            .collect();
        isotopes.sort_by_key(|(nuc, _)| *nuc);
        isotopes
    }
}

impl Default for AtomicData {
    fn default() -> Self {
        Self::new()
    }
}

impl NuclideData for AtomicData {
    fn atomic_mass(&self, nuc: Nuclide) -> EnrichmentResult<f64> {
        self.masses.get(&nuc).copied().ok_or(EnrichmentError::DataUnavailable(nuc))
    }

    fn natural_abund(&self, nuc: Nuclide) -> EnrichmentResult<f64> {
        self.abundances.get(&nuc).copied().ok_or(EnrichmentError::DataUnavailable(nuc))
    }
}

/// Atomic mass from the process-wide table.
pub fn atomic_mass(nuc: Nuclide) -> EnrichmentResult<f64> {
    AtomicData::global().atomic_mass(nuc)
}

/// Natural abundance from the process-wide table.
pub fn natural_abund(nuc: Nuclide) -> EnrichmentResult<f64> {
    AtomicData::global().natural_abund(nuc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nucname::{U234, U235, U236, U238};
    use approx::assert_relative_eq;

    #[test]
    fn test_uranium_masses() {
        let data = AtomicData::new();
        assert_relative_eq!(data.atomic_mass(U235).unwrap(), 235.0439299, max_relative = 1e-12);
        assert_relative_eq!(data.atomic_mass(U238).unwrap(), 238.0507882, max_relative = 1e-12);
    }

    #[test]
    fn test_natural_abundances() {
        let data = AtomicData::new();
        assert_relative_eq!(data.natural_abund(U235).unwrap(), 0.007204, max_relative = 1e-12);
        assert_relative_eq!(data.natural_abund(U234).unwrap(), 0.000054, max_relative = 1e-12);
        assert_eq!(data.natural_abund(U236).unwrap(), 0.0);
    }

    #[test]
    fn test_element_weight_is_abundance_weighted() {
        let data = AtomicData::new();
        let uranium = Nuclide::element(92).unwrap();
        let expected = (0.000054 * 234.0409521 + 0.007204 * 235.0439299 + 0.992742 * 238.0507882)
            / (0.000054 + 0.007204 + 0.992742);
        assert_relative_eq!(data.atomic_mass(uranium).unwrap(), expected, max_relative = 1e-12);
        assert_eq!(data.natural_abund(uranium).unwrap(), 1.0);

        let carbon = data.atomic_mass(Nuclide::element(6).unwrap()).unwrap();
        assert!((carbon - 12.0107).abs() < 1e-3);
    }

    #[test]
    fn test_missing_nuclide_is_reported() {
        let data = AtomicData::new();
        let u239 = Nuclide::new(92, 239).unwrap();
        assert_eq!(data.atomic_mass(u239), Err(EnrichmentError::DataUnavailable(u239)));
        assert_eq!(data.natural_abund(u239), Err(EnrichmentError::DataUnavailable(u239)));
    }

    #[test]
    fn test_global_is_initialized_once() {
        let first = AtomicData::global() as *const AtomicData;
        let second = AtomicData::global() as *const AtomicData;
        assert_eq!(first, second);
        assert!(AtomicData::global().contains(U238));
    }

    #[test]
    fn test_natural_isotopes_of_tungsten() {
        let data = AtomicData::new();
        let isotopes = data.natural_isotopes(74);
        let anums: Vec<u32> = isotopes.iter().map(|(nuc, _)| nuc.anum()).collect();
        assert_eq!(anums, vec![180, 182, 183, 184, 186]);
        let total: f64 = isotopes.iter().map(|(_, a)| a).sum();
        assert_relative_eq!(total, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_from_entries_validates_rows() {
        let u235 = NuclideEntry { nuclide: U235, mass: 235.0, abundance: 0.5 };
        let table = AtomicData::from_entries([u235]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.atomic_mass(Nuclide::element(92).unwrap()).unwrap(), 235.0);

        let bad_mass = NuclideEntry { nuclide: U238, mass: -1.0, abundance: 0.5 };
        assert!(AtomicData::from_entries([bad_mass]).is_err());

        let element = NuclideEntry { nuclide: Nuclide::element(92).unwrap(), mass: 238.0, abundance: 1.0 };
        assert!(AtomicData::from_entries([element]).is_err());
    }
}
