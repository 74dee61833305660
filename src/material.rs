//! Isotopic compositions.
//!
//! A [`Material`] is a total mass plus a mapping from nuclide to mass
//! fraction. Fractions are normalized on construction so they sum to one.
//! Nuclides absent from the mapping have an implicit fraction of zero,
//! both for lookups and for equality.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::data::NuclideData;
use crate::error::{EnrichmentError, EnrichmentResult};
use crate::nucname::Nuclide;

/// Absolute tolerance on fractions (and relative on mass) used by `==`.
pub const EQUALITY_TOLERANCE: f64 = 1e-12;

/// Mass plus normalized per-nuclide mass fractions.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    comp: BTreeMap<Nuclide, f64>,
    mass: f64,
}

impl Material {
    /// Creates a material from (nuclide, mass fraction) pairs.
    ///
    /// Repeated nuclides are summed and the result is normalized when the
    /// total is positive. Nothing is rejected here; see [`Material::validate`].
    pub fn new<I>(comp: I, mass: f64) -> Self
    where
        I: IntoIterator<Item = (Nuclide, f64)>,
    {
        let mut map: BTreeMap<Nuclide, f64> = BTreeMap::new();
        for (nuc, frac) in comp {
            *map.entry(nuc).or_insert(0.0) += frac;
        }
        let total: f64 = map.values().sum();
        if total.is_finite() && total > 0.0 {
            map.values_mut().for_each(|frac| *frac /= total);
        }
        Material { comp: map, mass }
    }

    /// Creates a material from atom fractions, converting to mass fractions
    /// with the atomic masses in `data`.
    pub fn from_atom_frac<I, D>(atoms: I, mass: f64, data: &D) -> EnrichmentResult<Self>
    where
        I: IntoIterator<Item = (Nuclide, f64)>,
        D: NuclideData + ?Sized,
    {
        let weighted = atoms
            .into_iter()
            .map(|(nuc, frac)| Ok((nuc, frac * data.atomic_mass(nuc)?)))
            .collect::<EnrichmentResult<Vec<_>>>()?;
        Ok(Material::new(weighted, mass))
    }

    /// Mass fractions keyed by nuclide.
    pub fn comp(&self) -> &BTreeMap<Nuclide, f64> {
        &self.comp
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Returns a copy with a different total mass.
    pub fn with_mass(&self, mass: f64) -> Self {
        Material { comp: self.comp.clone(), mass }
    }

    /// Mass fraction of `nuc`, zero when absent.
    pub fn fraction(&self, nuc: Nuclide) -> f64 {
        self.comp.get(&nuc).copied().unwrap_or(0.0)
    }

    /// Mass of `nuc` contained in the material.
    pub fn mass_of(&self, nuc: Nuclide) -> f64 {
        self.mass * self.fraction(nuc)
    }

    pub fn contains(&self, nuc: Nuclide) -> bool {
        self.comp.contains_key(&nuc)
    }

    pub fn len(&self) -> usize {
        self.comp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comp.is_empty()
    }

    /// Iterates over (nuclide, mass fraction) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Nuclide, f64)> + '_ {
        self.comp.iter().map(|(&nuc, &frac)| (nuc, frac))
    }

    /// Checks that the mass and every fraction are finite and non-negative.
    pub fn validate(&self) -> EnrichmentResult<()> {
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            return Err(EnrichmentError::invalid(format!(
                "material mass must be non-negative, got {}",
                self.mass
            )));
        }
        for (nuc, frac) in self.iter() {
            if !(frac.is_finite() && (0.0..=1.0).contains(&frac)) {
                return Err(EnrichmentError::invalid(format!(
                    "mass fraction of {nuc} must lie in [0, 1], got {frac}"
                )));
            }
        }
        Ok(())
    }

    /// Atomic numbers of the elements present.
    pub fn elements(&self) -> BTreeSet<u32> {
        self.comp.keys().map(|nuc| nuc.znum()).collect()
    }

    /// The part of the material belonging to element `z`, renormalized,
    /// with the mass of that element.
    pub fn sub_element(&self, z: u32) -> Material {
        let part: Vec<(Nuclide, f64)> = self.iter().filter(|(nuc, _)| nuc.znum() == z).collect();
        let share: f64 = part.iter().map(|(_, frac)| frac).sum();
        Material::new(part, self.mass * share)
    }

    /// Replaces element entries by their naturally occurring isotopes.
    pub fn expand_elements<D>(&self, data: &D) -> EnrichmentResult<Material>
    where
        D: NuclideData + ?Sized,
    {
        let mut expanded: Vec<(Nuclide, f64)> = Vec::with_capacity(self.comp.len());
        for (nuc, frac) in self.iter() {
            if !nuc.is_element() {
                expanded.push((nuc, frac));
                continue;
            }
            let isotopes = natural_isotopes(nuc.znum(), data)?;
            if isotopes.is_empty() {
                return Err(EnrichmentError::DataUnavailable(nuc));
            }
            // atom fractions -> mass fractions within the element
            let molar: f64 = isotopes.iter().map(|(_, abund, mass)| abund * mass).sum();
            for (iso, abund, mass) in isotopes {
                expanded.push((iso, frac * abund * mass / molar));
            }
        }
        Ok(Material::new(expanded, self.mass))
    }

    /// Mean molecular mass in g/mol.
    pub fn molecular_mass<D>(&self, data: &D) -> EnrichmentResult<f64>
    where
        D: NuclideData + ?Sized,
    {
        let mut moles = 0.0;
        for (nuc, frac) in self.iter() {
            moles += frac / data.atomic_mass(nuc)?;
        }
        if moles <= 0.0 {
            return Err(EnrichmentError::invalid("molecular mass of an empty material"));
        }
        Ok(1.0 / moles)
    }

    /// Atom fractions keyed by nuclide.
    pub fn to_atom_frac<D>(&self, data: &D) -> EnrichmentResult<BTreeMap<Nuclide, f64>>
    where
        D: NuclideData + ?Sized,
    {
        let mm = self.molecular_mass(data)?;
        self.iter().map(|(nuc, frac)| Ok((nuc, frac * mm / data.atomic_mass(nuc)?))).collect()
    }
}

fn natural_isotopes<D>(z: u32, data: &D) -> EnrichmentResult<Vec<(Nuclide, f64, f64)>>
where
    D: NuclideData + ?Sized,
{
    let mut isotopes = Vec::new();
    for a in z..(3 * z + 10).min(1000) {
        let iso = Nuclide::new(z, a)?;
        match data.natural_abund(iso) {
            Ok(abund) if abund > 0.0 => isotopes.push((iso, abund, data.atomic_mass(iso)?)),
            Ok(_) | Err(EnrichmentError::DataUnavailable(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(isotopes)
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        let mass_scale = self.mass.abs().max(other.mass.abs()).max(1.0);
        if (self.mass - other.mass).abs() > EQUALITY_TOLERANCE * mass_scale {
            return false;
        }
        self.comp
            .keys()
            .chain(other.comp.keys())
            .all(|&nuc| (self.fraction(nuc) - other.fraction(nuc)).abs() <= EQUALITY_TOLERANCE)
    }
}

/// Mixing: masses add, fractions are mass-weighted.
impl Add for &Material {
    type Output = Material;

    fn add(self, other: &Material) -> Material {
        let total = self.mass + other.mass;
        let nuclides: BTreeSet<Nuclide> =
            self.comp.keys().chain(other.comp.keys()).copied().collect();
        let comp = nuclides.into_iter().map(|nuc| (nuc, self.mass_of(nuc) + other.mass_of(nuc)));
        Material::new(comp, total)
    }
}

impl Add for Material {
    type Output = Material;

    fn add(self, other: Material) -> Material {
        &self + &other
    }
}

impl Mul<f64> for &Material {
    type Output = Material;

    fn mul(self, factor: f64) -> Material {
        self.with_mass(self.mass * factor)
    }
}

impl Mul<f64> for Material {
    type Output = Material;

    fn mul(self, factor: f64) -> Material {
        Material { mass: self.mass * factor, comp: self.comp }
    }
}

impl FromIterator<(Nuclide, f64)> for Material {
    /// Collects mass fractions into a unit-mass material.
    fn from_iter<T: IntoIterator<Item = (Nuclide, f64)>>(iter: T) -> Self {
        Material::new(iter, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AtomicData;
    use crate::nucname::{U234, U235, U238};
    use approx::assert_relative_eq;

    fn natural_uranium() -> Material {
        Material::new([(U234, 5.5e-5), (U235, 0.0072), (U238, 0.992745)], 1.0)
    }

    #[test]
    fn test_new_normalizes() {
        let mat = Material::new([(U235, 1.0), (U238, 3.0)], 10.0);
        assert_eq!(mat.fraction(U235), 0.25);
        assert_eq!(mat.fraction(U238), 0.75);
        assert_eq!(mat.mass_of(U238), 7.5);
        assert_eq!(mat.fraction(U234), 0.0);
    }

    #[test]
    fn test_duplicate_entries_are_summed() {
        let mat = Material::new([(U235, 0.5), (U235, 0.5), (U238, 1.0)], 1.0);
        assert_eq!(mat.len(), 2);
        assert_eq!(mat.fraction(U235), 0.5);
    }

    #[test]
    fn test_equality_treats_missing_as_zero() {
        let a = Material::new([(U235, 0.5), (U238, 0.5)], 2.0);
        let b = Material::new([(U235, 0.5), (U238, 0.5), (U234, 0.0)], 2.0);
        assert_eq!(a, b);

        let heavier = a.with_mass(2.5);
        assert_ne!(a, heavier);

        let shifted = Material::new([(U235, 0.6), (U238, 0.4)], 2.0);
        assert_ne!(a, shifted);
    }

    #[test]
    fn test_default_is_empty() {
        let mat = Material::default();
        assert!(mat.is_empty());
        assert_eq!(mat.mass(), 0.0);
        assert_eq!(mat, Material::new(Vec::<(Nuclide, f64)>::new(), 0.0));
    }

    #[test]
    fn test_mixing_conserves_isotopes() {
        let nu = natural_uranium();
        let leu = Material::new([(U235, 0.05), (U238, 0.95)], 0.5);
        let mix = &nu + &leu;
        assert_relative_eq!(mix.mass(), 1.5);
        assert_relative_eq!(mix.mass_of(U235), 0.0072 + 0.025, max_relative = 1e-12);
        assert_relative_eq!(mix.mass_of(U234), 5.5e-5, max_relative = 1e-12);
        let total: f64 = mix.comp().values().sum();
        assert_relative_eq!(total, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_scaling() {
        let scaled = natural_uranium() * 4.0;
        assert_eq!(scaled.mass(), 4.0);
        assert_relative_eq!(scaled.fraction(U235), 0.0072, max_relative = 1e-12);
    }

    #[test]
    fn test_elements_and_sub_element() {
        let w182 = Nuclide::new(74, 182).unwrap();
        let mat = Material::new([(U235, 0.25), (U238, 0.25), (w182, 0.5)], 4.0);
        assert_eq!(mat.elements().into_iter().collect::<Vec<_>>(), vec![74, 92]);

        let uranium = mat.sub_element(92);
        assert_relative_eq!(uranium.mass(), 2.0);
        assert_relative_eq!(uranium.fraction(U235), 0.5);
        assert_eq!(uranium.fraction(w182), 0.0);
    }

    #[test]
    fn test_atom_fraction_round_trip() {
        let data = AtomicData::new();
        let nu = natural_uranium();
        let atoms = nu.to_atom_frac(&data).unwrap();
        // lighter isotopes have larger atom fractions than mass fractions
        assert!(atoms[&U235] > nu.fraction(U235));
        let back = Material::from_atom_frac(atoms, 1.0, &data).unwrap();
        assert_eq!(back, nu);
    }

    #[test]
    fn test_molecular_mass() {
        let data = AtomicData::new();
        let mat = Material::new([(U235, 1.0)], 1.0);
        assert_relative_eq!(mat.molecular_mass(&data).unwrap(), 235.0439299, max_relative = 1e-12);
        assert!(Material::default().molecular_mass(&data).is_err());
    }

    #[test]
    fn test_expand_natural_element() {
        let data = AtomicData::new();
        let uranium = Nuclide::element(92).unwrap();
        let mat = Material::new([(uranium, 1.0)], 1.0).expand_elements(&data).unwrap();
        assert_eq!(mat.len(), 3);
        assert!(mat.fraction(U235) > 0.0071 && mat.fraction(U235) < 0.0072);
        let atoms = mat.to_atom_frac(&data).unwrap();
        assert_relative_eq!(atoms[&U235], 0.007204, max_relative = 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(natural_uranium().validate().is_ok());
        assert!(Material::new([(U235, 1.0)], -1.0).validate().is_err());
        assert!(Material::new([(U235, 2.0), (U238, -1.0)], 1.0).validate().is_err());
    }
}
