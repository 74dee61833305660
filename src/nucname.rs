//! Nuclide identifiers.
//!
//! A nuclide is identified by a single integer of the form `ZZZAAASSSS`,
//! i.e. `Z·10^7 + A·10^4 + S`, where `Z` is the atomic number, `A` the mass
//! number and `S` the excitation state. Elements (natural mixtures) use
//! `A = 0`, so uranium is `920000000` and U-235 is `922350000`.
//!
//! ```
//! use isocascade::nucname::Nuclide;
//!
//! let u235: Nuclide = "U-235".parse().unwrap();
//! assert_eq!(u235.id(), 922350000);
//! assert_eq!(u235.znum(), 92);
//! assert_eq!(u235.anum(), 235);
//! assert_eq!(u235.to_string(), "U235");
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EnrichmentError, EnrichmentResult};

const Z_FACTOR: u32 = 10_000_000;
const A_FACTOR: u32 = 10_000;

/// Element symbols indexed by atomic number minus one.
pub const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Integer nuclide identifier (`Z·10^7 + A·10^4 + S`).
///
/// The default value (id 0) carries no element and is only meaningful as
/// the placeholder of a default-constructed cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Nuclide(u32);

pub const U232: Nuclide = Nuclide::from_id(922320000);
pub const U234: Nuclide = Nuclide::from_id(922340000);
pub const U235: Nuclide = Nuclide::from_id(922350000);
pub const U236: Nuclide = Nuclide::from_id(922360000);
pub const U238: Nuclide = Nuclide::from_id(922380000);

impl Nuclide {
    /// Wraps a raw identifier without validation.
    pub const fn from_id(id: u32) -> Self {
        Nuclide(id)
    }

    /// Creates a ground-state nuclide from atomic and mass numbers.
    ///
    /// A mass number of zero denotes the natural element.
    pub fn new(z: u32, a: u32) -> EnrichmentResult<Self> {
        Self::with_state(z, a, 0)
    }

    /// Creates a nuclide in excitation state `state`.
    pub fn with_state(z: u32, a: u32, state: u32) -> EnrichmentResult<Self> {
        if !(1..=ELEMENT_SYMBOLS.len() as u32).contains(&z) {
            return Err(EnrichmentError::invalid(format!("atomic number {z} out of range")));
        }
        if a != 0 && (a < z || a >= 1000) {
            return Err(EnrichmentError::invalid(format!("mass number {a} invalid for Z = {z}")));
        }
        if state >= A_FACTOR || (a == 0 && state != 0) {
            return Err(EnrichmentError::invalid(format!("excitation state {state} invalid")));
        }
        Ok(Nuclide(z * Z_FACTOR + a * A_FACTOR + state))
    }

    /// Creates the natural element with atomic number `z`.
    pub fn element(z: u32) -> EnrichmentResult<Self> {
        Self::new(z, 0)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Atomic number.
    pub const fn znum(self) -> u32 {
        self.0 / Z_FACTOR
    }

    /// Mass number; zero for elements.
    pub const fn anum(self) -> u32 {
        (self.0 / A_FACTOR) % 1000
    }

    /// Excitation state; zero for the ground state.
    pub const fn state(self) -> u32 {
        self.0 % A_FACTOR
    }

    pub const fn is_element(self) -> bool {
        self.anum() == 0 && self.state() == 0
    }

    /// The natural element this nuclide belongs to.
    pub const fn to_element(self) -> Nuclide {
        Nuclide(self.znum() * Z_FACTOR)
    }

    /// Chemical symbol, if the atomic number is known.
    pub fn symbol(self) -> Option<&'static str> {
        let z = self.znum() as usize;
        if z == 0 {
            return None;
        }
        ELEMENT_SYMBOLS.get(z - 1).copied()
    }
}

impl From<Nuclide> for u32 {
    fn from(nuc: Nuclide) -> Self {
        nuc.0
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(symbol) = self.symbol() else {
            return write!(f, "{}", self.0);
        };
        if self.is_element() {
            return write!(f, "{symbol}");
        }
        write!(f, "{}{}", symbol, self.anum())?;
        match self.state() {
            0 => Ok(()),
            1 => write!(f, "M"),
            s => write!(f, "M{s}"),
        }
    }
}

impl FromStr for Nuclide {
    type Err = EnrichmentError;

    /// Parses `"U235"`, `"U-235"`, `"u235m"`, `"922350000"` or a bare symbol such as `"W"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EnrichmentError::invalid("empty nuclide name"));
        }

        if s.chars().all(|c| c.is_ascii_digit()) {
            let id: u32 =
                s.parse().map_err(|_| EnrichmentError::invalid(format!("bad nuclide id '{s}'")))?;
            let nuc = Nuclide(id);
            return Nuclide::with_state(nuc.znum(), nuc.anum(), nuc.state());
        }

        let split = s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (symbol, rest) = s.split_at(split);
        let z = ELEMENT_SYMBOLS
            .iter()
            .position(|sym| sym.eq_ignore_ascii_case(symbol))
            .map(|i| i as u32 + 1)
            .ok_or_else(|| EnrichmentError::invalid(format!("unknown element symbol in '{s}'")))?;

        let rest = rest.strip_prefix('-').unwrap_or(rest);
        if rest.is_empty() {
            return Nuclide::element(z);
        }

        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);
        let a: u32 = digits
            .parse()
            .map_err(|_| EnrichmentError::invalid(format!("bad mass number in '{s}'")))?;

        let state = match suffix {
            "" => 0,
            "m" | "M" => 1,
            other => {
                let level = other.strip_prefix(['m', 'M']).ok_or_else(|| {
                    EnrichmentError::invalid(format!("bad excitation state in '{s}'"))
                })?;
                level
                    .parse()
                    .map_err(|_| EnrichmentError::invalid(format!("bad excitation state in '{s}'")))?
            }
        };

        Nuclide::with_state(z, a, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_decomposition() {
        let w180 = Nuclide::new(74, 180).unwrap();
        assert_eq!(w180.id(), 741800000);
        assert_eq!(w180.znum(), 74);
        assert_eq!(w180.anum(), 180);
        assert_eq!(w180.state(), 0);
        assert_eq!(w180.to_element().id(), 740000000);
        assert!(!w180.is_element());
        assert!(w180.to_element().is_element());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("U235".parse::<Nuclide>().unwrap(), U235);
        assert_eq!("u-235".parse::<Nuclide>().unwrap(), U235);
        assert_eq!("922380000".parse::<Nuclide>().unwrap(), U238);
        assert_eq!("W".parse::<Nuclide>().unwrap().id(), 740000000);
        assert_eq!("Am242m".parse::<Nuclide>().unwrap().id(), 952420001);
        assert_eq!("Ta180M2".parse::<Nuclide>().unwrap().state(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Nuclide>().is_err());
        assert!("Xx12".parse::<Nuclide>().is_err());
        assert!("U1".parse::<Nuclide>().is_err());
        assert!("U235q".parse::<Nuclide>().is_err());
        assert!("1300000000".parse::<Nuclide>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(U234.to_string(), "U234");
        assert_eq!(Nuclide::from_id(952420001).to_string(), "Am242M");
        assert_eq!(Nuclide::element(92).unwrap().to_string(), "U");
        assert_eq!(Nuclide::default().to_string(), "0");
    }

    #[test]
    fn test_ordering_follows_id() {
        assert!(U234 < U235);
        assert!(U235 < U238);
        assert!(Nuclide::new(74, 186).unwrap() < U232);
    }
}
