use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond symbol: '{0}'")]
pub struct ParseBondOrderError(String);

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He, Li, Be, B, C, N, O, F, Ne, Na, Mg, Al,
    Si, P, S, Cl, Ar, K, Ca, Sc, Ti, V, Cr, Mn,
    Fe, Co, Ni, Cu, Zn, Ga, Ge, As, Se, Br, Kr, Rb,
    Sr, Y, Zr, Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In,
    Sn, Sb, Te, I, Xe, Cs, Ba, La, Ce, Pr, Nd, Pm,
    Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb, Lu, Hf, Ta,
    W, Re, Os, Ir, Pt, Au, Hg, Tl, Pb, Bi, Po, At,
    Rn, Fr, Ra, Ac, Th, Pa, U, Np, Pu, Am, Cm, Bk,
    Cf, Es, Fm, Md, No, Lr, Rf, Db, Sg, Bh, Hs, Mt,
    Ds, Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og,
}

use Element as E;

#[rustfmt::skip]
const ALL: [Element; 118] = [
    E::H, E::He, E::Li, E::Be, E::B, E::C, E::N, E::O, E::F, E::Ne,
    E::Na, E::Mg, E::Al, E::Si, E::P, E::S, E::Cl, E::Ar, E::K, E::Ca,
    E::Sc, E::Ti, E::V, E::Cr, E::Mn, E::Fe, E::Co, E::Ni, E::Cu, E::Zn,
    E::Ga, E::Ge, E::As, E::Se, E::Br, E::Kr, E::Rb, E::Sr, E::Y, E::Zr,
    E::Nb, E::Mo, E::Tc, E::Ru, E::Rh, E::Pd, E::Ag, E::Cd, E::In, E::Sn,
    E::Sb, E::Te, E::I, E::Xe, E::Cs, E::Ba, E::La, E::Ce, E::Pr, E::Nd,
    E::Pm, E::Sm, E::Eu, E::Gd, E::Tb, E::Dy, E::Ho, E::Er, E::Tm, E::Yb,
    E::Lu, E::Hf, E::Ta, E::W, E::Re, E::Os, E::Ir, E::Pt, E::Au, E::Hg,
    E::Tl, E::Pb, E::Bi, E::Po, E::At, E::Rn, E::Fr, E::Ra, E::Ac, E::Th,
    E::Pa, E::U, E::Np, E::Pu, E::Am, E::Cm, E::Bk, E::Cf, E::Es, E::Fm,
    E::Md, E::No, E::Lr, E::Rf, E::Db, E::Sg, E::Bh, E::Hs, E::Mt, E::Ds,
    E::Rg, E::Cn, E::Nh, E::Fl, E::Mc, E::Lv, E::Ts, E::Og,
];

/// Symbol and standard atomic weight, indexed by `atomic_number - 1`.
#[rustfmt::skip]
const ELEMENT_DATA: [(&str, f64); 118] = [
    ("H", 1.008), ("He", 4.0026), ("Li", 6.94), ("Be", 9.0122),
    ("B", 10.81), ("C", 12.011), ("N", 14.007), ("O", 15.999),
    ("F", 18.998), ("Ne", 20.18), ("Na", 22.99), ("Mg", 24.305),
    ("Al", 26.982), ("Si", 28.085), ("P", 30.974), ("S", 32.06),
    ("Cl", 35.45), ("Ar", 39.948), ("K", 39.098), ("Ca", 40.078),
    ("Sc", 44.956), ("Ti", 47.867), ("V", 50.942), ("Cr", 51.996),
    ("Mn", 54.938), ("Fe", 55.845), ("Co", 58.933), ("Ni", 58.693),
    ("Cu", 63.546), ("Zn", 65.38), ("Ga", 69.723), ("Ge", 72.63),
    ("As", 74.922), ("Se", 78.971), ("Br", 79.904), ("Kr", 83.798),
    ("Rb", 85.468), ("Sr", 87.62), ("Y", 88.906), ("Zr", 91.224),
    ("Nb", 92.906), ("Mo", 95.96), ("Tc", 98.0), ("Ru", 101.07),
    ("Rh", 102.91), ("Pd", 106.42), ("Ag", 107.87), ("Cd", 112.41),
    ("In", 114.82), ("Sn", 118.71), ("Sb", 121.76), ("Te", 127.6),
    ("I", 126.9), ("Xe", 131.29), ("Cs", 132.91), ("Ba", 137.33),
    ("La", 138.91), ("Ce", 140.12), ("Pr", 140.91), ("Nd", 144.24),
    ("Pm", 145.0), ("Sm", 150.36), ("Eu", 151.96), ("Gd", 157.25),
    ("Tb", 158.93), ("Dy", 162.5), ("Ho", 164.93), ("Er", 167.26),
    ("Tm", 168.93), ("Yb", 173.05), ("Lu", 174.97), ("Hf", 178.49),
    ("Ta", 180.95), ("W", 183.84), ("Re", 186.21), ("Os", 190.23),
    ("Ir", 192.22), ("Pt", 195.08), ("Au", 196.97), ("Hg", 200.59),
    ("Tl", 204.38), ("Pb", 207.2), ("Bi", 208.98), ("Po", 209.0),
    ("At", 210.0), ("Rn", 222.0), ("Fr", 223.0), ("Ra", 226.0),
    ("Ac", 227.0), ("Th", 232.04), ("Pa", 231.04), ("U", 238.03),
    ("Np", 237.0), ("Pu", 244.0), ("Am", 243.0), ("Cm", 247.0),
    ("Bk", 247.0), ("Cf", 251.0), ("Es", 252.0), ("Fm", 257.0),
    ("Md", 258.0), ("No", 259.0), ("Lr", 262.0), ("Rf", 267.0),
    ("Db", 270.0), ("Sg", 271.0), ("Bh", 270.0), ("Hs", 277.0),
    ("Mt", 276.0), ("Ds", 281.0), ("Rg", 280.0), ("Cn", 285.0),
    ("Nh", 284.0), ("Fl", 289.0), ("Mc", 288.0), ("Lv", 293.0),
    ("Ts", 294.0), ("Og", 294.0),
];

impl Element {
    pub fn from_atomic_number(z: u8) -> Option<Element> {
        ALL.get(usize::from(z).checked_sub(1)?).copied()
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn atomic_mass(&self) -> f64 {
        ELEMENT_DATA[self.index()].1
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        ELEMENT_DATA[self.index()].0
    }

    /// Standard valence states used for implicit hydrogen assignment.
    ///
    /// Elements without an entry here (metals, noble gases) never receive
    /// implicit hydrogens and are not valence-checked.
    pub fn default_valences(&self) -> Option<&'static [u8]> {
        match self {
            Element::H => Some(&[1]),
            Element::B => Some(&[3]),
            Element::C | Element::Si | Element::Ge => Some(&[4]),
            Element::N => Some(&[3]),
            Element::O => Some(&[2]),
            Element::F | Element::Cl | Element::Br => Some(&[1]),
            Element::P | Element::As => Some(&[3, 5]),
            Element::S | Element::Se | Element::Te => Some(&[2, 4, 6]),
            Element::I => Some(&[1, 3, 5]),
            _ => None,
        }
    }

    /// Valence states of a charged atom, taken from its isoelectronic
    /// neighbour in the same period (`N+` behaves like `C`, `O-` like `F`).
    pub fn allowed_valences(&self, charge: i8) -> Option<&'static [u8]> {
        if charge == 0 {
            return self.default_valences();
        }
        let shifted = i16::from(self.atomic_number()) - i16::from(charge);
        let shifted = Element::from_atomic_number(u8::try_from(shifted).ok()?)?;
        if shifted.period() != self.period() {
            return None;
        }
        shifted.default_valences()
    }

    /// Elements that may be written without brackets in SMILES.
    pub fn is_organic_subset(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    /// Elements that may carry a lowercase (aromatic) SMILES symbol.
    pub fn can_be_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::Se
                | Element::As
                | Element::Te
        )
    }

    pub fn period(&self) -> u8 {
        match self.atomic_number() {
            1..=2 => 1,
            3..=10 => 2,
            11..=18 => 3,
            19..=36 => 4,
            37..=54 => 5,
            55..=86 => 6,
            _ => 7,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        usize::from(self.atomic_number()) - 1
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENT_DATA
            .iter()
            .position(|(symbol, _)| *symbol == s)
            .map(|idx| ALL[idx])
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Integral contribution to an atom's explicit valence. Aromatic bonds
    /// count as one; the extra pi electron is settled by kekulization.
    pub fn valence(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    /// Explicit SMILES symbol. Single and aromatic bonds are usually implied
    /// and only written when the context requires it.
    pub fn smiles_symbol(&self) -> char {
        match self {
            BondOrder::Single => '-',
            BondOrder::Double => '=',
            BondOrder::Triple => '#',
            BondOrder::Aromatic => ':',
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" | "/" | "\\" => Ok(BondOrder::Single),
            "=" => Ok(BondOrder::Double),
            "#" => Ok(BondOrder::Triple),
            ":" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}
