use crate::model::{molecule::Molecule, types::Element};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Element counts including implicit hydrogens.
pub fn element_counts(molecule: &Molecule) -> BTreeMap<Element, u32> {
    let mut counts = BTreeMap::new();
    for atom in &molecule.atoms {
        *counts.entry(atom.element).or_insert(0) += 1;
        if atom.hydrogens > 0 {
            *counts.entry(Element::H).or_insert(0) += u32::from(atom.hydrogens);
        }
    }
    counts
}

/// Molecular formula in Hill order with the net charge appended.
///
/// With carbon present, C comes first, then H, then the remaining symbols
/// alphabetically; without carbon every symbol is alphabetical.
pub fn hill_formula(molecule: &Molecule) -> String {
    let counts = element_counts(molecule);
    let mut order: Vec<(&'static str, u32)> = counts
        .iter()
        .map(|(element, &count)| (element.symbol(), count))
        .collect();

    if counts.contains_key(&Element::C) {
        order.sort_by_key(|&(symbol, _)| match symbol {
            "C" => (0, symbol),
            "H" => (1, symbol),
            _ => (2, symbol),
        });
    } else {
        order.sort_by_key(|&(symbol, _)| symbol);
    }

    let mut formula = String::new();
    for (symbol, count) in order {
        formula.push_str(symbol);
        if count > 1 {
            let _ = write!(formula, "{count}");
        }
    }

    match molecule.total_charge() {
        0 => {}
        1 => formula.push('+'),
        -1 => formula.push('-'),
        c if c > 0 => {
            let _ = write!(formula, "+{c}");
        }
        c => {
            let _ = write!(formula, "-{}", -c);
        }
    }
    formula
}

/// Average molecular weight from standard atomic weights.
pub fn molecular_weight(molecule: &Molecule) -> f64 {
    let hydrogen = Element::H.atomic_mass();
    molecule
        .atoms
        .iter()
        .map(|atom| atom.element.atomic_mass() + f64::from(atom.hydrogens) * hydrogen)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    fn with_h(element: Element, hydrogens: u8) -> Atom {
        let mut atom = Atom::new(element);
        atom.hydrogens = hydrogens;
        atom
    }

    #[test]
    fn hill_order_with_carbon() {
        let mol = Molecule {
            atoms: vec![with_h(Element::C, 3), with_h(Element::O, 1), with_h(Element::Cl, 0)],
            bonds: Vec::new(),
        };
        assert_eq!(hill_formula(&mol), "CH4ClO");
    }

    #[test]
    fn alphabetical_without_carbon() {
        let mut ammonium = with_h(Element::N, 4);
        ammonium.charge = 1;
        let mol = Molecule {
            atoms: vec![ammonium],
            bonds: Vec::new(),
        };
        assert_eq!(hill_formula(&mol), "H4N+");
    }

    #[test]
    fn charge_suffixes() {
        let mut iron = Atom::new(Element::Fe);
        iron.charge = 2;
        let mut oxide = Atom::new(Element::O);
        oxide.charge = -2;
        let mol = Molecule {
            atoms: vec![iron],
            bonds: Vec::new(),
        };
        assert_eq!(hill_formula(&mol), "Fe+2");
        let mol = Molecule {
            atoms: vec![oxide],
            bonds: Vec::new(),
        };
        assert_eq!(hill_formula(&mol), "O-2");
    }

    #[test]
    fn weight_of_methane() {
        let mol = Molecule {
            atoms: vec![with_h(Element::C, 4)],
            bonds: Vec::new(),
        };
        let weight = molecular_weight(&mol);
        assert!((weight - 16.043).abs() < 1e-9);
    }
}
