use super::error::Error;
use super::rings::RingInfo;
use crate::model::{molecule::Molecule, types::BondOrder};

/// Search steps allowed before a system is declared unkekulizable.
const STEP_BUDGET: usize = 100_000;

/// Rejects lowercase atoms that are not on a ring and demotes aromatic
/// bonds outside rings to single bonds.
///
/// An unmarked bond between two lowercase atoms reads as aromatic, so
/// `c1ccccc1c1ccccc1` links its rings through such a bond.
pub fn prepare_aromatic(molecule: &mut Molecule, rings: &RingInfo) -> Result<(), Error> {
    for (idx, atom) in molecule.atoms.iter().enumerate() {
        if atom.aromatic && !rings.is_ring_atom(idx) {
            return Err(Error::non_ring_aromatic(idx, atom.element));
        }
    }
    for (b, bond) in molecule.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic && !rings.is_ring_bond(b) {
            bond.order = BondOrder::Single;
        }
    }
    Ok(())
}

/// Replaces aromatic bonds by an alternating single/double assignment and
/// clears every aromatic flag.
///
/// An aromatic atom takes part in the matching when its lowest permitted
/// valence leaves room for one more bond; every such atom must receive
/// exactly one double bond.
pub fn kekulize(molecule: &mut Molecule) -> Result<(), Error> {
    let has_aromatic = molecule.bonds.iter().any(|b| b.order == BondOrder::Aromatic)
        || molecule.atoms.iter().any(|a| a.aromatic);
    if !has_aromatic {
        return Ok(());
    }

    let n = molecule.atom_count();
    let needs_double: Vec<bool> = (0..n).map(|idx| needs_double_bond(molecule, idx)).collect();

    let mut neighbors = vec![Vec::new(); n];
    for (b, bond) in molecule.bonds.iter().enumerate() {
        if bond.order == BondOrder::Aromatic && needs_double[bond.i] && needs_double[bond.j] {
            neighbors[bond.i].push((bond.j, b));
            neighbors[bond.j].push((bond.i, b));
        }
    }

    let candidates: Vec<usize> = (0..n).filter(|&a| needs_double[a]).collect();
    let mut matcher = Matcher {
        neighbors: &neighbors,
        candidates: &candidates,
        mate: vec![None; n],
        steps: 0,
    };

    if !matcher.search() {
        let atom = candidates
            .iter()
            .copied()
            .find(|&a| matcher.mate[a].is_none())
            .or_else(|| candidates.first().copied())
            .unwrap_or(0);
        return Err(Error::Kekulize { atom });
    }

    let doubles: Vec<usize> = matcher.mate.iter().flatten().copied().collect();
    for bond in &mut molecule.bonds {
        if bond.order == BondOrder::Aromatic {
            bond.order = BondOrder::Single;
        }
    }
    for b in doubles {
        molecule.bonds[b].order = BondOrder::Double;
    }
    for atom in &mut molecule.atoms {
        atom.aromatic = false;
    }

    Ok(())
}

fn needs_double_bond(molecule: &Molecule, idx: usize) -> bool {
    let atom = &molecule.atoms[idx];
    if !atom.aromatic {
        return false;
    }
    let mut explicit = molecule.bond_valence(idx);
    if atom.fixed_hydrogens {
        explicit += atom.hydrogens;
    }
    atom.element
        .allowed_valences(atom.charge)
        .and_then(|valences| valences.iter().copied().find(|&v| v >= explicit))
        .is_some_and(|v| v > explicit)
}

struct Matcher<'a> {
    neighbors: &'a [Vec<(usize, usize)>],
    candidates: &'a [usize],
    /// Double bond chosen for each atom.
    mate: Vec<Option<usize>>,
    steps: usize,
}

impl Matcher<'_> {
    fn search(&mut self) -> bool {
        self.steps += 1;
        if self.steps > STEP_BUDGET {
            return false;
        }

        // Most constrained atom first.
        let mut best: Option<(usize, usize)> = None;
        for &a in self.candidates {
            if self.mate[a].is_some() {
                continue;
            }
            let free = self.neighbors[a]
                .iter()
                .filter(|&&(nb, _)| self.mate[nb].is_none())
                .count();
            if free == 0 {
                return false;
            }
            if best.is_none_or(|(_, count)| free < count) {
                best = Some((a, free));
            }
        }

        let Some((atom, _)) = best else {
            return true;
        };

        for &(nb, bond) in &self.neighbors[atom] {
            if self.mate[nb].is_some() {
                continue;
            }
            self.mate[atom] = Some(bond);
            self.mate[nb] = Some(bond);
            if self.search() {
                return true;
            }
            self.mate[atom] = None;
            self.mate[nb] = None;
            if self.steps > STEP_BUDGET {
                return false;
            }
        }
        false
    }
}
