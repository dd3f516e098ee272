use crate::model::molecule::Molecule;
use std::collections::{HashSet, VecDeque};

/// A simple cycle of the molecular graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Atom indices in cyclic order.
    pub atoms: Vec<usize>,
    /// Bond indices, sorted.
    pub bonds: Vec<usize>,
}

impl Ring {
    #[inline]
    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    /// Bonds shared with another ring.
    pub fn shared_bonds(&self, other: &Ring) -> usize {
        self.bonds
            .iter()
            .filter(|b| other.bonds.binary_search(b).is_ok())
            .count()
    }
}

/// Ring membership and the set of smallest rings through every ring bond.
#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Ring>,
    ring_atoms: Vec<bool>,
    ring_bonds: Vec<bool>,
}

impl RingInfo {
    pub fn new(molecule: &Molecule) -> Self {
        let adjacency = molecule.adjacency();
        let mut ring_atoms = vec![false; molecule.atom_count()];
        let mut ring_bonds = vec![false; molecule.bond_count()];
        let mut rings = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        for (b, bond) in molecule.bonds.iter().enumerate() {
            let Some(path) = shortest_path_avoiding(&adjacency, bond.i, bond.j, b) else {
                continue;
            };

            let mut bonds: Vec<usize> = path.iter().map(|&(_, via)| via).collect();
            bonds.push(b);
            bonds.sort_unstable();

            ring_bonds[b] = true;
            let atoms: Vec<usize> = std::iter::once(bond.i)
                .chain(path.iter().map(|&(atom, _)| atom))
                .collect();
            for &a in &atoms {
                ring_atoms[a] = true;
            }

            if seen.insert(bonds.clone()) {
                rings.push(Ring { atoms, bonds });
            }
        }

        rings.sort_by(|a, b| a.size().cmp(&b.size()).then_with(|| a.bonds.cmp(&b.bonds)));

        Self {
            rings,
            ring_atoms,
            ring_bonds,
        }
    }

    #[inline]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    #[inline]
    pub fn is_ring_atom(&self, idx: usize) -> bool {
        self.ring_atoms[idx]
    }

    #[inline]
    pub fn is_ring_bond(&self, idx: usize) -> bool {
        self.ring_bonds[idx]
    }
}

/// Breadth-first path from `from` to `to` that does not use bond `skip`.
///
/// Returns the `(atom, bond used to reach it)` steps after `from`, ending
/// at `to`.
fn shortest_path_avoiding(
    adjacency: &[Vec<(usize, usize)>],
    from: usize,
    to: usize,
    skip: usize,
) -> Option<Vec<(usize, usize)>> {
    let mut previous: Vec<Option<(usize, usize)>> = vec![None; adjacency.len()];
    let mut visited = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([from]);
    visited[from] = true;

    while let Some(atom) = queue.pop_front() {
        if atom == to {
            break;
        }
        for &(nb, bond) in &adjacency[atom] {
            if bond == skip || visited[nb] {
                continue;
            }
            visited[nb] = true;
            previous[nb] = Some((atom, bond));
            queue.push_back(nb);
        }
    }

    if !visited[to] {
        return None;
    }

    let mut steps = Vec::new();
    let mut current = to;
    while current != from {
        let (prev, bond) = previous[current]?;
        steps.push((current, bond));
        current = prev;
    }
    steps.reverse();
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::read;

    #[test]
    fn chain_has_no_rings() {
        let mol = read("CCCO").unwrap();
        let info = RingInfo::new(&mol);
        assert!(info.rings().is_empty());
        assert!((0..mol.atom_count()).all(|a| !info.is_ring_atom(a)));
    }

    #[test]
    fn benzene_is_one_six_ring() {
        let mol = read("c1ccccc1").unwrap();
        let info = RingInfo::new(&mol);
        assert_eq!(info.rings().len(), 1);
        assert_eq!(info.rings()[0].size(), 6);
        assert!((0..6).all(|b| info.is_ring_bond(b)));
    }

    #[test]
    fn naphthalene_has_two_fused_rings() {
        let mol = read("c1ccc2ccccc2c1").unwrap();
        let info = RingInfo::new(&mol);
        assert_eq!(info.rings().len(), 2);
        let (a, b) = (&info.rings()[0], &info.rings()[1]);
        assert_eq!(a.shared_bonds(b), 1);
    }

    #[test]
    fn substituent_bond_is_not_a_ring_bond() {
        let mol = read("C1CC1C").unwrap();
        let info = RingInfo::new(&mol);
        assert_eq!(info.rings().len(), 1);
        assert!(!info.is_ring_atom(3));
        let exo = mol.bond_between(2, 3).unwrap();
        assert!(!info.is_ring_bond(exo));
    }

    #[test]
    fn ring_atoms_are_in_cyclic_order() {
        let mol = read("C1CCCC1").unwrap();
        let info = RingInfo::new(&mol);
        let ring = &info.rings()[0];
        for k in 0..ring.size() {
            let a = ring.atoms[k];
            let b = ring.atoms[(k + 1) % ring.size()];
            assert!(mol.bond_between(a, b).is_some());
        }
    }
}
