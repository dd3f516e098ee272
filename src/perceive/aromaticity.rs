use super::rings::{Ring, RingInfo};
use crate::model::{
    molecule::Molecule,
    types::{BondOrder, Element},
};

/// Re-derives aromatic flags on a kekulized molecule.
///
/// A ring is aromatic when every atom contributes a known number of pi
/// electrons and the total is 4n+2. Pairs of rings fused through exactly one
/// bond are also tested as a whole, which catches systems such as azulene
/// whose rings fail the rule individually. Atoms of aromatic cycles are
/// flagged and their bonds set to [`BondOrder::Aromatic`].
pub fn perceive(molecule: &mut Molecule, rings: &RingInfo) {
    for atom in &mut molecule.atoms {
        atom.aromatic = false;
    }

    let electrons: Vec<Option<u8>> = (0..molecule.atom_count())
        .map(|idx| pi_electrons(molecule, rings, idx))
        .collect();

    let all = rings.rings();
    let mut aromatic_bonds = vec![false; molecule.bond_count()];
    let mut aromatic_atoms = vec![false; molecule.atom_count()];

    for ring in all {
        if is_huckel(ring.atoms.iter().copied(), &electrons) {
            mark(ring, &mut aromatic_atoms, &mut aromatic_bonds);
        }
    }

    for (k, first) in all.iter().enumerate() {
        for second in &all[k + 1..] {
            if first.shared_bonds(second) != 1 {
                continue;
            }
            let mut atoms: Vec<usize> = first.atoms.iter().chain(&second.atoms).copied().collect();
            atoms.sort_unstable();
            atoms.dedup();
            if is_huckel(atoms.into_iter(), &electrons) {
                mark(first, &mut aromatic_atoms, &mut aromatic_bonds);
                mark(second, &mut aromatic_atoms, &mut aromatic_bonds);
            }
        }
    }

    for (atom, aromatic) in molecule.atoms.iter_mut().zip(aromatic_atoms) {
        atom.aromatic = aromatic;
    }
    for (bond, aromatic) in molecule.bonds.iter_mut().zip(aromatic_bonds) {
        if aromatic {
            bond.order = BondOrder::Aromatic;
        }
    }
}

fn mark(ring: &Ring, atoms: &mut [bool], bonds: &mut [bool]) {
    for &a in &ring.atoms {
        atoms[a] = true;
    }
    for &b in &ring.bonds {
        bonds[b] = true;
    }
}

fn is_huckel(mut atoms: impl Iterator<Item = usize>, electrons: &[Option<u8>]) -> bool {
    let total = atoms.try_fold(0u32, |sum, a| electrons[a].map(|e| sum + u32::from(e)));
    total.is_some_and(|t| t % 4 == 2)
}

/// Pi electrons an atom donates to a ring it belongs to, or `None` when the
/// atom cannot be part of an aromatic cycle.
fn pi_electrons(molecule: &Molecule, rings: &RingInfo, idx: usize) -> Option<u8> {
    if !rings.is_ring_atom(idx) {
        return None;
    }

    let atom = &molecule.atoms[idx];
    let mut ring_double = false;
    let mut exocyclic_partner = None;
    let mut degree = 0;

    for (b, bond) in molecule.bonds.iter().enumerate() {
        if !bond.contains(idx) {
            continue;
        }
        degree += 1;
        match bond.order {
            BondOrder::Triple => return None,
            BondOrder::Double if rings.is_ring_bond(b) => ring_double = true,
            BondOrder::Double => exocyclic_partner = Some(bond.other(idx)),
            _ => {}
        }
    }

    if ring_double {
        return Some(1);
    }

    if let Some(partner) = exocyclic_partner {
        let acceptor = matches!(
            molecule.atoms[partner].element,
            Element::N | Element::O | Element::S
        );
        return (atom.element == Element::C && acceptor).then_some(0);
    }

    let connections = degree + usize::from(atom.hydrogens);
    match (atom.element, atom.charge, connections) {
        (Element::N | Element::P | Element::As, 0, 3) => Some(2),
        (Element::N, -1, 2) => Some(2),
        (Element::O | Element::S | Element::Se | Element::Te, 0, 2) => Some(2),
        (Element::C, -1, 3) => Some(2),
        (Element::C, 1, 3) => Some(0),
        (Element::B, 0, 3) => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceive::{kekulize::kekulize, valence::assign_hydrogens};
    use crate::smiles::read;

    fn perceived(smiles: &str) -> Molecule {
        let mut mol = read(smiles).unwrap();
        kekulize(&mut mol).unwrap();
        assign_hydrogens(&mut mol).unwrap();
        let rings = RingInfo::new(&mol);
        perceive(&mut mol, &rings);
        mol
    }

    fn aromatic_count(mol: &Molecule) -> usize {
        mol.atoms.iter().filter(|a| a.aromatic).count()
    }

    #[test]
    fn kekule_benzene_becomes_aromatic() {
        let mol = perceived("C1=CC=CC=C1");
        assert_eq!(aromatic_count(&mol), 6);
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn five_membered_heteroaromatics() {
        assert_eq!(aromatic_count(&perceived("c1cc[nH]c1")), 5);
        assert_eq!(aromatic_count(&perceived("c1ccoc1")), 5);
        assert_eq!(aromatic_count(&perceived("c1ccsc1")), 5);
    }

    #[test]
    fn non_aromatic_rings_stay_kekule() {
        assert_eq!(aromatic_count(&perceived("C1=CCC=C1")), 0);
        assert_eq!(aromatic_count(&perceived("C1=CC=CC=CC=C1")), 0);
        assert_eq!(aromatic_count(&perceived("C1CCCCC1")), 0);
    }

    #[test]
    fn fused_and_substituted_systems() {
        let mol = perceived("c1ccc2ccccc2c1");
        assert_eq!(aromatic_count(&mol), 10);

        // Only the lactam and benzene rings are aromatic; the saturated
        // seven-membered ring is not.
        let mol = perceived("O=C1Nc2ccccc2c3c1CCCCC3");
        assert_eq!(aromatic_count(&mol), 10);
        assert!(!mol.atoms[0].aromatic);
        assert!(!mol.atoms[11].aromatic);
    }

    #[test]
    fn azulene_is_aromatic_as_a_whole() {
        let mol = perceived("C1=CC2=CC=CC=CC2=C1");
        assert_eq!(aromatic_count(&mol), 10);
    }

    #[test]
    fn biphenyl_link_stays_single() {
        let mol = perceived("c1ccccc1-c1ccccc1");
        let link = mol.bond_between(5, 6).unwrap();
        assert_eq!(mol.bonds[link].order, BondOrder::Single);
        assert_eq!(aromatic_count(&mol), 12);
    }
}
