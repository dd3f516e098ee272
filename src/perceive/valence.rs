use super::error::Error;
use crate::model::{
    molecule::{Bond, Molecule},
    types::BondOrder,
};

/// Fills implicit hydrogen counts from the default valence model and checks
/// explicit valences. Expects a kekulized molecule.
///
/// Atoms written without brackets take the smallest permitted valence that
/// accommodates their bonds. Bracket atoms keep their stated count and are
/// only checked against the highest permitted valence of their element and
/// charge; elements without a valence model are not checked.
pub fn assign_hydrogens(molecule: &mut Molecule) -> Result<(), Error> {
    for idx in 0..molecule.atom_count() {
        let used = molecule.bond_valence(idx);
        let atom = &molecule.atoms[idx];
        let Some(valences) = atom.element.allowed_valences(atom.charge) else {
            continue;
        };

        if atom.fixed_hydrogens {
            let explicit = used + atom.hydrogens;
            let highest = valences.iter().copied().max().unwrap_or(0);
            if explicit > highest {
                return Err(Error::valence(idx, atom.element, explicit));
            }
            continue;
        }

        let Some(target) = valences.iter().copied().find(|&v| v >= used) else {
            return Err(Error::valence(idx, atom.element, used));
        };
        molecule.atoms[idx].hydrogens = target - used;
    }
    Ok(())
}

/// Removes explicit hydrogen atoms and adds them to their heavy-atom
/// neighbour's hydrogen count.
///
/// Only plain singly bonded hydrogens are folded: charged or isotopic
/// hydrogens, bare protons and hydrogen bonded to hydrogen stay in the graph.
pub fn fold_hydrogens(molecule: &mut Molecule) {
    let n = molecule.atom_count();
    let adjacency = molecule.adjacency();
    let mut removed = vec![false; n];

    for idx in 0..n {
        let atom = &molecule.atoms[idx];
        if !atom.is_hydrogen() || atom.charge != 0 || atom.isotope.is_some() || atom.hydrogens > 0
        {
            continue;
        }
        let &[(heavy, bond)] = adjacency[idx].as_slice() else {
            continue;
        };
        if molecule.atoms[heavy].is_hydrogen() || molecule.bonds[bond].order != BondOrder::Single {
            continue;
        }
        removed[idx] = true;
        molecule.atoms[heavy].hydrogens += 1;
    }

    if !removed.iter().any(|&r| r) {
        return;
    }

    let mut remap = vec![usize::MAX; n];
    let mut next = 0;
    for idx in 0..n {
        if !removed[idx] {
            remap[idx] = next;
            next += 1;
        }
    }

    let atoms = std::mem::take(&mut molecule.atoms);
    molecule.atoms = atoms
        .into_iter()
        .zip(&removed)
        .filter(|(_, removed)| !**removed)
        .map(|(atom, _)| atom)
        .collect();

    let bonds = std::mem::take(&mut molecule.bonds);
    molecule.bonds = bonds
        .into_iter()
        .filter(|b| !removed[b.i] && !removed[b.j])
        .map(|b| Bond::new(remap[b.i], remap[b.j], b.order))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::read;

    fn hydrogens(smiles: &str) -> Result<Vec<u8>, Error> {
        let mut mol = read(smiles).unwrap();
        assign_hydrogens(&mut mol)?;
        Ok(mol.atoms.iter().map(|a| a.hydrogens).collect())
    }

    #[test]
    fn default_valences_fill_hydrogens() {
        assert_eq!(hydrogens("CC(=O)O").unwrap(), vec![3, 0, 0, 1]);
        assert_eq!(hydrogens("C#N").unwrap(), vec![1, 0]);
        assert_eq!(hydrogens("CS(=O)(=O)C").unwrap(), vec![3, 0, 0, 0, 3]);
        assert_eq!(hydrogens("ClCBr").unwrap(), vec![0, 2, 0]);
    }

    #[test]
    fn bracket_atoms_keep_stated_hydrogens() {
        assert_eq!(hydrogens("[NH4+]").unwrap(), vec![4]);
        assert_eq!(hydrogens("[CH2]C").unwrap(), vec![2, 3]);
        assert_eq!(hydrogens("[Fe+2]").unwrap(), vec![0]);
    }

    #[test]
    fn excess_valence_is_rejected() {
        assert!(matches!(hydrogens("C(C)(C)(C)(C)C"), Err(Error::Valence { valence: 5, .. })));
        assert!(matches!(hydrogens("[NH4]"), Err(Error::Valence { .. })));
        assert!(matches!(hydrogens("FC(F)(F)(F)F"), Err(Error::Valence { .. })));
    }

    #[test]
    fn explicit_hydrogens_fold_into_neighbors() {
        let mut mol = read("[H]C([H])([H])[H]").unwrap();
        assign_hydrogens(&mut mol).unwrap();
        fold_hydrogens(&mut mol);
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.atoms[0].hydrogens, 4);
    }

    #[test]
    fn folding_remaps_bonds() {
        let mut mol = read("[H]OC").unwrap();
        assign_hydrogens(&mut mol).unwrap();
        fold_hydrogens(&mut mol);
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);
        assert_eq!(mol.atoms[0].hydrogens, 1);
        assert_eq!(mol.atoms[1].hydrogens, 3);
    }

    #[test]
    fn special_hydrogens_stay() {
        for smiles in ["[H][H]", "[2H]C", "[H+]"] {
            let mut mol = read(smiles).unwrap();
            let count = mol.atom_count();
            assign_hydrogens(&mut mol).unwrap();
            fold_hydrogens(&mut mol);
            assert_eq!(mol.atom_count(), count, "{smiles}");
        }
    }
}
