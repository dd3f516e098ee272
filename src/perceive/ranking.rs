use crate::model::{molecule::Molecule, types::BondOrder};

/// Assigns every atom a distinct canonical rank.
///
/// Atoms are first partitioned by a local invariant (degree, element,
/// isotope, charge, hydrogens, aromaticity). Classes are then refined by
/// the sorted ranks of their neighbours until stable. Remaining ties are
/// broken by promoting one atom of the lowest tied class and refining again,
/// which yields the same result for every choice when the tied atoms are
/// symmetry-equivalent.
///
/// Ties between atoms that are not symmetry-equivalent are broken by input
/// index, so for such graphs the ranking (and the canonical SMILES built on
/// it) can differ between two atom orderings of the same molecule.
pub fn canonical_ranks(molecule: &Molecule) -> Vec<usize> {
    let n = molecule.atom_count();
    if n == 0 {
        return Vec::new();
    }

    let adjacency = molecule.adjacency();
    let invariants: Vec<_> = (0..n)
        .map(|idx| {
            let atom = &molecule.atoms[idx];
            (
                adjacency[idx].len(),
                atom.element.atomic_number(),
                atom.isotope.unwrap_or(0),
                atom.charge,
                atom.hydrogens,
                atom.aromatic,
            )
        })
        .collect();

    let mut ranks = dense_ranks(&invariants);
    loop {
        ranks = refine(molecule, &adjacency, ranks);
        if class_count(&ranks) == n {
            return ranks;
        }

        let tied = lowest_tied_class(&ranks);
        let chosen = (0..n).find(|&a| ranks[a] == tied).unwrap_or(0);
        ranks = ranks
            .iter()
            .enumerate()
            .map(|(a, &r)| if r == tied && a != chosen { 2 * r + 1 } else { 2 * r })
            .collect();
    }
}

fn refine(molecule: &Molecule, adjacency: &[Vec<(usize, usize)>], mut ranks: Vec<usize>) -> Vec<usize> {
    let mut classes = class_count(&ranks);
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = adjacency
            .iter()
            .enumerate()
            .map(|(a, neighbors)| {
                let mut environment: Vec<(usize, u8)> = neighbors
                    .iter()
                    .map(|&(nb, b)| (ranks[nb], bond_code(molecule.bonds[b].order)))
                    .collect();
                environment.sort_unstable();
                (ranks[a], environment)
            })
            .collect();

        ranks = dense_ranks(&keys);
        let refined = class_count(&ranks);
        if refined == classes {
            return ranks;
        }
        classes = refined;
    }
}

fn bond_code(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Maps keys to `0..k` preserving their order; equal keys share a rank.
fn dense_ranks<T: Ord>(keys: &[T]) -> Vec<usize> {
    let mut sorted: Vec<&T> = keys.iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    keys.iter()
        .map(|key| sorted.binary_search(&key).unwrap_or(0))
        .collect()
}

fn class_count(ranks: &[usize]) -> usize {
    let mut distinct = ranks.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct.len()
}

fn lowest_tied_class(ranks: &[usize]) -> usize {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted
        .windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
        .unwrap_or(0)
}
