use super::atom::Atom;
use super::types::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// The atom at the far end of this bond as seen from `idx`.
    #[inline]
    pub fn other(&self, idx: usize) -> usize {
        if self.i == idx { self.j } else { self.i }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.i == idx || self.j == idx
    }
}

/// A molecular graph: atoms with implicit hydrogen counts and the bonds
/// between them. No coordinates are carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Per-atom lists of `(neighbor, bond index)` pairs.
    pub fn adjacency(&self) -> Vec<Vec<(usize, usize)>> {
        let mut adj = vec![Vec::new(); self.atoms.len()];
        for (b, bond) in self.bonds.iter().enumerate() {
            adj[bond.i].push((bond.j, b));
            adj[bond.j].push((bond.i, b));
        }
        adj
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        let (i, j) = (a.min(b), a.max(b));
        self.bonds.iter().position(|bond| bond.i == i && bond.j == j)
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.bonds.iter().filter(|b| b.contains(idx)).count()
    }

    /// Sum of bond valences around an atom, aromatic bonds counting one.
    pub fn bond_valence(&self, idx: usize) -> u8 {
        self.bonds
            .iter()
            .filter(|b| b.contains(idx))
            .map(|b| b.order.valence())
            .sum()
    }

    pub fn total_charge(&self) -> i32 {
        self.atoms.iter().map(|a| i32::from(a.charge)).sum()
    }

    /// Connected components as sorted atom index lists, ordered by their
    /// lowest atom index.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let adj = self.adjacency();
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();

        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(a) = stack.pop() {
                members.push(a);
                for &(nb, _) in &adj[a] {
                    if !seen[nb] {
                        seen[nb] = true;
                        stack.push(nb);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        components
    }
}
