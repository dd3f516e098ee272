use crate::model::{atom::Atom, molecule::Molecule, types::BondOrder};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Writes a molecule as SMILES, visiting atoms in the order given by
/// `ranks`.
///
/// Every component starts at its lowest-ranked atom and neighbours are
/// explored in ascending rank, so equal ranks on equal graphs give equal
/// strings. Ring-closure digits reuse the lowest free label. `ranks` must
/// hold one entry per atom.
pub fn write(molecule: &Molecule, ranks: &[usize]) -> String {
    debug_assert_eq!(molecule.atom_count(), ranks.len());

    let mut adjacency = molecule.adjacency();
    for neighbors in &mut adjacency {
        neighbors.sort_by_key(|&(nb, _)| ranks[nb]);
    }

    let mut roots: Vec<usize> = molecule
        .components()
        .into_iter()
        .filter_map(|members| members.into_iter().min_by_key(|&a| ranks[a]))
        .collect();
    roots.sort_by_key(|&a| ranks[a]);

    let mut plan = Plan::new(molecule.atom_count(), molecule.bond_count());
    for &root in &roots {
        plan.visit(&adjacency, root, None);
    }
    for closures in plan.openings.iter_mut().chain(plan.closings.iter_mut()) {
        closures.sort_by_key(|&(partner, _)| ranks[partner]);
    }

    let mut emitter = Emitter {
        molecule,
        plan: &plan,
        digits: vec![None; molecule.bond_count()],
        in_use: BTreeSet::new(),
        out: String::new(),
    };
    for (n, &root) in roots.iter().enumerate() {
        if n > 0 {
            emitter.out.push('.');
        }
        emitter.emit(root, None);
    }
    emitter.out
}

/// Hydrogen count a bare (unbracketed) atom token implies for `idx`, or
/// `None` when no default valence accommodates its bonds.
pub(crate) fn implied_hydrogens(molecule: &Molecule, idx: usize) -> Option<u8> {
    let atom = &molecule.atoms[idx];
    let used = molecule.bond_valence(idx);
    let valence = atom
        .element
        .default_valences()?
        .iter()
        .copied()
        .find(|&v| v >= used)?;
    let room = valence - used;
    Some(if atom.aromatic && room >= 1 { room - 1 } else { room })
}

struct Plan {
    visited: Vec<bool>,
    bond_used: Vec<bool>,
    children: Vec<Vec<(usize, usize)>>,
    openings: Vec<Vec<(usize, usize)>>,
    closings: Vec<Vec<(usize, usize)>>,
}

impl Plan {
    fn new(atoms: usize, bonds: usize) -> Self {
        Self {
            visited: vec![false; atoms],
            bond_used: vec![false; bonds],
            children: vec![Vec::new(); atoms],
            openings: vec![Vec::new(); atoms],
            closings: vec![Vec::new(); atoms],
        }
    }

    fn visit(&mut self, adjacency: &[Vec<(usize, usize)>], atom: usize, via: Option<usize>) {
        self.visited[atom] = true;
        for &(nb, bond) in &adjacency[atom] {
            if Some(bond) == via || self.bond_used[bond] {
                continue;
            }
            self.bond_used[bond] = true;
            if self.visited[nb] {
                // Back edge to an ancestor: the ring bond opens there.
                self.openings[nb].push((atom, bond));
                self.closings[atom].push((nb, bond));
            } else {
                self.children[atom].push((nb, bond));
                self.visit(adjacency, nb, Some(bond));
            }
        }
    }
}

struct Emitter<'a> {
    molecule: &'a Molecule,
    plan: &'a Plan,
    digits: Vec<Option<u16>>,
    in_use: BTreeSet<u16>,
    out: String,
}

impl Emitter<'_> {
    fn emit(&mut self, atom: usize, via: Option<usize>) {
        if let Some(bond) = via {
            self.write_bond(bond);
        }
        self.write_atom(atom);

        let plan = self.plan;
        let mut released = Vec::new();
        for &(_, bond) in &plan.closings[atom] {
            if let Some(digit) = self.digits[bond] {
                write_ring_label(&mut self.out, digit);
                released.push(digit);
            }
        }
        for &(_, bond) in &plan.openings[atom] {
            let digit = (1..).find(|d| !self.in_use.contains(d)).unwrap_or(1);
            self.in_use.insert(digit);
            self.digits[bond] = Some(digit);
            self.write_bond(bond);
            write_ring_label(&mut self.out, digit);
        }
        for digit in released {
            self.in_use.remove(&digit);
        }

        let children = &plan.children[atom];
        let last = children.len().saturating_sub(1);
        for (n, &(child, bond)) in children.iter().enumerate() {
            if n < last {
                self.out.push('(');
                self.emit(child, Some(bond));
                self.out.push(')');
            } else {
                self.emit(child, Some(bond));
            }
        }
    }

    fn write_bond(&mut self, bond: usize) {
        let bond = &self.molecule.bonds[bond];
        let both_aromatic =
            self.molecule.atoms[bond.i].aromatic && self.molecule.atoms[bond.j].aromatic;
        match bond.order {
            BondOrder::Single if both_aromatic => self.out.push('-'),
            BondOrder::Single | BondOrder::Aromatic => {}
            order => self.out.push(order.smiles_symbol()),
        }
    }

    fn write_atom(&mut self, idx: usize) {
        let atom = &self.molecule.atoms[idx];
        let bare = atom.element.is_organic_subset()
            && atom.charge == 0
            && atom.isotope.is_none()
            && implied_hydrogens(self.molecule, idx) == Some(atom.hydrogens);

        if bare {
            push_symbol(&mut self.out, atom);
            return;
        }

        self.out.push('[');
        if let Some(isotope) = atom.isotope {
            let _ = write!(self.out, "{isotope}");
        }
        push_symbol(&mut self.out, atom);
        match atom.hydrogens {
            0 => {}
            1 => self.out.push('H'),
            n => {
                let _ = write!(self.out, "H{n}");
            }
        }
        match atom.charge {
            0 => {}
            1 => self.out.push('+'),
            -1 => self.out.push('-'),
            c if c > 0 => {
                let _ = write!(self.out, "+{c}");
            }
            c => {
                let _ = write!(self.out, "-{}", -i16::from(c));
            }
        }
        self.out.push(']');
    }
}

fn push_symbol(out: &mut String, atom: &Atom) {
    if atom.aromatic {
        out.push_str(&atom.element.symbol().to_ascii_lowercase());
    } else {
        out.push_str(atom.element.symbol());
    }
}

fn write_ring_label(out: &mut String, digit: u16) {
    if digit < 10 {
        let _ = write!(out, "{digit}");
    } else {
        let _ = write!(out, "%{digit:02}");
    }
}
