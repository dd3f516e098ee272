use super::error::Error;
use crate::model::{
    atom::Atom,
    molecule::{Bond, Molecule},
    types::{BondOrder, Element},
};
use std::collections::HashMap;
use std::str::FromStr;

const MAX_BRACKET_HYDROGENS: u32 = 9;
const MAX_ABS_CHARGE: u32 = 15;

/// Parses a SMILES string into a molecular graph.
///
/// Only the first whitespace-delimited token is read; anything after it is
/// treated as a title. Hydrogen counts of organic-subset atoms are left at
/// zero for the valence model to fill in, and aromatic bonds are kept as
/// [`BondOrder::Aromatic`] until kekulization. Stereo markers are accepted
/// and dropped.
pub fn read(input: &str) -> Result<Molecule, Error> {
    let text = input.split_whitespace().next().unwrap_or("");
    if text.is_empty() {
        return Err(Error::Empty);
    }
    Reader::new(text).run()
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

struct Reader<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    molecule: Molecule,
    previous: Option<usize>,
    pending: Option<(BondOrder, usize)>,
    branches: Vec<usize>,
    rings: HashMap<u16, RingOpening>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            molecule: Molecule::new(),
            previous: None,
            pending: None,
            branches: Vec::new(),
            rings: HashMap::new(),
        }
    }

    fn run(mut self) -> Result<Molecule, Error> {
        while let Some(&c) = self.bytes.get(self.pos) {
            match c {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'.' => self.disconnect()?,
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => self.bond_symbol()?,
                b'$' => {
                    return Err(Error::parse(self.pos, "quadruple bonds are not supported"));
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.attach(atom)?;
                }
            }
        }

        if let Some((_, position)) = self.pending {
            return Err(Error::parse(position, "bond symbol is not followed by an atom"));
        }
        if self.previous.is_none() {
            return Err(Error::parse(self.pos - 1, "misplaced '.'"));
        }
        if !self.branches.is_empty() {
            return Err(Error::UnclosedBranch(self.branches.len()));
        }
        if let Some(&label) = self.rings.keys().min() {
            return Err(Error::UnclosedRing(label));
        }

        Ok(self.molecule)
    }

    fn current_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn open_branch(&mut self) -> Result<(), Error> {
        let Some(root) = self.previous else {
            return Err(Error::parse(self.pos, "branch has no preceding atom"));
        };
        if self.pending.is_some() {
            return Err(Error::parse(self.pos, "bond symbol before '('"));
        }
        if self.bytes.get(self.pos + 1) == Some(&b')') {
            return Err(Error::parse(self.pos, "empty branch"));
        }
        self.branches.push(root);
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(Error::parse(self.pos, "bond symbol before ')'"));
        }
        let Some(root) = self.branches.pop() else {
            return Err(Error::parse(self.pos, "unmatched ')'"));
        };
        self.previous = Some(root);
        self.pos += 1;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        if self.previous.is_none() || self.pending.is_some() {
            return Err(Error::parse(self.pos, "misplaced '.'"));
        }
        self.previous = None;
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self) -> Result<(), Error> {
        if self.previous.is_none() {
            return Err(Error::parse(self.pos, "bond has no preceding atom"));
        }
        if self.pending.is_some() {
            return Err(Error::parse(self.pos, "consecutive bond symbols"));
        }
        let symbol = &self.text[self.pos..self.pos + 1];
        let order =
            BondOrder::from_str(symbol).map_err(|e| Error::parse(self.pos, e.to_string()))?;
        self.pending = Some((order, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), Error> {
        let start = self.pos;
        let Some(current) = self.previous else {
            return Err(Error::parse(start, "ring bond has no preceding atom"));
        };

        let label = if self.eat(b'%') {
            match (self.bytes.get(self.pos), self.bytes.get(self.pos + 1)) {
                (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                    self.pos += 2;
                    u16::from(a - b'0') * 10 + u16::from(b - b'0')
                }
                _ => return Err(Error::parse(start, "'%' must be followed by two digits")),
            }
        } else {
            let digit = self.bytes[self.pos] - b'0';
            self.pos += 1;
            u16::from(digit)
        };

        let pending = self.pending.take().map(|(order, _)| order);
        match self.rings.remove(&label) {
            Some(opening) => {
                let order = match (opening.order, pending) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(Error::parse(start, "conflicting ring bond orders"));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.implicit_order(opening.atom, current),
                };
                self.connect(opening.atom, current, order, start)
            }
            None => {
                self.rings.insert(
                    label,
                    RingOpening {
                        atom: current,
                        order: pending,
                    },
                );
                Ok(())
            }
        }
    }

    fn attach(&mut self, atom: Atom) -> Result<(), Error> {
        let position = self.pos;
        let idx = self.molecule.atoms.len();
        self.molecule.atoms.push(atom);

        if let Some(prev) = self.previous {
            let order = match self.pending.take() {
                Some((order, _)) => order,
                None => self.implicit_order(prev, idx),
            };
            self.connect(prev, idx, order, position)?;
        }

        self.previous = Some(idx);
        Ok(())
    }

    fn implicit_order(&self, a: usize, b: usize) -> BondOrder {
        if self.molecule.atoms[a].aromatic && self.molecule.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn connect(&mut self, a: usize, b: usize, order: BondOrder, position: usize) -> Result<(), Error> {
        if a == b {
            return Err(Error::parse(position, "atom is bonded to itself"));
        }
        if self.molecule.bond_between(a, b).is_some() {
            return Err(Error::parse(position, "duplicate bond between the same atoms"));
        }
        self.molecule.bonds.push(Bond::new(a, b, order));
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, Error> {
        let rest = &self.bytes[self.pos..];
        let (element, aromatic, len) = match rest {
            [b'C', b'l', ..] => (Element::Cl, false, 2),
            [b'B', b'r', ..] => (Element::Br, false, 2),
            [b'B', ..] => (Element::B, false, 1),
            [b'C', ..] => (Element::C, false, 1),
            [b'N', ..] => (Element::N, false, 1),
            [b'O', ..] => (Element::O, false, 1),
            [b'P', ..] => (Element::P, false, 1),
            [b'S', ..] => (Element::S, false, 1),
            [b'F', ..] => (Element::F, false, 1),
            [b'I', ..] => (Element::I, false, 1),
            [b'b', ..] => (Element::B, true, 1),
            [b'c', ..] => (Element::C, true, 1),
            [b'n', ..] => (Element::N, true, 1),
            [b'o', ..] => (Element::O, true, 1),
            [b'p', ..] => (Element::P, true, 1),
            [b's', ..] => (Element::S, true, 1),
            [b'*', ..] => {
                return Err(Error::parse(self.pos, "wildcard atoms are not supported"));
            }
            _ => {
                return Err(Error::parse(
                    self.pos,
                    format!("unexpected character '{}'", self.current_char()),
                ));
            }
        };
        self.pos += len;
        Ok(if aromatic {
            Atom::aromatic(element)
        } else {
            Atom::new(element)
        })
    }

    fn bracket_atom(&mut self) -> Result<Atom, Error> {
        let start = self.pos;
        self.pos += 1;

        let isotope = match self.number() {
            Some(mass) => Some(
                u16::try_from(mass).map_err(|_| Error::parse(start, "isotope mass out of range"))?,
            ),
            None => None,
        };

        let (element, aromatic) = self.bracket_symbol()?;
        self.chirality();

        let hydrogens = if self.eat(b'H') {
            let count = self.number().unwrap_or(1);
            if count > MAX_BRACKET_HYDROGENS {
                return Err(Error::parse(start, "hydrogen count out of range"));
            }
            count as u8
        } else {
            0
        };

        let charge = self.charge(start)?;

        if self.eat(b':') && self.number().is_none() {
            return Err(Error::parse(self.pos, "atom class must be a number"));
        }

        if !self.eat(b']') {
            return Err(Error::parse(start, "unterminated bracket atom"));
        }

        let mut atom = Atom::bracket(element, hydrogens);
        atom.aromatic = aromatic;
        atom.charge = charge;
        atom.isotope = isotope;
        Ok(atom)
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), Error> {
        let first = self.peek().unwrap_or(b']');
        let second = self.bytes.get(self.pos + 1).copied();

        if first.is_ascii_uppercase() {
            if let Some(second) = second.filter(u8::is_ascii_lowercase) {
                let pair = [first, second];
                let symbol = std::str::from_utf8(&pair).unwrap_or_default();
                if let Ok(element) = Element::from_str(symbol) {
                    self.pos += 2;
                    return Ok((element, false));
                }
            }
            let pair = [first];
            let symbol = std::str::from_utf8(&pair).unwrap_or_default();
            let element = Element::from_str(symbol)
                .map_err(|e| Error::parse(self.pos, e.to_string()))?;
            self.pos += 1;
            return Ok((element, false));
        }

        let aromatic = match (first, second) {
            (b's', Some(b'e')) => Some((Element::Se, 2)),
            (b'a', Some(b's')) => Some((Element::As, 2)),
            (b't', Some(b'e')) => Some((Element::Te, 2)),
            (b'b', _) => Some((Element::B, 1)),
            (b'c', _) => Some((Element::C, 1)),
            (b'n', _) => Some((Element::N, 1)),
            (b'o', _) => Some((Element::O, 1)),
            (b'p', _) => Some((Element::P, 1)),
            (b's', _) => Some((Element::S, 1)),
            _ => None,
        };

        match aromatic {
            Some((element, len)) => {
                self.pos += len;
                Ok((element, true))
            }
            None if first == b'*' => Err(Error::parse(self.pos, "wildcard atoms are not supported")),
            None => Err(Error::parse(
                self.pos,
                format!("invalid element symbol starting with '{}'", self.current_char()),
            )),
        }
    }

    fn chirality(&mut self) {
        if !self.eat(b'@') {
            return;
        }
        if self.eat(b'@') {
            return;
        }
        let class = self.bytes.get(self.pos..self.pos + 2);
        let is_class = matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH"));
        let followed_by_digit = self
            .bytes
            .get(self.pos + 2)
            .is_some_and(u8::is_ascii_digit);
        if is_class && followed_by_digit {
            self.pos += 2;
            self.number();
        }
    }

    fn charge(&mut self, start: usize) -> Result<i8, Error> {
        let sign = match self.peek() {
            Some(b'+') => 1i32,
            Some(b'-') => -1i32,
            _ => return Ok(0),
        };
        let symbol = self.bytes[self.pos];
        self.pos += 1;

        let magnitude = match self.number() {
            Some(n) => n,
            None => {
                let mut count = 1;
                while self.eat(symbol) {
                    count += 1;
                }
                count
            }
        };
        if magnitude > MAX_ABS_CHARGE {
            return Err(Error::parse(start, "formal charge out of range"));
        }
        Ok((sign * magnitude as i32) as i8)
    }

    fn number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) && self.pos - start < 6 {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        self.text[start..self.pos].parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_linear_chain_with_branch() {
        let mol = read("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.bonds[1], Bond::new(1, 2, BondOrder::Double));
        assert_eq!(mol.bonds[2], Bond::new(1, 3, BondOrder::Single));
    }

    #[test]
    fn aromatic_ring_closure_is_aromatic() {
        let mol = read("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.atoms.iter().all(|a| a.aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn ring_closure_takes_explicit_order_from_either_side() {
        let opened = read("C=1CCCCC1").unwrap();
        let closed = read("C1CCCCC=1").unwrap();
        let order = |m: &Molecule| m.bonds[m.bond_between(0, 5).unwrap()].order;
        assert_eq!(order(&opened), BondOrder::Double);
        assert_eq!(order(&closed), BondOrder::Double);
    }

    #[test]
    fn percent_ring_labels() {
        let mol = read("C%12CC%12").unwrap();
        assert_eq!(mol.bond_count(), 3);
        assert!(mol.bond_between(0, 2).is_some());
    }

    #[test]
    fn bracket_atom_fields() {
        let mol = read("[13CH3-:7]").unwrap();
        let atom = &mol.atoms[0];
        assert_eq!(atom.element, Element::C);
        assert_eq!(atom.isotope, Some(13));
        assert_eq!(atom.hydrogens, 3);
        assert!(atom.fixed_hydrogens);
        assert_eq!(atom.charge, -1);
    }

    #[test]
    fn bracket_two_letter_and_aromatic_symbols() {
        let na = read("[Na+]").unwrap();
        assert_eq!(na.atoms[0].element, Element::Na);
        assert_eq!(na.atoms[0].charge, 1);
        let se = read("[se]1cccc1").unwrap();
        assert_eq!(se.atoms[0].element, Element::Se);
        assert!(se.atoms[0].aromatic);
    }

    #[test]
    fn repeated_charge_signs() {
        let mol = read("[Fe++]").unwrap();
        assert_eq!(mol.atoms[0].charge, 2);
        let mol = read("[O-2]").unwrap();
        assert_eq!(mol.atoms[0].charge, -2);
    }

    #[test]
    fn stereo_markers_are_dropped() {
        let mol = read("F/C=C/F").unwrap();
        assert_eq!(mol.bond_count(), 3);
        let mol = read("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atoms[1].hydrogens, 1);
    }

    #[test]
    fn trailing_title_is_ignored() {
        let mol = read("CCO ethanol").unwrap();
        assert_eq!(mol.atom_count(), 3);
    }

    #[test]
    fn rejects_invalid_strings() {
        assert_eq!(read("").unwrap_err(), Error::Empty);
        assert!(matches!(read("not-a-structure"), Err(Error::Parse { .. })));
        assert!(matches!(read("C1CC"), Err(Error::UnclosedRing(1))));
        assert!(matches!(read("C(C"), Err(Error::UnclosedBranch(1))));
        assert!(matches!(read("CC)"), Err(Error::Parse { .. })));
        assert!(matches!(read("C()C"), Err(Error::Parse { .. })));
        assert!(matches!(read("C=="), Err(Error::Parse { .. })));
        assert!(matches!(read("C$C"), Err(Error::Parse { .. })));
        assert!(matches!(read("C11"), Err(Error::Parse { .. })));
        assert!(matches!(read("C12CC12"), Err(Error::Parse { .. })));
        assert!(matches!(read("[C"), Err(Error::Parse { .. })));
        assert!(matches!(read("[Xx]"), Err(Error::Parse { .. })));
        assert!(matches!(read("*C"), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_misplaced_dots() {
        assert!(matches!(read(".C"), Err(Error::Parse { position: 0, .. })));
        assert!(matches!(read("C..C"), Err(Error::Parse { position: 2, .. })));
        assert!(matches!(read("C."), Err(Error::Parse { position: 1, .. })));
        assert!(matches!(read("CC. title"), Err(Error::Parse { position: 2, .. })));
        assert_eq!(read("C.C").unwrap().atom_count(), 2);
    }
}
