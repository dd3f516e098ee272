use super::types::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Attached hydrogens not present as graph nodes.
    pub hydrogens: u8,
    /// `true` when `hydrogens` was stated explicitly (bracket atom) and must
    /// not be recomputed from the valence model.
    pub fixed_hydrogens: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            aromatic: false,
            charge: 0,
            isotope: None,
            hydrogens: 0,
            fixed_hydrogens: false,
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            aromatic: true,
            ..Self::new(element)
        }
    }

    pub fn bracket(element: Element, hydrogens: u8) -> Self {
        Self {
            hydrogens,
            fixed_hydrogens: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}
