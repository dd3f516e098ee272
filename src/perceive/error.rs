//! Error types for structure validation.
//!
//! Every variant describes a structure string that cannot be turned into a
//! chemically sane molecular graph. These errors are non-fatal to a batch:
//! the affected compound simply carries no canonical structure.

use crate::model::types::Element;
use crate::smiles;
use thiserror::Error;

/// Errors that can occur while sanitizing and canonicalizing a structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The structure string does not follow the SMILES grammar.
    #[error(transparent)]
    Smiles(#[from] smiles::Error),

    /// An atom was written in lowercase but does not lie on any ring.
    #[error("aromatic atom {symbol} (index {atom}) is not in a ring")]
    NonRingAromatic {
        /// Atom index in input order.
        atom: usize,
        /// Element of the offending atom.
        symbol: Element,
    },

    /// No alternating single/double assignment exists for the aromatic
    /// system containing this atom.
    #[error("cannot kekulize aromatic system at atom {atom}")]
    Kekulize {
        /// An atom left without a double bond.
        atom: usize,
    },

    /// Explicit valence exceeds every permitted valence state.
    #[error("explicit valence {valence} is not allowed for {symbol} (index {atom})")]
    Valence {
        /// Atom index in input order.
        atom: usize,
        /// Element of the offending atom.
        symbol: Element,
        /// Sum of bond orders plus attached hydrogens.
        valence: u8,
    },
}

impl Error {
    pub fn non_ring_aromatic(atom: usize, symbol: Element) -> Self {
        Self::NonRingAromatic { atom, symbol }
    }

    pub fn valence(atom: usize, symbol: Element, valence: u8) -> Self {
        Self::Valence {
            atom,
            symbol,
            valence,
        }
    }
}
