//! Structure validation and canonicalization.
//!
//! [`canonicalize`] turns a raw SMILES string into a [`CanonicalStructure`]:
//!
//! 1. parse the string ([`crate::smiles::read`]);
//! 2. check that aromatic atoms lie on rings;
//! 3. kekulize aromatic systems ([`kekulize`]);
//! 4. fill implicit hydrogens and check valences ([`valence`]);
//! 5. fold explicit hydrogen atoms into their neighbours;
//! 6. re-perceive aromaticity with the Hückel rule ([`aromaticity`]);
//! 7. rank atoms canonically ([`ranking`]) and write the SMILES;
//! 8. derive the Hill formula and average weight ([`formula`]).
//!
//! Re-perceiving aromaticity from the Kekulé form makes aromatic and Kekulé
//! notations of the same molecule canonicalize to the same string, and the
//! output is a fixed point: canonicalizing it again returns it unchanged.
//! The whole pipeline is pure.

mod error;

pub mod aromaticity;
pub mod formula;
pub mod kekulize;
pub mod ranking;
pub mod rings;
pub mod valence;

pub use error::Error;

use crate::model::molecule::Molecule;
use crate::smiles;
use rings::RingInfo;

/// A validated structure in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalStructure {
    /// Canonical, non-isomeric SMILES.
    pub smiles: String,
    /// Hill formula with charge suffix.
    pub formula: String,
    /// Average molecular weight in g/mol.
    pub molecular_weight: f64,
    /// The sanitized graph in canonical perception state.
    pub molecule: Molecule,
}

impl CanonicalStructure {
    /// Weight formatted to two decimals, as exported.
    pub fn weight_label(&self) -> String {
        format!("{:.2}", self.molecular_weight)
    }
}

/// Validates `raw` and returns its canonical form.
pub fn canonicalize(raw: &str) -> Result<CanonicalStructure, Error> {
    let mut molecule = smiles::read(raw)?;

    let rings = RingInfo::new(&molecule);
    kekulize::prepare_aromatic(&mut molecule, &rings)?;
    kekulize::kekulize(&mut molecule)?;
    valence::assign_hydrogens(&mut molecule)?;
    valence::fold_hydrogens(&mut molecule);

    let rings = RingInfo::new(&molecule);
    aromaticity::perceive(&mut molecule, &rings);

    let ranks = ranking::canonical_ranks(&molecule);
    let smiles = smiles::write(&molecule, &ranks);

    Ok(CanonicalStructure {
        smiles,
        formula: formula::hill_formula(&molecule),
        molecular_weight: formula::molecular_weight(&molecule),
        molecule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn canon(smiles: &str) -> String {
        canonicalize(smiles).unwrap().smiles
    }

    #[test]
    fn benzene_formula_and_weight() {
        let result = canonicalize("c1ccccc1").unwrap();
        assert_eq!(result.formula, "C6H6");
        assert_eq!(result.weight_label(), "78.11");
        assert_eq!(result.smiles, "c1ccccc1");
    }

    #[test]
    fn kekule_and_aromatic_forms_agree() {
        assert_eq!(canon("C1=CC=CC=C1"), canon("c1ccccc1"));
        assert_eq!(canon("C1=CC=C2C=CC=CC2=C1"), canon("c1ccc2ccccc2c1"));
        assert_eq!(canon("C1=CC=NC=C1"), canon("n1ccccc1"));
    }

    #[test]
    fn atom_order_does_not_matter() {
        assert_eq!(canon("OCC"), canon("CCO"));
        assert_eq!(canon("C(C)(C)O"), canon("CC(O)C"));
        assert_eq!(canon("c1ccc2[nH]ccc2c1"), canon("[nH]1ccc2ccccc12"));
        assert_eq!(
            canon("CCN(CC)C(=O)c1ccc(cc1)N2CCOCC2"),
            canon("O=C(N(CC)CC)c1ccc(N2CCOCC2)cc1")
        );
    }

    #[test]
    fn canonical_form_is_a_fixed_point() {
        let registry = Registry::builtin();
        for entry in registry.iter() {
            let structures = [&entry.literal_structure, &entry.fallback_structure];
            for raw in structures.into_iter().flatten() {
                let first = canonicalize(raw).unwrap();
                let second = canonicalize(&first.smiles).unwrap();
                assert_eq!(first.smiles, second.smiles, "{}", entry.identifier);
                assert_eq!(first.formula, second.formula);
            }
        }
    }

    #[test]
    fn invalid_structures_are_rejected() {
        assert!(matches!(canonicalize("not-a-structure"), Err(Error::Smiles(_))));
        assert!(matches!(canonicalize(""), Err(Error::Smiles(smiles::Error::Empty))));
        assert!(matches!(canonicalize("C(C)(C)(C)(C)C"), Err(Error::Valence { .. })));
        assert!(matches!(canonicalize("c1ccnc1"), Err(Error::Kekulize { .. })));
        assert!(matches!(canonicalize("cC"), Err(Error::NonRingAromatic { .. })));
    }

    #[test]
    fn charged_and_explicit_hydrogen_structures() {
        let ammonium = canonicalize("[NH4+]").unwrap();
        assert_eq!(ammonium.formula, "H4N+");
        assert_eq!(ammonium.smiles, "[NH4+]");

        assert_eq!(canon("[H]C([H])([H])[H]"), "C");

        let salt = canonicalize("[Na+].[Cl-]").unwrap();
        assert_eq!(salt.formula, "ClNa");
        assert_eq!(salt.smiles, "[Na+].[Cl-]");
    }

    #[test]
    fn stereo_is_discarded() {
        assert_eq!(canon("F/C=C/F"), canon("FC=CF"));
        assert_eq!(canon("N[C@@H](C)C(=O)O"), canon("NC(C)C(=O)O"));
    }

    #[test]
    fn pyridone_keeps_carbonyl() {
        let result = canonicalize("O=C1C=CC=CN1").unwrap();
        assert_eq!(result.formula, "C5H5NO");
        assert_eq!(result.smiles, "O=c1cccc[nH]1");
        assert_eq!(canon(&result.smiles), result.smiles);
    }
}
