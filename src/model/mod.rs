//! Core data structures flowing through `compound-forge`.
//!
//! - [`types`] – Periodic table elements and bond order classifications.
//! - [`atom`] – Graph atom with charge, isotope, aromaticity and hydrogen count.
//! - [`molecule`] – Molecular graph of atoms and bonds.
//! - [`registry`] – Curated registry entries describing the compounds to resolve.
//! - [`record`] – Per-compound output records and the aggregate report.
//!
//! Structure strings are parsed into a [`Molecule`](molecule::Molecule),
//! normalized by [`crate::perceive`], and summarized into a
//! [`CanonicalCompoundRecord`](record::CanonicalCompoundRecord) for export.

pub mod atom;
pub mod molecule;
pub mod record;
pub mod registry;
pub mod types;
