//! A pure Rust library for resolving, canonicalizing, depicting and exporting
//! the chemical structures of a curated compound registry.
//!
//! Every registry entry runs through the same pipeline, independently of the
//! others:
//!
//! - **Resolution**: literal structures for scaffolds, otherwise a name
//!   lookup against PubChem (one alias at a time) and a curated fallback
//! - **Canonicalization**: SMILES parsing, kekulization, valence checks,
//!   Hückel aromaticity, canonical atom ranking, Hill formula and average
//!   molecular weight
//! - **Naming**: authoritative names from the lookup, or a formula label
//!   flagged in the record's provenance
//! - **Depiction**: deterministic 2D layout rendered to a JPEG
//! - **Export**: combined JSON, a CSV table and one JSON file per compound
//!
//! # Quick Start
//!
//! ```
//! use compound_forge::canonicalize;
//!
//! let kekule = canonicalize("C1=CC=CC=C1")?;
//! let aromatic = canonicalize("c1ccccc1")?;
//!
//! assert_eq!(kekule.smiles, "c1ccccc1");
//! assert_eq!(kekule.smiles, aromatic.smiles);
//! assert_eq!(kekule.formula, "C6H6");
//! assert_eq!(kekule.weight_label(), "78.11");
//! # Ok::<(), compound_forge::perceive::Error>(())
//! ```
//!
//! Processing the built-in registry without network access:
//!
//! ```
//! use compound_forge::{Registry, Resolver, process_entry};
//!
//! let resolver = Resolver::offline();
//! let records: Vec<_> = Registry::builtin()
//!     .iter()
//!     .map(|entry| process_entry(entry, &resolver, None))
//!     .collect();
//!
//! assert_eq!(records.len(), Registry::builtin().len());
//! assert!(records.iter().all(|r| r.is_consistent()));
//! ```
//!
//! # Module Organization
//!
//! - [`smiles`]: SMILES reader and canonical writer
//! - [`perceive`]: sanitization, aromaticity, ranking, formula
//! - [`resolve`]: resolver, lookup trait and the PubChem client
//! - [`registry`]: built-in and TOML-loaded registries
//! - [`naming`]: display-name enrichment
//! - [`depict`]: 2D layout and JPEG rendering
//! - [`export`]: JSON/CSV export
//! - [`pipeline`]: per-entry processing and whole-registry runs

mod model;

pub mod depict;
pub mod export;
pub mod naming;
pub mod perceive;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod smiles;

pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::record::{AggregateReport, CanonicalCompoundRecord, ReportMetadata};
pub use model::registry::{Category, RegistryEntry};
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};

pub use depict::{RenderConfig, Renderer};
pub use export::{ExportConfig, ExportSummary, export};
pub use naming::{DerivedName, NameOrigin, derive_name};
pub use perceive::{CanonicalStructure, canonicalize};
pub use pipeline::{
    NoopSink, PipelineConfig, ProgressSink, RunOutcome, process_all, process_entry, run,
};
pub use registry::Registry;
pub use resolve::{
    LookupConfig, LookupError, PropertyBundle, ResolvedStructure, Resolver, SourceKind,
    StructureLookup,
};
