//! SMILES reading and writing.
//!
//! [`read`] accepts the OpenSMILES subset used by curated registries and
//! lookup services: organic-subset and bracket atoms, explicit bonds,
//! branches, ring closures and dot-disconnected components. Stereo markers
//! are accepted and dropped. [`write`] emits a non-isomeric string in a
//! caller-supplied atom order; [`crate::perceive`] supplies the canonical
//! order.

mod error;
mod reader;
mod writer;

pub use error::Error;
pub use reader::read;
pub use writer::write;
