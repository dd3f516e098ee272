//! The compound registry.
//!
//! A registry is an ordered, read-only table of [`RegistryEntry`] values
//! keyed by a unique identifier. The built-in registry lists the cGAS
//! inhibitor clinical candidates and representative scaffolds; custom
//! registries use the same TOML layout:
//!
//! ```toml
//! [[compound]]
//! identifier = "Benzofuran_core"
//! category = "scaffold"
//! description = "Benzofuran core structure"
//! companies = ["Merck", "Roche"]
//! smiles = "c1ccc2c(c1)cco2"
//! skip_lookup = true
//! ```

use crate::model::registry::{Category, RegistryEntry};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

const BUILTIN_REGISTRY_TOML: &str = include_str!("../resources/cgas.registry.toml");

static BUILTIN_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Errors raised while loading or validating a registry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read registry file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("registry entry #{0} has an empty identifier")]
    EmptyIdentifier(usize),

    #[error("duplicate registry identifier '{0}'")]
    DuplicateIdentifier(String),

    /// A lookup-skipping entry has nothing to resolve from.
    #[error("registry entry '{0}' skips lookup but has no literal structure")]
    MissingLiteral(String),
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "compound")]
    compounds: Vec<RegistryEntry>,
}

/// Ordered, validated collection of registry entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Validates identifiers and builds a registry preserving entry order.
    pub fn new(entries: Vec<RegistryEntry>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            if entry.identifier.trim().is_empty() {
                return Err(Error::EmptyIdentifier(idx + 1));
            }
            if !seen.insert(entry.identifier.as_str()) {
                return Err(Error::DuplicateIdentifier(entry.identifier.clone()));
            }
            if entry.skip_external_lookup && entry.literal_structure.is_none() {
                return Err(Error::MissingLiteral(entry.identifier.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The embedded cGAS registry: four clinical candidates followed by five
    /// scaffolds.
    pub fn builtin() -> &'static Registry {
        BUILTIN_REGISTRY.get_or_init(|| {
            Self::from_toml_str(BUILTIN_REGISTRY_TOML)
                .expect("Failed to parse embedded registry. This is a library bug.")
        })
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        let file: RegistryFile = toml::from_str(toml)?;
        Self::new(file.compounds)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[inline]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    pub fn count(&self, category: Category) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RegistryEntry;
    type IntoIter = std::slice::Iter<'a, RegistryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
