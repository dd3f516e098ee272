//! Display-name enrichment.

use crate::perceive::CanonicalStructure;

/// Suffix appended to a record's provenance when its name is only the
/// molecular formula.
pub const DERIVED_NAME_MARKER: &str = " (name derived from formula)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrigin {
    /// Name reported by the lookup service.
    Authoritative,
    /// No name was available; the formula stands in for it.
    FormulaFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    pub name: String,
    pub origin: NameOrigin,
}

impl DerivedName {
    /// Provenance string for the record, marked when the name is degraded.
    pub fn annotate_source(&self, source: &str) -> String {
        match self.origin {
            NameOrigin::Authoritative => source.to_string(),
            NameOrigin::FormulaFallback => format!("{source}{DERIVED_NAME_MARKER}"),
        }
    }
}

/// Picks the display name: a non-blank external name verbatim, otherwise the
/// molecular formula.
pub fn derive_name(canonical: &CanonicalStructure, external_name: Option<&str>) -> DerivedName {
    match external_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => DerivedName {
            name: name.to_string(),
            origin: NameOrigin::Authoritative,
        },
        None => DerivedName {
            name: canonical.formula.clone(),
            origin: NameOrigin::FormulaFallback,
        },
    }
}
