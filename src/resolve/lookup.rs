use thiserror::Error;

/// Failure to obtain an answer from a structure lookup service.
///
/// Lookup failures never abort a run: the resolver logs them and moves on
/// to the next alias or the fallback structure.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered {status} for '{alias}'")]
    Status { status: u16, alias: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Properties returned by a name lookup. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBundle {
    pub structure: Option<String>,
    pub name: Option<String>,
    pub formula: Option<String>,
    pub weight: Option<String>,
}

impl PropertyBundle {
    /// The structure string, if present and non-blank.
    pub fn usable_structure(&self) -> Option<&str> {
        non_blank(self.structure.as_deref())
    }

    pub fn usable_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn usable_formula(&self) -> Option<&str> {
        non_blank(self.formula.as_deref())
    }

    pub fn usable_weight(&self) -> Option<&str> {
        non_blank(self.weight.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A service that maps a compound name to structure properties.
pub trait StructureLookup {
    /// Name used in provenance strings, e.g. `PubChem`.
    fn service_name(&self) -> &str;

    /// Looks up one alias. `Ok(None)` means the service knows no compound
    /// by that name.
    fn lookup_by_name(&self, alias: &str) -> Result<Option<PropertyBundle>, LookupError>;
}
