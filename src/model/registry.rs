use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ClinicalCandidate,
    Scaffold,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::ClinicalCandidate => "clinical_candidate",
            Category::Scaffold => "scaffold",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::ClinicalCandidate => write!(f, "Clinical candidate"),
            Category::Scaffold => write!(f, "Scaffold"),
        }
    }
}

/// One compound of the registry. Entries are immutable once the registry
/// has been built.
///
/// Exactly one structure source is consulted: `literal_structure` when
/// `skip_external_lookup` is set, otherwise the lookup aliases followed by
/// `fallback_structure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub identifier: String,
    pub category: Category,
    #[serde(default, rename = "company")]
    pub provenance_company: Option<String>,
    #[serde(default, rename = "scaffold")]
    pub scaffold_label: Option<String>,
    #[serde(default, rename = "status")]
    pub development_status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub search_aliases: Vec<String>,
    #[serde(default, rename = "smiles")]
    pub literal_structure: Option<String>,
    #[serde(default, rename = "fallback_smiles")]
    pub fallback_structure: Option<String>,
    #[serde(default, rename = "skip_lookup")]
    pub skip_external_lookup: bool,
}

impl RegistryEntry {
    /// A clinical candidate resolved through the lookup service, with a
    /// curated fallback structure.
    pub fn candidate(
        identifier: impl Into<String>,
        company: impl Into<String>,
        scaffold: impl Into<String>,
        status: impl Into<String>,
        aliases: &[&str],
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            category: Category::ClinicalCandidate,
            provenance_company: Some(company.into()),
            scaffold_label: Some(scaffold.into()),
            development_status: Some(status.into()),
            description: None,
            companies: Vec::new(),
            search_aliases: aliases.iter().map(|a| a.to_string()).collect(),
            literal_structure: None,
            fallback_structure: Some(fallback.into()),
            skip_external_lookup: false,
        }
    }

    /// A representative scaffold with a literal structure; never looked up.
    pub fn scaffold(
        identifier: impl Into<String>,
        description: impl Into<String>,
        companies: &[&str],
        smiles: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            category: Category::Scaffold,
            provenance_company: None,
            scaffold_label: None,
            development_status: None,
            description: Some(description.into()),
            companies: companies.iter().map(|c| c.to_string()).collect(),
            search_aliases: Vec::new(),
            literal_structure: Some(smiles.into()),
            fallback_structure: None,
            skip_external_lookup: true,
        }
    }

    /// Aliases to query, falling back to the identifier itself when the
    /// entry lists none.
    pub fn lookup_terms(&self) -> Vec<&str> {
        if self.search_aliases.is_empty() {
            vec![self.identifier.as_str()]
        } else {
            self.search_aliases.iter().map(String::as_str).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_constructor_sets_lookup_fields() {
        let entry = RegistryEntry::candidate(
            "X-1",
            "Acme",
            "quinoline",
            "Phase 1",
            &["X-1", "X1"],
            "c1ccccc1",
        );
        assert_eq!(entry.category, Category::ClinicalCandidate);
        assert!(!entry.skip_external_lookup);
        assert_eq!(entry.lookup_terms(), vec!["X-1", "X1"]);
        assert_eq!(entry.fallback_structure.as_deref(), Some("c1ccccc1"));
        assert!(entry.literal_structure.is_none());
    }

    #[test]
    fn scaffold_constructor_skips_lookup() {
        let entry = RegistryEntry::scaffold("Core", "A core", &["Acme"], "c1ccncc1");
        assert_eq!(entry.category, Category::Scaffold);
        assert!(entry.skip_external_lookup);
        assert_eq!(entry.literal_structure.as_deref(), Some("c1ccncc1"));
        assert!(entry.provenance_company.is_none());
    }

    #[test]
    fn lookup_terms_default_to_identifier() {
        let mut entry = RegistryEntry::candidate("Y", "Acme", "s", "p", &[], "C");
        entry.search_aliases.clear();
        assert_eq!(entry.lookup_terms(), vec!["Y"]);
    }

    #[test]
    fn category_labels() {
        assert_eq!(Category::ClinicalCandidate.label(), "clinical_candidate");
        assert_eq!(Category::Scaffold.to_string(), "Scaffold");
    }
}
