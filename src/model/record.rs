use super::registry::Category;
use serde::{Deserialize, Serialize};

/// Terminal output of the pipeline for one registry entry.
///
/// When `canonical_structure` is empty the structure could not be resolved
/// or validated, and every field derived from it (`molecular_formula`,
/// `molecular_weight`, `display_name`, `image_path`) is empty as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCompoundRecord {
    #[serde(rename = "compound_name")]
    pub identifier: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "company")]
    pub provenance_company: String,
    #[serde(rename = "scaffold")]
    pub scaffold_label: String,
    #[serde(rename = "status")]
    pub development_status: String,
    pub description: String,
    #[serde(rename = "smiles")]
    pub canonical_structure: String,
    #[serde(rename = "iupac_name")]
    pub display_name: String,
    pub molecular_formula: String,
    pub molecular_weight: String,
    pub image_path: String,
    pub source: String,
}

impl CanonicalCompoundRecord {
    /// Column order of the tabular export, matching the serialized field
    /// names.
    pub const COLUMNS: [&'static str; 12] = [
        "compound_name",
        "type",
        "company",
        "scaffold",
        "status",
        "description",
        "smiles",
        "iupac_name",
        "molecular_formula",
        "molecular_weight",
        "image_path",
        "source",
    ];

    #[inline]
    pub fn has_structure(&self) -> bool {
        !self.canonical_structure.is_empty()
    }

    /// Checks the no-partial-enrichment invariant.
    pub fn is_consistent(&self) -> bool {
        self.has_structure()
            || (self.molecular_formula.is_empty()
                && self.molecular_weight.is_empty()
                && self.display_name.is_empty()
                && self.image_path.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_date: String,
    pub total_compounds: usize,
    pub clinical_candidates: usize,
    pub scaffolds: usize,
}

/// All records of one run plus summary counts, as written to the combined
/// JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub metadata: ReportMetadata,
    pub compounds: Vec<CanonicalCompoundRecord>,
}

impl AggregateReport {
    pub fn new(generated_date: impl Into<String>, compounds: Vec<CanonicalCompoundRecord>) -> Self {
        let count = |category: Category| compounds.iter().filter(|r| r.category == category).count();
        Self {
            metadata: ReportMetadata {
                generated_date: generated_date.into(),
                total_compounds: compounds.len(),
                clinical_candidates: count(Category::ClinicalCandidate),
                scaffolds: count(Category::Scaffold),
            },
            compounds,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::ClinicalCandidate => self.metadata.clinical_candidates,
            Category::Scaffold => self.metadata.scaffolds,
        }
    }
}
