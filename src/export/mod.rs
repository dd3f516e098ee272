//! Result aggregation and export.
//!
//! [`export`] writes an [`AggregateReport`] to a destination directory:
//!
//! - `<stem>_master.json`: metadata with summary counts, plus every record;
//! - `<stem>_master.csv`: one row per record under the fixed column header;
//! - `<safe identifier>_data.json`: one file per record with a structure.
//!
//! Any failed write aborts the export.

mod error;
mod json;
mod table;

pub use error::Error;

use crate::model::record::{AggregateReport, CanonicalCompoundRecord};
use std::path::{Path, PathBuf};

pub const DEFAULT_STEM: &str = "cgas_structures";
pub const DEFAULT_OUTPUT_DIR: &str = "cgas_structures";
pub const IMAGE_DIR: &str = "images";

/// Where and under which file stem results are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            stem: DEFAULT_STEM.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_master.json", self.stem))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_master.csv", self.stem))
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGE_DIR)
    }

    pub fn record_path(&self, identifier: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_data.json", safe_file_stem(identifier)))
    }
}

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub record_files: Vec<PathBuf>,
}

/// Replaces path separators and other characters that are unsafe in file
/// names with `_`.
pub fn safe_file_stem(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Creates `dir` and its `images/` subdirectory if absent.
pub fn prepare_output_dir(dir: &Path) -> Result<(), Error> {
    let images = dir.join(IMAGE_DIR);
    std::fs::create_dir_all(&images).map_err(|source| Error::CreateDir {
        path: images,
        source,
    })
}

pub fn export(report: &AggregateReport, config: &ExportConfig) -> Result<ExportSummary, Error> {
    prepare_output_dir(&config.output_dir)?;

    let json_path = config.json_path();
    json::write_pretty(&json_path, report)?;
    tracing::info!(path = %json_path.display(), "wrote combined JSON");

    let csv_path = config.csv_path();
    table::write_records(&csv_path, &report.compounds)?;
    tracing::info!(path = %csv_path.display(), "wrote CSV table");

    let record_files = write_record_files(&report.compounds, config)?;
    tracing::info!(count = record_files.len(), "wrote per-compound files");

    Ok(ExportSummary {
        json_path,
        csv_path,
        record_files,
    })
}

fn write_record_files(
    records: &[CanonicalCompoundRecord],
    config: &ExportConfig,
) -> Result<Vec<PathBuf>, Error> {
    records
        .iter()
        .filter(|record| record.has_structure())
        .map(|record| {
            let path = config.record_path(&record.identifier);
            json::write_pretty(&path, record)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::Category;
    use serde_json::Value;

    fn record(identifier: &str, category: Category, smiles: &str) -> CanonicalCompoundRecord {
        let with_structure = |value: &str| {
            if smiles.is_empty() { String::new() } else { value.to_string() }
        };
        CanonicalCompoundRecord {
            identifier: identifier.to_string(),
            category,
            provenance_company: "Acme".to_string(),
            scaffold_label: String::new(),
            development_status: String::new(),
            description: String::new(),
            canonical_structure: smiles.to_string(),
            display_name: with_structure("C6H6"),
            molecular_formula: with_structure("C6H6"),
            molecular_weight: with_structure("78.11"),
            image_path: String::new(),
            source: "Fallback structure".to_string(),
        }
    }

    fn report() -> AggregateReport {
        AggregateReport::new(
            "2025-01-01 12:00:00",
            vec![
                record("A/B", Category::ClinicalCandidate, "c1ccccc1"),
                record("Broken", Category::ClinicalCandidate, ""),
                record("Core", Category::Scaffold, "c1ccccc1"),
            ],
        )
    }

    #[test]
    fn safe_file_stem_replaces_unsafe_characters() {
        assert_eq!(safe_file_stem("A/B"), "A_B");
        assert_eq!(safe_file_stem(r"a\b:c*d?e"), "a_b_c_d_e");
        assert_eq!(safe_file_stem("x\"<y>|z\0"), "x__y__z_");
        assert_eq!(safe_file_stem("Pyrido[4,3-b]indole_core"), "Pyrido[4,3-b]indole_core");
    }

    #[test]
    fn export_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().join("out"),
            stem: "test".to_string(),
        };
        let summary = export(&report(), &config).unwrap();

        assert!(config.image_dir().is_dir());
        assert_eq!(summary.json_path, dir.path().join("out/test_master.json"));

        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.json_path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["total_compounds"], 3);
        assert_eq!(json["metadata"]["clinical_candidates"], 2);
        assert_eq!(json["metadata"]["scaffolds"], 1);
        assert_eq!(json["metadata"]["generated_date"], "2025-01-01 12:00:00");
        assert_eq!(json["compounds"].as_array().unwrap().len(), 3);
        assert_eq!(json["compounds"][0]["compound_name"], "A/B");

        let csv = std::fs::read_to_string(&summary.csv_path).unwrap();
        assert_eq!(csv.lines().count(), 4);

        assert_eq!(
            summary.record_files,
            vec![
                dir.path().join("out/A_B_data.json"),
                dir.path().join("out/Core_data.json"),
            ]
        );
        let single: CanonicalCompoundRecord =
            serde_json::from_str(&std::fs::read_to_string(&summary.record_files[0]).unwrap())
                .unwrap();
        assert_eq!(single.identifier, "A/B");
        assert!(!dir.path().join("out/Broken_data.json").exists());
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = ExportConfig {
            output_dir: blocker.join("out"),
            stem: DEFAULT_STEM.to_string(),
        };
        assert!(matches!(export(&report(), &config), Err(Error::CreateDir { .. })));
    }
}
