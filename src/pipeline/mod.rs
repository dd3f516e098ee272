//! End-to-end processing of a compound registry.
//!
//! Each entry runs independently through
//! resolve → canonicalize → name → depict, producing exactly one
//! [`CanonicalCompoundRecord`]. Per-entry failures only degrade that entry's
//! record; [`run`] then aggregates the records and exports them, and only
//! export failures abort.

mod config;
mod error;
mod progress;

pub use config::PipelineConfig;
pub use error::Error;
pub use progress::{NoopSink, ProgressSink};

use crate::depict::Renderer;
use crate::export::{self, ExportSummary};
use crate::model::record::{AggregateReport, CanonicalCompoundRecord};
use crate::model::registry::RegistryEntry;
use crate::naming::derive_name;
use crate::perceive::canonicalize;
use crate::registry::Registry;
use crate::resolve::{FALLBACK_SOURCE, LITERAL_SOURCE, ResolvedStructure, Resolver};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Records and written files of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: AggregateReport,
    pub summary: ExportSummary,
}

/// Produces the record for one entry. Never fails.
pub fn process_entry(
    entry: &RegistryEntry,
    resolver: &Resolver,
    renderer: Option<&Renderer>,
) -> CanonicalCompoundRecord {
    let mut record = empty_record(entry);

    let Some(resolved) = resolver.resolve(entry) else {
        record.source = if entry.skip_external_lookup {
            LITERAL_SOURCE
        } else {
            FALLBACK_SOURCE
        }
        .to_string();
        return record;
    };
    record.source = resolved.source_detail.clone();

    let canonical = match canonicalize(&resolved.raw) {
        Ok(canonical) => canonical,
        Err(e) => {
            tracing::warn!(
                identifier = %entry.identifier,
                structure = %resolved.raw,
                %e,
                "invalid structure"
            );
            return record;
        }
    };

    let ResolvedStructure {
        source_detail,
        properties,
        ..
    } = resolved;
    let properties = properties.unwrap_or_default();

    let name = derive_name(&canonical, properties.usable_name());
    record.source = name.annotate_source(&source_detail);
    record.display_name = name.name;
    record.molecular_formula = properties
        .usable_formula()
        .map_or_else(|| canonical.formula.clone(), str::to_string);
    record.molecular_weight = properties
        .usable_weight()
        .map_or_else(|| canonical.weight_label(), str::to_string);

    if let Some(renderer) = renderer {
        match renderer.render(&canonical.molecule, &entry.identifier) {
            Ok(path) => record.image_path = path.display().to_string(),
            Err(e) => tracing::warn!(identifier = %entry.identifier, %e, "rendering failed"),
        }
    }

    record.canonical_structure = canonical.smiles;
    record
}

/// Processes every entry in registry order.
pub fn process_all(
    registry: &Registry,
    resolver: &Resolver,
    renderer: Option<&Renderer>,
    sink: &mut dyn ProgressSink,
) -> Vec<CanonicalCompoundRecord> {
    let total = registry.len();
    registry
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            sink.entry_started(index, total, entry);
            let record = process_entry(entry, resolver, renderer);
            sink.entry_finished(index, total, &record);
            record
        })
        .collect()
}

/// Builds the resolver and renderer described by `config` and processes the
/// whole registry. Creates the output and image directories when images
/// are enabled.
pub fn process_registry(
    registry: &Registry,
    config: &PipelineConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<CanonicalCompoundRecord>, Error> {
    let resolver = Resolver::from_config(config.lookup.as_ref()).map_err(Error::LookupClient)?;

    let renderer = match config.render {
        Some(render) => {
            export::prepare_output_dir(&config.export.output_dir)?;
            Some(Renderer::new(config.export.image_dir(), render))
        }
        None => None,
    };

    tracing::info!(
        entries = registry.len(),
        offline = resolver.is_offline(),
        images = renderer.is_some(),
        "processing registry"
    );
    Ok(process_all(registry, &resolver, renderer.as_ref(), sink))
}

/// Processes the registry, stamps the report with the local time and
/// exports it.
pub fn run(
    registry: &Registry,
    config: &PipelineConfig,
    sink: &mut dyn ProgressSink,
) -> Result<RunOutcome, Error> {
    let report = aggregate(process_registry(registry, config, sink)?);
    let summary = export::export(&report, &config.export)?;
    Ok(RunOutcome { report, summary })
}

/// Wraps `records` in a report stamped with the current local time.
pub fn aggregate(records: Vec<CanonicalCompoundRecord>) -> AggregateReport {
    let generated = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    AggregateReport::new(generated, records)
}

fn empty_record(entry: &RegistryEntry) -> CanonicalCompoundRecord {
    CanonicalCompoundRecord {
        identifier: entry.identifier.clone(),
        category: entry.category,
        provenance_company: entry.provenance_company.clone().unwrap_or_default(),
        scaffold_label: entry.scaffold_label.clone().unwrap_or_default(),
        development_status: entry.development_status.clone().unwrap_or_default(),
        description: entry.description.clone().unwrap_or_default(),
        canonical_structure: String::new(),
        display_name: String::new(),
        molecular_formula: String::new(),
        molecular_weight: String::new(),
        image_path: String::new(),
        source: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depict::RenderConfig;
    use crate::export::ExportConfig;
    use crate::model::registry::Category;
    use crate::naming::DERIVED_NAME_MARKER;
    use crate::resolve::{LookupError, PropertyBundle, StructureLookup};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeLookup {
        answers: HashMap<String, PropertyBundle>,
    }

    impl FakeLookup {
        fn answer(mut self, alias: &str, bundle: PropertyBundle) -> Self {
            self.answers.insert(alias.to_string(), bundle);
            self
        }
    }

    impl StructureLookup for FakeLookup {
        fn service_name(&self) -> &str {
            "PubChem"
        }

        fn lookup_by_name(&self, alias: &str) -> Result<Option<PropertyBundle>, LookupError> {
            Ok(self.answers.get(alias).cloned())
        }
    }

    fn online(lookup: FakeLookup) -> Resolver {
        Resolver::new(Box::new(lookup), Duration::ZERO)
    }

    fn candidate(fallback: &str) -> RegistryEntry {
        RegistryEntry::candidate("X-1", "Acme", "quinoline", "Phase 1", &["X-1"], fallback)
    }

    #[derive(Default)]
    struct RecordingSink {
        started: Vec<String>,
        finished: Vec<(usize, usize)>,
    }

    impl ProgressSink for RecordingSink {
        fn entry_started(&mut self, _index: usize, _total: usize, entry: &RegistryEntry) {
            self.started.push(entry.identifier.clone());
        }

        fn entry_finished(&mut self, index: usize, total: usize, _record: &CanonicalCompoundRecord) {
            self.finished.push((index, total));
        }
    }

    #[test]
    fn fallback_structure_is_canonicalized_and_named_from_formula() {
        let record = process_entry(&candidate("C1=CC=CC=C1"), &Resolver::offline(), None);
        assert_eq!(record.canonical_structure, "c1ccccc1");
        assert_eq!(record.molecular_formula, "C6H6");
        assert_eq!(record.molecular_weight, "78.11");
        assert_eq!(record.display_name, "C6H6");
        assert_eq!(record.source, format!("{FALLBACK_SOURCE}{DERIVED_NAME_MARKER}"));
        assert_eq!(record.provenance_company, "Acme");
        assert_eq!(record.scaffold_label, "quinoline");
        assert_eq!(record.development_status, "Phase 1");
        assert!(record.image_path.is_empty());
    }

    #[test]
    fn lookup_properties_take_precedence() {
        let bundle = PropertyBundle {
            structure: Some("c1ccccc1".to_string()),
            name: Some("benzene".to_string()),
            formula: Some("C6H6".to_string()),
            weight: Some("78.1120".to_string()),
        };
        let resolver = online(FakeLookup::default().answer("X-1", bundle));
        let record = process_entry(&candidate("CCO"), &resolver, None);
        assert_eq!(record.canonical_structure, "c1ccccc1");
        assert_eq!(record.display_name, "benzene");
        assert_eq!(record.molecular_weight, "78.1120");
        assert_eq!(record.source, "PubChem (X-1)");
    }

    #[test]
    fn missing_lookup_fields_are_computed() {
        let bundle = PropertyBundle {
            structure: Some("OCC".to_string()),
            ..PropertyBundle::default()
        };
        let resolver = online(FakeLookup::default().answer("X-1", bundle));
        let record = process_entry(&candidate("c1ccccc1"), &resolver, None);
        assert_eq!(record.canonical_structure, "CCO");
        assert_eq!(record.molecular_formula, "C2H6O");
        assert_eq!(record.molecular_weight, "46.07");
        assert_eq!(record.source, format!("PubChem (X-1){DERIVED_NAME_MARKER}"));
    }

    #[test]
    fn invalid_structure_leaves_derived_fields_empty() {
        let record = process_entry(&candidate("not-a-structure"), &Resolver::offline(), None);
        assert!(!record.has_structure());
        assert!(record.is_consistent());
        assert!(record.display_name.is_empty());
        assert_eq!(record.source, FALLBACK_SOURCE);

        let scaffold = RegistryEntry::scaffold("Core", "d", &[], "not-a-structure");
        let record = process_entry(&scaffold, &Resolver::offline(), None);
        assert!(record.is_consistent());
        assert_eq!(record.source, LITERAL_SOURCE);
        assert_eq!(record.description, "d");
    }

    #[test]
    fn unresolvable_entry_still_yields_a_record() {
        let mut entry = candidate("C");
        entry.fallback_structure = None;
        let record = process_entry(&entry, &Resolver::offline(), None);
        assert_eq!(record.identifier, "X-1");
        assert!(!record.has_structure());
        assert!(record.is_consistent());
        assert_eq!(record.source, FALLBACK_SOURCE);
    }

    #[test]
    fn renderer_fills_image_path() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path(), RenderConfig::default());
        let record = process_entry(&candidate("c1ccccc1O"), &Resolver::offline(), Some(&renderer));
        assert_eq!(record.image_path, dir.path().join("X-1.jpg").display().to_string());
        assert!(dir.path().join("X-1.jpg").is_file());
    }

    #[test]
    fn render_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path().join("missing"), RenderConfig::default());
        let record = process_entry(&candidate("c1ccccc1"), &Resolver::offline(), Some(&renderer));
        assert_eq!(record.canonical_structure, "c1ccccc1");
        assert!(record.image_path.is_empty());
    }

    #[test]
    fn builtin_registry_keeps_order_and_count() {
        let registry = Registry::builtin();
        let mut sink = RecordingSink::default();
        let records = process_all(registry, &Resolver::offline(), None, &mut sink);

        assert_eq!(records.len(), registry.len());
        for (record, entry) in records.iter().zip(registry) {
            assert_eq!(record.identifier, entry.identifier);
            assert!(record.has_structure(), "{} did not canonicalize", entry.identifier);
            assert!(record.is_consistent());
        }
        for record in records.iter().filter(|r| r.category == Category::Scaffold) {
            assert!(record.source.starts_with(LITERAL_SOURCE));
        }
        assert_eq!(sink.started.len(), registry.len());
        assert_eq!(sink.finished.last(), Some(&(registry.len() - 1, registry.len())));
    }

    #[test]
    fn run_exports_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            lookup: None,
            render: Some(RenderConfig {
                width: 200,
                height: 150,
                ..RenderConfig::default()
            }),
            export: ExportConfig {
                output_dir: dir.path().join("out"),
                stem: "run".to_string(),
            },
        };
        let registry = Registry::builtin();
        let outcome = run(registry, &config, &mut NoopSink).unwrap();

        assert_eq!(outcome.report.metadata.total_compounds, registry.len());
        assert_eq!(outcome.report.count(Category::Scaffold), registry.count(Category::Scaffold));
        assert_eq!(outcome.summary.record_files.len(), registry.len());
        assert!(outcome.summary.json_path.is_file());
        assert!(outcome.summary.csv_path.is_file());
        for record in &outcome.report.compounds {
            assert!(std::path::Path::new(&record.image_path).is_file());
        }
        assert_eq!(outcome.report.metadata.generated_date.len(), 19);
    }

    #[test]
    fn offline_config_has_no_lookup_or_images() {
        let config = PipelineConfig::offline();
        assert!(config.lookup.is_none());
        assert!(config.render.is_none());
        assert_eq!(PipelineConfig::default().render, Some(RenderConfig::default()));
    }
}
