use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_registry_hints(err);
        collector.collect_pipeline_hints(err);
        collector.collect_structure_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_registry_hints(&mut self, err: &Error) {
        use compound_forge::registry::Error as RegistryError;

        let Some(registry_err) = err.downcast_ref::<RegistryError>() else {
            return;
        };

        self.mark_typed();

        match registry_err {
            RegistryError::Io { source, .. } => self.collect_std_io_hints(source),

            RegistryError::Parse(_) => {
                self.add("The registry must be TOML with one [[compound]] table per entry");
                self.add("Each entry needs at least 'identifier' and 'category'");
                self.add("Valid categories: clinical_candidate, scaffold");
            }

            RegistryError::EmptyIdentifier(position) => {
                self.add(format!("Give compound #{position} a non-empty identifier"));
            }

            RegistryError::DuplicateIdentifier(id) => {
                self.add(format!("Rename or remove one of the entries called '{id}'"));
                self.add("Identifiers name the exported files and must be unique");
            }

            RegistryError::MissingLiteral(id) => {
                self.add(format!("Add a 'smiles' value to '{id}'"));
                self.add("Or remove 'skip_lookup' so the entry is looked up by name");
            }
        }
    }

    fn collect_pipeline_hints(&mut self, err: &Error) {
        use compound_forge::export::Error as ExportError;
        use compound_forge::pipeline::Error as PipelineError;

        let export_err = match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::Export(export_err)) => Some(export_err),
            Some(PipelineError::LookupClient(_)) => {
                self.mark_typed();
                self.add("The HTTP client could not be created");
                self.add("Use --offline to run with curated structures only");
                return;
            }
            None => err.downcast_ref::<ExportError>(),
        };

        let Some(export_err) = export_err else {
            return;
        };

        self.mark_typed();
        self.add(format!(
            "Could not write to '{}'",
            export_err.path().display()
        ));

        match export_err {
            ExportError::CreateDir { source, .. } | ExportError::Io { source, .. } => {
                self.collect_std_io_hints(source);
            }
            ExportError::Json { .. } | ExportError::Csv { .. } => {
                self.add("Check available disk space and choose another -o directory");
            }
        }
    }

    fn collect_structure_hints(&mut self, err: &Error) {
        use compound_forge::perceive::Error as StructureError;

        let Some(structure_err) = err.downcast_ref::<StructureError>() else {
            return;
        };

        self.mark_typed();

        match structure_err {
            StructureError::Smiles(_) => {
                self.add("Check the SMILES syntax near the reported position");
                self.add("Quote the argument so the shell leaves brackets and '#' alone");
            }
            StructureError::NonRingAromatic { .. } => {
                self.add("Lowercase (aromatic) atoms must be part of a ring");
                self.add("Write acyclic atoms in uppercase");
            }
            StructureError::Kekulize { .. } => {
                self.add("The aromatic system has no valid Kekulé form");
                self.add("Mark pyrrole-type nitrogens explicitly, e.g. [nH]");
            }
            StructureError::Valence { .. } => {
                self.add("An atom has more bonds than its element allows");
                self.add("Add a formal charge in brackets if intended, e.g. [N+]");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the path");
                self.add("Check permissions with `ls -la`");
            }

            ErrorKind::AlreadyExists | ErrorKind::NotADirectory => {
                self.add("A file is in the way of the output directory");
                self.add("Choose a different -o directory");
            }

            ErrorKind::StorageFull | ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn registry_errors_get_typed_hints() {
        let err = compound_forge::Registry::from_toml_str("[[compound]]\nidentifier = 1")
            .context("Failed to load registry")
            .unwrap_err();
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("[[compound]]")));
    }

    #[test]
    fn structure_errors_get_typed_hints() {
        let err = compound_forge::canonicalize("CC(C")
            .context("Invalid structure")
            .unwrap_err();
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("SMILES syntax")));
    }

    #[test]
    fn untyped_errors_fall_back_to_message_hints() {
        let err = anyhow::anyhow!("open failed: No such file or directory");
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("file path"));
        assert!(HintCollector::collect(&anyhow::anyhow!("odd")).is_none());
    }
}
