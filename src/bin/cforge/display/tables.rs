use std::io::{self, Write};

use compound_forge::{CanonicalCompoundRecord, CanonicalStructure, Category, Registry};

use crate::util::text::truncate;

const INDENT: &str = "      ";

pub fn print_registry_table(registry: &Registry) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|entry| {
            let origin = match entry.category {
                Category::ClinicalCandidate => entry.provenance_company.clone().unwrap_or_default(),
                Category::Scaffold => entry.companies.join(", "),
            };
            let source = if entry.skip_external_lookup {
                "literal".to_string()
            } else {
                format!("lookup ({})", entry.lookup_terms().len())
            };
            vec![
                entry.identifier.clone(),
                entry.category.to_string(),
                origin,
                source,
            ]
        })
        .collect();

    print_table(
        &mut out,
        &format!(
            "Registry: {} compounds ({} candidates, {} scaffolds)",
            registry.len(),
            registry.count(Category::ClinicalCandidate),
            registry.count(Category::Scaffold)
        ),
        &["Identifier", "Type", "Company", "Structure"],
        &[28, 18, 24, 12],
        &rows,
    );
}

pub fn print_record_summary(records: &[CanonicalCompoundRecord]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.identifier.clone(),
                if record.has_structure() {
                    record.molecular_formula.clone()
                } else {
                    "n/a".to_string()
                },
                record.molecular_weight.clone(),
                record.source.clone(),
            ]
        })
        .collect();

    let _ = writeln!(out);
    print_table(
        &mut out,
        "Compounds",
        &["Identifier", "Formula", "Weight", "Source"],
        &[24, 14, 8, 30],
        &rows,
    );
}

pub fn print_canonical_table(results: &[(String, CanonicalStructure)]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (input, canonical) in results {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            canonical.smiles,
            canonical.formula,
            canonical.weight_label(),
            input
        );
    }
}

fn print_table(
    out: &mut impl Write,
    title: &str,
    headers: &[&str],
    widths: &[usize],
    rows: &[Vec<String>],
) {
    let line = |left: &str, mid: &str, right: &str| {
        let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{INDENT}{left}{}{right}", cells.join(mid))
    };
    let row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, &w)| format!(" {:<w$} ", truncate(cell, w), w = w))
            .collect();
        format!("{INDENT}│{}│", padded.join("│"))
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", title);
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(out, "{}", row(&header_cells));
    let _ = writeln!(out, "{}", line("├", "┼", "┤"));
    for cells in rows {
        let _ = writeln!(out, "{}", row(cells));
    }
    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}
