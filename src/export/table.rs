use super::error::Error;
use crate::model::record::CanonicalCompoundRecord;
use std::path::Path;

/// Writes one CSV row per record under the fixed column header.
pub fn write_records(path: &Path, records: &[CanonicalCompoundRecord]) -> Result<(), Error> {
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer
        .write_record(CanonicalCompoundRecord::COLUMNS)
        .map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::Category;

    fn record(identifier: &str, description: &str) -> CanonicalCompoundRecord {
        CanonicalCompoundRecord {
            identifier: identifier.to_string(),
            category: Category::Scaffold,
            provenance_company: String::new(),
            scaffold_label: String::new(),
            development_status: String::new(),
            description: description.to_string(),
            canonical_structure: "c1ccccc1".to_string(),
            display_name: "C6H6".to_string(),
            molecular_formula: "C6H6".to_string(),
            molecular_weight: "78.11".to_string(),
            image_path: String::new(),
            source: "Predefined scaffold".to_string(),
        }
    }

    #[test]
    fn header_then_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, &[record("A", "plain"), record("B", "with, comma")]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CanonicalCompoundRecord::COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "B");
        assert_eq!(&rows[1][1], "scaffold");
        assert_eq!(&rows[1][5], "with, comma");
        assert_eq!(&rows[1][9], "78.11");
    }

    #[test]
    fn empty_record_list_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("compound_name,type,company"));
    }
}
