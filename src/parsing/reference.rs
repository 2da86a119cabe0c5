use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::dictionary::ReferenceDictionary;
use crate::parsing::table::{open_reader, read_multi_table, read_table_lenient, Row};
use crate::parsing::ParseError;

/// Which table columns hold reference keys and values.
#[derive(Debug, Clone)]
pub struct ReferenceSpec {
    /// Columns whose cells are reference keys (0-based)
    pub key_columns: Vec<usize>,
    /// Column whose cell is the value for every key on the row (0-based)
    pub value_column: usize,
    /// First row of each table is a header
    pub has_header: bool,
    /// Split key cells on this character (e.g. `|` for NCBI synonyms)
    pub key_separator: Option<char>,
}

impl Default for ReferenceSpec {
    fn default() -> Self {
        Self {
            key_columns: vec![0],
            value_column: 1,
            has_header: false,
            key_separator: None,
        }
    }
}

/// Build a reference dictionary from table rows.
///
/// Each row adds its value cell under every key found in its key columns.
/// Empty key cells are ignored.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row is too short for a
/// configured column. Row numbers in errors are 1-based.
pub fn reference_from_rows(
    rows: &[Row],
    spec: &ReferenceSpec,
) -> Result<ReferenceDictionary, ParseError> {
    let mut reference = ReferenceDictionary::new();
    let skip = usize::from(spec.has_header);

    for (i, row) in rows.iter().enumerate().skip(skip) {
        let row_num = i + 1;
        let value = cell(row, spec.value_column, row_num)?;

        for &column in &spec.key_columns {
            let keys = cell(row, column, row_num)?;
            match spec.key_separator {
                Some(sep) => {
                    for key in keys.split(sep).filter(|k| !k.is_empty()) {
                        reference.push(key, value);
                    }
                }
                None if !keys.is_empty() => reference.push(keys, value),
                None => {}
            }
        }
    }

    Ok(reference)
}

fn cell<'r>(row: &'r Row, column: usize, row_num: usize) -> Result<&'r str, ParseError> {
    row.get(column).map(String::as_str).ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Row {row_num} has {} fields, column {column} requested",
            row.len()
        ))
    })
}

/// Read and concatenate reference tables, then build the dictionary.
///
/// With `has_header`, later files' headers are dropped and the combined
/// header row is skipped. With `skip_errors`, unreadable files are logged
/// and skipped; otherwise the first one is an error.
///
/// # Errors
///
/// Returns `ParseError::Io` if a file cannot be read and `skip_errors` is
/// false, or `ParseError::InvalidFormat` if a row is too short for a
/// configured column.
pub fn read_reference_tables(
    paths: &[PathBuf],
    spec: &ReferenceSpec,
    skip_errors: bool,
) -> Result<ReferenceDictionary, ParseError> {
    let rows = if spec.has_header {
        read_multi_table(paths, skip_errors)?
    } else {
        let mut rows = Vec::new();
        for path in paths {
            rows.extend(read_table_lenient(path, skip_errors)?);
        }
        rows
    };

    let reference = reference_from_rows(&rows, spec)?;
    debug!(
        "Loaded {} reference keys from {} file(s)",
        reference.len(),
        paths.len()
    );
    Ok(reference)
}

/// Read a JSON object of `key → [values]`, preserving key order.
///
/// `.gz` files are decompressed transparently.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::Json` if it is not an object of string arrays.
pub fn read_reference_json(path: &Path) -> Result<ReferenceDictionary, ParseError> {
    let reader = open_reader(path)?;
    let reference: ReferenceDictionary = serde_json::from_reader(reader)?;
    debug!(
        "Loaded {} reference keys from {}",
        reference.len(),
        path.display()
    );
    Ok(reference)
}

/// Check if the path names a JSON reference (`.json` or `.json.gz`)
#[must_use]
pub fn is_json_reference(path: &Path) -> bool {
    let name = path.to_string_lossy().to_lowercase();
    name.ends_with(".json") || name.ends_with(".json.gz")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::table::parse_table_text;

    const GENE_INFO: &str = "\
#tax_id\tGeneID\tSymbol\tLocusTag\tSynonyms
9606\t672\tBRCA1\t-\tBRCAI|BRCC1|IRIS
9606\t7157\tTP53\t-\tP53|LFS1
9606\t3308\tHSPA4\t-\tHSP70|HSP70RY
";

    #[test]
    fn test_default_spec() {
        let rows = parse_table_text("BRCA1\t672\nTP53\t7157\nBRCA1\t672\n");
        let reference = reference_from_rows(&rows, &ReferenceSpec::default()).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.get("BRCA1").unwrap(), ["672", "672"]);
    }

    #[test]
    fn test_gene_info_with_synonyms() {
        let rows = parse_table_text(GENE_INFO);
        let spec = ReferenceSpec {
            key_columns: vec![2, 4],
            value_column: 1,
            has_header: true,
            key_separator: Some('|'),
        };
        let reference = reference_from_rows(&rows, &spec).unwrap();

        assert_eq!(reference.get("BRCA1").unwrap(), ["672"]);
        assert_eq!(reference.get("IRIS").unwrap(), ["672"]);
        assert_eq!(reference.get("HSP70").unwrap(), ["3308"]);
        assert!(reference.get("#tax_id").is_none());
        assert!(reference.get("GeneID").is_none());
    }

    #[test]
    fn test_short_row_is_error() {
        let rows = parse_table_text("BRCA1\t672\nTP53\n");
        let err = reference_from_rows(&rows, &ReferenceSpec::default()).unwrap_err();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_empty_key_cells_ignored() {
        let rows = parse_table_text("\t672\nTP53\t7157\n");
        let reference = reference_from_rows(&rows, &ReferenceSpec::default()).unwrap();
        assert_eq!(reference.len(), 1);
    }

    #[test]
    fn test_read_reference_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, r#"{"TP53": ["7157"], "BRCA1": ["672"]}"#).unwrap();

        let reference = read_reference_json(&path).unwrap();
        let keys: Vec<&str> = reference.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["TP53", "BRCA1"]);
    }

    #[test]
    fn test_read_reference_json_rejects_non_object() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, r#"["TP53"]"#).unwrap();
        assert!(matches!(
            read_reference_json(&path),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_read_reference_tables_with_headers() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.tsv");
        let b = dir.path().join("b.tsv");
        std::fs::write(&a, "symbol\tid\nBRCA1\t672\n").unwrap();
        std::fs::write(&b, "symbol\tid\nTP53\t7157\n").unwrap();

        let spec = ReferenceSpec {
            has_header: true,
            ..ReferenceSpec::default()
        };
        let reference = read_reference_tables(&[a, b], &spec, false).unwrap();
        assert_eq!(reference.len(), 2);
        assert!(reference.get("symbol").is_none());
    }

    #[test]
    fn test_read_reference_tables_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.tsv");
        std::fs::write(&a, "TP53\t7157\n").unwrap();
        let missing = dir.path().join("missing.tsv");
        let paths = [a, missing];

        assert!(matches!(
            read_reference_tables(&paths, &ReferenceSpec::default(), false),
            Err(ParseError::Io(_))
        ));
        let reference = read_reference_tables(&paths, &ReferenceSpec::default(), true).unwrap();
        assert_eq!(reference.get("TP53"), Some(&["7157".to_string()][..]));
    }

    #[test]
    fn test_is_json_reference() {
        assert!(is_json_reference(Path::new("ref.json")));
        assert!(is_json_reference(Path::new("ref.JSON.gz")));
        assert!(!is_json_reference(Path::new("ref.tsv")));
    }
}
