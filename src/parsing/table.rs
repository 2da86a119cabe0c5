use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use regex::Regex;
use tracing::{debug, warn};

use crate::parsing::ParseError;

/// One tab-separated line, split into fields.
pub type Row = Vec<String>;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a file for line reading, decompressing `.gz`/`.bgz` transparently.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a tab-separated file into rows.
///
/// Empty lines are skipped; every other line becomes one row, header
/// included.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or read (including
/// corrupt gzip data or invalid UTF-8).
pub fn read_table_file(path: &Path) -> Result<Vec<Row>, ParseError> {
    let reader = open_reader(path)?;
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(row) = split_row(&line) {
            rows.push(row);
        }
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Split tab-separated text into rows, skipping empty lines.
#[must_use]
pub fn parse_table_text(text: &str) -> Vec<Row> {
    text.lines().filter_map(split_row).collect()
}

fn split_row(line: &str) -> Option<Row> {
    if line.is_empty() {
        None
    } else {
        Some(line.split('\t').map(str::to_string).collect())
    }
}

/// Read several tables that share one header.
///
/// The first file that yields rows contributes all of them; every later
/// file has its first (header) row dropped. With `skip_errors`, files that
/// cannot be read are logged and skipped.
///
/// # Errors
///
/// Returns the first read error when `skip_errors` is false.
pub fn read_multi_table(paths: &[PathBuf], skip_errors: bool) -> Result<Vec<Row>, ParseError> {
    let mut all_rows = Vec::new();
    let mut have_header = false;

    for path in paths {
        let rows = read_table_lenient(path, skip_errors)?;
        if rows.is_empty() {
            continue;
        }
        if have_header {
            all_rows.extend(rows.into_iter().skip(1));
        } else {
            all_rows = rows;
            have_header = true;
        }
    }

    Ok(all_rows)
}

/// Read a table, optionally treating a missing or unreadable file as empty.
///
/// # Errors
///
/// Returns the underlying error only when `skip_errors` is false.
pub fn read_table_lenient(path: &Path, skip_errors: bool) -> Result<Vec<Row>, ParseError> {
    match read_table_file(path) {
        Ok(rows) => Ok(rows),
        Err(e) if skip_errors => {
            warn!("Skipping {}: {e}", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Recursively find files under `dir` whose file name fully matches `pattern`.
///
/// Results are sorted so that table concatenation order is stable.
///
/// # Errors
///
/// Returns `ParseError::InvalidPattern` if `pattern` is not a valid regex,
/// or `ParseError::Io` if a directory cannot be listed.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, ParseError> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| ParseError::InvalidPattern(format!("{pattern}: {e}")))?;

    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                let matches = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| regex.is_match(name));
                if matches {
                    found.push(path);
                }
            }
        }
    }

    found.sort();
    Ok(found)
}
