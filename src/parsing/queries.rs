use std::io::BufRead;
use std::path::Path;

use crate::parsing::table::open_reader;
use crate::parsing::ParseError;

/// Read query strings from a file.
///
/// Without `column`, every non-empty line is one query, taken verbatim
/// (tabs included). With `column`, lines are split on tabs and the given
/// 0-based field is the query. `has_header` drops the first non-empty line.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a line is too short for `column`.
pub fn read_queries_file(
    path: &Path,
    column: Option<usize>,
    has_header: bool,
) -> Result<Vec<String>, ParseError> {
    let reader = open_reader(path)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    parse_queries(lines.iter().map(String::as_str), column, has_header)
}

/// Parse query strings from text; see [`read_queries_file`].
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line is too short for `column`.
pub fn parse_queries_text(
    text: &str,
    column: Option<usize>,
    has_header: bool,
) -> Result<Vec<String>, ParseError> {
    parse_queries(text.lines(), column, has_header)
}

fn parse_queries<'a>(
    lines: impl Iterator<Item = &'a str>,
    column: Option<usize>,
    has_header: bool,
) -> Result<Vec<String>, ParseError> {
    let mut queries = Vec::new();
    let mut first_line = true;

    for (i, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        if first_line {
            first_line = false;
            if has_header {
                continue;
            }
        }

        let query = match column {
            None => line,
            Some(column) => line.split('\t').nth(column).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Line {} has no column {column}",
                    i + 1
                ))
            })?,
        };
        queries.push(query.to_string());
    }

    Ok(queries)
}
