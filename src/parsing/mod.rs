//! Readers that turn source files into reference dictionaries and queries.
//!
//! This module provides:
//!
//! - **Tables**: tab-separated files, optionally gzip-compressed, read one at
//!   a time or concatenated under a shared header
//! - **Reference dictionaries**: built from table columns or a JSON object
//! - **Queries**: one per line, or one column of a table
//! - **File discovery**: recursive search by file-name regex
//!
//! ## Example
//!
//! ```rust,no_run
//! use gene_match::parsing::reference::{read_reference_tables, ReferenceSpec};
//! use gene_match::parsing::queries::read_queries_file;
//! use std::path::{Path, PathBuf};
//!
//! // NCBI gene_info: Symbol (col 2) and Synonyms (col 4) → GeneID (col 1)
//! let spec = ReferenceSpec {
//!     key_columns: vec![2, 4],
//!     value_column: 1,
//!     has_header: true,
//!     key_separator: Some('|'),
//! };
//! let reference = read_reference_tables(&[PathBuf::from("gene_info.gz")], &spec, false).unwrap();
//! let queries = read_queries_file(Path::new("mentions.txt"), None, false).unwrap();
//! ```

use thiserror::Error;

pub mod queries;
pub mod reference;
pub mod table;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("Invalid JSON reference: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid file name pattern: {0}")]
    InvalidPattern(String),
}
