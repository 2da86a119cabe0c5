//! Command-line interface for gene-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Match query identifiers against a reference dictionary
//! - **normalize**: Print the normalized form of identifiers
//! - **stats**: Build the reference index and report its size
//!
//! ## Usage
//!
//! ```text
//! # Resolve mentions against NCBI gene_info symbols and synonyms
//! gene-match resolve -r gene_info.gz --header --key-column 2 --key-column 4 \
//!     --key-separator '|' --value-column 1 -q mentions.txt
//!
//! # Pipe queries from another tool, JSON output
//! cut -f2 mentions.tsv | gene-match resolve -r genes.json -q - --format json
//!
//! # See what an identifier normalizes to
//! gene-match normalize "BRCA1-alpha" "HSP70-2"
//!
//! # Check index size before a large run
//! gene-match stats -r gene_info.gz --header --key-column 2 --value-column 1
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::catalog::index::IndexLimits;
use crate::core::dictionary::ReferenceDictionary;
use crate::core::types::ProgressEvent;
use crate::parsing::reference::{
    is_json_reference, read_reference_json, read_reference_tables, ReferenceSpec,
};
use crate::parsing::table::find_files;
use crate::utils::validation::DEFAULT_MAX_POSTINGS;

pub mod normalize;
pub mod resolve;
pub mod stats;

#[derive(Parser)]
#[command(name = "gene-match")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Resolve free-form gene and protein identifiers against a reference dictionary")]
#[command(
    long_about = "gene-match resolves identifier mentions (gene symbols, protein names, synonyms) against a reference dictionary that maps canonical identifiers to target values.\n\nIt tolerates the common surface variants of the same entity:\n- Case, punctuation and whitespace differences\n- Isoform and allele suffixes (HSP70-2, CYP2D6A, BRCA1-alpha)\n- Word-order subsets and partial names\n- Abbreviated fragments, via prefix/suffix fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve query identifiers against a reference dictionary
    Resolve(resolve::ResolveArgs),

    /// Print the normalized form of identifiers
    Normalize(normalize::NormalizeArgs),

    /// Build the reference index and report its size
    Stats(stats::StatsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options that locate and shape the reference dictionary
#[derive(Args)]
pub struct ReferenceArgs {
    /// Reference files or directories (TSV, TSV.gz, JSON, JSON.gz)
    #[arg(short, long = "reference", required = true, num_args = 1..)]
    pub references: Vec<PathBuf>,

    /// Regex a file name must fully match to be read from a reference directory
    #[arg(long, default_value = r".*\.(tsv|txt|json)(\.gz)?")]
    pub pattern: String,

    /// 0-based column holding reference keys (repeatable)
    #[arg(long = "key-column", default_values_t = vec![0])]
    pub key_columns: Vec<usize>,

    /// 0-based column holding the value for every key on the row
    #[arg(long, default_value = "1")]
    pub value_column: usize,

    /// Reference tables start with a header row
    #[arg(long)]
    pub header: bool,

    /// Split key cells on this character (e.g. '|' for NCBI synonyms)
    #[arg(long)]
    pub key_separator: Option<char>,

    /// Fail if the index would hold more postings than this
    #[arg(long, default_value_t = DEFAULT_MAX_POSTINGS)]
    pub max_postings: usize,
}

impl ReferenceArgs {
    pub fn spec(&self) -> ReferenceSpec {
        ReferenceSpec {
            key_columns: self.key_columns.clone(),
            value_column: self.value_column,
            has_header: self.header,
            key_separator: self.key_separator,
        }
    }

    pub fn limits(&self) -> IndexLimits {
        IndexLimits {
            max_postings: self.max_postings,
        }
    }

    /// Expand directories, then load JSON and table references in order.
    ///
    /// Files named on the command line must be readable. Tables found by
    /// searching a directory are read leniently: unreadable ones are logged
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be searched, a named file
    /// cannot be read, a JSON reference is invalid, or a table row is too
    /// short for a configured column.
    pub fn load(&self) -> anyhow::Result<ReferenceDictionary> {
        let mut json_files = Vec::new();
        let mut named_tables = Vec::new();
        let mut found_tables = Vec::new();

        for path in &self.references {
            if path.is_dir() {
                let files = find_files(path, &self.pattern)
                    .with_context(|| format!("Failed to search {}", path.display()))?;
                for file in files {
                    if is_json_reference(&file) {
                        json_files.push(file);
                    } else {
                        found_tables.push(file);
                    }
                }
            } else if is_json_reference(path) {
                json_files.push(path.clone());
            } else {
                named_tables.push(path.clone());
            }
        }

        let mut reference = ReferenceDictionary::new();
        for file in &json_files {
            let loaded = read_reference_json(file)
                .with_context(|| format!("Failed to load {}", file.display()))?;
            merge(&mut reference, &loaded);
        }
        if !named_tables.is_empty() {
            let loaded = read_reference_tables(&named_tables, &self.spec(), false)
                .context("Failed to load reference tables")?;
            merge(&mut reference, &loaded);
        }
        if !found_tables.is_empty() {
            let loaded = read_reference_tables(&found_tables, &self.spec(), true)?;
            merge(&mut reference, &loaded);
        }

        Ok(reference)
    }
}

fn merge(into: &mut ReferenceDictionary, from: &ReferenceDictionary) {
    for (key, values) in from.iter() {
        into.insert(key, values.iter().cloned());
    }
}

/// Progress reporter used when `--verbose` is set.
pub fn log_progress(event: ProgressEvent) {
    info!(
        "{}: {}/{} ({:.0}%)",
        event.stage,
        event.done,
        event.total,
        event.fraction() * 100.0
    );
}
