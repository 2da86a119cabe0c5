//! # gene-match
//!
//! A library for resolving free-form biological identifiers against a
//! curated reference dictionary.
//!
//! Text-mined mentions of genes and proteins rarely match a database key
//! exactly. The same entity shows up as `BRCA1`, `brca1-alpha`, `BRCA1 alpha`,
//! or as a fragment of a longer name such as `shock protein` for
//! `heat shock protein 70`.
//!
//! `gene-match` handles this by normalizing every key and query, building
//! derived indexes over the reference once, and running each query through
//! a cascade of progressively looser match strategies.
//!
//! ## Features
//!
//! - **Normalization**: case, punctuation, whitespace, isoform and allele suffixes
//! - **Direct matching**: normalized query equals a normalized key
//! - **Word-span matching**: query fragments against whole keys, and against key fragments
//! - **Prefix/suffix fallback**: run-together or truncated identifiers
//! - **Parallel resolution**: read-only indexes shared across rayon workers
//!
//! ## Example
//!
//! ```rust
//! use gene_match::{MatchingEngine, ReferenceDictionary, ReferenceIndex};
//!
//! let mut reference = ReferenceDictionary::new();
//! reference.insert("heat shock protein 70", ["HSP70"]);
//! reference.insert("BRCA1-alpha", ["GENE:BRCA1"]);
//!
//! // Build the indexes once
//! let index = ReferenceIndex::build(&reference).unwrap();
//!
//! // Resolve many queries against them
//! let engine = MatchingEngine::new(&index);
//! let results = engine.resolve_all(&["brca1 ALPHA", "Shock Protein", "unknown"]);
//!
//! assert_eq!(results["brca1 ALPHA"], vec!["GENE:BRCA1"]);
//! assert!(!results.contains_key("unknown"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Normalization, the reference dictionary, and result types
//! - [`catalog`]: Derived index construction
//! - [`matching`]: The match cascade and the batch driver
//! - [`parsing`]: Readers for reference tables, JSON dictionaries, and query files
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::index::{IndexError, IndexLimits, IndexStats, ReferenceIndex};
pub use core::dictionary::ReferenceDictionary;
pub use core::normalize::normalize;
pub use core::types::*;
pub use matching::engine::{resolve_all, MatchingEngine, ResolveConfig};
