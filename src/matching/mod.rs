//! Identifier matching: the per-query cascade and the batch driver.
//!
//! - [`cascade`]: ordered fallback strategies for a single query
//! - [`MatchingEngine`](engine::MatchingEngine): resolves many queries against one index
//! - [`resolve_all`](engine::resolve_all): build-then-resolve convenience entry point
//!
//! ## Matching Algorithm
//!
//! Each query is normalized and then tried against, in order:
//!
//! 1. **Direct**: the normalized-key map
//! 2. **Longest span**: the query's longest word spans in the normalized-key map
//! 3. **Raw expanded**: the raw query in the word-span map
//! 4. **Expanded spans**: every query word span in the word-span map
//! 5. **Prefix/suffix**: longest character prefix and suffix
//!
//! The first strategy with a hit wins. Values are returned as a multiset:
//! a reference value reached through two spans appears twice.
//!
//! ## Example
//!
//! ```rust
//! use gene_match::core::dictionary::ReferenceDictionary;
//! use gene_match::matching::engine::{resolve_all, ResolveConfig};
//!
//! let mut reference = ReferenceDictionary::new();
//! reference.insert("BRCA1-alpha", ["GENE:BRCA1"]);
//!
//! let results = resolve_all(&["brca1 ALPHA"], &reference, ResolveConfig::default()).unwrap();
//! assert_eq!(results["brca1 ALPHA"], vec!["GENE:BRCA1"]);
//! ```

pub mod cascade;
pub mod engine;
