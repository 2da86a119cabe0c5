//! Derived lookup structures over a reference dictionary.
//!
//! A [`ReferenceIndex`](index::ReferenceIndex) is built once per resolution
//! run and is read-only afterwards, so any number of threads may query it.
//!
//! ## Example
//!
//! ```rust
//! use gene_match::catalog::index::ReferenceIndex;
//! use gene_match::core::dictionary::ReferenceDictionary;
//!
//! let mut reference = ReferenceDictionary::new();
//! reference.insert("heat shock protein 70", ["HSP70"]);
//!
//! let index = ReferenceIndex::build(&reference).unwrap();
//! let ids = index.expanded("shock protein").unwrap();
//! assert_eq!(index.values_for(ids), vec!["HSP70"]);
//! ```
//!
//! ## Capacity
//!
//! The expanded map stores every contiguous word span of every key, so its
//! size is quadratic in key word count. Use
//! [`IndexLimits`](index::IndexLimits) to fail fast on oversized inputs.

pub mod affix;
pub mod index;
