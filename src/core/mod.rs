//! Core data types and text normalization.
//!
//! - [`ReferenceDictionary`](dictionary::ReferenceDictionary): raw key → values, insertion ordered
//! - [`normalize`](normalize::normalize): the canonical form used for every key and query
//! - [`MatchStrategy`](types::MatchStrategy), [`Resolution`](types::Resolution): match results
//!
//! ## Identifier Variants
//!
//! The same gene is written many ways in the literature and in source tables:
//!
//! | Raw            | Normalized  |
//! |----------------|-------------|
//! | `BRCA1-alpha`  | `brca1`     |
//! | `HSP70-2`      | `hsp70`     |
//! | `CYP2D6A`      | `cyp2d6`    |
//! | `heat_shock`   | `heat shock`|
//!
//! Identity between identifiers is defined only after normalization.

pub mod dictionary;
pub mod normalize;
pub mod types;
