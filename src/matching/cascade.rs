//! The per-query match cascade.
//!
//! Strategies are tried in order and the first one that hits wins:
//!
//! 1. **Direct**: normalized query is a normalized reference key
//! 2. **Longest span**: the longest word spans of the query that are
//!    normalized reference keys. All hits at that length are unioned and
//!    shorter lengths are not examined.
//! 3. **Raw expanded**: the *raw* query string is a reference word span
//! 4. **Expanded spans**: every word span of the query, at every length,
//!    that is a reference word span. Unlike strategy 2 this does not stop
//!    at the first length with a hit.
//! 5. **Prefix/suffix**: longest query prefix among reference key prefixes
//!    plus longest query suffix among reference key suffixes
//!
//! Strategies 1-4 hit when at least one of their lookups finds a key.
//! Strategy 5 hits only when its prefix and suffix lookups yield at least one
//! value. Values are never deduplicated.
//!
//! Strategy 3 looks up the query exactly as given, before normalization,
//! against spans built from normalized keys. It therefore only hits for
//! queries already in lowercase, single-spaced, noise-free form.

use crate::catalog::index::ReferenceIndex;
use crate::core::normalize::{normalize, words};
use crate::core::types::{MatchStrategy, Resolution};

/// Resolve one raw query, returning the matched values.
///
/// Returns an empty vector when nothing matches.
#[must_use]
pub fn resolve(query: &str, index: &ReferenceIndex) -> Vec<String> {
    resolve_detailed(query, index)
        .map(|r| r.values)
        .unwrap_or_default()
}

/// Resolve one raw query, reporting which strategy matched.
///
/// Returns `None` when nothing matches, including when the query normalizes
/// to an empty string.
#[must_use]
pub fn resolve_detailed(query: &str, index: &ReferenceIndex) -> Option<Resolution> {
    let normalized = normalize(query);
    if normalized.is_empty() {
        return None;
    }

    if let Some(ids) = index.normalized(&normalized) {
        return Some(Resolution::new(index.values_for(ids), MatchStrategy::Direct));
    }

    let query_words = words(&normalized);

    if let Some(values) = longest_normalized_span(&query_words, index) {
        return Some(Resolution::new(values, MatchStrategy::LongestSpan));
    }

    if let Some(ids) = index.expanded(query) {
        return Some(Resolution::new(
            index.values_for(ids),
            MatchStrategy::RawExpanded,
        ));
    }

    if let Some(values) = all_expanded_spans(&query_words, index) {
        return Some(Resolution::new(values, MatchStrategy::ExpandedSpans));
    }

    prefix_suffix(&normalized, index)
        .map(|values| Resolution::new(values, MatchStrategy::PrefixSuffix))
}

/// Space-joined word spans of exactly `len` words, left to right.
fn spans<'w>(words: &'w [&str], len: usize) -> impl Iterator<Item = String> + 'w {
    let count = (words.len() + 1).saturating_sub(len);
    (0..count).map(move |start| words[start..start + len].join(" "))
}

/// Strategy 2: stops at the longest span length with any normalized-key hit.
fn longest_normalized_span(words: &[&str], index: &ReferenceIndex) -> Option<Vec<String>> {
    for len in (1..=words.len()).rev() {
        let mut hit = false;
        let mut values = Vec::new();
        for span in spans(words, len) {
            if let Some(ids) = index.normalized(&span) {
                hit = true;
                index.extend_values(ids, &mut values);
            }
        }
        if hit {
            return Some(values);
        }
    }
    None
}

/// Strategy 4: accumulates expanded-span hits across every length.
fn all_expanded_spans(words: &[&str], index: &ReferenceIndex) -> Option<Vec<String>> {
    let mut hit = false;
    let mut values = Vec::new();
    for len in (1..=words.len()).rev() {
        for span in spans(words, len) {
            if let Some(ids) = index.expanded(&span) {
                hit = true;
                index.extend_values(ids, &mut values);
            }
        }
    }
    hit.then_some(values)
}

/// Strategy 5: prefix hit values followed by suffix hit values.
///
/// Unlike strategies 1-4, this only counts as a match when the hits carry
/// at least one value.
fn prefix_suffix(normalized: &str, index: &ReferenceIndex) -> Option<Vec<String>> {
    let affix = index.affix();
    let mut values = Vec::new();
    if let Some((_, ids)) = affix.longest_prefix(normalized) {
        index.extend_values(ids, &mut values);
    }
    if let Some((_, ids)) = affix.longest_suffix(normalized) {
        index.extend_values(ids, &mut values);
    }
    (!values.is_empty()).then_some(values)
}
