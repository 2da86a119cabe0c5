use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::dictionary::ReferenceDictionary;
use crate::core::normalize::{normalize, words};
use crate::core::types::{ProgressCallback, ProgressEvent, Stage};
use crate::utils::validation::{
    check_entry_limit, check_posting_limit, posting_cost, DEFAULT_MAX_POSTINGS,
};

use super::affix::AffixIndex;

/// Position of a raw reference entry in the values arena.
pub type EntryId = u32;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index capacity exceeded while adding '{key}': {message}")]
    CapacityExceeded { key: String, message: String },

    #[error("{0}")]
    TooManyEntries(String),
}

/// Capacity limits applied while building a [`ReferenceIndex`].
#[derive(Debug, Clone, Copy)]
pub struct IndexLimits {
    /// Maximum total postings across all derived maps
    pub max_postings: usize,
}

impl Default for IndexLimits {
    fn default() -> Self {
        Self {
            max_postings: DEFAULT_MAX_POSTINGS,
        }
    }
}

/// Size summary of a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Raw entries indexed
    pub entries: usize,
    /// Raw entries skipped because their key normalized to nothing
    pub skipped: usize,
    pub normalized_keys: usize,
    pub expanded_keys: usize,
    pub prefix_keys: usize,
    pub suffix_keys: usize,
    /// Entry ids stored across all maps
    pub postings: usize,
}

/// Builds a [`ReferenceIndex`] one raw entry at a time.
///
/// Building is the only phase that mutates; [`finish`](Self::finish) hands
/// back a frozen index that is only ever read.
#[derive(Debug, Default)]
pub struct ReferenceIndexBuilder {
    limits: IndexLimits,
    values: Vec<Vec<String>>,
    normalized: HashMap<String, Vec<EntryId>>,
    expanded: HashMap<String, Vec<EntryId>>,
    affix: AffixIndex,
    postings: usize,
    skipped: usize,
}

impl ReferenceIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: IndexLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Index one raw reference entry.
    ///
    /// Returns `Ok(false)` if the key normalizes to an empty string and was
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::CapacityExceeded` if the entry would push the
    /// index past `max_postings`, or `IndexError::TooManyEntries` if the
    /// entry id space is exhausted. The builder is left unchanged.
    pub fn add(&mut self, raw_key: &str, values: &[String]) -> Result<bool, IndexError> {
        let key = normalize(raw_key);
        if key.is_empty() {
            self.skipped += 1;
            return Ok(false);
        }

        if let Some(message) = check_entry_limit(self.values.len()) {
            return Err(IndexError::TooManyEntries(message));
        }

        let key_words = words(&key);
        let cost = posting_cost(key_words.len(), key.chars().count());
        if let Some(message) = check_posting_limit(self.postings, cost, self.limits.max_postings)
        {
            return Err(IndexError::CapacityExceeded {
                key: raw_key.to_string(),
                message,
            });
        }

        #[allow(clippy::cast_possible_truncation)] // bounded by check_entry_limit
        let id = self.values.len() as EntryId;
        self.values.push(values.to_vec());

        self.normalized.entry(key.clone()).or_default().push(id);
        let mut added = 1;

        // Every contiguous word span i..=j, including the full key
        for i in 0..key_words.len() {
            for j in i..key_words.len() {
                let span = key_words[i..=j].join(" ");
                self.expanded.entry(span).or_default().push(id);
                added += 1;
            }
        }

        added += self.affix.insert(&key, id);
        self.postings += added;

        Ok(true)
    }

    pub fn finish(self) -> ReferenceIndex {
        let index = ReferenceIndex {
            values: self.values,
            normalized: self.normalized,
            expanded: self.expanded,
            affix: self.affix,
            postings: self.postings,
            skipped: self.skipped,
        };
        debug!(
            "Built reference index: {} entries, {} skipped, {} postings",
            index.values.len(),
            index.skipped,
            index.postings
        );
        index
    }
}

/// Read-only lookup structures derived from a [`ReferenceDictionary`].
///
/// Holds one values list per indexed raw entry, and four maps from string
/// to entry ids:
///
/// - **normalized**: normalized key
/// - **expanded**: every contiguous word span of every normalized key
/// - **prefix** / **suffix**: every character prefix / suffix of every normalized key
///
/// Looking up a key and materialising its ids yields the concatenation of
/// the values of every contributing entry, in dictionary order, duplicates
/// kept.
///
/// ## Scaling
///
/// A key of `w` words and `L` characters adds `w(w+1)/2` expanded postings
/// and `2L` affix postings. Dictionaries with long multi-word keys grow
/// quadratically in word count; [`IndexLimits`] bounds the total.
#[derive(Debug)]
pub struct ReferenceIndex {
    values: Vec<Vec<String>>,
    normalized: HashMap<String, Vec<EntryId>>,
    expanded: HashMap<String, Vec<EntryId>>,
    affix: AffixIndex,
    postings: usize,
    skipped: usize,
}

impl ReferenceIndex {
    /// Build an index with default limits.
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if the dictionary exceeds the default limits.
    pub fn build(reference: &ReferenceDictionary) -> Result<Self, IndexError> {
        Self::build_with_limits(reference, IndexLimits::default())
    }

    /// Build an index with custom limits.
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if the dictionary exceeds `limits`.
    pub fn build_with_limits(
        reference: &ReferenceDictionary,
        limits: IndexLimits,
    ) -> Result<Self, IndexError> {
        Self::build_with_progress(reference, limits, 0, None)
    }

    /// Build an index, reporting progress every `interval` entries.
    ///
    /// An `interval` of 0 reports only on completion.
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if the dictionary exceeds `limits`.
    pub fn build_with_progress(
        reference: &ReferenceDictionary,
        limits: IndexLimits,
        interval: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<Self, IndexError> {
        let total = reference.len();
        let mut builder = ReferenceIndexBuilder::with_limits(limits);

        for (done, (key, values)) in reference.iter().enumerate() {
            builder.add(key, values)?;
            if let Some(report) = progress {
                let done = done + 1;
                if interval > 0 && done % interval == 0 && done < total {
                    report(ProgressEvent::new(Stage::Indexing, done, total));
                }
            }
        }

        if let Some(report) = progress {
            report(ProgressEvent::new(Stage::Indexing, total, total));
        }

        Ok(builder.finish())
    }

    /// Entry ids whose normalized key equals `key`.
    #[must_use]
    pub fn normalized(&self, key: &str) -> Option<&[EntryId]> {
        self.normalized.get(key).map(Vec::as_slice)
    }

    /// Entry ids whose normalized key contains the word span `span`.
    #[must_use]
    pub fn expanded(&self, span: &str) -> Option<&[EntryId]> {
        self.expanded.get(span).map(Vec::as_slice)
    }

    #[must_use]
    pub fn affix(&self) -> &AffixIndex {
        &self.affix
    }

    /// Append the values of every entry in `ids`, in order, to `out`.
    pub fn extend_values(&self, ids: &[EntryId], out: &mut Vec<String>) {
        for &id in ids {
            if let Some(values) = self.values.get(id as usize) {
                out.extend(values.iter().cloned());
            }
        }
    }

    /// Values of every entry in `ids`, in order.
    #[must_use]
    pub fn values_for(&self, ids: &[EntryId]) -> Vec<String> {
        let mut out = Vec::new();
        self.extend_values(ids, &mut out);
        out
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.values.len(),
            skipped: self.skipped,
            normalized_keys: self.normalized.len(),
            expanded_keys: self.expanded.len(),
            prefix_keys: self.affix.prefix_count(),
            suffix_keys: self.affix.suffix_count(),
            postings: self.postings,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
