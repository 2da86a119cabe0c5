use std::collections::HashMap;

use super::index::EntryId;

/// Character-level prefix and suffix maps over normalized reference keys.
///
/// Every prefix and every suffix of the full normalized key (not of each
/// word) is stored, so a key of `L` characters adds `2L` postings. Slicing
/// is on `char` boundaries.
#[derive(Debug, Default)]
pub struct AffixIndex {
    prefixes: HashMap<String, Vec<EntryId>>,
    suffixes: HashMap<String, Vec<EntryId>>,
}

impl AffixIndex {
    /// Record every prefix and suffix of `key` for entry `id`.
    /// Returns the number of postings added.
    pub(crate) fn insert(&mut self, key: &str, id: EntryId) -> usize {
        let mut added = 0;
        for (start, c) in key.char_indices() {
            let end = start + c.len_utf8();
            self.prefixes
                .entry(key[..end].to_string())
                .or_default()
                .push(id);
            self.suffixes
                .entry(key[start..].to_string())
                .or_default()
                .push(id);
            added += 2;
        }
        added
    }

    /// Longest prefix of `query` present in the prefix map.
    ///
    /// Prefixes are tried from the full query down to its first character;
    /// the first hit wins.
    #[must_use]
    pub fn longest_prefix<'q>(&self, query: &'q str) -> Option<(&'q str, &[EntryId])> {
        let ends: Vec<usize> = query
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        ends.into_iter().rev().find_map(|end| {
            let prefix = &query[..end];
            self.prefixes.get(prefix).map(|ids| (prefix, ids.as_slice()))
        })
    }

    /// Longest suffix of `query` present in the suffix map.
    ///
    /// Suffixes are tried from the full query down to its last character;
    /// the first hit wins.
    #[must_use]
    pub fn longest_suffix<'q>(&self, query: &'q str) -> Option<(&'q str, &[EntryId])> {
        query.char_indices().find_map(|(start, _)| {
            let suffix = &query[start..];
            self.suffixes.get(suffix).map(|ids| (suffix, ids.as_slice()))
        })
    }

    #[must_use]
    pub fn prefix_count(&self) -> usize {
        self.prefixes.len()
    }

    #[must_use]
    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }
}
