//! Centralized capacity limits and input checks.

/// Default ceiling on the number of postings a [`ReferenceIndex`] may hold.
///
/// One posting is one entry id stored under one index key. A reference key
/// of `w` words and `L` characters costs `w(w+1)/2 + 2L + 1` postings, so
/// dictionaries with long multi-word keys hit this limit first.
///
/// [`ReferenceIndex`]: crate::catalog::index::ReferenceIndex
pub const DEFAULT_MAX_POSTINGS: usize = 200_000_000;

/// Maximum number of raw reference entries (entry ids are `u32`).
pub const MAX_ENTRIES: usize = u32::MAX as usize;

/// Number of postings one normalized reference key adds to the indexes.
///
/// # Examples
///
/// ```
/// use gene_match::utils::validation::posting_cost;
///
/// // "heat shock": 3 spans + 10 prefixes + 10 suffixes + 1 normalized
/// assert_eq!(posting_cost(2, 10), 24);
/// ```
#[must_use]
pub fn posting_cost(word_count: usize, char_count: usize) -> usize {
    let spans = word_count.saturating_mul(word_count.saturating_add(1)) / 2;
    spans
        .saturating_add(char_count.saturating_mul(2))
        .saturating_add(1)
}

/// Check if adding `additional` postings to `current` would exceed `limit`.
///
/// Call this BEFORE inserting. Returns an error message if the insert would
/// exceed the limit, None if safe.
#[must_use]
pub fn check_posting_limit(current: usize, additional: usize, limit: usize) -> Option<String> {
    let total = current.saturating_add(additional);
    if total > limit {
        Some(format!(
            "Index would hold {total} postings, exceeding the limit of {limit}"
        ))
    } else {
        None
    }
}

/// Check if adding another entry would exceed [`MAX_ENTRIES`].
#[must_use]
pub fn check_entry_limit(count: usize) -> Option<String> {
    if count >= MAX_ENTRIES {
        Some(format!(
            "Too many reference entries: adding another would exceed maximum of {MAX_ENTRIES}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_cost() {
        // single word "tp53": 1 span + 4 prefixes + 4 suffixes + 1
        assert_eq!(posting_cost(1, 4), 10);
        // four words: 10 spans
        assert_eq!(posting_cost(4, 21), 10 + 42 + 1);
    }

    #[test]
    fn test_posting_cost_saturates() {
        assert_eq!(posting_cost(usize::MAX, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_check_posting_limit() {
        assert!(check_posting_limit(0, 10, 10).is_none());
        assert!(check_posting_limit(5, 6, 10).is_some());
        assert!(check_posting_limit(usize::MAX, 1, usize::MAX - 1).is_some());
    }

    #[test]
    fn test_check_entry_limit() {
        assert!(check_entry_limit(0).is_none());
        assert!(check_entry_limit(MAX_ENTRIES - 1).is_none());
        assert!(check_entry_limit(MAX_ENTRIES).is_some());
    }
}
