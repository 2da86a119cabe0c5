use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from original (un-normalized) query string to matched values.
///
/// Keys appear in first-seen query order. Unmatched queries are absent.
pub type ResultMap = IndexMap<String, Vec<String>>;

/// The cascade stage that produced a match, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Normalized query equals a normalized reference key
    Direct,
    /// Longest word span(s) of the query equal to a normalized reference key
    LongestSpan,
    /// Raw query string found verbatim among the reference word spans
    RawExpanded,
    /// Every query word span found among the reference word spans
    ExpandedSpans,
    /// Longest shared character prefix and/or suffix
    PrefixSuffix,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::LongestSpan => write!(f, "longest_span"),
            Self::RawExpanded => write!(f, "raw_expanded"),
            Self::ExpandedSpans => write!(f, "expanded_spans"),
            Self::PrefixSuffix => write!(f, "prefix_suffix"),
        }
    }
}

/// A successful match for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Matched values; may contain repeats. Empty only if every matched
    /// reference entry carries no values.
    pub values: Vec<String>,

    /// Stage that produced `values`
    pub strategy: MatchStrategy,
}

impl Resolution {
    #[must_use]
    pub fn new(values: Vec<String>, strategy: MatchStrategy) -> Self {
        Self { values, strategy }
    }
}

/// Phase of a resolution run reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Indexing,
    Resolving,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indexing => write!(f, "Indexing references"),
            Self::Resolving => write!(f, "Resolving queries"),
        }
    }
}

/// A coarse-grained progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub done: usize,
    pub total: usize,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(stage: Stage, done: usize, total: usize) -> Self {
        Self { stage, done, total }
    }

    /// Completed fraction in `0.0..=1.0`; 1.0 when there is nothing to do.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let fraction = self.done as f64 / self.total as f64;
            fraction
        }
    }
}

/// Optional observer for [`ProgressEvent`]s. Never affects results.
pub type ProgressCallback<'a> = &'a (dyn Fn(ProgressEvent) + Sync);
