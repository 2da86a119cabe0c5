use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::index::{IndexError, IndexLimits, ReferenceIndex};
use crate::core::dictionary::ReferenceDictionary;
use crate::core::types::{ProgressCallback, ProgressEvent, Resolution, ResultMap, Stage};
use crate::matching::cascade;

/// Query string → full resolution, for callers that want the strategy too.
pub type DetailedResultMap = IndexMap<String, Resolution>;

/// Default number of items between progress callbacks
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Configuration for a resolution run
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Resolve queries on a rayon thread pool
    pub parallel: bool,
    /// Worker threads for parallel runs (0 = rayon's global pool)
    pub threads: usize,
    /// Items between progress callbacks (0 = completion only)
    pub progress_interval: usize,
    /// Capacity limits for index construction
    pub limits: IndexLimits,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            limits: IndexLimits::default(),
        }
    }
}

impl ResolveConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

/// Resolves queries against a built [`ReferenceIndex`].
///
/// The index is borrowed immutably, so the engine is cheap to create and
/// queries never affect one another.
pub struct MatchingEngine<'a> {
    index: &'a ReferenceIndex,
    config: ResolveConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self {
            index,
            config: ResolveConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(index: &'a ReferenceIndex, config: ResolveConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &ReferenceIndex {
        self.index
    }

    /// Matched values for one query; empty when nothing matches.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Vec<String> {
        cascade::resolve(query, self.index)
    }

    /// Resolution for one query, or `None` when nothing matches.
    #[must_use]
    pub fn resolve_detailed(&self, query: &str) -> Option<Resolution> {
        cascade::resolve_detailed(query, self.index)
    }

    /// Resolve every query, keyed by the original query string.
    ///
    /// Unmatched queries are omitted. A query string that appears more than
    /// once keeps its first position.
    pub fn resolve_all<S: AsRef<str> + Sync>(&self, queries: &[S]) -> ResultMap {
        self.resolve_all_detailed(queries, None)
            .into_iter()
            .map(|(query, resolution)| (query, resolution.values))
            .collect()
    }

    /// Resolve every query, keeping the matching strategy of each.
    ///
    /// Results are identical for sequential and parallel runs: per-query
    /// outcomes are gathered in query order before the map is assembled.
    pub fn resolve_all_detailed<S: AsRef<str> + Sync>(
        &self,
        queries: &[S],
        progress: Option<ProgressCallback<'_>>,
    ) -> DetailedResultMap {
        let total = queries.len();
        let done = AtomicUsize::new(0);
        let interval = self.config.progress_interval;

        let resolve_one = |query: &S| {
            let resolution = self.resolve_detailed(query.as_ref());
            if let Some(report) = progress {
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                if interval > 0 && n % interval == 0 && n < total {
                    report(ProgressEvent::new(Stage::Resolving, n, total));
                }
            }
            resolution
        };

        let resolutions: Vec<Option<Resolution>> = if self.config.parallel {
            self.run_parallel(|| queries.par_iter().map(resolve_one).collect())
        } else {
            queries.iter().map(resolve_one).collect()
        };

        if let Some(report) = progress {
            report(ProgressEvent::new(Stage::Resolving, total, total));
        }

        let mut results = DetailedResultMap::with_capacity(total);
        for (query, resolution) in queries.iter().zip(resolutions) {
            if let Some(resolution) = resolution {
                results.insert(query.as_ref().to_string(), resolution);
            }
        }

        debug!("Resolved {} of {} queries", results.len(), total);
        results
    }

    /// Run `op` on a dedicated pool when `threads` is set, else on the global pool.
    fn run_parallel<T: Send>(&self, op: impl FnOnce() -> T + Send) -> T {
        if self.config.threads == 0 {
            return op();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
        {
            Ok(pool) => pool.install(op),
            Err(e) => {
                warn!(
                    "Could not build a {}-thread pool ({e}); using the global pool",
                    self.config.threads
                );
                op()
            }
        }
    }
}

/// Build indexes over `reference`, then resolve every query against them.
///
/// # Errors
///
/// Returns an `IndexError` if the reference dictionary exceeds the
/// configured capacity limits. Query resolution itself cannot fail.
pub fn resolve_all<S: AsRef<str> + Sync>(
    queries: &[S],
    reference: &ReferenceDictionary,
    config: ResolveConfig,
) -> Result<ResultMap, IndexError> {
    let index = ReferenceIndex::build_with_limits(reference, config.limits)?;
    Ok(MatchingEngine::with_config(&index, config).resolve_all(queries))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::types::MatchStrategy;

    fn make_reference() -> ReferenceDictionary {
        let mut reference = ReferenceDictionary::new();
        reference.insert("BRCA1-alpha", ["GENE:BRCA1"]);
        reference.insert("heat shock protein 70", ["HSP70"]);
        reference.insert("kinase domain containing 1", ["X1"]);
        reference.insert("TP53", ["7157"]);
        reference.insert("tp53-2", ["7157"]);
        reference
    }

    fn make_queries() -> Vec<&'static str> {
        vec![
            "brca1 ALPHA",
            "shock protein",
            "Shock Protein",
            "kinasedomain",
            "zzz_not_present",
            "TP53",
            "",
        ]
    }

    #[test]
    fn test_resolve_all_keys_by_original_query() {
        let results = resolve_all(&make_queries(), &make_reference(), ResolveConfig::default())
            .unwrap();

        assert_eq!(results["brca1 ALPHA"], vec!["GENE:BRCA1"]);
        assert_eq!(results["shock protein"], vec!["HSP70"]);
        assert_eq!(results["Shock Protein"], vec!["HSP70", "HSP70", "HSP70"]);
        assert_eq!(results["kinasedomain"], vec!["X1"]);
        assert_eq!(results["TP53"], vec!["7157", "7157"]);
        assert!(!results.contains_key("zzz_not_present"));
        assert!(!results.contains_key(""));
    }

    #[test]
    fn test_result_order_follows_queries() {
        let results = resolve_all(&make_queries(), &make_reference(), ResolveConfig::default())
            .unwrap();
        let keys: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["brca1 ALPHA", "shock protein", "Shock Protein", "kinasedomain", "TP53"]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let reference = make_reference();
        let queries: Vec<String> = (0..500)
            .map(|i| match i % 4 {
                0 => format!("brca1-{i}"),
                1 => format!("heat shock {i}"),
                2 => format!("kinase{i}"),
                _ => format!("unknown {i}"),
            })
            .collect();

        let index = ReferenceIndex::build(&reference).unwrap();
        let parallel = MatchingEngine::with_config(
            &index,
            ResolveConfig {
                threads: 4,
                ..ResolveConfig::default()
            },
        )
        .resolve_all(&queries);
        let sequential =
            MatchingEngine::with_config(&index, ResolveConfig::sequential()).resolve_all(&queries);

        assert_eq!(parallel, sequential);
        let parallel_keys: Vec<&String> = parallel.keys().collect();
        let sequential_keys: Vec<&String> = sequential.keys().collect();
        assert_eq!(parallel_keys, sequential_keys);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let first = resolve_all(&make_queries(), &make_reference(), ResolveConfig::default())
            .unwrap();
        let second = resolve_all(&make_queries(), &make_reference(), ResolveConfig::default())
            .unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_duplicate_queries_collapse() {
        let queries = ["TP53", "brca1", "TP53"];
        let results = resolve_all(&queries, &make_reference(), ResolveConfig::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.get_index(0).unwrap().0, "TP53");
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty: [&str; 0] = [];
        let results = resolve_all(&empty, &make_reference(), ResolveConfig::default()).unwrap();
        assert!(results.is_empty());

        let results =
            resolve_all(&["tp53"], &ReferenceDictionary::new(), ResolveConfig::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_detailed_reports_strategy() {
        let index = ReferenceIndex::build(&make_reference()).unwrap();
        let engine = MatchingEngine::new(&index);
        let results = engine.resolve_all_detailed(&make_queries(), None);

        assert_eq!(results["brca1 ALPHA"].strategy, MatchStrategy::Direct);
        assert_eq!(results["shock protein"].strategy, MatchStrategy::RawExpanded);
        assert_eq!(results["Shock Protein"].strategy, MatchStrategy::ExpandedSpans);
        assert_eq!(results["kinasedomain"].strategy, MatchStrategy::PrefixSuffix);
    }

    #[test]
    fn test_progress_does_not_change_results() {
        let index = ReferenceIndex::build(&make_reference()).unwrap();
        let config = ResolveConfig {
            progress_interval: 2,
            ..ResolveConfig::sequential()
        };
        let engine = MatchingEngine::with_config(&index, config);

        let events = Mutex::new(Vec::new());
        let report = |event: ProgressEvent| events.lock().unwrap().push(event.done);
        let with_progress = engine.resolve_all_detailed(&make_queries(), Some(&report));
        let without_progress = engine.resolve_all_detailed(&make_queries(), None);

        assert_eq!(with_progress, without_progress);
        assert_eq!(events.into_inner().unwrap(), vec![2, 4, 6, 7]);
    }

    #[test]
    fn test_capacity_error_surfaces() {
        let config = ResolveConfig {
            limits: IndexLimits { max_postings: 5 },
            ..ResolveConfig::default()
        };
        let result = resolve_all(&["tp53"], &make_reference(), config);
        assert!(matches!(result, Err(IndexError::CapacityExceeded { .. })));
    }
}
