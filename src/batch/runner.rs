use crate::batch::queries::QueryRecord;
use crate::batch::results::SearchResults;
use crate::config::ErrorPolicy;
use crate::error::ParseResult;
use crate::index::InvertedIndex;
use crate::query::{parse_query, QueryEvaluator};
use crate::utils::progress;
use anyhow::{Context, Result};
use rayon::prelude::*;
use roaring::RoaringBitmap;
use serde::Serialize;

/// Counts for a finished batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub queries: usize,
    /// Queries that failed to parse (only non-zero under `ErrorPolicy::Skip`)
    pub failed: usize,
    /// Queries that matched no documents, failures included
    pub empty: usize,
}

/// Evaluates a list of queries against one index in parallel
pub struct BatchRunner {
    policy: ErrorPolicy,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run all queries.
    ///
    /// Each query is parsed and evaluated independently; the index is only
    /// read. Errors are applied in input order, so `Abort` reports the first
    /// failing query of the file.
    pub fn run(
        &self,
        index: &InvertedIndex,
        queries: &[QueryRecord],
    ) -> Result<(SearchResults, BatchSummary)> {
        let pb = progress::bar(queries.len() as u64, self.show_progress, "Searching");
        let evaluator = QueryEvaluator::new(index);

        let outcomes: Vec<ParseResult<RoaringBitmap>> = queries
            .par_iter()
            .map(|q| {
                let outcome = parse_query(&q.text).map(|tree| {
                    log::debug!("query {}: {}", q.id, tree);
                    let docs = evaluator.evaluate(&tree);
                    log::debug!("query {}: {} documents", q.id, docs.len());
                    docs
                });
                pb.inc(1);
                outcome
            })
            .collect();
        pb.finish_and_clear();

        let mut results = SearchResults::new();
        let mut summary = BatchSummary {
            queries: queries.len(),
            ..Default::default()
        };

        for (query, outcome) in queries.iter().zip(outcomes) {
            let docs = match outcome {
                Ok(docs) => docs,
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        return Err(e)
                            .with_context(|| format!("query {} {:?}", query.id, query.text));
                    }
                    ErrorPolicy::Skip => {
                        log::warn!("skipping query {} {:?}: {}", query.id, query.text, e);
                        summary.failed += 1;
                        RoaringBitmap::new()
                    }
                },
            };

            if docs.is_empty() {
                summary.empty += 1;
            }
            results.add(query.id, docs);
        }

        log::info!(
            "evaluated {} queries ({} failed, {} empty)",
            summary.queries,
            summary.failed,
            summary.empty
        );
        Ok((results, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    fn index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document("d1", ["a", "b"]);
        index.add_document("d2", ["b", "c"]);
        index.add_document("d3", ["c"]);
        index
    }

    fn record(id: u32, text: &str) -> QueryRecord {
        QueryRecord {
            id,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_run() {
        let index = index();
        let queries = vec![record(1, "a b"), record(2, "a|c"), record(3, "zzz")];
        let (results, summary) = BatchRunner::new(ErrorPolicy::Skip).run(&index, &queries).unwrap();

        assert_eq!(index.doc_names(results.get(1).unwrap()), vec!["d1"]);
        assert_eq!(index.doc_names(results.get(2).unwrap()), vec!["d1", "d2", "d3"]);
        assert!(results.get(3).unwrap().is_empty());
        assert_eq!(summary, BatchSummary { queries: 3, failed: 0, empty: 1 });
    }

    #[test]
    fn test_skip_policy() {
        let queries = vec![record(1, "(a|b"), record(2, "c")];
        let (results, summary) = BatchRunner::new(ErrorPolicy::Skip).run(&index(), &queries).unwrap();

        assert!(results.get(1).unwrap().is_empty());
        assert_eq!(results.get(2).unwrap().len(), 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.empty, 1);
    }

    #[test]
    fn test_abort_policy() {
        let queries = vec![record(1, "c"), record(7, "a|"), record(8, ")")];
        let err = BatchRunner::new(ErrorPolicy::Abort).run(&index(), &queries).unwrap_err();

        assert!(err.to_string().contains("query 7"));
        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_long_query_on_worker_threads() {
        let long = vec!["b"; 50_000].join(" ");
        let grouped = format!("{} (a|c)", vec!["b"; 50_000].join(" "));
        let queries = vec![record(1, &long), record(2, &grouped), record(3, "c")];
        let (results, summary) = BatchRunner::new(ErrorPolicy::Abort).run(&index(), &queries).unwrap();

        let index = index();
        assert_eq!(index.doc_names(results.get(1).unwrap()), vec!["d1", "d2"]);
        assert_eq!(index.doc_names(results.get(2).unwrap()), vec!["d1", "d2"]);
        assert_eq!(summary, BatchSummary { queries: 3, failed: 0, empty: 0 });
    }
}
