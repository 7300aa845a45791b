//! Batch processing: queries file in, submission file out.
//!
//! - [`queries`] - Reading `<QueryId>\t<query>` files
//! - [`runner`] - Parallel evaluation with a per-query error policy
//! - [`results`] - Per-query result sets and submission CSV output

pub mod queries;
pub mod results;
pub mod runner;

pub use queries::{parse_queries, read_queries, QueryRecord};
pub use results::{SearchResults, SubmissionSummary};
pub use runner::{BatchRunner, BatchSummary};
