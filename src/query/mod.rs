//! Boolean query pipeline: tokenize, build the expression tree, evaluate.
//!
//! ```
//! use boolsearch::index::InvertedIndex;
//! use boolsearch::query::search;
//!
//! let mut index = InvertedIndex::new();
//! index.add_document("d1", ["rust", "search"]);
//! index.add_document("d2", ["rust", "index"]);
//!
//! let docs = search("rust (search|index)", &index).unwrap();
//! assert_eq!(index.doc_names(&docs), vec!["d1", "d2"]);
//! ```

pub mod evaluator;
pub mod parser;
pub mod token;

pub use evaluator::QueryEvaluator;
pub use parser::{build_tree, parse_query, Operator, QueryNode};
pub use token::{render_tokens, tokenize, Token};

use crate::error::ParseResult;
use crate::index::TermLookup;
use roaring::RoaringBitmap;

/// Parse and evaluate a query in one step
pub fn search<I: TermLookup + ?Sized>(query: &str, index: &I) -> ParseResult<RoaringBitmap> {
    let tree = parse_query(query)?;
    Ok(QueryEvaluator::new(index).evaluate(&tree))
}
