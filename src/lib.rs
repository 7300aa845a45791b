//! # boolsearch - Boolean keyword search
//!
//! Answers queries such as `a (b|c) d` against a document collection
//! through an in-memory inverted index.
//!
//! ## Architecture
//!
//! - [`query`] - Tokenizer, expression tree builder, and evaluator
//! - [`index`] - Inverted index (normalized term -> document bitmap)
//! - [`batch`] - Queries file processing and submission output
//! - [`config`] - Runtime configuration
//! - [`output`] - Terminal formatting
//! - [`utils`] - Normalization and progress helpers
//!
//! ## Syntax
//!
//! Whitespace between operands is AND, `|` is OR, and parentheses group.
//! When both operators appear at the same nesting level the rightmost AND
//! becomes the root, so `a b|c` reads as `a AND (b OR c)`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use boolsearch::index::InvertedIndex;
//! use boolsearch::query::search;
//! use std::path::Path;
//!
//! let index = InvertedIndex::open(Path::new("docs.txt")).unwrap();
//! let docs = search("hello (world|fine)", &index).unwrap();
//! for name in index.doc_names(&docs) {
//!     println!("{}", name);
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use error::QueryError;
