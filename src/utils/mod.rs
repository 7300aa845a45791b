//! Utility functions shared by the index and the query pipeline.
//!
//! ## Modules
//!
//! - [`normalize`] - Term normalization (case folding, punctuation stripping)
//! - [`progress`] - Progress bars that compile away without the `progress` feature

pub mod normalize;
pub mod progress;

pub use normalize::*;
