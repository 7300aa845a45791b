pub mod inverted;
pub mod stats;
pub mod types;

pub use inverted::InvertedIndex;
pub use stats::IndexStats;
pub use types::*;
