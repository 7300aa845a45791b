use crate::index::inverted::InvertedIndex;
use serde::{Deserialize, Serialize};

/// Summary numbers for a loaded index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub doc_count: usize,
    pub term_count: usize,
    pub total_postings: u64,
    /// Most frequent terms by document frequency, descending
    pub top_terms: Vec<(String, u64)>,
}

impl IndexStats {
    pub fn collect(index: &InvertedIndex, top: usize) -> Self {
        let mut total_postings = 0;
        let mut terms: Vec<(String, u64)> = index
            .terms()
            .map(|(term, postings)| {
                total_postings += postings.len();
                (term.to_string(), postings.len())
            })
            .collect();

        // Ties broken by term so output is stable
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(top);

        Self {
            doc_count: index.doc_count(),
            term_count: index.term_count(),
            total_postings,
            top_terms: terms,
        }
    }

    /// Print in a human-readable layout
    pub fn print(&self) {
        println!("Index Statistics");
        println!("================");
        println!();
        println!("Document count:   {}", self.doc_count);
        println!("Term count:       {}", self.term_count);
        println!("Total postings:   {}", self.total_postings);
        if self.doc_count > 0 {
            println!(
                "Avg terms/doc:    {:.1}",
                self.total_postings as f64 / self.doc_count as f64
            );
        }

        if !self.top_terms.is_empty() {
            println!();
            println!("Most frequent terms:");
            for (term, df) in &self.top_terms {
                println!("  {:20} {}", term, df);
            }
        }
    }
}
