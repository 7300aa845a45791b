use crate::index::stats::IndexStats;
use crate::index::types::{DocId, DocTable, TermLookup};
use crate::utils::normalize_word;
use crate::utils::progress;
use ahash::RandomState;
use anyhow::{Context, Result};
use rayon::prelude::*;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// One parsed line of the docs file (computed in parallel)
struct ParsedDoc<'a> {
    name: &'a str,
    terms: Vec<String>,
}

/// Parse `<DocumentId> <word> <word> ...`; blank lines yield `None`
fn parse_doc_line(line: &str) -> Option<ParsedDoc<'_>> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let terms = fields
        .map(normalize_word)
        .filter(|t| !t.is_empty())
        .collect();
    Some(ParsedDoc { name, terms })
}

/// In-memory inverted index: normalized term -> documents containing it
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    docs: DocTable,
    postings: HashMap<String, RoaringBitmap, RandomState>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a docs file
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_progress(path, false)
    }

    /// Load a docs file, optionally showing a progress bar.
    ///
    /// Lines are tokenized and normalized in parallel, then merged in file
    /// order so doc ids follow first appearance.
    pub fn open_with_progress(path: &Path, show_progress: bool) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read docs file {}", path.display()))?;

        let lines: Vec<&str> = content.lines().collect();
        let parsed: Vec<ParsedDoc<'_>> = lines.par_iter().filter_map(|l| parse_doc_line(*l)).collect();

        let pb = progress::bar(parsed.len() as u64, show_progress, "Indexing");
        let mut index = Self::new();
        for doc in parsed {
            index.insert_terms(doc.name, doc.terms);
            pb.inc(1);
        }
        pb.finish_and_clear();

        log::info!(
            "indexed {} documents, {} terms from {}",
            index.doc_count(),
            index.term_count(),
            path.display()
        );
        Ok(index)
    }

    /// Build from any line-oriented source
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = Self::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read docs line {}", line_no + 1))?;
            if let Some(doc) = parse_doc_line(&line) {
                index.insert_terms(doc.name, doc.terms);
            }
        }
        Ok(index)
    }

    /// Add (or extend) a document with raw words; words are normalized here
    pub fn add_document<I, S>(&mut self, name: &str, words: I) -> DocId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|t| !t.is_empty());
        self.insert_terms(name, terms)
    }

    fn insert_terms(&mut self, name: &str, terms: impl IntoIterator<Item = String>) -> DocId {
        let id = self.docs.intern(name);
        for term in terms {
            self.postings.entry(term).or_default().insert(id);
        }
        id
    }

    pub fn doc_id(&self, name: &str) -> Option<DocId> {
        self.docs.id(name)
    }

    pub fn doc_name(&self, id: DocId) -> Option<&str> {
        self.docs.name(id)
    }

    /// Resolve a result set to document names in id order
    pub fn doc_names(&self, docs: &RoaringBitmap) -> Vec<&str> {
        docs.iter().filter_map(|id| self.docs.name(id)).collect()
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Iterate over `(term, postings)` in arbitrary order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &RoaringBitmap)> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats::collect(self, 10)
    }
}

impl TermLookup for InvertedIndex {
    fn postings(&self, term: &str) -> Option<&RoaringBitmap> {
        self.postings.get(term)
    }
}
