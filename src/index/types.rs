use ahash::RandomState;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Dense internal identifier for a document in the index
pub type DocId = u32;

/// Read-only term lookup used by the query evaluator
pub trait TermLookup {
    /// Postings for an already normalized term, `None` when absent
    fn postings(&self, term: &str) -> Option<&RoaringBitmap>;
}

impl<S: BuildHasher> TermLookup for HashMap<String, RoaringBitmap, S> {
    fn postings(&self, term: &str) -> Option<&RoaringBitmap> {
        self.get(term)
    }
}

/// Bidirectional mapping between external document names and [`DocId`]s.
///
/// Ids are assigned in first-seen order starting at zero.
#[derive(Debug, Default, Clone)]
pub struct DocTable {
    names: Vec<String>,
    ids: HashMap<String, DocId, RandomState>,
}

impl DocTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, assigning a new one if unseen
    pub fn intern(&mut self, name: &str) -> DocId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as DocId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<DocId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: DocId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
