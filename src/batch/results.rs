use crate::batch::queries::QueryId;
use crate::index::InvertedIndex;
use ahash::RandomState;
use anyhow::{Context, Result};
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// One row of the objects file; columns are matched by header name
#[derive(Debug, Deserialize)]
struct ObjectRow {
    #[serde(rename = "ObjectId")]
    object_id: String,
    #[serde(rename = "QueryId")]
    query_id: QueryId,
    #[serde(rename = "DocumentId")]
    document_id: String,
}

/// Result sets of a batch run, keyed by query id
#[derive(Debug, Default, Clone)]
pub struct SearchResults {
    by_query: HashMap<QueryId, RoaringBitmap, RandomState>,
}

/// Counts reported after writing a submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionSummary {
    pub rows: usize,
    pub relevant: usize,
    /// Objects naming a document the index has never seen
    pub unknown_docs: usize,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query's result; a repeated id unions with the earlier result
    pub fn add(&mut self, id: QueryId, docs: RoaringBitmap) {
        *self.by_query.entry(id).or_default() |= docs;
    }

    pub fn get(&self, id: QueryId) -> Option<&RoaringBitmap> {
        self.by_query.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_query.is_empty()
    }

    /// Whether document `doc_name` matched query `id`
    pub fn is_relevant(&self, id: QueryId, doc_name: &str, index: &InvertedIndex) -> bool {
        match (self.by_query.get(&id), index.doc_id(doc_name)) {
            (Some(docs), Some(doc)) => docs.contains(doc),
            _ => false,
        }
    }

    /// Turn an objects CSV (header with `ObjectId`, `QueryId`, `DocumentId`
    /// in any order) into a submission CSV (`ObjectId,Relevance`).
    pub fn write_submission<R: Read, W: Write>(
        &self,
        objects: R,
        out: W,
        index: &InvertedIndex,
    ) -> Result<SubmissionSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(objects);
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["ObjectId", "Relevance"])?;

        let mut summary = SubmissionSummary::default();
        for (i, row) in reader.deserialize::<ObjectRow>().enumerate() {
            let row = row.with_context(|| format!("objects record {}", i + 1))?;

            if index.doc_id(&row.document_id).is_none() {
                summary.unknown_docs += 1;
            }
            let relevant = self.is_relevant(row.query_id, &row.document_id, index);
            writer.write_record([row.object_id.as_str(), if relevant { "1" } else { "0" }])?;

            summary.rows += 1;
            if relevant {
                summary.relevant += 1;
            }
        }

        writer.flush()?;
        Ok(summary)
    }

    /// File-based wrapper around [`write_submission`](Self::write_submission)
    pub fn write_submission_file(
        &self,
        objects_path: &Path,
        submission_path: &Path,
        index: &InvertedIndex,
    ) -> Result<SubmissionSummary> {
        let objects = File::open(objects_path)
            .with_context(|| format!("Failed to open objects file {}", objects_path.display()))?;
        let out = File::create(submission_path).with_context(|| {
            format!("Failed to create submission file {}", submission_path.display())
        })?;

        let summary = self
            .write_submission(objects, out, index)
            .with_context(|| format!("Failed to write submission from {}", objects_path.display()))?;

        if summary.unknown_docs > 0 {
            log::warn!(
                "{} objects reference documents missing from the index",
                summary.unknown_docs
            );
        }
        Ok(summary)
    }
}
