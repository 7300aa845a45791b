//! Set algebra over posting lists.
//!
//! AND intersects, OR unions; a missing term is the empty set.

use crate::index::{DocId, TermLookup};
use crate::query::parser::{Operator, QueryNode};
use roaring::RoaringBitmap;

/// Evaluates expression trees against a read-only index
pub struct QueryEvaluator<'a, I: TermLookup + ?Sized> {
    index: &'a I,
}

impl<'a, I: TermLookup + ?Sized> QueryEvaluator<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Evaluate a tree to the set of matching documents.
    ///
    /// Terms missing from the index resolve to the empty set. The left spine
    /// is walked in a loop, so long operator chains don't deepen the stack.
    pub fn evaluate(&self, node: &QueryNode) -> RoaringBitmap {
        let mut spine = Vec::new();
        let mut node = node;
        while let QueryNode::Binary { op, left, right } = node {
            spine.push((*op, right.as_ref()));
            node = left.as_ref();
        }

        let mut result = match node {
            QueryNode::Leaf(word) => self.index.postings(word).cloned().unwrap_or_default(),
            _ => RoaringBitmap::new(),
        };
        for (op, right) in spine.into_iter().rev() {
            match op {
                Operator::And => {
                    // Nothing on the right can bring documents back
                    if !result.is_empty() {
                        result &= self.evaluate(right);
                    }
                }
                Operator::Or => result |= self.evaluate(right),
            }
        }
        result
    }

    /// Evaluate and collect sorted document ids
    pub fn evaluate_ids(&self, node: &QueryNode) -> Vec<DocId> {
        self.evaluate(node).iter().collect()
    }
}
