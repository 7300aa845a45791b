//! Expression tree builder.
//!
//! Turns a token sequence into a binary tree of AND/OR nodes. Parentheses
//! group; outside them, the rightmost AND at the shallowest nesting level is
//! the root, so `|` binds its neighbours before whitespace does.

use crate::error::{ParseResult, QueryError};
use crate::query::token::{tokenize, Token};
use std::fmt;

/// Boolean operator of an internal tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("AND"),
            Operator::Or => f.write_str("OR"),
        }
    }
}

/// Query expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Single normalized term
    Leaf(String),
    /// Operator applied to two exclusively owned subtrees
    Binary {
        op: Operator,
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
    /// Empty query (only ever the root)
    Empty,
}

impl QueryNode {
    pub fn leaf(word: impl Into<String>) -> Self {
        QueryNode::Leaf(word.into())
    }

    pub fn and(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Binary {
            op: Operator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Binary {
            op: Operator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryNode::Empty)
    }

    /// All leaf terms, left to right
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                QueryNode::Leaf(w) => out.push(w.as_str()),
                QueryNode::Binary { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
                QueryNode::Empty => {}
            }
        }
        out
    }

    /// Height of the tree (a leaf is 1, empty is 0)
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            match node {
                QueryNode::Leaf(_) => max = max.max(level),
                QueryNode::Binary { left, right, .. } => {
                    stack.push((left.as_ref(), level + 1));
                    stack.push((right.as_ref(), level + 1));
                }
                QueryNode::Empty => {}
            }
        }
        max
    }
}

/// Chains of thousands of terms build left-deep trees; tear them down
/// without recursing.
impl Drop for QueryNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        if let QueryNode::Binary { left, right, .. } = self {
            stack.push(std::mem::replace(left.as_mut(), QueryNode::Empty));
            stack.push(std::mem::replace(right.as_mut(), QueryNode::Empty));
        }
        while let Some(mut node) = stack.pop() {
            if let QueryNode::Binary { left, right, .. } = &mut node {
                stack.push(std::mem::replace(left.as_mut(), QueryNode::Empty));
                stack.push(std::mem::replace(right.as_mut(), QueryNode::Empty));
            }
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'a> {
            Node(&'a QueryNode),
            Text(&'static str),
        }

        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(t) => f.write_str(t)?,
                Piece::Node(QueryNode::Leaf(w)) => write!(f, "{:?}", w)?,
                Piece::Node(QueryNode::Empty) => f.write_str("<empty>")?,
                Piece::Node(QueryNode::Binary { op, left, right }) => {
                    let op = match op {
                        Operator::And => "(AND ",
                        Operator::Or => "(OR ",
                    };
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(right));
                    stack.push(Piece::Text(" "));
                    stack.push(Piece::Node(left));
                    stack.push(Piece::Text(op));
                }
            }
        }
        Ok(())
    }
}

/// Parse a query string into an expression tree.
///
/// An empty (or whitespace/punctuation-only) query yields [`QueryNode::Empty`].
pub fn parse_query(input: &str) -> ParseResult<QueryNode> {
    let tokens = tokenize(input);
    build_tree(&tokens)
}

/// Build an expression tree from an already tokenized query
pub fn build_tree(tokens: &[Token]) -> ParseResult<QueryNode> {
    if tokens.is_empty() {
        return Ok(QueryNode::Empty);
    }
    check_balance(tokens)?;
    TreeBuilder { tokens }.build(0, tokens.len())
}

/// Deepest parenthesis nesting accepted; building recurses once per level
pub const MAX_NESTING: usize = 256;

/// Validate that parentheses nest and close.
///
/// Reports the first stray `)` or, failing that, the innermost `(` left open.
fn check_balance(tokens: &[Token]) -> ParseResult<()> {
    let mut open = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => {
                open.push(i);
                if open.len() > MAX_NESTING {
                    return Err(QueryError::malformed(i, "parentheses nested too deeply"));
                }
            }
            Token::CloseParen => {
                if open.pop().is_none() {
                    return Err(QueryError::unbalanced(i));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(&pos) => Err(QueryError::unbalanced(pos)),
        None => Ok(()),
    }
}

/// Splitter over absolute token ranges `[start, end)`.
///
/// Splitting a span at its rightmost qualifying operator, then its left
/// remainder at the next one, and so on, is the same as cutting the span at
/// every qualifying operator and folding the pieces from the left. The
/// builder does the latter in one scan, so it only recurses into groups.
struct TreeBuilder<'a> {
    tokens: &'a [Token],
}

impl<'a> TreeBuilder<'a> {
    fn build(&self, mut start: usize, mut end: usize) -> ParseResult<QueryNode> {
        if start == end {
            return Err(QueryError::malformed(start, "missing operand"));
        }

        while self.is_wrapped(start, end) {
            start += 1;
            end -= 1;
            if start == end {
                return Err(QueryError::malformed(start - 1, "empty group"));
            }
        }

        if end - start == 1 {
            return match &self.tokens[start] {
                Token::Word(w) => Ok(QueryNode::Leaf(w.clone())),
                _ => Err(QueryError::malformed(start, "expected a word")),
            };
        }

        let (op, splits) = self
            .split_points(start, end)
            .ok_or_else(|| QueryError::malformed(start, "missing operator between operands"))?;

        // Checked right to left, matching the order a recursive split would
        // hit them
        for (k, &split) in splits.iter().enumerate().rev() {
            let next = splits.get(k + 1).copied().unwrap_or(end);
            if split + 1 == next {
                return Err(QueryError::malformed(split, "operator has no right operand"));
            }
        }
        if splits[0] == start {
            return Err(QueryError::malformed(start, "operator has no left operand"));
        }

        let mut node = self.build(start, splits[0])?;
        for (k, &split) in splits.iter().enumerate() {
            let next = splits.get(k + 1).copied().unwrap_or(end);
            let right = self.build(split + 1, next)?;
            node = QueryNode::Binary {
                op,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    /// True when `(` at `start` is matched by the `)` at `end - 1`
    fn is_wrapped(&self, start: usize, end: usize) -> bool {
        if self.tokens[start] != Token::OpenParen || self.tokens[end - 1] != Token::CloseParen {
            return false;
        }

        let mut depth = 0i32;
        for i in start..end {
            match self.tokens[i] {
                Token::OpenParen => depth += 1,
                Token::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return i == end - 1;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Pick the operators a span is cut at, in ascending position.
    ///
    /// Only operators at the minimal nesting depth of the span qualify.
    /// If any of those is an AND, every AND there is a cut point (the
    /// rightmost one is the root); otherwise every OR there is.
    fn split_points(&self, start: usize, end: usize) -> Option<(Operator, Vec<usize>)> {
        let mut depth = 0i32;
        let mut min_depth = i32::MAX;
        let mut ands = Vec::new();
        let mut ors = Vec::new();

        for i in start..end {
            let op = match self.tokens[i] {
                Token::OpenParen => {
                    depth += 1;
                    continue;
                }
                Token::CloseParen => {
                    depth -= 1;
                    continue;
                }
                Token::Word(_) => continue,
                Token::And => Operator::And,
                Token::Or => Operator::Or,
            };

            if depth < min_depth {
                min_depth = depth;
                ands.clear();
                ors.clear();
            }
            if depth == min_depth {
                match op {
                    Operator::And => ands.push(i),
                    Operator::Or => ors.push(i),
                }
            }
        }

        if !ands.is_empty() {
            Some((Operator::And, ands))
        } else if !ors.is_empty() {
            Some((Operator::Or, ors))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(w: &str) -> QueryNode {
        QueryNode::leaf(w)
    }

    #[test]
    fn test_single_word() {
        assert_eq!(parse_query("hello").unwrap(), leaf("hello"));
    }

    #[test]
    fn test_implicit_and() {
        assert_eq!(
            parse_query("a b").unwrap(),
            QueryNode::and(leaf("a"), leaf("b"))
        );
    }

    #[test]
    fn test_or() {
        assert_eq!(
            parse_query("a|b").unwrap(),
            QueryNode::or(leaf("a"), leaf("b"))
        );
    }

    #[test]
    fn test_group_then_and() {
        assert_eq!(
            parse_query("(a|b) c").unwrap(),
            QueryNode::and(QueryNode::or(leaf("a"), leaf("b")), leaf("c"))
        );
    }

    #[test]
    fn test_rightmost_and_is_root() {
        assert_eq!(
            parse_query("a (b|c) d").unwrap(),
            QueryNode::and(
                QueryNode::and(leaf("a"), QueryNode::or(leaf("b"), leaf("c"))),
                leaf("d")
            )
        );
    }

    #[test]
    fn test_and_selected_over_or_at_same_depth() {
        assert_eq!(
            parse_query("a b|c").unwrap(),
            QueryNode::and(leaf("a"), QueryNode::or(leaf("b"), leaf("c")))
        );
        assert_eq!(
            parse_query("a|b c").unwrap(),
            QueryNode::and(QueryNode::or(leaf("a"), leaf("b")), leaf("c"))
        );
    }

    #[test]
    fn test_or_chain_splits_rightmost() {
        assert_eq!(
            parse_query("a|b|c").unwrap(),
            QueryNode::or(QueryNode::or(leaf("a"), leaf("b")), leaf("c"))
        );
    }

    #[test]
    fn test_outer_parens_stripped() {
        assert_eq!(
            parse_query("((a|b))").unwrap(),
            QueryNode::or(leaf("a"), leaf("b"))
        );
        assert_eq!(parse_query("(((a)))").unwrap(), leaf("a"));
    }

    #[test]
    fn test_sibling_groups_not_stripped() {
        assert_eq!(
            parse_query("(a|b) (c|d)").unwrap(),
            QueryNode::and(
                QueryNode::or(leaf("a"), leaf("b")),
                QueryNode::or(leaf("c"), leaf("d"))
            )
        );
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(
            parse_query("a|(b (c|d))").unwrap(),
            QueryNode::or(
                leaf("a"),
                QueryNode::and(leaf("b"), QueryNode::or(leaf("c"), leaf("d")))
            )
        );
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query("").unwrap().is_empty());
        assert!(parse_query("   ").unwrap().is_empty());
        assert!(parse_query("?! ...").unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_open() {
        assert!(matches!(
            parse_query("(a|b"),
            Err(QueryError::UnbalancedParentheses { position: 0 })
        ));
    }

    #[test]
    fn test_unbalanced_close() {
        // "a)b" tokenizes to [a, ), AND, b]
        assert!(matches!(
            parse_query("a)b"),
            Err(QueryError::UnbalancedParentheses { position: 1 })
        ));
    }

    #[test]
    fn test_close_before_open() {
        assert!(matches!(
            parse_query(")a("),
            Err(QueryError::UnbalancedParentheses { .. })
        ));
    }

    #[test]
    fn test_dangling_or() {
        assert!(matches!(
            parse_query("a|"),
            Err(QueryError::MalformedQuery { position: 1, .. })
        ));
        assert!(matches!(
            parse_query("|a"),
            Err(QueryError::MalformedQuery { position: 0, .. })
        ));
    }

    #[test]
    fn test_lone_operator() {
        assert!(matches!(
            parse_query("|"),
            Err(QueryError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_empty_group() {
        assert!(matches!(
            parse_query("a ()"),
            Err(QueryError::MalformedQuery { .. })
        ));
        assert!(matches!(
            parse_query("()"),
            Err(QueryError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_missing_operator_in_hand_built_tokens() {
        let tokens = vec![Token::Word("a".into()), Token::Word("b".into())];
        assert!(matches!(
            build_tree(&tokens),
            Err(QueryError::MalformedQuery { position: 0, .. })
        ));
    }

    #[test]
    fn test_deterministic_shape() {
        let q = "x (y|z) w|v (a b|c)";
        assert_eq!(parse_query(q).unwrap(), parse_query(q).unwrap());
    }

    #[test]
    fn test_terms_and_depth() {
        let tree = parse_query("a (b|c) d").unwrap();
        assert_eq!(tree.terms(), vec!["a", "b", "c", "d"]);
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn test_display() {
        let tree = parse_query("(a|b) c").unwrap();
        assert_eq!(tree.to_string(), r#"(AND (OR "a" "b") "c")"#);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(parse_query("Hello").unwrap(), leaf("hello"));
    }

    #[test]
    fn test_long_chain() {
        let query = vec!["w"; 50_000].join(" ");
        let tree = parse_query(&query).unwrap();
        assert_eq!(tree.terms().len(), 50_000);
        assert_eq!(tree.depth(), 50_000);
        assert!(tree.to_string().starts_with("(AND (AND "));
    }

    #[test]
    fn test_chain_matches_nested_rightmost_split() {
        assert_eq!(
            parse_query("a b|c d (e|f)").unwrap(),
            QueryNode::and(
                QueryNode::and(
                    QueryNode::and(leaf("a"), QueryNode::or(leaf("b"), leaf("c"))),
                    leaf("d")
                ),
                QueryNode::or(leaf("e"), leaf("f"))
            )
        );
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(parse_query(&ok).unwrap(), leaf("a"));

        let deep = format!("{}a{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert!(matches!(
            parse_query(&deep),
            Err(QueryError::MalformedQuery { position, .. }) if position == MAX_NESTING
        ));
    }

    #[test]
    fn test_right_operand_error_position() {
        // "a||b" tokenizes to [a, |, |, b]
        assert!(matches!(
            parse_query("a||b"),
            Err(QueryError::MalformedQuery { position: 1, .. })
        ));
    }
}
