use thiserror::Error;

/// Errors raised while turning a query string into an expression tree.
///
/// Positions are token indices into the sequence produced by
/// [`tokenize`](crate::query::tokenize), not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unbalanced parentheses at token {position}")]
    UnbalancedParentheses { position: usize },

    #[error("malformed query at token {position}: {reason}")]
    MalformedQuery { position: usize, reason: &'static str },
}

impl QueryError {
    pub fn unbalanced(position: usize) -> Self {
        QueryError::UnbalancedParentheses { position }
    }

    pub fn malformed(position: usize, reason: &'static str) -> Self {
        QueryError::MalformedQuery { position, reason }
    }
}

pub type ParseResult<T> = std::result::Result<T, QueryError>;
