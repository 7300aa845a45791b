//! Query tokenizer.
//!
//! Splits a query into words, parentheses, `|`, and implicit AND markers.
//! Words are normalized exactly like index terms.

use crate::utils::{normalize_query, normalize_word};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A word, or a single operator/grouping character.
static RAW_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\s()|]+|[()|]").expect("valid token regex"));

/// Atomic lexical unit of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Normalized query term
    Word(String),
    OpenParen,
    CloseParen,
    /// Explicit `|`
    Or,
    /// Implicit conjunction between adjacent operands
    And,
}

impl Token {
    /// Token may end an operand: a word or `)`
    fn ends_operand(&self) -> bool {
        matches!(self, Token::Word(_) | Token::CloseParen)
    }

    /// Token may start an operand: a word or `(`
    fn starts_operand(&self) -> bool {
        matches!(self, Token::Word(_) | Token::OpenParen)
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Token::And | Token::Or)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => f.write_str(w),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Or => f.write_str("|"),
            Token::And => f.write_str(" "),
        }
    }
}

/// Tokenize a raw query string.
///
/// Never fails. Punctuation-only words vanish, and an AND marker is placed
/// between every pair of adjacent operands.
pub fn tokenize(query: &str) -> Vec<Token> {
    let normalized = normalize_query(query);
    let mut tokens: Vec<Token> = Vec::new();

    for m in RAW_TOKEN.find_iter(&normalized) {
        let token = match m.as_str() {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            "|" => Token::Or,
            word => {
                let word = normalize_word(word);
                if word.is_empty() {
                    continue;
                }
                Token::Word(word)
            }
        };

        if token.starts_operand() && tokens.last().is_some_and(Token::ends_operand) {
            tokens.push(Token::And);
        }
        tokens.push(token);
    }

    tokens
}

/// Render tokens back to their surface form
pub fn render_tokens(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str) -> Token {
        Token::Word(w.to_string())
    }

    #[test]
    fn test_hello_world_fine() {
        let tokens = tokenize("hello (world|fine)");
        assert_eq!(
            render_tokens(&tokens),
            vec!["hello", " ", "(", "world", "|", "fine", ")"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(
            tokenize("  Foo   BAR "),
            vec![word("foo"), Token::And, word("bar")]
        );
    }

    #[test]
    fn test_spaces_around_or_ignored() {
        assert_eq!(
            tokenize("a | b"),
            vec![word("a"), Token::Or, word("b")]
        );
    }

    #[test]
    fn test_spaces_inside_parens_ignored() {
        assert_eq!(
            tokenize("( a|b ) c"),
            vec![
                Token::OpenParen,
                word("a"),
                Token::Or,
                word("b"),
                Token::CloseParen,
                Token::And,
                word("c"),
            ]
        );
    }

    #[test]
    fn test_adjacent_groups_get_and() {
        assert_eq!(
            tokenize("(a)(b)"),
            vec![
                Token::OpenParen,
                word("a"),
                Token::CloseParen,
                Token::And,
                Token::OpenParen,
                word("b"),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(
            tokenize("hello, world!"),
            vec![word("hello"), Token::And, word("world")]
        );
        assert_eq!(tokenize("don't"), vec![word("dont")]);
    }

    #[test]
    fn test_punctuation_only_word_dropped() {
        assert_eq!(
            tokenize("a - b"),
            vec![word("a"), Token::And, word("b")]
        );
    }

    #[test]
    fn test_operators_kept_verbatim() {
        assert_eq!(
            tokenize("|)("),
            vec![Token::Or, Token::CloseParen, Token::And, Token::OpenParen]
        );
    }
}
