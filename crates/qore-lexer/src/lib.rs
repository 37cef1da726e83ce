//! Qore Lexer
//!
//! Tokenizes Qore source text into a stream of tokens with byte spans and
//! 1-based line/column ranges. Handles keywords and built-in type names,
//! old-style `$` variables, numeric, date, string and regex literals, and
//! `%` parse directives. Comments are discarded.
//!
//! The scanner is pull-based and never fails: malformed input is returned as
//! [`TokenKind::Invalid`] tokens so the parser can report them in place.
//!
//! # Example
//!
//! ```
//! use qore_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("");
//! assert_eq!(tokens.len(), 1); // Just EOF
//! assert_eq!(tokens[0].kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{
    Keyword, Position, Range, RegexKind, RegexLiteral, Span, Token, TokenCategory, TokenKind,
};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {}, column {}: {}", .range.start.line, .range.start.column, .message)]
pub struct LexerError {
    pub message: String,
    pub range: Range,
}

impl LexerError {
    /// The error carried by an invalid token, if any.
    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Invalid(message) => Some(Self {
                message: message.clone(),
                range: token.range,
            }),
            _ => None,
        }
    }
}

/// Collect the errors of every invalid token in `source`.
pub fn lexical_errors(source: &str) -> Vec<LexerError> {
    Scanner::new(source)
        .filter_map(|token| LexerError::from_token(&token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source_has_no_lexical_errors() {
        assert!(lexical_errors("int x = 1; # fine").is_empty());
    }

    #[test]
    fn test_lexical_errors_in_order() {
        let errors = lexical_errors("a @ b\nc \"open");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].range.start, Position::new(1, 3));
        assert_eq!(errors[1].range.start, Position::new(2, 3));
        assert!(errors[1].message.contains("Unterminated string"));
    }

    #[test]
    fn test_error_display() {
        let err = lexical_errors("  @").remove(0);
        assert_eq!(
            err.to_string(),
            "Lexer error at line 1, column 3: Unexpected character: '@'"
        );
    }
}
