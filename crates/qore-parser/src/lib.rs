//! Qore Parser
//!
//! Parses Qore source text into a position-indexed Abstract Syntax Tree.
//! The grammar engine is error tolerant: every syntax and lexical error is
//! collected, and a partial tree is produced for malformed input.
//!
//! Declarations and statements are parsed by recursive descent
//! ([`parser`]), expressions by precedence climbing ([`expr_parser`]).
//! A [`ParseSession`] drives one parse at a time and owns the resulting
//! [`AstTree`] and error list; [`SessionHolder`] is a thin lifecycle wrapper
//! around a session.
//!
//! # Example
//!
//! ```
//! use qore_parser::{NodeKind, ParseSession, ParseStatus};
//!
//! let mut session = ParseSession::new();
//! let status = session.parse_string("int x = 1;");
//! assert_eq!(status, ParseStatus::Success);
//!
//! let node = session.find_node(1, 5).unwrap().unwrap();
//! assert_eq!(node.kind, NodeKind::VarDecl);
//! ```

pub mod ast;
mod declarations;
pub mod expr_parser;
pub mod holder;
pub mod options;
pub mod parser;
pub mod session;
pub mod tree;

pub use ast::{AstNode, NodeKind, NodeValue};
pub use holder::SessionHolder;
pub use options::ParseOptions;
pub use parser::{parse, Parser};
pub use qore_lexer::{Position, Range};
pub use session::{ParseSession, ParseStatus, SessionError};
pub use tree::{AstTree, TreeError};

use qore_lexer::LexerError;
use serde::Serialize;

/// How serious a diagnostic is. Every parse diagnostic is currently an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
}

/// Parser error with position information.
///
/// Covers both syntax errors and lexical errors surfaced from invalid
/// tokens.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("Parse error at line {}, column {}: {}", .range.start.line, .range.start.column, .message)]
pub struct ParseError {
    pub severity: Severity,
    pub message: String,
    pub range: Range,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            range,
        }
    }

    pub fn line(&self) -> u32 {
        self.range.start.line
    }

    pub fn column(&self) -> u32 {
        self.range.start.column
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self::new(err.message, err.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::new(
            "Expected ';', found end of input",
            Range::empty(Position::new(3, 7)),
        );
        assert_eq!(
            err.to_string(),
            "Parse error at line 3, column 7: Expected ';', found end of input"
        );
        assert_eq!((err.line(), err.column()), (3, 7));
    }

    #[test]
    fn test_from_lexer_error() {
        let lex = qore_lexer::lexical_errors("@").remove(0);
        let err = ParseError::from(lex);
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.range.start, Position::new(1, 1));
    }

    #[test]
    fn test_public_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParseSession>();
        assert_send_sync::<AstTree>();
        assert_send_sync::<ParseError>();
        assert_send_sync::<SessionHolder>();
    }
}
