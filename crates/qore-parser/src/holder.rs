//! Lifecycle wrapper owning a single [`ParseSession`].

use crate::ast::AstNode;
use crate::options::ParseOptions;
use crate::session::{ParseSession, ParseStatus, SessionError};
use crate::tree::AstTree;
use crate::ParseError;
use std::path::Path;

/// Owns one session for its whole life and forwards every call to it.
#[derive(Debug, Default)]
pub struct SessionHolder {
    session: ParseSession,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            session: ParseSession::with_options(options),
        }
    }

    pub fn session(&self) -> &ParseSession {
        &self.session
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ParseStatus, SessionError> {
        self.session.parse_file(path)
    }

    pub fn parse_string(&mut self, source: &str) -> ParseStatus {
        self.session.parse_string(source)
    }

    pub fn find_node(&self, line: u32, column: u32) -> Result<Option<&AstNode>, SessionError> {
        self.session.find_node(line, column)
    }

    pub fn tree(&self) -> Option<&AstTree> {
        self.session.tree()
    }

    pub fn release_tree(&mut self) -> Option<AstTree> {
        self.session.release_tree()
    }

    pub fn error_count(&self) -> usize {
        self.session.error_count()
    }

    pub fn error(&self, index: usize) -> Result<&ParseError, SessionError> {
        self.session.error(index)
    }
}

impl Drop for SessionHolder {
    fn drop(&mut self) {
        tracing::trace!(
            tree_held = self.session.tree().is_some(),
            "dropping parse session"
        );
    }
}
