//! Parse session: runs parses and owns their results.
//!
//! A session holds the tree and error list of its most recent parse. Each
//! new parse replaces both. The tree can be moved out once with
//! [`ParseSession::release_tree`]; afterwards position lookups report
//! [`SessionError::TreeReleased`].

use crate::ast::AstNode;
use crate::options::ParseOptions;
use crate::parser::parse;
use crate::tree::AstTree;
use crate::ParseError;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Misuse of a session, or a source that could not be read.
///
/// Syntax and lexical errors are never reported here; they land in the
/// session's error list.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A query was made before anything was parsed.
    #[error("nothing has been parsed yet")]
    NotParsed,

    /// The tree was already moved out of the session.
    #[error("the syntax tree has been released")]
    TreeReleased,

    #[error("error index {index} out of range ({count} errors)")]
    ErrorIndexOutOfRange { index: usize, count: usize },

    /// Failed to read a source file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// No errors were recorded.
    Success,
    /// At least one error was recorded; a partial tree may still exist.
    Failed,
}

#[derive(Debug, Default)]
enum TreeSlot {
    #[default]
    NotParsed,
    Present(AstTree),
    Released,
}

/// Drives parses and keeps the latest tree and errors.
#[derive(Debug, Default)]
pub struct ParseSession {
    options: ParseOptions,
    tree: TreeSlot,
    errors: Vec<ParseError>,
}

impl ParseSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse in-memory source text.
    pub fn parse_string(&mut self, source: &str) -> ParseStatus {
        let name = self.options.source_name.clone();
        self.run(source, &name)
    }

    /// Parse raw bytes.
    ///
    /// Invalid UTF-8 sequences become U+FFFD and are not parse errors;
    /// positions then refer to the decoded text.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> ParseStatus {
        let name = self.options.source_name.clone();
        let source = decode(bytes, &name);
        self.run(&source, &name)
    }

    /// Read and parse a file.
    ///
    /// A read failure leaves the previous results untouched.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ParseStatus, SessionError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SessionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path.display().to_string();
        let source = decode(&bytes, &name);
        Ok(self.run(&source, &name))
    }

    fn run(&mut self, source: &str, name: &str) -> ParseStatus {
        let (tree, errors) = parse(source, &self.options);
        tracing::debug!(
            source = name,
            bytes = source.len(),
            nodes = tree.len(),
            errors = errors.len(),
            "parsed"
        );
        self.tree = TreeSlot::Present(tree);
        self.errors = errors;
        self.status()
    }

    fn status(&self) -> ParseStatus {
        if self.errors.is_empty() {
            ParseStatus::Success
        } else {
            ParseStatus::Failed
        }
    }

    /// Tree of the latest parse; `None` before parsing or after release.
    pub fn tree(&self) -> Option<&AstTree> {
        match &self.tree {
            TreeSlot::Present(tree) => Some(tree),
            TreeSlot::NotParsed | TreeSlot::Released => None,
        }
    }

    /// Move the tree out of the session. Returns `None` if there is no tree
    /// to release.
    pub fn release_tree(&mut self) -> Option<AstTree> {
        match std::mem::take(&mut self.tree) {
            TreeSlot::Present(tree) => {
                self.tree = TreeSlot::Released;
                Some(tree)
            }
            other => {
                self.tree = other;
                None
            }
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn error(&self, index: usize) -> Result<&ParseError, SessionError> {
        self.errors
            .get(index)
            .ok_or(SessionError::ErrorIndexOutOfRange {
                index,
                count: self.errors.len(),
            })
    }

    /// Errors of the latest parse, in source order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Deepest node at `line:column` in the latest tree.
    pub fn find_node(&self, line: u32, column: u32) -> Result<Option<&AstNode>, SessionError> {
        match &self.tree {
            TreeSlot::Present(tree) => Ok(tree.find_node(line, column)),
            TreeSlot::NotParsed => Err(SessionError::NotParsed),
            TreeSlot::Released => Err(SessionError::TreeReleased),
        }
    }
}

fn decode<'b>(bytes: &'b [u8], name: &str) -> Cow<'b, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        tracing::warn!(source = name, "invalid UTF-8 replaced with U+FFFD");
    }
    text
}
