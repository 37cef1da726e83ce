//! Owned syntax tree with position lookup.
//!
//! Lookup descends from the root, binary-searching each node's children by
//! start position. Children are sorted and disjoint, so at most one child
//! can contain a given point and the search is `O(depth * log(fan-out))`.

use crate::ast::{AstNode, NodeKind, Walk};
use qore_lexer::{Position, Range};
use serde::Serialize;

/// A violated range invariant, reported by [`AstTree::check_well_formed`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("{kind} node has inverted range {range}")]
    InvertedRange { kind: NodeKind, range: Range },

    #[error("{child} child at {child_range} escapes {parent} parent at {parent_range}")]
    ChildOutsideParent {
        parent: NodeKind,
        parent_range: Range,
        child: NodeKind,
        child_range: Range,
    },

    #[error("{first} at {first_range} overlaps or follows sibling {second} at {second_range}")]
    SiblingOrder {
        first: NodeKind,
        first_range: Range,
        second: NodeKind,
        second_range: Range,
    },
}

/// The result of a parse: zero or one root node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AstTree {
    root: Option<AstNode>,
}

impl AstTree {
    pub fn new(root: AstNode) -> Self {
        Self { root: Some(root) }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&AstNode> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<AstNode> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, AstNode::subtree_len)
    }

    /// Pre-order traversal of every node.
    pub fn walk(&self) -> Walk<'_> {
        match &self.root {
            Some(root) => root.walk(),
            None => Walk::empty(),
        }
    }

    /// Deepest node whose range contains `line:column`.
    pub fn find_node(&self, line: u32, column: u32) -> Option<&AstNode> {
        self.find_at(Position::new(line, column))
    }

    /// Deepest node whose range contains `pos`.
    pub fn find_at(&self, pos: Position) -> Option<&AstNode> {
        self.ancestors_at(pos).pop()
    }

    /// Path from the root to the deepest node containing `pos`.
    ///
    /// Empty when `pos` lies outside the root. The last element is the node
    /// [`find_at`](Self::find_at) returns; the one before it is its parent.
    pub fn ancestors_at(&self, pos: Position) -> Vec<&AstNode> {
        let mut path = Vec::new();
        let Some(mut node) = self.root.as_ref() else {
            return path;
        };
        if !node.range.contains(pos) {
            return path;
        }
        loop {
            path.push(node);
            match child_containing(node, pos) {
                Some(child) => node = child,
                None => return path,
            }
        }
    }

    /// Verify that every node's range encloses its children and that
    /// siblings are ordered and disjoint.
    pub fn check_well_formed(&self) -> Result<(), TreeError> {
        self.walk().try_for_each(check_node)
    }
}

fn child_containing(node: &AstNode, pos: Position) -> Option<&AstNode> {
    // Last child starting at or before `pos`; among equal starts a zero-width
    // child sorts first, so the non-empty one wins.
    let idx = node.children.partition_point(|c| c.range.start <= pos);
    let candidate = node.children.get(idx.checked_sub(1)?)?;
    candidate.range.contains(pos).then_some(candidate)
}

fn check_node(node: &AstNode) -> Result<(), TreeError> {
    if node.range.start > node.range.end {
        return Err(TreeError::InvertedRange {
            kind: node.kind,
            range: node.range,
        });
    }
    for child in &node.children {
        if !node.range.encloses(&child.range) {
            return Err(TreeError::ChildOutsideParent {
                parent: node.kind,
                parent_range: node.range,
                child: child.kind,
                child_range: child.range,
            });
        }
    }
    for pair in node.children.windows(2) {
        if pair[0].range.end > pair[1].range.start {
            return Err(TreeError::SiblingOrder {
                first: pair[0].kind,
                first_range: pair[0].range,
                second: pair[1].kind,
                second_range: pair[1].range,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeValue;
    use pretty_assertions::assert_eq;

    fn node(kind: NodeKind, (l1, c1): (u32, u32), (l2, c2): (u32, u32)) -> AstNode {
        AstNode::new(
            kind,
            Range::new(Position::new(l1, c1), Position::new(l2, c2)),
        )
    }

    /// `x = 1;` on line 1, then `y;` on line 2.
    fn sample() -> AstTree {
        let assign = node(NodeKind::Assignment, (1, 1), (1, 6))
            .with_value(NodeValue::Operator("=".into()))
            .with_children(vec![
                node(NodeKind::Name, (1, 1), (1, 2)),
                node(NodeKind::IntegerLiteral, (1, 5), (1, 6)),
            ]);
        let first = node(NodeKind::ExprStatement, (1, 1), (1, 7)).with_children(vec![assign]);
        let second = node(NodeKind::ExprStatement, (2, 1), (2, 3))
            .with_children(vec![node(NodeKind::Name, (2, 1), (2, 2))]);
        AstTree::new(node(NodeKind::Script, (1, 1), (2, 3)).with_children(vec![first, second]))
    }

    // =====================================================================
    // Lookup
    // =====================================================================

    #[test]
    fn test_find_deepest_node() {
        let tree = sample();
        assert_eq!(tree.find_node(1, 1).map(|n| n.kind), Some(NodeKind::Name));
        assert_eq!(
            tree.find_node(1, 5).map(|n| n.kind),
            Some(NodeKind::IntegerLiteral)
        );
        assert_eq!(tree.find_node(2, 1).map(|n| n.kind), Some(NodeKind::Name));
    }

    #[test]
    fn test_find_between_children_returns_parent() {
        let tree = sample();
        // The `=` sign lies inside the assignment but outside both operands.
        assert_eq!(
            tree.find_node(1, 3).map(|n| n.kind),
            Some(NodeKind::Assignment)
        );
        // The `;` belongs to the statement only.
        assert_eq!(
            tree.find_node(1, 6).map(|n| n.kind),
            Some(NodeKind::ExprStatement)
        );
    }

    #[test]
    fn test_find_outside_root() {
        let tree = sample();
        assert!(tree.find_node(3, 1).is_none());
        assert!(tree.find_node(2, 3).is_none());
        assert!(AstTree::empty().find_node(1, 1).is_none());
    }

    #[test]
    fn test_find_in_gap_between_statements() {
        let tree = sample();
        assert_eq!(tree.find_node(1, 9).map(|n| n.kind), Some(NodeKind::Script));
    }

    #[test]
    fn test_zero_width_child_is_never_found() {
        let root = node(NodeKind::VarDecl, (1, 1), (1, 10)).with_children(vec![
            node(NodeKind::Type, (1, 1), (1, 4)),
            node(NodeKind::Missing, (1, 8), (1, 8)),
        ]);
        let tree = AstTree::new(root);
        assert_eq!(tree.find_node(1, 8).map(|n| n.kind), Some(NodeKind::VarDecl));
    }

    #[test]
    fn test_ancestors_path() {
        let tree = sample();
        let path: Vec<_> = tree
            .ancestors_at(Position::new(1, 5))
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            path,
            vec![
                NodeKind::Script,
                NodeKind::ExprStatement,
                NodeKind::Assignment,
                NodeKind::IntegerLiteral,
            ]
        );
    }

    // =====================================================================
    // Shape
    // =====================================================================

    #[test]
    fn test_len_and_walk() {
        let tree = sample();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.walk().count(), 7);
        assert_eq!(AstTree::empty().len(), 0);
        assert_eq!(AstTree::empty().walk().count(), 0);
    }

    #[test]
    fn test_well_formed_sample() {
        assert_eq!(sample().check_well_formed(), Ok(()));
    }

    #[test]
    fn test_detects_child_outside_parent() {
        let root = node(NodeKind::Block, (1, 1), (1, 5))
            .with_children(vec![node(NodeKind::Name, (1, 3), (1, 9))]);
        let err = AstTree::new(root).check_well_formed().unwrap_err();
        assert!(matches!(err, TreeError::ChildOutsideParent { .. }));
    }

    #[test]
    fn test_detects_overlapping_siblings() {
        let root = node(NodeKind::Block, (1, 1), (1, 9)).with_children(vec![
            node(NodeKind::Name, (1, 1), (1, 5)),
            node(NodeKind::Name, (1, 4), (1, 6)),
        ]);
        let err = AstTree::new(root).check_well_formed().unwrap_err();
        assert!(matches!(err, TreeError::SiblingOrder { .. }));
    }
}
