//! Abstract Syntax Tree for Qore.
//!
//! Every grammar construct is an [`AstNode`]: a [`NodeKind`], a source
//! [`Range`], a kind-specific [`NodeValue`] payload and an ordered list of
//! owned children. A parent exclusively owns its children.
//!
//! Ranges obey two invariants, checked by [`crate::AstTree::check_well_formed`]:
//! a node's range encloses every child range, and siblings appear in source
//! order without overlapping.

use qore_lexer::{Range, RegexLiteral};
use serde::Serialize;
use std::fmt;

/// Node classification, one variant per grammar construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    // ---------------------------------------------------------------------
    // Top level
    // ---------------------------------------------------------------------
    /// The root of a parsed source unit.
    Script,
    /// `%name argument` parse directive.
    Directive,

    // ---------------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------------
    Namespace,
    Class,
    /// `inherits A, private B`
    InheritanceList,
    Superclass,
    /// `private { ... }` member block inside a class.
    MemberBlock,
    /// Class member variable or `hashdecl` member.
    Field,
    Method,
    /// `: Base(args)` base-class constructor call in a constructor.
    BaseConstructorCall,
    Function,
    Hashdecl,
    Constant,
    Modifier,
    ParamList,
    Param,
    Type,
    /// `my`/`our`/typed variable declaration.
    VarDecl,

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------
    Block,
    ExprStatement,
    /// `;` on its own, or an omitted `for` clause.
    Empty,
    If,
    While,
    DoWhile,
    For,
    Foreach,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Throw,
    Return,
    Break,
    Continue,
    Rethrow,
    ThreadExit,
    OnExit,
    OnSuccess,
    OnError,

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------
    IntegerLiteral,
    FloatLiteral,
    NumberLiteral,
    StringLiteral,
    DateLiteral,
    BoolLiteral,
    NothingLiteral,
    NullLiteral,
    BackquoteLiteral,
    RegexLiteral,
    ListLiteral,
    HashLiteral,
    /// `key: value` inside a hash literal.
    HashEntry,
    /// Bare or namespace-scoped name: `foo`, `Qore::Thread::Mutex`.
    Name,
    /// Old-style `$name` variable.
    Variable,
    /// Old-style `$.name` member reference.
    SelfMember,
    /// `$1`, `$2`, ...
    ImplicitArgument,
    /// `$#`
    ImplicitIndex,
    SelfExpr,
    /// Parenthesized expression.
    Paren,
    Unary,
    Postfix,
    Binary,
    Assignment,
    Ternary,
    Call,
    ArgList,
    Index,
    /// `hash{"a", "b"}` hash slice.
    Slice,
    Member,
    New,
    Cast,
    Closure,
    /// Keyword operators taking operands: `elements`, `push`, `splice`, ...
    KeywordOp,
    Map,
    Select,
    /// `foldl` / `foldr`.
    Fold,

    // ---------------------------------------------------------------------
    // Recovery
    // ---------------------------------------------------------------------
    /// Zero-width placeholder for a required construct that was absent.
    Missing,
    /// Invalid input kept in the tree (lexically invalid operand, stray
    /// modifiers).
    Error,
}

impl NodeKind {
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::Namespace
                | NodeKind::Class
                | NodeKind::Field
                | NodeKind::Method
                | NodeKind::Function
                | NodeKind::Hashdecl
                | NodeKind::Constant
                | NodeKind::VarDecl
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::IntegerLiteral
                | NodeKind::FloatLiteral
                | NodeKind::NumberLiteral
                | NodeKind::StringLiteral
                | NodeKind::DateLiteral
                | NodeKind::BoolLiteral
                | NodeKind::NothingLiteral
                | NodeKind::NullLiteral
                | NodeKind::BackquoteLiteral
                | NodeKind::RegexLiteral
        )
    }

    /// Placeholder produced by error recovery.
    pub fn is_recovery(self) -> bool {
        matches!(self, NodeKind::Missing | NodeKind::Error)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeValue {
    None,
    /// Declared or referenced name, type spelling, modifier or keyword.
    Name(String),
    /// Operator symbol of unary, binary, assignment and relational-case nodes.
    Operator(String),
    Integer(i64),
    Float(f64),
    /// Arbitrary-precision number as written.
    Number(String),
    String(String),
    /// Date literal as written.
    Date(String),
    Bool(bool),
    Regex(RegexLiteral),
    Directive { name: String, argument: String },
}

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstNode {
    pub kind: NodeKind,
    pub range: Range,
    pub value: NodeValue,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(kind: NodeKind, range: Range) -> Self {
        Self {
            kind,
            range,
            value: NodeValue::None,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: NodeValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    /// Name payload for declarations, names, types and modifiers.
    pub fn name(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Operator symbol for operator nodes.
    pub fn operator(&self) -> Option<&str> {
        match &self.value {
            NodeValue::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// First direct child of the given kind.
    pub fn child(&self, kind: NodeKind) -> Option<&AstNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Direct children of the given kind.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &AstNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Pre-order traversal of this node and all its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }

    /// Short human-readable label, e.g. `Function add` or `Binary +`.
    pub fn label(&self) -> String {
        match &self.value {
            NodeValue::None => self.kind.to_string(),
            NodeValue::Name(name) => format!("{} {name}", self.kind),
            NodeValue::Operator(op) => format!("{} {op}", self.kind),
            NodeValue::Integer(v) => format!("{} {v}", self.kind),
            NodeValue::Float(v) => format!("{} {v}", self.kind),
            NodeValue::Number(v) => format!("{} {v}n", self.kind),
            NodeValue::String(s) => format!("{} {s:?}", self.kind),
            NodeValue::Date(d) => format!("{} {d}", self.kind),
            NodeValue::Bool(b) => format!("{} {b}", self.kind),
            NodeValue::Regex(r) => format!("{} /{}/{}", self.kind, r.pattern, r.flags),
            NodeValue::Directive { name, argument } if argument.is_empty() => {
                format!("{} %{name}", self.kind)
            }
            NodeValue::Directive { name, argument } => {
                format!("{} %{name} {argument}", self.kind)
            }
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct Walk<'a> {
    stack: Vec<&'a AstNode>,
}

impl Walk<'_> {
    pub(crate) fn empty() -> Self {
        Walk { stack: Vec::new() }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<&'a AstNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
