//! Qore grammar engine.
//!
//! Recursive descent over a pulled token stream. Declarations live in
//! `declarations.rs`, expressions in [`crate::expr_parser`]; this module
//! holds the token cursor, error recovery and statements.
//!
//! Recovery works in two layers. A failed expectation records one error and
//! sets the `recovering` flag, which silences further syntax errors until
//! a statement boundary (`;` or a brace) is consumed. The statement loops then
//! call [`Parser::synchronize`], which skips tokens up to a point where
//! parsing can resume.

use crate::ast::{AstNode, NodeKind, NodeValue};
use crate::options::ParseOptions;
use crate::tree::AstTree;
use crate::ParseError;
use qore_lexer::{Keyword, LexerError, Position, Range, Scanner, Token, TokenKind};
use std::collections::VecDeque;

/// Parse `source` into a tree, collecting every lexical and syntax error.
///
/// Never fails: malformed input yields a partial tree alongside the errors.
/// Source consisting only of whitespace and comments yields an empty tree.
pub fn parse(source: &str, options: &ParseOptions) -> (AstTree, Vec<ParseError>) {
    Parser::new(source, options).parse_script()
}

/// Start of a node under construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Marker {
    start: Position,
    consumed: usize,
}

/// Where a statement sequence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminator {
    /// Top level: runs to end of input; a stray `}` is an error.
    EndOfInput,
    /// Block or declaration body closed by `}`.
    Brace,
    /// Statements of a `case`/`default` arm.
    CaseArm,
}

/// Qore parser.
///
/// Owns the scanner for the duration of one parse and pulls tokens on
/// demand through a small lookahead buffer.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    ahead: VecDeque<Token>,
    start_line: u32,
    /// End of the last consumed token.
    prev_end: Position,
    consumed: usize,
    errors: Vec<ParseError>,
    recovering: bool,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        let start_line = options.start_line.max(1);
        let mut scanner = Scanner::with_start_line(source, start_line);
        let current = scanner.next_token();
        Self {
            scanner,
            current,
            ahead: VecDeque::new(),
            start_line,
            prev_end: Position::new(start_line, 1),
            consumed: 0,
            errors: Vec::new(),
            recovering: false,
            depth: 0,
            max_depth: options.max_nesting_depth.max(1),
        }
    }

    /// Parse the whole source unit.
    pub fn parse_script(mut self) -> (AstTree, Vec<ParseError>) {
        if self.is_at_end() {
            return (AstTree::empty(), self.errors);
        }
        let items = self.parse_sequence(Terminator::EndOfInput, Self::parse_statement);
        let range = Range::new(
            Position::new(self.start_line, 1),
            self.current.range.start,
        );
        let root = AstNode::new(NodeKind::Script, range).with_children(items);
        (AstTree::new(root), self.errors)
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    pub(crate) fn kind(&self) -> &TokenKind {
        &self.current.kind
    }

    pub(crate) fn current_keyword(&self) -> Option<Keyword> {
        match self.current.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Kind of the token `n` positions ahead; `0` is the current token.
    pub(crate) fn nth_kind(&mut self, n: usize) -> &TokenKind {
        if n == 0 {
            return &self.current.kind;
        }
        while self.ahead.len() < n {
            let token = self.scanner.next_token();
            self.ahead.push_back(token);
        }
        &self.ahead[n - 1].kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current.is_eof()
    }

    /// Whether the current token has the same kind as `kind`, ignoring
    /// any carried data.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_keyword(&self, kw: Keyword) -> bool {
        self.current.kind.is_keyword(kw)
    }

    /// Consume the current token and return it. Invalid tokens are
    /// reported as lexical errors here. End of input is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        if self.is_at_end() {
            return self.current.clone();
        }
        let next = match self.ahead.pop_front() {
            Some(token) => token,
            None => self.scanner.next_token(),
        };
        let token = std::mem::replace(&mut self.current, next);
        self.prev_end = token.range.end;
        self.consumed += 1;
        if let Some(err) = LexerError::from_token(&token) {
            self.push_error(err.into());
            self.recovering = true;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or report it missing.
    ///
    /// Consuming `;` or a brace ends recovery; other tokens leave it in force.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> bool {
        if self.eat(kind) {
            if matches!(
                kind,
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace
            ) {
                self.recovering = false;
            }
            true
        } else {
            self.error_expected(&kind.describe());
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> bool {
        if self.eat_keyword(kw) {
            true
        } else {
            self.error_expected(&format!("'{kw}'"));
            false
        }
    }

    /// Consume the closing delimiter of a comma-separated list.
    pub(crate) fn expect_closing(&mut self, kind: &TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_expected(what);
            false
        }
    }

    /// Consume one `>` closing a type argument list, splitting `>>`.
    pub(crate) fn eat_closing_angle(&mut self) -> bool {
        match self.current.kind {
            TokenKind::Gt => {
                self.advance();
                true
            }
            TokenKind::Shr => {
                let start = self.current.range.start;
                let split = Position::new(start.line, start.column + 1);
                self.prev_end = split;
                self.consumed += 1;
                self.current.kind = TokenKind::Gt;
                self.current.range.start = split;
                self.current.span.start += 1;
                self.current.newline_before = false;
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    pub(crate) fn mark(&self) -> Marker {
        Marker {
            start: self.current.range.start,
            consumed: self.consumed,
        }
    }

    /// Build a node spanning from `m` to the last consumed token.
    ///
    /// A node that consumed nothing is zero-width at the end of the previous
    /// token. The range is widened to cover every child.
    pub(crate) fn finish(
        &self,
        m: Marker,
        kind: NodeKind,
        value: NodeValue,
        children: Vec<AstNode>,
    ) -> AstNode {
        let mut range = if self.consumed > m.consumed {
            Range::new(m.start, self.prev_end)
        } else {
            Range::empty(self.prev_end)
        };
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            range = range.cover(&first.range).cover(&last.range);
        }
        AstNode {
            kind,
            range,
            value,
            children,
        }
    }

    /// Zero-width placeholder for an absent construct.
    pub(crate) fn placeholder(&self, kind: NodeKind) -> AstNode {
        AstNode::new(kind, Range::empty(self.prev_end))
    }

    pub(crate) fn missing(&self) -> AstNode {
        self.placeholder(NodeKind::Missing)
    }

    // =========================================================================
    // Errors and recovery
    // =========================================================================

    fn push_error(&mut self, err: ParseError) {
        debug_assert!(
            self.errors
                .last()
                .map_or(true, |last| last.range.start <= err.range.start),
            "errors must be recorded in source order"
        );
        self.errors.push(err);
    }

    /// Report a syntax error at the current token and enter recovery.
    ///
    /// Suppressed while already recovering, and at invalid tokens, whose
    /// lexical error is reported when they are consumed.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        if !self.recovering && !matches!(self.current.kind, TokenKind::Invalid(_)) {
            let err = ParseError::new(message, self.current.range);
            self.push_error(err);
        }
        self.recovering = true;
    }

    pub(crate) fn error_expected(&mut self, what: &str) {
        let found = self.current.kind.describe();
        self.error(format!("Expected {what}, found {found}"));
    }

    /// Returns `false` when nesting is already at the cap, after reporting
    /// and skipping the over-deep construct so enclosing levels find their
    /// own closing delimiters. Every `true` must be paired with
    /// [`leave_nesting`](Self::leave_nesting).
    pub(crate) fn enter_nesting(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.error(format!(
                "Nesting is too deep (maximum {} levels)",
                self.max_depth
            ));
            self.skip_nested();
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skip the construct at the current token with brackets balanced.
    /// Stops before `;`, `,` or a closing bracket it did not open.
    fn skip_nested(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon | TokenKind::Comma if depth == 0 => break,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip tokens until parsing can resume, then leave recovery mode.
    ///
    /// Stops after `;`, or before `}`, end of input, a declaration keyword
    /// or a statement keyword that starts a line. Braced groups met on the
    /// way are skipped whole.
    pub(crate) fn synchronize(&mut self) {
        let from = self.current.range.start;
        let mut depth = 0usize;
        while !self.is_at_end() {
            if depth == 0 {
                if self.eat(&TokenKind::Semicolon) {
                    break;
                }
                if self.check(&TokenKind::RBrace) || self.at_recovery_point() {
                    break;
                }
            }
            if self.check(&TokenKind::LBrace) {
                depth += 1;
            } else if self.check(&TokenKind::RBrace) {
                depth -= 1;
            }
            self.advance();
        }
        self.recovering = false;
        tracing::trace!(%from, to = %self.current.range.start, "resynchronized");
    }

    fn at_recovery_point(&self) -> bool {
        match &self.current.kind {
            TokenKind::Directive { .. } => true,
            TokenKind::Keyword(kw) if is_declaration_keyword(*kw) => true,
            kind => self.current.newline_before && starts_statement(kind),
        }
    }

    fn at_terminator(&self, terminator: Terminator) -> bool {
        if self.is_at_end() {
            return true;
        }
        match terminator {
            Terminator::EndOfInput => false,
            Terminator::Brace => self.check(&TokenKind::RBrace),
            Terminator::CaseArm => {
                self.check(&TokenKind::RBrace)
                    || self.check_keyword(Keyword::Case)
                    || self.check_keyword(Keyword::Default)
            }
        }
    }

    /// Parse items with `parse_one` until `terminator`, recovering after
    /// each malformed item. Items that consumed no tokens are dropped.
    pub(crate) fn parse_sequence(
        &mut self,
        terminator: Terminator,
        parse_one: fn(&mut Self) -> AstNode,
    ) -> Vec<AstNode> {
        let mut items = Vec::new();
        while !self.at_terminator(terminator) {
            if self.check(&TokenKind::RBrace) {
                self.error("Unmatched '}'");
                self.advance();
                self.recovering = false;
                continue;
            }
            let before = self.consumed;
            let errors_before = self.errors.len();
            let item = parse_one(self);
            if self.consumed > before {
                items.push(item);
            }
            if self.recovering {
                self.synchronize();
            }
            if self.consumed == before {
                if self.errors.len() == errors_before {
                    let found = self.current.kind.describe();
                    self.error(format!("Unexpected {found}"));
                }
                self.advance();
                self.recovering = false;
            }
        }
        items
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse one statement or declaration.
    pub(crate) fn parse_statement(&mut self) -> AstNode {
        let m = self.mark();
        if !self.enter_nesting() {
            return self.finish(m, NodeKind::Error, NodeValue::None, Vec::new());
        }
        let node = self.parse_statement_inner();
        self.leave_nesting();
        node
    }

    fn parse_statement_inner(&mut self) -> AstNode {
        match self.kind() {
            TokenKind::LBrace => return self.parse_block(),
            TokenKind::Semicolon => {
                let m = self.mark();
                self.advance();
                return self.finish(m, NodeKind::Empty, NodeValue::None, Vec::new());
            }
            TokenKind::Directive { .. } => return self.parse_directive(),
            _ => {}
        }
        match self.current_keyword() {
            Some(Keyword::If) => self.parse_if(),
            Some(Keyword::While) => self.parse_while(),
            Some(Keyword::Do) => self.parse_do_while(),
            Some(Keyword::For) => self.parse_for(),
            Some(Keyword::Foreach) => self.parse_foreach(),
            Some(Keyword::Switch) => self.parse_switch(),
            Some(Keyword::Try) => self.parse_try(),
            Some(Keyword::Throw) => self.parse_jump(NodeKind::Throw, true),
            Some(Keyword::Return) => self.parse_jump(NodeKind::Return, false),
            Some(Keyword::Rethrow) => self.parse_jump(NodeKind::Rethrow, false),
            Some(Keyword::Break) => self.parse_bare(NodeKind::Break),
            Some(Keyword::Continue) => self.parse_bare(NodeKind::Continue),
            Some(Keyword::ThreadExit) => self.parse_bare(NodeKind::ThreadExit),
            Some(Keyword::OnExit) => self.parse_guard(NodeKind::OnExit),
            Some(Keyword::OnSuccess) => self.parse_guard(NodeKind::OnSuccess),
            Some(Keyword::OnError) => self.parse_guard(NodeKind::OnError),
            Some(Keyword::My | Keyword::Our) => self.parse_var_decl(true),
            _ if self.at_declaration() => self.parse_declaration(),
            _ if self.at_var_decl() => self.parse_var_decl(true),
            _ => self.parse_expression_statement(),
        }
    }

    pub(crate) fn parse_directive(&mut self) -> AstNode {
        let m = self.mark();
        let token = self.advance();
        let value = match token.kind {
            TokenKind::Directive { name, argument } => NodeValue::Directive { name, argument },
            _ => NodeValue::None,
        };
        self.finish(m, NodeKind::Directive, value, Vec::new())
    }

    /// `{ statement* }`
    pub(crate) fn parse_block(&mut self) -> AstNode {
        let m = self.mark();
        if !self.expect(&TokenKind::LBrace) {
            return self.missing();
        }
        let statements = self.parse_sequence(Terminator::Brace, Self::parse_statement);
        self.expect(&TokenKind::RBrace);
        self.finish(m, NodeKind::Block, NodeValue::None, statements)
    }

    fn parse_expression_statement(&mut self) -> AstNode {
        let m = self.mark();
        let expr = self.parse_expression();
        self.expect(&TokenKind::Semicolon);
        self.finish(m, NodeKind::ExprStatement, NodeValue::None, vec![expr])
    }

    /// `( expr )` after `if`, `while`, `switch`.
    fn parse_condition(&mut self) -> AstNode {
        self.expect(&TokenKind::LParen);
        let cond = self.parse_expression();
        self.expect(&TokenKind::RParen);
        cond
    }

    fn parse_if(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut children = vec![self.parse_condition()];
        children.push(self.parse_statement());
        if self.eat_keyword(Keyword::Else) {
            children.push(self.parse_statement());
        }
        self.finish(m, NodeKind::If, NodeValue::None, children)
    }

    fn parse_while(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let cond = self.parse_condition();
        let body = self.parse_statement();
        self.finish(m, NodeKind::While, NodeValue::None, vec![cond, body])
    }

    fn parse_do_while(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let body = self.parse_statement();
        self.expect_keyword(Keyword::While);
        let cond = self.parse_condition();
        self.expect(&TokenKind::Semicolon);
        self.finish(m, NodeKind::DoWhile, NodeValue::None, vec![body, cond])
    }

    /// `for (init; cond; step) body`; omitted clauses become zero-width
    /// `Empty` nodes so the four children keep fixed roles.
    fn parse_for(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        self.expect(&TokenKind::LParen);
        let init = if self.check(&TokenKind::Semicolon) {
            self.placeholder(NodeKind::Empty)
        } else if self.at_local_var_decl() {
            self.parse_var_decl(false)
        } else {
            self.parse_expression()
        };
        self.expect(&TokenKind::Semicolon);
        let cond = if self.check(&TokenKind::Semicolon) {
            self.placeholder(NodeKind::Empty)
        } else {
            self.parse_expression()
        };
        self.expect(&TokenKind::Semicolon);
        let step = if self.check(&TokenKind::RParen) {
            self.placeholder(NodeKind::Empty)
        } else {
            self.parse_expression()
        };
        self.expect(&TokenKind::RParen);
        let body = self.parse_statement();
        self.finish(m, NodeKind::For, NodeValue::None, vec![init, cond, step, body])
    }

    /// `foreach [my] [type] var in (list) body`
    fn parse_foreach(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let var = if self.at_local_var_decl() {
            self.parse_var_decl(false)
        } else {
            self.parse_expression()
        };
        self.expect_keyword(Keyword::In);
        let list = self.parse_condition();
        let body = self.parse_statement();
        self.finish(m, NodeKind::Foreach, NodeValue::None, vec![var, list, body])
    }

    fn parse_switch(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut children = vec![self.parse_condition()];
        if self.expect(&TokenKind::LBrace) {
            while !self.is_at_end() && !self.check(&TokenKind::RBrace) {
                match self.current_keyword() {
                    Some(Keyword::Case) => children.push(self.parse_case()),
                    Some(Keyword::Default) => children.push(self.parse_default()),
                    _ => {
                        let before = self.consumed;
                        self.error_expected("'case' or 'default'");
                        self.synchronize();
                        if self.consumed == before {
                            self.advance();
                        }
                    }
                }
            }
            self.expect(&TokenKind::RBrace);
        }
        self.finish(m, NodeKind::Switch, NodeValue::None, children)
    }

    /// `case [op] expr: statement*`, where `op` makes a relational case.
    fn parse_case(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let op = match self.kind() {
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Lte
            | TokenKind::Gte
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Match
            | TokenKind::NoMatch => self.kind().symbol(),
            _ => None,
        };
        if op.is_some() {
            self.advance();
        }
        let mut children = vec![self.parse_expression()];
        self.expect(&TokenKind::Colon);
        children.extend(self.parse_sequence(Terminator::CaseArm, Self::parse_statement));
        let value = op.map_or(NodeValue::None, |op| NodeValue::Operator(op.to_string()));
        self.finish(m, NodeKind::Case, value, children)
    }

    fn parse_default(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        self.expect(&TokenKind::Colon);
        let body = self.parse_sequence(Terminator::CaseArm, Self::parse_statement);
        self.finish(m, NodeKind::Default, NodeValue::None, body)
    }

    /// `try block catch (param) block`
    fn parse_try(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut children = vec![self.parse_block()];
        if self.check_keyword(Keyword::Catch) {
            let cm = self.mark();
            self.advance();
            let mut catch = Vec::new();
            self.expect(&TokenKind::LParen);
            if !self.check(&TokenKind::RParen) {
                catch.push(self.parse_param());
            }
            self.expect(&TokenKind::RParen);
            catch.push(self.parse_block());
            children.push(self.finish(cm, NodeKind::Catch, NodeValue::None, catch));
        } else {
            self.error_expected("'catch'");
            children.push(self.missing());
        }
        self.finish(m, NodeKind::Try, NodeValue::None, children)
    }

    /// `throw`, `return` and `rethrow`, whose operand is an optional
    /// comma-separated list.
    fn parse_jump(&mut self, kind: NodeKind, operand_required: bool) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut children = Vec::new();
        if operand_required || !self.check(&TokenKind::Semicolon) {
            children.push(self.parse_expression_list());
        }
        self.expect(&TokenKind::Semicolon);
        self.finish(m, kind, NodeValue::None, children)
    }

    /// `break;`, `continue;`, `thread_exit;`
    fn parse_bare(&mut self, kind: NodeKind) -> AstNode {
        let m = self.mark();
        self.advance();
        self.expect(&TokenKind::Semicolon);
        self.finish(m, kind, NodeValue::None, Vec::new())
    }

    /// `on_exit`, `on_success`, `on_error` followed by a statement.
    fn parse_guard(&mut self, kind: NodeKind) -> AstNode {
        let m = self.mark();
        self.advance();
        let body = self.parse_statement();
        self.finish(m, kind, NodeValue::None, vec![body])
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    /// Typed declaration ahead: a type followed by a variable name.
    pub(crate) fn at_var_decl(&mut self) -> bool {
        match self.type_len(0) {
            Some(n) => matches!(
                self.nth_kind(n),
                TokenKind::Identifier(_) | TokenKind::Variable(_)
            ),
            None => false,
        }
    }

    fn at_local_var_decl(&mut self) -> bool {
        self.check_keyword(Keyword::My) || self.check_keyword(Keyword::Our) || self.at_var_decl()
    }

    /// `[my|our] [type] name [= expr]` or `my|our (decl, ...) [= expr]`,
    /// followed by `;` when `terminated`.
    pub(crate) fn parse_var_decl(&mut self, terminated: bool) -> AstNode {
        let m = self.mark();
        let mut children = Vec::new();
        if let Some(kw @ (Keyword::My | Keyword::Our)) = self.current_keyword() {
            let km = self.mark();
            self.advance();
            children.push(self.finish(
                km,
                NodeKind::Modifier,
                NodeValue::Name(kw.as_str().to_string()),
                Vec::new(),
            ));
        }
        let name = if self.check(&TokenKind::LParen) {
            self.parse_declarator_list(&mut children);
            None
        } else {
            self.parse_declarator(&mut children)
        };
        if self.eat(&TokenKind::Assign) {
            children.push(self.parse_expression());
        }
        if terminated {
            self.expect(&TokenKind::Semicolon);
        }
        let value = name.map_or(NodeValue::None, NodeValue::Name);
        self.finish(m, NodeKind::VarDecl, value, children)
    }

    /// `[type] name`, pushing the type node; returns the name.
    fn parse_declarator(&mut self, children: &mut Vec<AstNode>) -> Option<String> {
        if self.at_var_decl() {
            children.push(self.parse_type());
        }
        match self.kind() {
            TokenKind::Identifier(name) | TokenKind::Variable(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => {
                self.error_expected("variable name");
                None
            }
        }
    }

    /// `( [type] name, ... )`, one nested `VarDecl` per name.
    fn parse_declarator_list(&mut self, children: &mut Vec<AstNode>) {
        self.advance();
        loop {
            let m = self.mark();
            let mut parts = Vec::new();
            let name = self.parse_declarator(&mut parts);
            let value = name.map_or(NodeValue::None, NodeValue::Name);
            children.push(self.finish(m, NodeKind::VarDecl, value, parts));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(&TokenKind::RParen, "',' or ')'");
    }
}

fn is_declaration_keyword(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Class
            | Keyword::Namespace
            | Keyword::Sub
            | Keyword::Const
            | Keyword::Hashdecl
            | Keyword::My
            | Keyword::Our
    )
}

fn starts_statement(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Keyword(kw) => {
            kw.is_builtin_type()
                || kw.is_modifier()
                || matches!(
                    kw,
                    Keyword::If
                        | Keyword::While
                        | Keyword::Do
                        | Keyword::For
                        | Keyword::Foreach
                        | Keyword::Switch
                        | Keyword::Case
                        | Keyword::Default
                        | Keyword::Try
                        | Keyword::Throw
                        | Keyword::Return
                        | Keyword::Rethrow
                        | Keyword::Break
                        | Keyword::Continue
                        | Keyword::ThreadExit
                        | Keyword::OnExit
                        | Keyword::OnSuccess
                        | Keyword::OnError
                )
        }
        _ => false,
    }
}
