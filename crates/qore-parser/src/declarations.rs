//! Declarations: namespaces, classes, hashdecls, functions, constants,
//! parameters and type names.

use crate::ast::{AstNode, NodeKind, NodeValue};
use crate::parser::{Marker, Parser, Terminator};
use qore_lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Whether a declaration (not a plain variable) starts here.
    pub(crate) fn at_declaration(&mut self) -> bool {
        match self.current_keyword() {
            Some(kw) if kw.is_modifier() => true,
            Some(Keyword::Namespace | Keyword::Class | Keyword::Hashdecl | Keyword::Const) => {
                true
            }
            Some(Keyword::Sub) => matches!(self.nth_kind(1), TokenKind::Identifier(_)),
            _ => self.at_typed_function(),
        }
    }

    /// `type sub name`
    fn at_typed_function(&mut self) -> bool {
        match self.type_len(0) {
            Some(n) => self.nth_kind(n).is_keyword(Keyword::Sub),
            None => false,
        }
    }

    pub(crate) fn parse_declaration(&mut self) -> AstNode {
        let m = self.mark();
        let modifiers = self.parse_modifiers();
        match self.current_keyword() {
            Some(Keyword::Namespace) => self.parse_namespace(m, modifiers),
            Some(Keyword::Class) => self.parse_class(m, modifiers),
            Some(Keyword::Hashdecl) => self.parse_hashdecl(m, modifiers),
            Some(Keyword::Const) => self.parse_constant(m, modifiers),
            Some(Keyword::Sub) => self.parse_function(m, modifiers),
            _ if self.at_typed_function() => self.parse_function(m, modifiers),
            _ => {
                self.error_expected("declaration after modifiers");
                self.finish(m, NodeKind::Error, NodeValue::None, modifiers)
            }
        }
    }

    /// `private`, `static`, `abstract`, ... including the scoped
    /// `private:internal` and `private:hierarchy` forms.
    fn parse_modifiers(&mut self) -> Vec<AstNode> {
        let mut modifiers = Vec::new();
        while let Some(kw) = self.current_keyword().filter(|kw| kw.is_modifier()) {
            let m = self.mark();
            self.advance();
            let mut name = kw.as_str().to_string();
            if kw == Keyword::Private
                && self.check(&TokenKind::Colon)
                && matches!(self.nth_kind(1), TokenKind::Identifier(_))
            {
                self.advance();
                if let TokenKind::Identifier(scope) = self.advance().kind {
                    name.push(':');
                    name.push_str(&scope);
                }
            }
            modifiers.push(self.finish(m, NodeKind::Modifier, NodeValue::Name(name), Vec::new()));
        }
        modifiers
    }

    // =========================================================================
    // Namespaces and classes
    // =========================================================================

    fn parse_namespace(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        self.advance();
        let name = self.expect_scoped_name("namespace name");
        if !self.eat(&TokenKind::Semicolon) && self.expect(&TokenKind::LBrace) {
            children.extend(self.parse_sequence(Terminator::Brace, Self::parse_statement));
            self.expect(&TokenKind::RBrace);
        }
        self.finish(m, NodeKind::Namespace, name_value(name), children)
    }

    /// `class Name [inherits ...] { member* }` or a `;` forward declaration.
    fn parse_class(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        self.advance();
        let name = self.expect_scoped_name("class name");
        if self.check_keyword(Keyword::Inherits) {
            children.push(self.parse_inheritance());
        }
        if !self.eat(&TokenKind::Semicolon) && self.expect(&TokenKind::LBrace) {
            children.extend(self.parse_sequence(Terminator::Brace, Self::parse_class_member));
            self.expect(&TokenKind::RBrace);
        }
        self.finish(m, NodeKind::Class, name_value(name), children)
    }

    fn parse_inheritance(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut parents = Vec::new();
        loop {
            let pm = self.mark();
            let access = self.parse_modifiers();
            let name = self.expect_scoped_name("superclass name");
            parents.push(self.finish(pm, NodeKind::Superclass, name_value(name), access));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.finish(m, NodeKind::InheritanceList, NodeValue::None, parents)
    }

    fn parse_class_member(&mut self) -> AstNode {
        if self.at_member_block() {
            return self.parse_member_block();
        }
        let m = self.mark();
        let modifiers = self.parse_modifiers();
        if self.check_keyword(Keyword::Const) {
            return self.parse_constant(m, modifiers);
        }
        if matches!(self.kind(), TokenKind::Identifier(_))
            && matches!(self.nth_kind(1), TokenKind::LParen)
        {
            return self.parse_method(m, modifiers);
        }
        if let Some(n) = self.type_len(0) {
            let named = matches!(self.nth_kind(n), TokenKind::Identifier(_));
            let variable = matches!(self.nth_kind(n), TokenKind::Variable(_));
            if named && matches!(self.nth_kind(n + 1), TokenKind::LParen) {
                return self.parse_method(m, modifiers);
            }
            if named || variable {
                return self.parse_field(m, modifiers);
            }
        }
        self.error_expected("class member");
        self.finish(m, NodeKind::Error, NodeValue::None, modifiers)
    }

    /// `private {`, `public {`, `private:internal {`
    fn at_member_block(&mut self) -> bool {
        if !self.check_keyword(Keyword::Private) && !self.check_keyword(Keyword::Public) {
            return false;
        }
        match self.nth_kind(1) {
            TokenKind::LBrace => true,
            TokenKind::Colon => {
                matches!(self.nth_kind(2), TokenKind::Identifier(_))
                    && matches!(self.nth_kind(3), TokenKind::LBrace)
            }
            _ => false,
        }
    }

    fn parse_member_block(&mut self) -> AstNode {
        let m = self.mark();
        let access = self
            .parse_modifiers()
            .pop()
            .and_then(|modifier| modifier.name().map(str::to_string));
        self.expect(&TokenKind::LBrace);
        let members = self.parse_sequence(Terminator::Brace, Self::parse_block_member);
        self.expect(&TokenKind::RBrace);
        self.finish(m, NodeKind::MemberBlock, name_value(access), members)
    }

    /// Member variable or constant inside a member block.
    fn parse_block_member(&mut self) -> AstNode {
        let m = self.mark();
        let modifiers = self.parse_modifiers();
        if self.check_keyword(Keyword::Const) {
            self.parse_constant(m, modifiers)
        } else {
            self.parse_field(m, modifiers)
        }
    }

    /// `[type] name [= expr];`
    fn parse_field(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        if self.at_var_decl() {
            children.push(self.parse_type());
        }
        let name = match self.kind() {
            TokenKind::Identifier(name) | TokenKind::Variable(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => {
                self.error_expected("member name");
                None
            }
        };
        if self.eat(&TokenKind::Assign) {
            children.push(self.parse_expression());
        }
        self.expect(&TokenKind::Semicolon);
        self.finish(m, NodeKind::Field, name_value(name), children)
    }

    /// `[type] name(params) [returns type] [: Base(args), ...] (block | ;)`
    fn parse_method(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        if !matches!(self.nth_kind(1), TokenKind::LParen) {
            children.push(self.parse_type());
        }
        let name = self.expect_identifier("method name");
        children.push(self.parse_params());
        if self.eat_keyword(Keyword::Returns) {
            children.push(self.parse_type());
        }
        if self.eat(&TokenKind::Colon) {
            loop {
                let bm = self.mark();
                let base = self.expect_scoped_name("base class name");
                let args = self.parse_arg_list();
                children.push(self.finish(
                    bm,
                    NodeKind::BaseConstructorCall,
                    name_value(base),
                    vec![args],
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        children.extend(self.parse_body());
        self.finish(m, NodeKind::Method, name_value(name), children)
    }

    // =========================================================================
    // Functions, hashdecls, constants
    // =========================================================================

    /// `[type] sub name(params) [returns type] (block | ;)`
    fn parse_function(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        if !self.check_keyword(Keyword::Sub) {
            children.push(self.parse_type());
        }
        self.expect_keyword(Keyword::Sub);
        let name = self.expect_identifier("function name");
        children.push(self.parse_params());
        if self.eat_keyword(Keyword::Returns) {
            children.push(self.parse_type());
        }
        children.extend(self.parse_body());
        self.finish(m, NodeKind::Function, name_value(name), children)
    }

    /// A body block, or `;` for an abstract or forward declaration.
    fn parse_body(&mut self) -> Option<AstNode> {
        if self.check(&TokenKind::LBrace) {
            Some(self.parse_block())
        } else if self.eat(&TokenKind::Semicolon) {
            None
        } else {
            self.error_expected("'{' or ';'");
            Some(self.missing())
        }
    }

    fn parse_hashdecl(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        self.advance();
        let name = self.expect_scoped_name("hashdecl name");
        if self.expect(&TokenKind::LBrace) {
            children.extend(self.parse_sequence(Terminator::Brace, |p| {
                let fm = p.mark();
                p.parse_field(fm, Vec::new())
            }));
            self.expect(&TokenKind::RBrace);
        }
        self.finish(m, NodeKind::Hashdecl, name_value(name), children)
    }

    /// `const Name = expr;`
    fn parse_constant(&mut self, m: Marker, mut children: Vec<AstNode>) -> AstNode {
        self.advance();
        let name = self.expect_scoped_name("constant name");
        if self.expect(&TokenKind::Assign) {
            children.push(self.parse_expression());
        } else {
            children.push(self.missing());
        }
        self.expect(&TokenKind::Semicolon);
        self.finish(m, NodeKind::Constant, name_value(name), children)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub(crate) fn parse_params(&mut self) -> AstNode {
        let m = self.mark();
        let mut params = Vec::new();
        if self.expect(&TokenKind::LParen) {
            if !self.check(&TokenKind::RParen) {
                loop {
                    params.push(self.parse_param());
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect_closing(&TokenKind::RParen, "',' or ')'");
        }
        self.finish(m, NodeKind::ParamList, NodeValue::None, params)
    }

    /// `[type] name [= default]` or `...`
    pub(crate) fn parse_param(&mut self) -> AstNode {
        let m = self.mark();
        if self.eat(&TokenKind::Ellipsis) {
            return self.finish(m, NodeKind::Param, NodeValue::Name("...".into()), Vec::new());
        }
        let mut children = Vec::new();
        let untyped = matches!(self.kind(), TokenKind::Identifier(_) | TokenKind::Variable(_))
            && matches!(
                self.nth_kind(1),
                TokenKind::Comma | TokenKind::RParen | TokenKind::Assign
            );
        if !untyped {
            children.push(self.parse_type());
        }
        let name = match self.kind() {
            TokenKind::Identifier(name) | TokenKind::Variable(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => {
                self.error_expected("parameter name");
                None
            }
        };
        if self.eat(&TokenKind::Assign) {
            children.push(self.parse_expression());
        }
        self.finish(m, NodeKind::Param, name_value(name), children)
    }

    // =========================================================================
    // Names and types
    // =========================================================================

    /// `a::b::c`, optionally rooted with a leading `::`.
    pub(crate) fn parse_scoped_name(&mut self) -> String {
        let mut name = String::new();
        if self.eat(&TokenKind::DoubleColon) {
            name.push_str("::");
        }
        if let TokenKind::Identifier(first) = self.kind() {
            name.push_str(first);
            self.advance();
        }
        while self.check(&TokenKind::DoubleColon)
            && matches!(self.nth_kind(1), TokenKind::Identifier(_))
        {
            self.advance();
            if let TokenKind::Identifier(part) = self.advance().kind {
                name.push_str("::");
                name.push_str(&part);
            }
        }
        name
    }

    fn expect_scoped_name(&mut self, what: &str) -> Option<String> {
        match self.kind() {
            TokenKind::Identifier(_) | TokenKind::DoubleColon => Some(self.parse_scoped_name()),
            _ => {
                self.error_expected(what);
                None
            }
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Option<String> {
        match self.kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => {
                self.error_expected(what);
                None
            }
        }
    }

    /// Number of tokens a type spells starting `start` tokens ahead, or
    /// `None` when no type starts there.
    pub(crate) fn type_len(&mut self, start: usize) -> Option<usize> {
        let mut i = start;
        if matches!(self.nth_kind(i), TokenKind::Star) {
            i += 1;
        }
        match self.nth_kind(i) {
            TokenKind::Keyword(kw) if kw.is_builtin_type() => i += 1,
            TokenKind::Identifier(_) => i += 1,
            TokenKind::DoubleColon => {
                if !matches!(self.nth_kind(i + 1), TokenKind::Identifier(_)) {
                    return None;
                }
                i += 2;
            }
            _ => return None,
        }
        while matches!(self.nth_kind(i), TokenKind::DoubleColon)
            && matches!(self.nth_kind(i + 1), TokenKind::Identifier(_))
        {
            i += 2;
        }
        if matches!(self.nth_kind(i), TokenKind::Lt) {
            let mut depth = 1usize;
            i += 1;
            while depth > 0 {
                match self.nth_kind(i) {
                    TokenKind::Lt => depth += 1,
                    TokenKind::Gt => depth -= 1,
                    TokenKind::Shr if depth >= 2 => depth -= 2,
                    TokenKind::Keyword(kw) if kw.is_builtin_type() => {}
                    TokenKind::Identifier(_)
                    | TokenKind::DoubleColon
                    | TokenKind::Comma
                    | TokenKind::Star => {}
                    _ => return None,
                }
                i += 1;
            }
        }
        Some(i - start)
    }

    /// `[*] name [< type, ... >]`
    pub(crate) fn parse_type(&mut self) -> AstNode {
        let m = self.mark();
        if !self.enter_nesting() {
            return self.finish(m, NodeKind::Error, NodeValue::None, Vec::new());
        }
        let mut text = String::new();
        if self.eat(&TokenKind::Star) {
            text.push('*');
        }
        match self.current_keyword() {
            Some(kw) if kw.is_builtin_type() => {
                self.advance();
                text.push_str(kw.as_str());
            }
            _ if matches!(self.kind(), TokenKind::Identifier(_) | TokenKind::DoubleColon) => {
                text.push_str(&self.parse_scoped_name());
            }
            _ => {
                self.error_expected("type name");
                self.leave_nesting();
                let kind = if text.is_empty() {
                    NodeKind::Missing
                } else {
                    NodeKind::Type
                };
                return self.finish(m, kind, NodeValue::Name(text), Vec::new());
            }
        }
        let mut args = Vec::new();
        if self.eat(&TokenKind::Lt) {
            text.push('<');
            loop {
                let arg = self.parse_type();
                text.push_str(arg.name().unwrap_or_default());
                args.push(arg);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                text.push_str(", ");
            }
            if self.eat_closing_angle() {
                text.push('>');
            } else {
                self.error_expected("'>'");
            }
        }
        self.leave_nesting();
        self.finish(m, NodeKind::Type, NodeValue::Name(text), args)
    }
}

fn name_value(name: Option<String>) -> NodeValue {
    name.map_or(NodeValue::None, NodeValue::Name)
}
