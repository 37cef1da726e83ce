//! Expression parser for Qore.
//!
//! Precedence climbing over binding powers. Postfix operators bind
//! tightest, then prefix operators (including keyword operators such as
//! `elements` and `exists`), then the binary levels from multiplicative
//! down to assignment.

use crate::ast::{AstNode, NodeKind, NodeValue};
use crate::parser::{Marker, Parser};
use qore_lexer::{Keyword, TokenKind};

/// Binding power of prefix operators.
const PREFIX_BP: u8 = 25;
/// Minimum binding power of operands inside comma-separated keyword
/// operator lists: everything above assignment.
const LIST_ITEM_BP: u8 = 3;

/// Left and right binding powers of an infix operator.
fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    let bp = match kind {
        TokenKind::Assign
        | TokenKind::PlusAssign
        | TokenKind::MinusAssign
        | TokenKind::StarAssign
        | TokenKind::SlashAssign
        | TokenKind::PercentAssign
        | TokenKind::AmpAssign
        | TokenKind::PipeAssign
        | TokenKind::CaretAssign
        | TokenKind::ShlAssign
        | TokenKind::ShrAssign
        | TokenKind::QuestionQuestionAssign => (2, 1),
        TokenKind::Question | TokenKind::QuestionColon | TokenKind::QuestionQuestion => (4, 3),
        TokenKind::OrOr => (5, 6),
        TokenKind::AndAnd => (7, 8),
        TokenKind::Pipe => (9, 10),
        TokenKind::Caret => (11, 12),
        TokenKind::Amp => (13, 14),
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::StrictEq
        | TokenKind::StrictNotEq
        | TokenKind::Spaceship
        | TokenKind::Match
        | TokenKind::NoMatch => (15, 16),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => (17, 18),
        TokenKind::Keyword(Keyword::Instanceof) => (17, 18),
        TokenKind::Shl | TokenKind::Shr => (19, 20),
        TokenKind::Plus | TokenKind::Minus => (21, 22),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (23, 24),
        _ => return None,
    };
    Some(bp)
}

fn is_assignment(kind: &TokenKind) -> bool {
    matches!(infix_binding_power(kind), Some((2, 1)))
}

/// Keyword operators taking a single operand.
fn is_unary_keyword(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Elements
            | Keyword::Keys
            | Keyword::Exists
            | Keyword::Delete
            | Keyword::Remove
            | Keyword::Shift
            | Keyword::Pop
            | Keyword::Trim
            | Keyword::Background
    )
}

impl Parser<'_> {
    /// Parse a full expression, assignment included.
    pub fn parse_expression(&mut self) -> AstNode {
        self.parse_expr_bp(0)
    }

    /// One expression, or several separated by commas collected into an
    /// implicit list as in `throw "ERR", "desc"`.
    pub(crate) fn parse_expression_list(&mut self) -> AstNode {
        let m = self.mark();
        let first = self.parse_expression();
        if !self.check(&TokenKind::Comma) {
            return first;
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_expression());
        }
        self.finish(m, NodeKind::ListLiteral, NodeValue::None, items)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> AstNode {
        let m = self.mark();
        if !self.enter_nesting() {
            return self.finish(m, NodeKind::Error, NodeValue::None, Vec::new());
        }
        let mut lhs = self.parse_prefix();
        loop {
            if let Some(node) = self.try_parse_postfix(m, &mut lhs) {
                lhs = node;
                continue;
            }
            let Some((l_bp, r_bp)) = infix_binding_power(self.kind()) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            lhs = self.parse_infix(m, lhs, r_bp);
        }
        self.leave_nesting();
        lhs
    }

    fn parse_infix(&mut self, m: Marker, lhs: AstNode, r_bp: u8) -> AstNode {
        let token = self.advance();
        let op = token.kind.symbol().unwrap_or("instanceof").to_string();
        match token.kind {
            TokenKind::Question => {
                let then = self.parse_expression();
                self.expect(&TokenKind::Colon);
                let otherwise = self.parse_expr_bp(r_bp);
                self.finish(m, NodeKind::Ternary, NodeValue::None, vec![lhs, then, otherwise])
            }
            TokenKind::Keyword(Keyword::Instanceof) => {
                let ty = self.parse_type();
                self.finish(m, NodeKind::Binary, NodeValue::Operator(op), vec![lhs, ty])
            }
            ref kind if is_assignment(kind) => {
                let rhs = self.parse_expr_bp(r_bp);
                self.finish(m, NodeKind::Assignment, NodeValue::Operator(op), vec![lhs, rhs])
            }
            _ => {
                let rhs = self.parse_expr_bp(r_bp);
                self.finish(m, NodeKind::Binary, NodeValue::Operator(op), vec![lhs, rhs])
            }
        }
    }

    /// Apply one postfix operator to `lhs`, if one follows.
    fn try_parse_postfix(&mut self, m: Marker, lhs: &mut AstNode) -> Option<AstNode> {
        let kind = match self.kind() {
            TokenKind::Dot => NodeKind::Member,
            TokenKind::LBracket => NodeKind::Index,
            TokenKind::LBrace if !self.current().newline_before => NodeKind::Slice,
            TokenKind::LParen => NodeKind::Call,
            TokenKind::PlusPlus | TokenKind::MinusMinus => NodeKind::Postfix,
            _ => return None,
        };
        let object = std::mem::replace(lhs, self.missing());
        let node = match kind {
            NodeKind::Member => {
                self.advance();
                let member = match self.kind() {
                    TokenKind::Identifier(name) => Some(name.clone()),
                    TokenKind::Keyword(kw) => Some(kw.as_str().to_string()),
                    _ => None,
                };
                if member.is_some() {
                    self.advance();
                } else {
                    self.error_expected("member name");
                }
                let value = member.map_or(NodeValue::None, NodeValue::Name);
                self.finish(m, NodeKind::Member, value, vec![object])
            }
            NodeKind::Index => {
                self.advance();
                let index = self.parse_expression();
                self.expect(&TokenKind::RBracket);
                self.finish(m, NodeKind::Index, NodeValue::None, vec![object, index])
            }
            NodeKind::Slice => {
                self.advance();
                let mut children = vec![object];
                while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                    children.push(self.parse_expression());
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_closing(&TokenKind::RBrace, "',' or '}'");
                self.finish(m, NodeKind::Slice, NodeValue::None, children)
            }
            NodeKind::Call => {
                let args = self.parse_arg_list();
                self.finish(m, NodeKind::Call, NodeValue::None, vec![object, args])
            }
            _ => {
                let token = self.advance();
                let op = token.kind.symbol().unwrap_or_default().to_string();
                self.finish(m, NodeKind::Postfix, NodeValue::Operator(op), vec![object])
            }
        };
        Some(node)
    }

    /// `( expr, ... )` with an optional trailing comma.
    pub(crate) fn parse_arg_list(&mut self) -> AstNode {
        let m = self.mark();
        let mut args = Vec::new();
        if self.expect(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                args.push(self.parse_expression());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing(&TokenKind::RParen, "',' or ')'");
        }
        self.finish(m, NodeKind::ArgList, NodeValue::None, args)
    }

    // =========================================================================
    // Prefix operators
    // =========================================================================

    fn parse_prefix(&mut self) -> AstNode {
        let m = self.mark();
        let (kind, op) = match self.kind() {
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Backslash => (NodeKind::Unary, self.kind().symbol().unwrap_or_default()),
            TokenKind::Keyword(kw) if is_unary_keyword(*kw) => (NodeKind::KeywordOp, kw.as_str()),
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_expr_bp(PREFIX_BP);
        self.finish(m, kind, NodeValue::Operator(op.to_string()), vec![operand])
    }

    /// `push l, v`, `unshift l, v`, `splice l, start[, len[, list]]`,
    /// `extract l, start[, len[, list]]`
    fn parse_list_keyword_op(&mut self, kw: Keyword) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut operands = vec![self.parse_expr_bp(LIST_ITEM_BP)];
        while self.eat(&TokenKind::Comma) {
            operands.push(self.parse_expr_bp(LIST_ITEM_BP));
        }
        self.finish(
            m,
            NodeKind::KeywordOp,
            NodeValue::Operator(kw.as_str().to_string()),
            operands,
        )
    }

    /// `map expr, list[, where]`, `select list, expr`, `foldl expr, list`,
    /// `foldr expr, list`
    fn parse_functional_op(&mut self, kw: Keyword) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut operands = vec![self.parse_expr_bp(LIST_ITEM_BP)];
        self.expect(&TokenKind::Comma);
        operands.push(self.parse_expr_bp(LIST_ITEM_BP));
        if kw == Keyword::Map && self.eat(&TokenKind::Comma) {
            operands.push(self.parse_expr_bp(LIST_ITEM_BP));
        }
        let (kind, value) = match kw {
            Keyword::Map => (NodeKind::Map, NodeValue::None),
            Keyword::Select => (NodeKind::Select, NodeValue::None),
            _ => (NodeKind::Fold, NodeValue::Operator(kw.as_str().to_string())),
        };
        self.finish(m, kind, value, operands)
    }

    // =========================================================================
    // Primaries
    // =========================================================================

    fn parse_primary(&mut self) -> AstNode {
        let m = self.mark();
        let (kind, value) = match self.kind() {
            TokenKind::Integer(v) => (NodeKind::IntegerLiteral, NodeValue::Integer(*v)),
            TokenKind::Float(v) => (NodeKind::FloatLiteral, NodeValue::Float(*v)),
            TokenKind::Number(v) => (NodeKind::NumberLiteral, NodeValue::Number(v.clone())),
            TokenKind::String(s) => (NodeKind::StringLiteral, NodeValue::String(s.clone())),
            TokenKind::Date(d) => (NodeKind::DateLiteral, NodeValue::Date(d.clone())),
            TokenKind::Backquote(s) => (NodeKind::BackquoteLiteral, NodeValue::String(s.clone())),
            TokenKind::Regex(r) => (NodeKind::RegexLiteral, NodeValue::Regex(r.clone())),
            TokenKind::Variable(name) => (NodeKind::Variable, NodeValue::Name(name.clone())),
            TokenKind::SelfMember(name) => (NodeKind::SelfMember, NodeValue::Name(name.clone())),
            TokenKind::ImplicitArg(n) => {
                (NodeKind::ImplicitArgument, NodeValue::Integer(i64::from(*n)))
            }
            TokenKind::ImplicitIndex => (NodeKind::ImplicitIndex, NodeValue::None),
            TokenKind::Keyword(Keyword::True) => (NodeKind::BoolLiteral, NodeValue::Bool(true)),
            TokenKind::Keyword(Keyword::False) => (NodeKind::BoolLiteral, NodeValue::Bool(false)),
            TokenKind::Keyword(Keyword::Nothing) => (NodeKind::NothingLiteral, NodeValue::None),
            TokenKind::Keyword(Keyword::Null) => (NodeKind::NullLiteral, NodeValue::None),
            TokenKind::Keyword(Keyword::SelfRef) => (NodeKind::SelfExpr, NodeValue::None),
            // Lexically invalid operand; its error is reported on advance.
            TokenKind::Invalid(_) => (NodeKind::Error, NodeValue::None),
            _ => return self.parse_compound_primary(),
        };
        self.advance();
        self.finish(m, kind, value, Vec::new())
    }

    fn parse_compound_primary(&mut self) -> AstNode {
        match self.kind() {
            TokenKind::Identifier(_) | TokenKind::DoubleColon => return self.parse_name(),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBrace => return self.parse_hash(),
            _ => {}
        }
        match self.current_keyword() {
            Some(Keyword::New) => self.parse_new(),
            Some(Keyword::Cast) => self.parse_cast(),
            Some(Keyword::Sub) if matches!(self.nth_kind(1), TokenKind::LParen) => {
                self.parse_closure()
            }
            Some(kw @ (Keyword::Map | Keyword::Select | Keyword::Foldl | Keyword::Foldr)) => {
                self.parse_functional_op(kw)
            }
            Some(
                kw @ (Keyword::Push | Keyword::Unshift | Keyword::Splice | Keyword::Extract),
            ) => self.parse_list_keyword_op(kw),
            // Conversion functions share their names with types: `int("5")`.
            Some(kw) if kw.is_builtin_type() && matches!(self.nth_kind(1), TokenKind::LParen) => {
                let m = self.mark();
                self.advance();
                self.finish(
                    m,
                    NodeKind::Name,
                    NodeValue::Name(kw.as_str().to_string()),
                    Vec::new(),
                )
            }
            Some(kw) if kw.is_builtin_type() && self.nth_kind(1).is_keyword(Keyword::Sub) => {
                self.parse_closure()
            }
            _ => {
                self.error_expected("expression");
                self.missing()
            }
        }
    }

    fn parse_name(&mut self) -> AstNode {
        let m = self.mark();
        let name = self.parse_scoped_name();
        self.finish(m, NodeKind::Name, NodeValue::Name(name), Vec::new())
    }

    /// `()` empty list, `(expr)`, `(a, b)` list, or old-style hash
    /// `("k": v, ...)`.
    fn parse_paren(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        if self.eat(&TokenKind::RParen) {
            return self.finish(m, NodeKind::ListLiteral, NodeValue::None, Vec::new());
        }
        let first_m = self.mark();
        let first = self.parse_expression();
        if self.check(&TokenKind::Colon) {
            return self.parse_hash_entries(m, first_m, first, &TokenKind::RParen);
        }
        if self.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                if self.check(&TokenKind::RParen) {
                    break;
                }
                items.push(self.parse_expression());
            }
            self.expect_closing(&TokenKind::RParen, "',' or ')'");
            return self.finish(m, NodeKind::ListLiteral, NodeValue::None, items);
        }
        self.expect(&TokenKind::RParen);
        self.finish(m, NodeKind::Paren, NodeValue::None, vec![first])
    }

    /// `{}` or `{ key: value, ... }`
    fn parse_hash(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        if self.eat(&TokenKind::RBrace) {
            return self.finish(m, NodeKind::HashLiteral, NodeValue::None, Vec::new());
        }
        let first_m = self.mark();
        let first = self.parse_expression();
        self.parse_hash_entries(m, first_m, first, &TokenKind::RBrace)
    }

    /// Entries of a hash literal whose first key is already parsed.
    fn parse_hash_entries(
        &mut self,
        m: Marker,
        mut entry_m: Marker,
        mut key: AstNode,
        close: &TokenKind,
    ) -> AstNode {
        let mut entries = Vec::new();
        loop {
            self.expect(&TokenKind::Colon);
            let value = self.parse_expression();
            let entry = self.finish(entry_m, NodeKind::HashEntry, NodeValue::None, vec![key, value]);
            entries.push(entry);
            if !self.eat(&TokenKind::Comma) || self.check(close) {
                break;
            }
            entry_m = self.mark();
            key = self.parse_expression();
        }
        let what = format!("',' or {}", close.describe());
        self.expect_closing(close, &what);
        self.finish(m, NodeKind::HashLiteral, NodeValue::None, entries)
    }

    /// `new Type(args)`
    fn parse_new(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let ty = self.parse_type();
        let value = ty
            .name()
            .map_or(NodeValue::None, |name| NodeValue::Name(name.to_string()));
        let mut children = vec![ty];
        if self.check(&TokenKind::LParen) {
            children.push(self.parse_arg_list());
        }
        self.finish(m, NodeKind::New, value, children)
    }

    /// `cast<Type>(expr)`
    fn parse_cast(&mut self) -> AstNode {
        let m = self.mark();
        self.advance();
        let mut children = Vec::new();
        if self.expect(&TokenKind::Lt) {
            children.push(self.parse_type());
            if !self.eat_closing_angle() {
                self.error_expected("'>'");
            }
        }
        self.expect(&TokenKind::LParen);
        children.push(self.parse_expression());
        self.expect(&TokenKind::RParen);
        self.finish(m, NodeKind::Cast, NodeValue::None, children)
    }

    /// `[type] sub (params) [returns type] { ... }`
    fn parse_closure(&mut self) -> AstNode {
        let m = self.mark();
        let mut children = Vec::new();
        if !self.check_keyword(Keyword::Sub) {
            children.push(self.parse_type());
        }
        self.expect_keyword(Keyword::Sub);
        children.push(self.parse_params());
        if self.eat_keyword(Keyword::Returns) {
            children.push(self.parse_type());
        }
        children.push(self.parse_block());
        self.finish(m, NodeKind::Closure, NodeValue::None, children)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{AstNode, NodeKind, NodeValue};
    use crate::options::ParseOptions;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use qore_lexer::{Position, Range};

    /// Parse `source` as an expression statement and return the expression.
    fn expr(source: &str) -> AstNode {
        let text = format!("{source};");
        let (tree, errors) = parse(&text, &ParseOptions::default());
        assert!(errors.is_empty(), "unexpected errors for {source:?}: {errors:?}");
        tree.check_well_formed().unwrap();
        let mut root = tree.into_root().unwrap();
        let mut stmt = root.children.remove(0);
        assert_eq!(stmt.kind, NodeKind::ExprStatement);
        stmt.children.remove(0)
    }

    /// Right-hand side of `x = source`, for constructs that would start a
    /// block or declaration at statement level.
    fn rhs(source: &str) -> AstNode {
        let mut assign = expr(&format!("x = {source}"));
        assert_eq!(assign.kind, NodeKind::Assignment);
        assign.children.remove(1)
    }

    /// Compact s-expression rendering for precedence assertions.
    fn sexp(node: &AstNode) -> String {
        let head = match (&node.value, node.kind) {
            (NodeValue::Operator(op), _) => op.clone(),
            (NodeValue::Name(name), _) if node.children.is_empty() => return name.clone(),
            (NodeValue::Integer(v), NodeKind::IntegerLiteral) => return v.to_string(),
            (_, kind) => kind.to_string(),
        };
        if node.children.is_empty() {
            return head;
        }
        let parts: Vec<String> = node.children.iter().map(sexp).collect();
        format!("({head} {})", parts.join(" "))
    }

    fn kinds(nodes: &[AstNode]) -> Vec<NodeKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    // =========================================================================
    // Precedence
    // =========================================================================

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(sexp(&expr("a + b * c")), "(+ a (* b c))");
        assert_eq!(sexp(&expr("a - b - c")), "(- (- a b) c)");
        assert_eq!(sexp(&expr("(a + b) * c")), "(* (Paren (+ a b)) c)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(sexp(&expr("a = b = 1")), "(= a (= b 1))");
        assert_eq!(sexp(&expr("x += y || z")), "(+= x (|| y z))");
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_eq!(sexp(&expr("a < b && c == d")), "(&& (< a b) (== c d))");
        assert_eq!(sexp(&expr("a || b && c")), "(|| a (&& b c))");
        assert_eq!(sexp(&expr("x << 1 < y")), "(< (<< x 1) y)");
    }

    #[test]
    fn test_ternary_and_null_coalescing() {
        assert_eq!(sexp(&expr("a ? b : c ? d : e")), "(Ternary a b (Ternary c d e))");
        assert_eq!(sexp(&expr("a ?? b ?: c")), "(?? a (?: b c))");
    }

    #[test]
    fn test_prefix_and_postfix() {
        assert_eq!(sexp(&expr("-a * b")), "(* (- a) b)");
        assert_eq!(sexp(&expr("!x.y")), "(! (Member x))");
        assert_eq!(sexp(&expr("i++")), "(++ i)");
        assert_eq!(sexp(&expr("elements l + 1")), "(+ (elements l) 1)");
        assert_eq!(sexp(&expr("\\ref")), "(\\ ref)");
    }

    #[test]
    fn test_instanceof() {
        assert_eq!(
            sexp(&expr("o instanceof Qore::Thread::Mutex")),
            "(instanceof o Qore::Thread::Mutex)"
        );
    }

    // =========================================================================
    // Postfix chains
    // =========================================================================

    #[test]
    fn test_method_call_chain() {
        let node = expr("obj.get(1, 2)[0].name");
        assert_eq!(node.kind, NodeKind::Member);
        assert_eq!(node.name(), Some("name"));
        let index = &node.children[0];
        assert_eq!(index.kind, NodeKind::Index);
        let call = &index.children[0];
        assert_eq!(kinds(&call.children), vec![NodeKind::Member, NodeKind::ArgList]);
        assert_eq!(call.children[1].children.len(), 2);
    }

    #[test]
    fn test_hash_slice() {
        let node = expr("h{\"a\", \"b\"}");
        assert_eq!(node.kind, NodeKind::Slice);
        assert_eq!(node.children.len(), 3);
    }

    #[test]
    fn test_member_named_like_keyword() {
        let node = expr("h.keys()");
        assert_eq!(node.children[0].name(), Some("keys"));
    }

    // =========================================================================
    // Primaries
    // =========================================================================

    #[test]
    fn test_literals() {
        assert_eq!(expr("42").value, NodeValue::Integer(42));
        assert_eq!(expr("1.5").value, NodeValue::Float(1.5));
        assert_eq!(expr("1.5n").value, NodeValue::Number("1.5".into()));
        assert_eq!(expr("\"s\"").value, NodeValue::String("s".into()));
        assert_eq!(expr("True").value, NodeValue::Bool(true));
        assert_eq!(expr("NOTHING").kind, NodeKind::NothingLiteral);
        assert_eq!(expr("NULL").kind, NodeKind::NullLiteral);
        assert_eq!(expr("2017-01-31").kind, NodeKind::DateLiteral);
        assert_eq!(expr("$1").value, NodeValue::Integer(1));
        assert_eq!(expr("$#").kind, NodeKind::ImplicitIndex);
        assert_eq!(expr("$.member").kind, NodeKind::SelfMember);
        assert_eq!(expr("self").kind, NodeKind::SelfExpr);
    }

    #[test]
    fn test_list_and_hash_literals() {
        assert_eq!(rhs("()").kind, NodeKind::ListLiteral);
        let list = rhs("(1, 2, 3,)");
        assert_eq!(list.kind, NodeKind::ListLiteral);
        assert_eq!(list.children.len(), 3);

        let hash = rhs("{\"a\": 1, \"b\": (2, 3)}");
        assert_eq!(hash.kind, NodeKind::HashLiteral);
        assert_eq!(kinds(&hash.children), vec![NodeKind::HashEntry, NodeKind::HashEntry]);
        assert_eq!(hash.children[1].children[1].kind, NodeKind::ListLiteral);

        let old_style = rhs("(\"a\": 1)");
        assert_eq!(old_style.kind, NodeKind::HashLiteral);
        assert_eq!(rhs("{}").kind, NodeKind::HashLiteral);
    }

    #[test]
    fn test_regex_match() {
        let node = expr("s =~ /ab+c/i");
        assert_eq!(node.operator(), Some("=~"));
        assert_eq!(node.children[1].kind, NodeKind::RegexLiteral);
    }

    #[test]
    fn test_new_and_cast() {
        let node = expr("new Qore::Thread::Mutex()");
        assert_eq!(node.kind, NodeKind::New);
        assert_eq!(node.name(), Some("Qore::Thread::Mutex"));
        assert_eq!(kinds(&node.children), vec![NodeKind::Type, NodeKind::ArgList]);

        let cast = expr("cast<hash<string, int>>(x)");
        assert_eq!(kinds(&cast.children), vec![NodeKind::Type, NodeKind::Name]);
        assert_eq!(cast.children[0].name(), Some("hash<string, int>"));
    }

    #[test]
    fn test_conversion_call() {
        let node = rhs("int(\"5\")");
        assert_eq!(node.kind, NodeKind::Call);
        assert_eq!(node.children[0].name(), Some("int"));
    }

    #[test]
    fn test_closures() {
        let node = rhs("sub (int a) { return a; }");
        assert_eq!(kinds(&node.children), vec![NodeKind::ParamList, NodeKind::Block]);
        let closure = rhs("int sub () returns int { return 1; }");
        assert_eq!(closure.kind, NodeKind::Closure);
        assert_eq!(
            kinds(&closure.children),
            vec![NodeKind::Type, NodeKind::ParamList, NodeKind::Type, NodeKind::Block]
        );
    }

    #[test]
    fn test_keyword_operators() {
        let push = rhs("push l, 1 + 2");
        assert_eq!(push.operator(), Some("push"));
        assert_eq!(kinds(&push.children), vec![NodeKind::Name, NodeKind::Binary]);

        let map = rhs("map $1 * 2, l, $1 > 0");
        assert_eq!(map.kind, NodeKind::Map);
        assert_eq!(map.children.len(), 3);

        let fold = rhs("foldl $1 + $2, l");
        assert_eq!(fold.kind, NodeKind::Fold);
        assert_eq!(fold.operator(), Some("foldl"));

        let select = rhs("select l, $1 != 0");
        assert_eq!(select.kind, NodeKind::Select);
    }

    // =========================================================================
    // Ranges
    // =========================================================================

    #[test]
    fn test_binary_range_spans_operands() {
        let node = expr("ab + cd");
        assert_eq!(
            node.range,
            Range::new(Position::new(1, 1), Position::new(1, 8))
        );
        assert_eq!(node.children[1].range.start, Position::new(1, 6));
    }

    #[test]
    fn test_missing_operand_is_zero_width() {
        let (tree, errors) = parse("x = 1 + ;", &ParseOptions::default());
        assert_eq!(errors.len(), 1);
        tree.check_well_formed().unwrap();
        let assign = &tree.root().unwrap().children[0].children[0];
        let sum = &assign.children[1];
        assert_eq!(sum.kind, NodeKind::Binary);
        assert_eq!(sum.children[1].kind, NodeKind::Missing);
        assert_eq!(sum.children[1].range, Range::empty(Position::new(1, 8)));
        assert_eq!(sum.range, Range::new(Position::new(1, 5), Position::new(1, 8)));
    }
}
