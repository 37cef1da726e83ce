use serde::Serialize;
use std::fmt;

/// Byte offsets of a token in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A point in source text. Lines and columns are both 1-based; columns count
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open `[start, end)` region of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `pos`. Contains no points.
    pub fn empty(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `pos` lies inside `[start, end)`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn encloses(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both.
    pub fn cover(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Reserved words of the language, including the built-in type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    // Declarations
    Class,
    Const,
    Hashdecl,
    Inherits,
    Namespace,
    Sub,
    Returns,
    My,
    Our,

    // Modifiers
    Abstract,
    Deprecated,
    Final,
    Private,
    Public,
    Static,
    Synchronized,
    Transient,

    // Statements
    Break,
    Case,
    Catch,
    Context,
    Continue,
    Default,
    Do,
    Else,
    For,
    Foreach,
    If,
    In,
    OnError,
    OnExit,
    OnSuccess,
    Rethrow,
    Return,
    Switch,
    ThreadExit,
    Throw,
    Try,
    Where,
    While,

    // Keyword operators
    Background,
    Cast,
    Delete,
    Elements,
    Exists,
    Extract,
    Foldl,
    Foldr,
    Instanceof,
    Keys,
    Map,
    New,
    Pop,
    Push,
    Remove,
    Select,
    Shift,
    Splice,
    Trim,
    Unshift,

    // Values
    SelfRef,
    Nothing,
    Null,
    True,
    False,

    // Built-in types
    Int,
    Float,
    Number,
    Bool,
    StringType,
    Date,
    Binary,
    Hash,
    List,
    Object,
    Code,
    Reference,
    Any,
    Auto,
    NothingType,
    SoftInt,
    SoftFloat,
    SoftNumber,
    SoftBool,
    SoftString,
    SoftDate,
    SoftList,
    Timeout,
    Data,
    CallRef,
    Closure,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Self> {
        let kw = match ident {
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "hashdecl" => Keyword::Hashdecl,
            "inherits" => Keyword::Inherits,
            "namespace" => Keyword::Namespace,
            "sub" => Keyword::Sub,
            "returns" => Keyword::Returns,
            "my" => Keyword::My,
            "our" => Keyword::Our,
            "abstract" => Keyword::Abstract,
            "deprecated" => Keyword::Deprecated,
            "final" => Keyword::Final,
            "private" => Keyword::Private,
            "public" => Keyword::Public,
            "static" => Keyword::Static,
            "synchronized" => Keyword::Synchronized,
            "transient" => Keyword::Transient,
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "context" => Keyword::Context,
            "continue" => Keyword::Continue,
            "default" => Keyword::Default,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "for" => Keyword::For,
            "foreach" => Keyword::Foreach,
            "if" => Keyword::If,
            "in" => Keyword::In,
            "on_error" => Keyword::OnError,
            "on_exit" => Keyword::OnExit,
            "on_success" => Keyword::OnSuccess,
            "rethrow" => Keyword::Rethrow,
            "return" => Keyword::Return,
            "switch" => Keyword::Switch,
            "thread_exit" => Keyword::ThreadExit,
            "throw" => Keyword::Throw,
            "try" => Keyword::Try,
            "where" => Keyword::Where,
            "while" => Keyword::While,
            "background" => Keyword::Background,
            "cast" => Keyword::Cast,
            "delete" => Keyword::Delete,
            "elements" => Keyword::Elements,
            "exists" => Keyword::Exists,
            "extract" => Keyword::Extract,
            "foldl" => Keyword::Foldl,
            "foldr" => Keyword::Foldr,
            "instanceof" => Keyword::Instanceof,
            "keys" => Keyword::Keys,
            "map" => Keyword::Map,
            "new" => Keyword::New,
            "pop" => Keyword::Pop,
            "push" => Keyword::Push,
            "remove" => Keyword::Remove,
            "select" => Keyword::Select,
            "shift" => Keyword::Shift,
            "splice" => Keyword::Splice,
            "trim" => Keyword::Trim,
            "unshift" => Keyword::Unshift,
            "self" => Keyword::SelfRef,
            "NOTHING" => Keyword::Nothing,
            "NULL" => Keyword::Null,
            "True" => Keyword::True,
            "False" => Keyword::False,
            "int" => Keyword::Int,
            "float" => Keyword::Float,
            "number" => Keyword::Number,
            "bool" => Keyword::Bool,
            "string" => Keyword::StringType,
            "date" => Keyword::Date,
            "binary" => Keyword::Binary,
            "hash" => Keyword::Hash,
            "list" => Keyword::List,
            "object" => Keyword::Object,
            "code" => Keyword::Code,
            "reference" => Keyword::Reference,
            "any" => Keyword::Any,
            "auto" => Keyword::Auto,
            "nothing" => Keyword::NothingType,
            "softint" => Keyword::SoftInt,
            "softfloat" => Keyword::SoftFloat,
            "softnumber" => Keyword::SoftNumber,
            "softbool" => Keyword::SoftBool,
            "softstring" => Keyword::SoftString,
            "softdate" => Keyword::SoftDate,
            "softlist" => Keyword::SoftList,
            "timeout" => Keyword::Timeout,
            "data" => Keyword::Data,
            "callref" => Keyword::CallRef,
            "closure" => Keyword::Closure,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Hashdecl => "hashdecl",
            Keyword::Inherits => "inherits",
            Keyword::Namespace => "namespace",
            Keyword::Sub => "sub",
            Keyword::Returns => "returns",
            Keyword::My => "my",
            Keyword::Our => "our",
            Keyword::Abstract => "abstract",
            Keyword::Deprecated => "deprecated",
            Keyword::Final => "final",
            Keyword::Private => "private",
            Keyword::Public => "public",
            Keyword::Static => "static",
            Keyword::Synchronized => "synchronized",
            Keyword::Transient => "transient",
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Context => "context",
            Keyword::Continue => "continue",
            Keyword::Default => "default",
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::For => "for",
            Keyword::Foreach => "foreach",
            Keyword::If => "if",
            Keyword::In => "in",
            Keyword::OnError => "on_error",
            Keyword::OnExit => "on_exit",
            Keyword::OnSuccess => "on_success",
            Keyword::Rethrow => "rethrow",
            Keyword::Return => "return",
            Keyword::Switch => "switch",
            Keyword::ThreadExit => "thread_exit",
            Keyword::Throw => "throw",
            Keyword::Try => "try",
            Keyword::Where => "where",
            Keyword::While => "while",
            Keyword::Background => "background",
            Keyword::Cast => "cast",
            Keyword::Delete => "delete",
            Keyword::Elements => "elements",
            Keyword::Exists => "exists",
            Keyword::Extract => "extract",
            Keyword::Foldl => "foldl",
            Keyword::Foldr => "foldr",
            Keyword::Instanceof => "instanceof",
            Keyword::Keys => "keys",
            Keyword::Map => "map",
            Keyword::New => "new",
            Keyword::Pop => "pop",
            Keyword::Push => "push",
            Keyword::Remove => "remove",
            Keyword::Select => "select",
            Keyword::Shift => "shift",
            Keyword::Splice => "splice",
            Keyword::Trim => "trim",
            Keyword::Unshift => "unshift",
            Keyword::SelfRef => "self",
            Keyword::Nothing => "NOTHING",
            Keyword::Null => "NULL",
            Keyword::True => "True",
            Keyword::False => "False",
            Keyword::Int => "int",
            Keyword::Float => "float",
            Keyword::Number => "number",
            Keyword::Bool => "bool",
            Keyword::StringType => "string",
            Keyword::Date => "date",
            Keyword::Binary => "binary",
            Keyword::Hash => "hash",
            Keyword::List => "list",
            Keyword::Object => "object",
            Keyword::Code => "code",
            Keyword::Reference => "reference",
            Keyword::Any => "any",
            Keyword::Auto => "auto",
            Keyword::NothingType => "nothing",
            Keyword::SoftInt => "softint",
            Keyword::SoftFloat => "softfloat",
            Keyword::SoftNumber => "softnumber",
            Keyword::SoftBool => "softbool",
            Keyword::SoftString => "softstring",
            Keyword::SoftDate => "softdate",
            Keyword::SoftList => "softlist",
            Keyword::Timeout => "timeout",
            Keyword::Data => "data",
            Keyword::CallRef => "callref",
            Keyword::Closure => "closure",
        }
    }

    /// Built-in type names usable in declarations and signatures.
    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            Keyword::Int
                | Keyword::Float
                | Keyword::Number
                | Keyword::Bool
                | Keyword::StringType
                | Keyword::Date
                | Keyword::Binary
                | Keyword::Hash
                | Keyword::List
                | Keyword::Object
                | Keyword::Code
                | Keyword::Reference
                | Keyword::Any
                | Keyword::Auto
                | Keyword::NothingType
                | Keyword::SoftInt
                | Keyword::SoftFloat
                | Keyword::SoftNumber
                | Keyword::SoftBool
                | Keyword::SoftString
                | Keyword::SoftDate
                | Keyword::SoftList
                | Keyword::Timeout
                | Keyword::Data
                | Keyword::CallRef
                | Keyword::Closure
        )
    }

    /// Declaration modifiers that may precede classes, methods and functions.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Keyword::Abstract
                | Keyword::Deprecated
                | Keyword::Final
                | Keyword::Private
                | Keyword::Public
                | Keyword::Static
                | Keyword::Synchronized
                | Keyword::Transient
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flavour of a regular expression literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegexKind {
    /// `/pat/` or `m/pat/`
    Match,
    /// `s/pat/repl/`
    Substitute,
    /// `x/pat/`
    Extract,
    /// `tr/from/to/`
    Transliterate,
}

/// A regular expression literal following `=~` or `!~`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexLiteral {
    pub kind: RegexKind,
    pub pattern: String,
    pub replacement: Option<String>,
    pub flags: String,
}

/// Coarse classification of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenCategory {
    Identifier,
    Keyword,
    Literal,
    Operator,
    Punctuation,
    Directive,
    Invalid,
    EndOfInput,
}

/// Token classification for Qore source.
///
/// Data-carrying variants embed their value directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Names
    Identifier(String),
    /// Old-style `$name` variable reference.
    Variable(String),
    /// Old-style `$.name` member reference.
    SelfMember(String),
    /// Implicit closure/map argument `$1`, `$2`, ...
    ImplicitArg(u32),
    /// Implicit index `$#`.
    ImplicitIndex,
    Keyword(Keyword),

    // Literals (carry data)
    Integer(i64),
    Float(f64),
    /// Arbitrary-precision number, kept as written without the `n` suffix.
    Number(String),
    String(String),
    /// Absolute or relative date literal, kept as written.
    Date(String),
    Backquote(String),
    Regex(RegexLiteral),

    /// `%name argument` parse directive.
    Directive { name: String, argument: String },

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    Dot,
    Ellipsis,

    // Operators
    Question,
    QuestionQuestion,
    QuestionColon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,
    QuestionQuestionAssign,
    EqEq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    Spaceship,
    Match,
    NoMatch,
    AndAnd,
    OrOr,
    Not,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Backslash,

    /// Unrecognized or unterminated input; carries the diagnostic message.
    Invalid(String),

    // End of input
    Eof,
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Identifier(_)
            | TokenKind::Variable(_)
            | TokenKind::SelfMember(_)
            | TokenKind::ImplicitArg(_)
            | TokenKind::ImplicitIndex => TokenCategory::Identifier,
            TokenKind::Keyword(_) => TokenCategory::Keyword,
            TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Date(_)
            | TokenKind::Backquote(_)
            | TokenKind::Regex(_) => TokenCategory::Literal,
            TokenKind::Directive { .. } => TokenCategory::Directive,
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::DoubleColon
            | TokenKind::Dot
            | TokenKind::Ellipsis => TokenCategory::Punctuation,
            TokenKind::Invalid(_) => TokenCategory::Invalid,
            TokenKind::Eof => TokenCategory::EndOfInput,
            _ => TokenCategory::Operator,
        }
    }

    /// Source spelling of fixed tokens, used in diagnostics.
    pub fn describe(&self) -> String {
        let fixed = match self {
            TokenKind::Identifier(name) => return format!("identifier '{name}'"),
            TokenKind::Variable(name) => return format!("variable '${name}'"),
            TokenKind::SelfMember(name) => return format!("member reference '$.{name}'"),
            TokenKind::ImplicitArg(n) => return format!("implicit argument '${n}'"),
            TokenKind::ImplicitIndex => "'$#'",
            TokenKind::Keyword(kw) => return format!("keyword '{kw}'"),
            TokenKind::Integer(_) | TokenKind::Float(_) | TokenKind::Number(_) => {
                "number literal"
            }
            TokenKind::String(_) => "string literal",
            TokenKind::Date(_) => "date literal",
            TokenKind::Backquote(_) => "backquote expression",
            TokenKind::Regex(_) => "regular expression",
            TokenKind::Directive { name, .. } => return format!("directive '%{name}'"),
            TokenKind::Invalid(_) => "invalid token",
            TokenKind::Eof => "end of input",
            other => return format!("'{}'", other.symbol().unwrap_or("?")),
        };
        fixed.to_string()
    }

    /// Spelling of operator and punctuation tokens.
    pub fn symbol(&self) -> Option<&'static str> {
        let s = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionColon => "?:",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PercentAssign => "%=",
            TokenKind::AmpAssign => "&=",
            TokenKind::PipeAssign => "|=",
            TokenKind::CaretAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::QuestionQuestionAssign => "??=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::StrictEq => "===",
            TokenKind::StrictNotEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Lte => "<=",
            TokenKind::Gte => ">=",
            TokenKind::Spaceship => "<=>",
            TokenKind::Match => "=~",
            TokenKind::NoMatch => "!~",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Not => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Backslash => "\\",
            _ => return None,
        };
        Some(s)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }
}

/// A token produced by the Qore scanner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub range: Range,
    /// Whether a line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, range: Range) -> Self {
        Self {
            kind,
            span,
            range,
            newline_before: false,
        }
    }

    pub fn category(&self) -> TokenCategory {
        self.kind.category()
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_is_half_open() {
        let r = Range::new(Position::new(1, 1), Position::new(1, 5));
        assert!(r.contains(Position::new(1, 1)));
        assert!(r.contains(Position::new(1, 4)));
        assert!(!r.contains(Position::new(1, 5)));
        assert!(!r.contains(Position::new(2, 1)));
    }

    #[test]
    fn test_multiline_range_contains() {
        let r = Range::new(Position::new(1, 10), Position::new(3, 2));
        assert!(r.contains(Position::new(2, 100)));
        assert!(r.contains(Position::new(3, 1)));
        assert!(!r.contains(Position::new(1, 9)));
    }

    #[test]
    fn test_empty_range_contains_nothing() {
        let r = Range::empty(Position::new(2, 3));
        assert!(r.is_empty());
        assert!(!r.contains(Position::new(2, 3)));
    }

    #[test]
    fn test_range_cover() {
        let a = Range::new(Position::new(1, 5), Position::new(1, 9));
        let b = Range::new(Position::new(2, 1), Position::new(2, 4));
        let both = Range::new(Position::new(1, 5), Position::new(2, 4));
        assert_eq!(a.cover(&b), both);
        assert_eq!(b.cover(&a), both);
        assert_eq!(a.cover(&Range::empty(Position::new(1, 6))), a);
        assert!(both.encloses(&a) && both.encloses(&b));
    }

    #[test]
    fn test_keyword_round_trip_spelling() {
        for word in ["class", "on_exit", "NOTHING", "softstring", "self", "True"] {
            let kw = Keyword::from_ident(word).unwrap();
            assert_eq!(kw.as_str(), word);
        }
        assert_eq!(Keyword::from_ident("Class"), None);
    }

    #[test]
    fn test_token_categories() {
        assert_eq!(TokenKind::Identifier("x".into()).category(), TokenCategory::Identifier);
        assert_eq!(TokenKind::Keyword(Keyword::If).category(), TokenCategory::Keyword);
        assert_eq!(TokenKind::Integer(1).category(), TokenCategory::Literal);
        assert_eq!(TokenKind::Plus.category(), TokenCategory::Operator);
        assert_eq!(TokenKind::Semicolon.category(), TokenCategory::Punctuation);
        assert_eq!(TokenKind::Invalid("bad".into()).category(), TokenCategory::Invalid);
        assert_eq!(TokenKind::Eof.category(), TokenCategory::EndOfInput);
    }
}
