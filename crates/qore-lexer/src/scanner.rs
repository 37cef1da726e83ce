use crate::token::{Keyword, Position, Range, RegexKind, RegexLiteral, Span, Token, TokenKind};

/// Saved scanner location, used to rewind after an unterminated literal.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    line: u32,
    column: u32,
    at_line_start: bool,
    newline_pending: bool,
}

/// Qore source scanner.
///
/// Produces tokens on demand through [`Scanner::next_token`]. The scanner
/// never fails: unrecognized or unterminated input becomes a
/// [`TokenKind::Invalid`] token and scanning continues after it.
///
/// - `Vec<(usize, char)>` source for index-based navigation with byte offsets
/// - 1-based line and column tracking on every token
/// - `\n`, `\r\n` and `\r` each count as a single line break
/// - regex literals are recognised only directly after `=~` / `!~`
pub struct Scanner<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: u32,
    column: u32,
    /// No token has been emitted on the current line yet.
    at_line_start: bool,
    /// A line break was crossed since the last emitted token.
    newline_pending: bool,
    /// The previous token was `=~` or `!~`.
    regex_allowed: bool,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source, starting at line 1.
    pub fn new(source: &'a str) -> Self {
        Self::with_start_line(source, 1)
    }

    /// Create a scanner whose first line is numbered `line`.
    ///
    /// Used for embedded sources so positions are reported relative to the
    /// enclosing file.
    pub fn with_start_line(source: &'a str, line: u32) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            line: line.max(1),
            column: 1,
            at_line_start: true,
            newline_pending: false,
            regex_allowed: false,
            finished: false,
        }
    }

    /// Tokenize the entire source. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    /// Scan the next token. Returns [`TokenKind::Eof`] forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        if let Some(invalid) = self.skip_trivia() {
            return invalid;
        }

        let start = self.checkpoint();

        if self.is_at_end() {
            self.finished = true;
            return self.make(TokenKind::Eof, start);
        }

        let ch = self.peek();

        if self.regex_allowed {
            if let Some(kind) = self.regex_prefix() {
                return self.scan_regex(kind, start);
            }
        }

        match ch {
            '"' => self.scan_string(start),
            '\'' => self.scan_single_quoted(start),
            '`' => self.scan_backquote(start),
            '$' => self.scan_dollar(start),
            '%' if self.at_line_start && self.peek_next().is_ascii_alphabetic() => {
                self.scan_directive(start)
            }
            '0'..='9' => self.scan_number(start),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(start),
            _ => match self.scan_operator() {
                Some(kind) => self.make(kind, start),
                None => self.scan_invalid(start),
            },
        }
    }

    /// Current position (line and column of the next unread character).
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    // --- Trivia ---

    /// Skip whitespace and comments. Returns an invalid token for an
    /// unterminated block comment.
    fn skip_trivia(&mut self) -> Option<Token> {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\x0c' => {
                    self.advance();
                }
                '\n' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == '*' => {
                    let start = self.checkpoint();
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    let mut eol = None;
                    while !self.is_at_end() {
                        if self.peek() == '*' && self.peek_next() == '/' {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        if eol.is_none() && matches!(self.peek(), '\n' | '\r') {
                            eol = Some(self.checkpoint());
                        }
                        self.advance();
                    }
                    if !closed {
                        return Some(self.unterminated("Unterminated block comment", start, eol));
                    }
                }
                _ => return None,
            }
        }
        None
    }

    // --- Scanners ---

    /// Scan a double-quoted string with escape processing. Strings may span
    /// lines.
    fn scan_string(&mut self, start: Checkpoint) -> Token {
        self.advance(); // consume opening quote

        let mut value = String::new();
        let mut eol = None;

        loop {
            if self.is_at_end() {
                return self.unterminated("Unterminated string literal", start, eol);
            }
            let c = self.peek();
            match c {
                '"' => {
                    self.advance();
                    break;
                }
                '\\' => {
                    self.advance();
                    if self.is_at_end() {
                        return self.unterminated("Unterminated string literal", start, eol);
                    }
                    self.scan_escape(&mut value);
                }
                '\n' | '\r' => {
                    if eol.is_none() {
                        eol = Some(self.checkpoint());
                    }
                    value.push(c);
                    self.advance();
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        self.make(TokenKind::String(value), start)
    }

    /// Process one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self, value: &mut String) {
        let c = self.peek();
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            'a' => value.push('\u{7}'),
            '\\' | '"' | '$' => value.push(c),
            '0'..='7' => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 3 && matches!(self.peek(), '0'..='7') {
                    code = code * 8 + self.peek().to_digit(8).unwrap_or(0);
                    self.advance();
                    digits += 1;
                }
                value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                return;
            }
            'x' if self.peek_next().is_ascii_hexdigit() => {
                self.advance(); // consume x
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 2 && self.peek().is_ascii_hexdigit() {
                    code = code * 16 + self.peek().to_digit(16).unwrap_or(0);
                    self.advance();
                    digits += 1;
                }
                value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                return;
            }
            _ => {
                value.push('\\');
                value.push(c);
            }
        }
        self.advance();
    }

    /// Scan a single-quoted string. Only `\'` and `\\` are escapes.
    fn scan_single_quoted(&mut self, start: Checkpoint) -> Token {
        self.advance(); // consume opening quote

        let mut value = String::new();
        let mut eol = None;

        loop {
            if self.is_at_end() {
                return self.unterminated("Unterminated string literal", start, eol);
            }
            let c = self.peek();
            match c {
                '\'' => {
                    self.advance();
                    break;
                }
                '\\' if matches!(self.peek_next(), '\'' | '\\') => {
                    self.advance();
                    value.push(self.peek());
                    self.advance();
                }
                _ => {
                    if eol.is_none() && matches!(c, '\n' | '\r') {
                        eol = Some(self.checkpoint());
                    }
                    value.push(c);
                    self.advance();
                }
            }
        }

        self.make(TokenKind::String(value), start)
    }

    /// Scan a backquoted shell command.
    fn scan_backquote(&mut self, start: Checkpoint) -> Token {
        self.advance(); // consume opening backquote

        let mut value = String::new();
        let mut eol = None;

        loop {
            if self.is_at_end() {
                return self.unterminated("Unterminated backquote expression", start, eol);
            }
            let c = self.peek();
            if c == '`' {
                self.advance();
                break;
            }
            if eol.is_none() && matches!(c, '\n' | '\r') {
                eol = Some(self.checkpoint());
            }
            value.push(c);
            self.advance();
        }

        self.make(TokenKind::Backquote(value), start)
    }

    /// Scan `$name`, `$.name`, `$1` or `$#`.
    fn scan_dollar(&mut self, start: Checkpoint) -> Token {
        self.advance(); // consume $

        let c = self.peek();
        if c == '#' {
            self.advance();
            return self.make(TokenKind::ImplicitIndex, start);
        }
        if c.is_ascii_digit() {
            let mut n: u32 = 0;
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                let digit = self.peek().to_digit(10).unwrap_or(0);
                n = n.saturating_mul(10).saturating_add(digit);
                self.advance();
            }
            return self.make(TokenKind::ImplicitArg(n), start);
        }
        if c == '.' && is_ident_start(self.peek_next()) {
            self.advance(); // consume .
            let name = self.read_ident();
            return self.make(TokenKind::SelfMember(name), start);
        }
        if is_ident_start(c) {
            let name = self.read_ident();
            return self.make(TokenKind::Variable(name), start);
        }

        self.make(
            TokenKind::Invalid("Expected a variable name after '$'".into()),
            start,
        )
    }

    /// Scan a `%directive argument` line.
    fn scan_directive(&mut self, start: Checkpoint) -> Token {
        self.advance(); // consume %

        let mut name = String::new();
        while !self.is_at_end()
            && (self.peek().is_ascii_alphanumeric() || matches!(self.peek(), '-' | '_'))
        {
            name.push(self.peek());
            self.advance();
        }

        let mut argument = String::new();
        let mut end = self.checkpoint();
        while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
            let c = self.peek();
            argument.push(c);
            self.advance();
            if !c.is_whitespace() {
                end = self.checkpoint();
            }
        }

        // Trailing blanks are not part of the directive.
        self.restore(end);
        let argument = argument.trim().to_string();
        self.make(TokenKind::Directive { name, argument }, start)
    }

    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self, start: Checkpoint) -> Token {
        let ident = self.read_ident();
        let kind = match Keyword::from_ident(&ident) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier(ident),
        };
        self.make(kind, start)
    }

    /// Scan a numeric literal: integer, hex integer, float, `n`-suffixed
    /// number, absolute date or relative date.
    fn scan_number(&mut self, start: Checkpoint) -> Token {
        if self.peek() == '0' && matches!(self.peek_next(), 'x' | 'X') {
            self.advance();
            self.advance();
            let digits = self.read_while(|c| c.is_ascii_hexdigit());
            if digits.is_empty() {
                return self.make(
                    TokenKind::Invalid("Hexadecimal literal has no digits".into()),
                    start,
                );
            }
            return match i64::from_str_radix(&digits, 16) {
                Ok(v) => self.make(TokenKind::Integer(v), start),
                Err(_) => self.make(
                    TokenKind::Invalid(format!("Integer literal out of range: 0x{digits}")),
                    start,
                ),
            };
        }

        let int_part = self.read_while(|c| c.is_ascii_digit());

        if int_part.len() == 4 && self.at_date_separator() {
            return self.scan_absolute_date(int_part, start);
        }

        let mut text = int_part;
        let mut is_float = false;

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            text.push('.');
            self.advance();
            text.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), 'e' | 'E') {
            let sign = matches!(self.peek_next(), '+' | '-');
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_ascii_digit() {
                is_float = true;
                text.push('e');
                self.advance();
                if sign {
                    text.push(self.peek());
                    self.advance();
                }
                text.push_str(&self.read_while(|c| c.is_ascii_digit()));
            }
        }

        if self.peek() == 'n' && !is_ident_char(self.peek_next()) {
            self.advance();
            return self.make(TokenKind::Number(text), start);
        }

        if !is_float {
            if let Some(suffix) = self.relative_date_suffix() {
                for _ in 0..suffix.len() {
                    self.advance();
                }
                text.push_str(suffix);
                return self.make(TokenKind::Date(text), start);
            }
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(v) => self.make(TokenKind::Float(v), start),
                Err(_) => self.make(TokenKind::Invalid(format!("Invalid number: '{text}'")), start),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => self.make(TokenKind::Integer(v), start),
                Err(_) => self.make(
                    TokenKind::Invalid(format!("Integer literal out of range: {text}")),
                    start,
                ),
            }
        }
    }

    /// `YYYY-MM-DD` with optional `THH:MM:SS[.frac][Z|±HH:MM]`.
    fn scan_absolute_date(&mut self, year: String, start: Checkpoint) -> Token {
        let mut text = year;
        for _ in 0..2 {
            text.push(self.peek()); // '-'
            self.advance();
            text.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), 'T' | '-') && self.time_follows(1) {
            text.push(self.peek());
            self.advance();
            text.push_str(&self.read_while(|c| c.is_ascii_digit() || c == ':'));
            if self.peek() == '.' && self.peek_next().is_ascii_digit() {
                text.push('.');
                self.advance();
                text.push_str(&self.read_while(|c| c.is_ascii_digit()));
            }
            if self.peek() == 'Z' {
                text.push('Z');
                self.advance();
            } else if matches!(self.peek(), '+' | '-') && self.time_follows(1) {
                text.push(self.peek());
                self.advance();
                text.push_str(&self.read_while(|c| c.is_ascii_digit() || c == ':'));
            }
        }

        self.make(TokenKind::Date(text), start)
    }

    /// Scan a regex literal. The prefix letter(s) have not been consumed.
    fn scan_regex(&mut self, kind: RegexKind, start: Checkpoint) -> Token {
        // skip prefix letters up to and including the opening '/'
        while self.peek() != '/' {
            self.advance();
        }
        self.advance();

        let mut eol = None;
        let Some(pattern) = self.read_regex_part(&mut eol) else {
            return self.unterminated("Unterminated regular expression", start, eol);
        };

        let replacement = if matches!(kind, RegexKind::Substitute | RegexKind::Transliterate) {
            match self.read_regex_part(&mut eol) {
                Some(part) => Some(part),
                None => {
                    return self.unterminated("Unterminated regular expression", start, eol)
                }
            }
        } else {
            None
        };

        let flags = self.read_while(|c| c.is_ascii_alphabetic());

        self.make(
            TokenKind::Regex(RegexLiteral {
                kind,
                pattern,
                replacement,
                flags,
            }),
            start,
        )
    }

    /// Read up to the next unescaped `/`, consuming it. Escapes are kept raw.
    fn read_regex_part(&mut self, eol: &mut Option<Checkpoint>) -> Option<String> {
        let mut part = String::new();
        while !self.is_at_end() {
            let c = self.peek();
            match c {
                '/' => {
                    self.advance();
                    return Some(part);
                }
                '\\' if self.peek_next() != '\0' => {
                    part.push(c);
                    self.advance();
                    part.push(self.peek());
                    self.advance();
                }
                _ => {
                    if eol.is_none() && matches!(c, '\n' | '\r') {
                        *eol = Some(self.checkpoint());
                    }
                    part.push(c);
                    self.advance();
                }
            }
        }
        None
    }

    /// Longest-match operator and punctuation scanning.
    fn scan_operator(&mut self) -> Option<TokenKind> {
        let c0 = self.peek();
        let c1 = self.peek_next();
        let c2 = self.peek_at(2);

        let (kind, len) = match (c0, c1, c2) {
            ('<', '=', '>') => (TokenKind::Spaceship, 3),
            ('<', '<', '=') => (TokenKind::ShlAssign, 3),
            ('>', '>', '=') => (TokenKind::ShrAssign, 3),
            ('=', '=', '=') => (TokenKind::StrictEq, 3),
            ('!', '=', '=') => (TokenKind::StrictNotEq, 3),
            ('?', '?', '=') => (TokenKind::QuestionQuestionAssign, 3),
            ('.', '.', '.') => (TokenKind::Ellipsis, 3),
            (':', ':', _) => (TokenKind::DoubleColon, 2),
            ('?', '?', _) => (TokenKind::QuestionQuestion, 2),
            ('?', ':', _) => (TokenKind::QuestionColon, 2),
            ('+', '+', _) => (TokenKind::PlusPlus, 2),
            ('-', '-', _) => (TokenKind::MinusMinus, 2),
            ('+', '=', _) => (TokenKind::PlusAssign, 2),
            ('-', '=', _) => (TokenKind::MinusAssign, 2),
            ('*', '=', _) => (TokenKind::StarAssign, 2),
            ('/', '=', _) => (TokenKind::SlashAssign, 2),
            ('%', '=', _) => (TokenKind::PercentAssign, 2),
            ('&', '=', _) => (TokenKind::AmpAssign, 2),
            ('|', '=', _) => (TokenKind::PipeAssign, 2),
            ('^', '=', _) => (TokenKind::CaretAssign, 2),
            ('=', '=', _) => (TokenKind::EqEq, 2),
            ('!', '=', _) => (TokenKind::NotEq, 2),
            ('<', '=', _) => (TokenKind::Lte, 2),
            ('>', '=', _) => (TokenKind::Gte, 2),
            ('=', '~', _) => (TokenKind::Match, 2),
            ('!', '~', _) => (TokenKind::NoMatch, 2),
            ('&', '&', _) => (TokenKind::AndAnd, 2),
            ('|', '|', _) => (TokenKind::OrOr, 2),
            ('<', '<', _) => (TokenKind::Shl, 2),
            ('>', '>', _) => (TokenKind::Shr, 2),
            ('(', _, _) => (TokenKind::LParen, 1),
            (')', _, _) => (TokenKind::RParen, 1),
            ('{', _, _) => (TokenKind::LBrace, 1),
            ('}', _, _) => (TokenKind::RBrace, 1),
            ('[', _, _) => (TokenKind::LBracket, 1),
            (']', _, _) => (TokenKind::RBracket, 1),
            (';', _, _) => (TokenKind::Semicolon, 1),
            (',', _, _) => (TokenKind::Comma, 1),
            (':', _, _) => (TokenKind::Colon, 1),
            ('.', _, _) => (TokenKind::Dot, 1),
            ('?', _, _) => (TokenKind::Question, 1),
            ('+', _, _) => (TokenKind::Plus, 1),
            ('-', _, _) => (TokenKind::Minus, 1),
            ('*', _, _) => (TokenKind::Star, 1),
            ('/', _, _) => (TokenKind::Slash, 1),
            ('%', _, _) => (TokenKind::Percent, 1),
            ('=', _, _) => (TokenKind::Assign, 1),
            ('<', _, _) => (TokenKind::Lt, 1),
            ('>', _, _) => (TokenKind::Gt, 1),
            ('!', _, _) => (TokenKind::Not, 1),
            ('~', _, _) => (TokenKind::Tilde, 1),
            ('&', _, _) => (TokenKind::Amp, 1),
            ('|', _, _) => (TokenKind::Pipe, 1),
            ('^', _, _) => (TokenKind::Caret, 1),
            ('\\', _, _) => (TokenKind::Backslash, 1),
            _ => return None,
        };

        for _ in 0..len {
            self.advance();
        }
        Some(kind)
    }

    /// Group a run of unrecognized characters into one invalid token.
    fn scan_invalid(&mut self, start: Checkpoint) -> Token {
        let mut text = String::new();
        while !self.is_at_end() && is_unexpected(self.peek()) {
            text.push(self.peek());
            self.advance();
        }
        if text.is_empty() {
            text.push(self.peek());
            self.advance();
        }
        let message = if text.chars().count() == 1 {
            format!("Unexpected character: '{text}'")
        } else {
            format!("Unexpected characters: '{text}'")
        };
        self.make(TokenKind::Invalid(message), start)
    }

    // --- Lookahead predicates ---

    /// Regex flavour if the upcoming characters open a regex literal.
    fn regex_prefix(&self) -> Option<RegexKind> {
        match (self.peek(), self.peek_next(), self.peek_at(2)) {
            ('/', _, _) => Some(RegexKind::Match),
            ('m', '/', _) => Some(RegexKind::Match),
            ('s', '/', _) => Some(RegexKind::Substitute),
            ('x', '/', _) => Some(RegexKind::Extract),
            ('t', 'r', '/') => Some(RegexKind::Transliterate),
            _ => None,
        }
    }

    /// `-DD-` follows the current position.
    fn at_date_separator(&self) -> bool {
        self.peek() == '-'
            && self.peek_at(1).is_ascii_digit()
            && self.peek_at(2).is_ascii_digit()
            && self.peek_at(3) == '-'
            && self.peek_at(4).is_ascii_digit()
            && self.peek_at(5).is_ascii_digit()
    }

    /// `HH:` starts `offset` characters ahead.
    fn time_follows(&self, offset: usize) -> bool {
        self.peek_at(offset).is_ascii_digit()
            && self.peek_at(offset + 1).is_ascii_digit()
            && self.peek_at(offset + 2) == ':'
    }

    fn relative_date_suffix(&self) -> Option<&'static str> {
        let c0 = self.peek();
        let c1 = self.peek_next();
        let (suffix, len) = match (c0, c1) {
            ('m', 's') => ("ms", 2),
            ('u', 's') => ("us", 2),
            ('Y', _) => ("Y", 1),
            ('M', _) => ("M", 1),
            ('D', _) => ("D", 1),
            ('h', _) => ("h", 1),
            ('m', _) => ("m", 1),
            ('s', _) => ("s", 1),
            _ => return None,
        };
        if is_ident_char(self.peek_at(len)) {
            None
        } else {
            Some(suffix)
        }
    }

    // --- Helpers ---

    /// Build an invalid token for an unterminated construct opened at
    /// `start`. When the construct crossed a line break, the token ends at
    /// that line's end and scanning resumes from there.
    fn unterminated(
        &mut self,
        message: &str,
        start: Checkpoint,
        eol: Option<Checkpoint>,
    ) -> Token {
        if let Some(eol) = eol {
            self.restore(eol);
        }
        self.make(TokenKind::Invalid(message.into()), start)
    }

    fn make(&mut self, kind: TokenKind, start: Checkpoint) -> Token {
        let span = Span::new(self.offset_of(start.pos), self.offset_of(self.pos));
        let range = Range::new(Position::new(start.line, start.column), self.current_position());
        self.regex_allowed = matches!(kind, TokenKind::Match | TokenKind::NoMatch);
        let mut token = Token::new(kind, span, range);
        token.newline_before = start.newline_pending;
        self.newline_pending = false;
        self.at_line_start = false;
        token
    }

    fn read_ident(&mut self) -> String {
        self.read_while(is_ident_char)
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while !self.is_at_end() && pred(self.peek()) {
            text.push(self.peek());
            self.advance();
        }
        text
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            column: self.column,
            at_line_start: self.at_line_start,
            newline_pending: self.newline_pending,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.at_line_start = checkpoint.at_line_start;
        self.newline_pending = checkpoint.newline_pending;
    }

    fn offset_of(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, n: usize) -> char {
        self.chars.get(self.pos + n).map_or('\0', |(_, c)| *c)
    }

    /// Consume one character, tracking line breaks. A `\r` directly followed
    /// by `\n` does not count as a break of its own.
    fn advance(&mut self) {
        let Some(&(_, c)) = self.chars.get(self.pos) else {
            return;
        };
        self.pos += 1;
        match c {
            '\n' => self.new_line(),
            '\r' if self.peek() != '\n' => self.new_line(),
            _ => self.column += 1,
        }
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 1;
        self.at_line_start = true;
        self.newline_pending = true;
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields every token including the final [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that cannot start any token.
fn is_unexpected(c: char) -> bool {
    !(is_ident_char(c) || c.is_whitespace() || "\"'`$#%(){}[];,:.?+-*/=<>!&|^~\\".contains(c))
}
