//! The main scanner: drives the token loop and owns indentation, bracket,
//! comment, and line-tracking state.
//!
//! Scanning is total. Every input produces a finite token stream that ends
//! with an `EndOfStream` token; anomalies (unterminated strings, stray
//! backslashes, unknown characters, inconsistent dedents) are encoded in the
//! tokens themselves rather than reported out-of-band.

use crate::chars::{
    is_binary_digit, is_decimal_digit, is_hex_digit, is_identifier_continue, is_identifier_start,
    is_octal_digit,
};
use crate::literals;
use crate::ranges::TextRangeCollection;
use crate::token::{
    Comment, KeywordKind, NewLineKind, NumberToken, NumberValue, OperatorKind, StringToken,
    StringTokenFlags, Token, TokenKind,
};
use crate::TextRange;

/// Everything the parser needs from one pass over the source.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerOutput {
    /// The token stream, sorted and non-overlapping, ending in `EndOfStream`.
    pub tokens: TextRangeCollection<Token>,
    /// One range per physical line, terminator bytes included. A trailing
    /// terminator implies a final empty line; empty input has one empty line.
    pub lines: TextRangeCollection<TextRange>,
    /// Most frequent line terminator in the source (`"\n"` when unseen).
    pub predominant_end_of_line: String,
    /// `"\t"` when tab indentation dominates, otherwise the narrowest run of
    /// spaces used as an indent step (four spaces when nothing is indented).
    pub predominant_tab_sequence: String,
    /// The quote character opening the majority of string literals.
    pub predominant_single_quote_character: char,
}

/// Tokenize a whole source string.
pub fn tokenize(text: &str) -> TokenizerOutput {
    Tokenizer::new(text).tokenize()
}

/// Tokenize `length` bytes of `text` starting at `start`.
///
/// Token and line ranges are reported in whole-text coordinates. `start` and
/// `start + length` must lie on character boundaries; an out-of-range or
/// misaligned slice tokenizes as empty.
pub fn tokenize_range(text: &str, start: u32, length: u32) -> TokenizerOutput {
    let begin = start as usize;
    let end = begin.saturating_add(length as usize);
    let slice = text.get(begin..end).unwrap_or("");
    Tokenizer::with_base(slice, begin).tokenize()
}

#[derive(Debug, Clone, Copy)]
struct IndentLevel {
    /// Indent measured with tabs counting as one column.
    tab1: u32,
    /// Indent measured with tabs advancing to the next multiple of 8.
    tab8: u32,
    has_spaces: bool,
    has_tabs: bool,
}

impl IndentLevel {
    const ZERO: IndentLevel = IndentLevel {
        tab1: 0,
        tab8: 0,
        has_spaces: false,
        has_tabs: false,
    };
}

pub struct Tokenizer<'a> {
    input: &'a str,
    /// Offset added to every produced range (sub-range tokenization).
    base: usize,
    pos: usize,

    tokens: Vec<Token>,
    lines: Vec<TextRange>,
    line_start: usize,

    indents: Vec<IndentLevel>,
    paren_depth: u32,
    pending_comments: Vec<Comment>,
    at_line_start: bool,

    lf_count: u32,
    crlf_count: u32,
    cr_count: u32,
    tab_indent_lines: u32,
    space_indent_lines: u32,
    space_indent_unit: u32,
    single_quote_count: u32,
    double_quote_count: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_base(input, 0)
    }

    fn with_base(input: &'a str, base: usize) -> Self {
        Self {
            input,
            base,
            pos: 0,
            tokens: Vec::new(),
            lines: Vec::new(),
            line_start: 0,
            indents: Vec::new(),
            paren_depth: 0,
            pending_comments: Vec::new(),
            at_line_start: true,
            lf_count: 0,
            crlf_count: 0,
            cr_count: 0,
            tab_indent_lines: 0,
            space_indent_lines: 0,
            space_indent_unit: 0,
            single_quote_count: 0,
            double_quote_count: 0,
        }
    }

    pub fn tokenize(mut self) -> TokenizerOutput {
        // A byte-order mark at the start of the file is not content.
        if self.base == 0 && self.input.starts_with('\u{FEFF}') {
            self.pos = '\u{FEFF}'.len_utf8();
        }

        while self.pos < self.input.len() {
            if self.at_line_start {
                if self.paren_depth == 0 {
                    self.set_indent();
                } else {
                    // Indentation is collected but suppressed inside brackets.
                    self.skip_line_whitespace();
                }
                self.at_line_start = false;
            } else {
                self.skip_line_whitespace();
            }

            if self.pos >= self.input.len() {
                break;
            }
            self.next_token();
        }

        // The stream always ends NewLine (real or implied), dedents back to
        // column zero, then EndOfStream.
        if !matches!(self.tokens.last(), Some(tok) if tok.is_new_line()) {
            let pos = self.pos;
            self.push_token(TokenKind::NewLine(NewLineKind::Implied), pos, pos);
        }
        self.unwind_indents(0);
        let pos = self.pos;
        self.push_token(TokenKind::EndOfStream, pos, pos);

        self.lines
            .push(TextRange::new(self.base + self.line_start, self.base + self.pos));

        TokenizerOutput {
            predominant_end_of_line: self.predominant_end_of_line(),
            predominant_tab_sequence: self.predominant_tab_sequence(),
            predominant_single_quote_character: if self.double_quote_count
                > self.single_quote_count
            {
                '"'
            } else {
                '\''
            },
            tokens: TextRangeCollection::new(self.tokens),
            lines: TextRangeCollection::new(self.lines),
        }
    }

    // ----- cursor helpers -------------------------------------------------

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn peek_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        let comments = std::mem::take(&mut self.pending_comments);
        self.tokens.push(Token {
            kind,
            range: TextRange::new(self.base + start, self.base + end),
            comments,
        });
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push_token(kind, start, self.pos);
    }

    fn skip_line_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | 0x0C) = self.peek_byte() {
            self.pos += 1;
        }
    }

    /// Close out the current physical line at `self.pos`.
    fn record_line(&mut self) {
        self.lines
            .push(TextRange::new(self.base + self.line_start, self.base + self.pos));
        self.line_start = self.pos;
    }

    // ----- indentation ----------------------------------------------------

    fn set_indent(&mut self) {
        let mut tab1 = 0u32;
        let mut tab8 = 0u32;
        let mut has_spaces = false;
        let mut has_tabs = false;
        loop {
            match self.peek_byte() {
                Some(b' ') => {
                    tab1 += 1;
                    tab8 += 1;
                    has_spaces = true;
                    self.pos += 1;
                }
                Some(b'\t') => {
                    tab1 += 1;
                    tab8 = (tab8 / 8 + 1) * 8;
                    has_tabs = true;
                    self.pos += 1;
                }
                // Form feed resets the column count.
                Some(0x0C) => {
                    tab1 = 0;
                    tab8 = 0;
                    has_spaces = false;
                    has_tabs = false;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        // Blank and comment-only lines never change indentation.
        match self.peek_byte() {
            None | Some(b'\n') | Some(b'\r') | Some(b'#') => return,
            _ => {}
        }

        if has_tabs {
            self.tab_indent_lines += 1;
        } else if has_spaces {
            self.space_indent_lines += 1;
            if self.space_indent_unit == 0 || tab1 < self.space_indent_unit {
                self.space_indent_unit = tab1;
            }
        }

        let top = self.indents.last().copied().unwrap_or(IndentLevel::ZERO);
        if tab8 > top.tab8 {
            // The indent is ambiguous when tabs and spaces mix such that the
            // tab-1 measure disagrees with the tab-8 measure about ordering.
            let is_ambiguous = (top.has_spaces || has_spaces)
                && (top.has_tabs || has_tabs)
                && top.tab1 >= tab1;
            self.indents.push(IndentLevel {
                tab1,
                tab8,
                has_spaces,
                has_tabs,
            });
            let pos = self.pos;
            self.push_token(
                TokenKind::Indent {
                    amount: tab8,
                    is_ambiguous,
                },
                pos,
                pos,
            );
        } else if tab8 < top.tab8 {
            self.unwind_indents(tab8);
        }
    }

    /// Pop indent levels above `new_tab8`, emitting one dedent per pop.
    /// Intermediate dedents land exactly on the level they reveal; the final
    /// dedent reports the new amount and whether it matched.
    fn unwind_indents(&mut self, new_tab8: u32) {
        let mut reveals = Vec::new();
        while let Some(top) = self.indents.last() {
            if top.tab8 <= new_tab8 {
                break;
            }
            self.indents.pop();
            reveals.push(self.indents.last().map_or(0, |level| level.tab8));
        }

        let pos = self.pos;
        let count = reveals.len();
        for (index, reveal) in reveals.into_iter().enumerate() {
            let (amount, matches_indent) = if index + 1 == count {
                (new_tab8, new_tab8 == reveal)
            } else {
                (reveal, true)
            };
            self.push_token(
                TokenKind::Dedent {
                    amount,
                    matches_indent,
                },
                pos,
                pos,
            );
        }
    }

    // ----- line terminators and comments ----------------------------------

    fn handle_newline(&mut self) {
        let start = self.pos;
        let kind = if self.peek_byte() == Some(b'\r') {
            self.pos += 1;
            if self.peek_byte() == Some(b'\n') {
                self.pos += 1;
                NewLineKind::CarriageReturnLineFeed
            } else {
                NewLineKind::CarriageReturn
            }
        } else {
            self.pos += 1;
            NewLineKind::LineFeed
        };
        match kind {
            NewLineKind::LineFeed => self.lf_count += 1,
            NewLineKind::CarriageReturn => self.cr_count += 1,
            NewLineKind::CarriageReturnLineFeed => self.crlf_count += 1,
            NewLineKind::Implied => {}
        }
        self.record_line();
        self.at_line_start = true;

        // Terminators are swallowed inside brackets; consecutive newlines
        // collapse into the first token.
        if self.paren_depth > 0 || matches!(self.tokens.last(), Some(tok) if tok.is_new_line()) {
            return;
        }
        self.push_token(TokenKind::NewLine(kind), start, self.pos);
    }

    /// Consume a terminator inside a string or after a line-continuation
    /// backslash: the physical line ends but no token is produced.
    fn consume_line_terminator(&mut self) {
        if self.peek_byte() == Some(b'\r') {
            self.pos += 1;
            if self.peek_byte() == Some(b'\n') {
                self.pos += 1;
            }
        } else {
            self.pos += 1;
        }
        self.record_line();
    }

    fn read_comment(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek_byte() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
        self.pending_comments.push(Comment {
            range: TextRange::new(self.base + start, self.base + self.pos),
        });
    }

    fn handle_backslash(&mut self) {
        let start = self.pos;
        match self.peek_byte_at(1) {
            // Line continuation: both characters vanish and the logical line
            // continues on the next physical line.
            Some(b'\n' | b'\r') => {
                self.pos += 1;
                self.consume_line_terminator();
            }
            _ => {
                self.pos += 1;
                self.push_token(TokenKind::Invalid, start, self.pos);
            }
        }
    }

    // ----- token dispatch -------------------------------------------------

    fn next_token(&mut self) {
        let start = self.pos;
        let Some(b) = self.peek_byte() else {
            return;
        };
        match b {
            b'\n' | b'\r' => self.handle_newline(),
            b'#' => self.read_comment(),
            b'\\' => self.handle_backslash(),
            b'0'..=b'9' => self.read_number(),
            b'.' => {
                if matches!(self.peek_byte_at(1), Some(b'0'..=b'9')) {
                    self.read_number();
                } else if self.peek_byte_at(1) == Some(b'.') && self.peek_byte_at(2) == Some(b'.') {
                    self.pos += 3;
                    self.push_token(TokenKind::Ellipsis, start, self.pos);
                } else {
                    self.single(TokenKind::Dot);
                }
            }
            b'\'' | b'"' => self.read_string(StringTokenFlags::empty(), 0),
            b'(' => {
                self.paren_depth += 1;
                self.single(TokenKind::OpenParenthesis);
            }
            b')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.single(TokenKind::CloseParenthesis);
            }
            b'[' => {
                self.paren_depth += 1;
                self.single(TokenKind::OpenBracket);
            }
            b']' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.single(TokenKind::CloseBracket);
            }
            b'{' => {
                self.paren_depth += 1;
                self.single(TokenKind::OpenCurlyBrace);
            }
            b'}' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.single(TokenKind::CloseCurlyBrace);
            }
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b':' => {
                if self.peek_byte_at(1) == Some(b'=') {
                    self.pos += 2;
                    self.push_token(TokenKind::Operator(OperatorKind::Walrus), start, self.pos);
                } else {
                    self.single(TokenKind::Colon);
                }
            }
            b'-' => match self.peek_byte_at(1) {
                Some(b'>') => {
                    self.pos += 2;
                    self.push_token(TokenKind::Arrow, start, self.pos);
                }
                Some(b'=') => {
                    self.pos += 2;
                    self.push_token(
                        TokenKind::Operator(OperatorKind::SubtractEqual),
                        start,
                        self.pos,
                    );
                }
                _ => self.single(TokenKind::Operator(OperatorKind::Subtract)),
            },
            b'+' | b'*' | b'/' | b'%' | b'@' | b'&' | b'|' | b'^' | b'~' | b'<' | b'>' | b'='
            | b'!' => self.read_operator(),
            _ => {
                let ch = self.peek_char();
                if is_identifier_start(ch) {
                    self.read_identifier_or_string();
                } else {
                    self.pos += ch.len_utf8().max(1);
                    self.push_token(TokenKind::Invalid, start, self.pos);
                }
            }
        }
    }

    fn read_operator(&mut self) {
        let start = self.pos;
        let b = self.bytes()[start];
        let one = self.peek_byte_at(1);
        let two = self.peek_byte_at(2);

        let (kind, len) = match b {
            b'+' => match one {
                Some(b'=') => (OperatorKind::AddEqual, 2),
                _ => (OperatorKind::Add, 1),
            },
            b'*' => match (one, two) {
                (Some(b'*'), Some(b'=')) => (OperatorKind::PowerEqual, 3),
                (Some(b'*'), _) => (OperatorKind::Power, 2),
                (Some(b'='), _) => (OperatorKind::MultiplyEqual, 2),
                _ => (OperatorKind::Multiply, 1),
            },
            b'/' => match (one, two) {
                (Some(b'/'), Some(b'=')) => (OperatorKind::FloorDivideEqual, 3),
                (Some(b'/'), _) => (OperatorKind::FloorDivide, 2),
                (Some(b'='), _) => (OperatorKind::DivideEqual, 2),
                _ => (OperatorKind::Divide, 1),
            },
            b'%' => match one {
                Some(b'=') => (OperatorKind::ModEqual, 2),
                _ => (OperatorKind::Mod, 1),
            },
            b'@' => match one {
                Some(b'=') => (OperatorKind::MatrixMultiplyEqual, 2),
                _ => (OperatorKind::MatrixMultiply, 1),
            },
            b'&' => match one {
                Some(b'=') => (OperatorKind::BitwiseAndEqual, 2),
                _ => (OperatorKind::BitwiseAnd, 1),
            },
            b'|' => match one {
                Some(b'=') => (OperatorKind::BitwiseOrEqual, 2),
                _ => (OperatorKind::BitwiseOr, 1),
            },
            b'^' => match one {
                Some(b'=') => (OperatorKind::BitwiseXorEqual, 2),
                _ => (OperatorKind::BitwiseXor, 1),
            },
            b'~' => (OperatorKind::BitwiseInvert, 1),
            b'=' => match one {
                Some(b'=') => (OperatorKind::Equals, 2),
                _ => (OperatorKind::Assign, 1),
            },
            b'<' => match (one, two) {
                (Some(b'<'), Some(b'=')) => (OperatorKind::LeftShiftEqual, 3),
                (Some(b'<'), _) => (OperatorKind::LeftShift, 2),
                (Some(b'='), _) => (OperatorKind::LessThanOrEqual, 2),
                _ => (OperatorKind::LessThan, 1),
            },
            b'>' => match (one, two) {
                (Some(b'>'), Some(b'=')) => (OperatorKind::RightShiftEqual, 3),
                (Some(b'>'), _) => (OperatorKind::RightShift, 2),
                (Some(b'='), _) => (OperatorKind::GreaterThanOrEqual, 2),
                _ => (OperatorKind::GreaterThan, 1),
            },
            // `!` only forms a token with `=`.
            _ => match one {
                Some(b'=') => (OperatorKind::NotEquals, 2),
                _ => {
                    self.pos += 1;
                    self.push_token(TokenKind::Invalid, start, self.pos);
                    return;
                }
            },
        };

        self.pos += len;
        self.push_token(TokenKind::Operator(kind), start, self.pos);
    }

    fn read_identifier_or_string(&mut self) {
        let start = self.pos;

        // One or two prefix letters directly in front of a quote start a
        // string literal. Invalid letter combinations (e.g. `bf`) still
        // tokenize as strings; the parser diagnoses them.
        if let Some(first) = self.peek_byte().and_then(prefix_flag) {
            match self.peek_byte_at(1) {
                Some(b'\'' | b'"') => return self.read_string(first, 1),
                Some(second) => {
                    if let Some(second) = prefix_flag(second) {
                        if first != second
                            && matches!(self.peek_byte_at(2), Some(b'\'' | b'"'))
                        {
                            return self.read_string(first | second, 2);
                        }
                    }
                }
                None => {}
            }
        }

        while self.pos < self.input.len() {
            let ch = self.peek_char();
            if is_identifier_continue(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }

        let kind = match KeywordKind::from_identifier(&self.input[start..self.pos]) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };
        self.push_token(kind, start, self.pos);
    }

    // ----- strings --------------------------------------------------------

    fn read_string(&mut self, mut flags: StringTokenFlags, prefix_len: usize) {
        let start = self.pos;
        self.pos += prefix_len;

        let quote = self.bytes()[self.pos];
        if quote == b'\'' {
            flags |= StringTokenFlags::SINGLE_QUOTE;
            self.single_quote_count += 1;
        } else {
            flags |= StringTokenFlags::DOUBLE_QUOTE;
            self.double_quote_count += 1;
        }

        let quote_len = if self.peek_byte_at(1) == Some(quote) && self.peek_byte_at(2) == Some(quote)
        {
            flags |= StringTokenFlags::TRIPLICATE;
            3
        } else {
            1
        };
        self.pos += quote_len;
        let triple = quote_len == 3;

        let value_start = self.pos;
        let value_end;
        loop {
            let Some(b) = self.peek_byte() else {
                flags |= StringTokenFlags::UNTERMINATED;
                value_end = self.pos;
                break;
            };
            match b {
                // An escape consumes the next character unconditionally; in
                // raw mode it still shields quotes and terminators, and the
                // text is kept verbatim either way.
                b'\\' => {
                    self.pos += 1;
                    match self.peek_byte() {
                        Some(b'\n' | b'\r') => self.consume_line_terminator(),
                        Some(_) => self.pos += self.peek_char().len_utf8(),
                        None => {}
                    }
                }
                b'\n' | b'\r' => {
                    if triple {
                        self.consume_line_terminator();
                    } else {
                        // The terminator stays unconsumed; the main loop
                        // emits the newline token.
                        flags |= StringTokenFlags::UNTERMINATED;
                        value_end = self.pos;
                        break;
                    }
                }
                _ if b == quote => {
                    if !triple {
                        value_end = self.pos;
                        self.pos += 1;
                        break;
                    }
                    if self.peek_byte_at(1) == Some(quote) && self.peek_byte_at(2) == Some(quote) {
                        value_end = self.pos;
                        self.pos += 3;
                        break;
                    }
                    self.pos += 1;
                }
                _ => self.pos += self.peek_char().len_utf8(),
            }
        }

        let token = StringToken {
            flags,
            prefix_length: prefix_len as u32,
            quote_mark_length: quote_len as u32,
            escaped_value: self.input[value_start..value_end].into(),
        };
        self.push_token(TokenKind::String(Box::new(token)), start, self.pos);
    }

    // ----- numbers --------------------------------------------------------

    fn read_number(&mut self) {
        let start = self.pos;

        if self.peek_byte() == Some(b'0') {
            if let Some(prefix) = self.peek_byte_at(1) {
                let radix = match prefix {
                    b'x' | b'X' => Some(16),
                    b'o' | b'O' => Some(8),
                    b'b' | b'B' => Some(2),
                    _ => None,
                };
                if let Some(radix) = radix {
                    self.pos += 2;
                    let digits_start = self.pos;
                    self.consume_digit_run(radix);
                    match literals::integer_value(&self.input[digits_start..self.pos], radix) {
                        Some(value) => {
                            self.push_token(
                                TokenKind::Number(NumberToken {
                                    value: NumberValue::Int(value),
                                    is_imaginary: false,
                                }),
                                start,
                                self.pos,
                            );
                        }
                        None => {
                            // No digits after the base prefix: the zero
                            // stands alone and the rest is rescanned.
                            self.pos = start + 1;
                            self.push_token(
                                TokenKind::Number(NumberToken {
                                    value: NumberValue::Int(0.into()),
                                    is_imaginary: false,
                                }),
                                start,
                                self.pos,
                            );
                        }
                    }
                    return;
                }
            }
        }

        let mut is_float = false;
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            self.consume_digit_run(10);
            is_float = true;
        } else {
            self.consume_digit_run(10);
            if self.peek_byte() == Some(b'.') {
                self.pos += 1;
                self.consume_digit_run(10);
                is_float = true;
            }
        }

        // The exponent is consumed only when digits actually follow;
        // otherwise `1e` is a number and an identifier.
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let consumed = match (self.peek_byte_at(1), self.peek_byte_at(2)) {
                (Some(digit), _) if digit.is_ascii_digit() => {
                    self.pos += 2;
                    true
                }
                (Some(b'+' | b'-'), Some(digit)) if digit.is_ascii_digit() => {
                    self.pos += 3;
                    true
                }
                _ => false,
            };
            if consumed {
                self.consume_digit_run(10);
                is_float = true;
            }
        }

        let value_end = self.pos;
        let mut is_imaginary = false;
        if matches!(self.peek_byte(), Some(b'j' | b'J')) {
            is_imaginary = true;
            self.pos += 1;
        }

        let text = &self.input[start..value_end];
        let value = if is_float || is_imaginary {
            NumberValue::Float(literals::float_value(text))
        } else {
            NumberValue::Int(literals::integer_value(text, 10).unwrap_or_default())
        };
        self.push_token(
            TokenKind::Number(NumberToken {
                value,
                is_imaginary,
            }),
            start,
            self.pos,
        );
    }

    fn consume_digit_run(&mut self, radix: u32) {
        while let Some(b) = self.peek_byte() {
            let ch = b as char;
            let is_digit = match radix {
                2 => is_binary_digit(ch),
                8 => is_octal_digit(ch),
                16 => is_hex_digit(ch),
                _ => is_decimal_digit(ch),
            };
            if is_digit {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    // ----- output statistics ----------------------------------------------

    fn predominant_end_of_line(&self) -> String {
        let mut best = ("\n", self.lf_count);
        if self.crlf_count > best.1 {
            best = ("\r\n", self.crlf_count);
        }
        if self.cr_count > best.1 {
            best = ("\r", self.cr_count);
        }
        best.0.to_string()
    }

    fn predominant_tab_sequence(&self) -> String {
        if self.tab_indent_lines > self.space_indent_lines {
            "\t".to_string()
        } else if self.space_indent_unit > 0 {
            " ".repeat(self.space_indent_unit as usize)
        } else {
            "    ".to_string()
        }
    }
}

fn prefix_flag(b: u8) -> Option<StringTokenFlags> {
    match b.to_ascii_lowercase() {
        b'b' => Some(StringTokenFlags::BYTES),
        b'u' => Some(StringTokenFlags::UNICODE),
        b'r' => Some(StringTokenFlags::RAW),
        b'f' => Some(StringTokenFlags::FORMAT),
        _ => None,
    }
}
