//! Token data model: the tagged sum type produced by the scanner, plus the
//! keyword table and operator classification helpers used by the parser.

use bitflags::bitflags;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::ranges::Ranged;
use crate::TextRange;

/// The concrete line-terminator sequence behind a `NewLine` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NewLineKind {
    LineFeed,
    CarriageReturn,
    CarriageReturnLineFeed,
    /// Synthesized at end of input when no terminator precedes it; length 0.
    Implied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum KeywordKind {
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Class,
    Continue,
    /// `__debug__`.
    Debug,
    Def,
    Del,
    Elif,
    Else,
    Except,
    False,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    None,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    True,
    Try,
    While,
    With,
    Yield,
}

impl KeywordKind {
    /// Keyword lookup for a scanned identifier.
    ///
    /// Soft keywords (`async`, `await`) are included; the parser re-interprets
    /// them as names where the grammar allows it.
    pub fn from_identifier(text: &str) -> Option<KeywordKind> {
        Some(match text {
            "False" => KeywordKind::False,
            "None" => KeywordKind::None,
            "True" => KeywordKind::True,
            "and" => KeywordKind::And,
            "as" => KeywordKind::As,
            "assert" => KeywordKind::Assert,
            "async" => KeywordKind::Async,
            "await" => KeywordKind::Await,
            "break" => KeywordKind::Break,
            "class" => KeywordKind::Class,
            "continue" => KeywordKind::Continue,
            "def" => KeywordKind::Def,
            "del" => KeywordKind::Del,
            "elif" => KeywordKind::Elif,
            "else" => KeywordKind::Else,
            "except" => KeywordKind::Except,
            "finally" => KeywordKind::Finally,
            "for" => KeywordKind::For,
            "from" => KeywordKind::From,
            "global" => KeywordKind::Global,
            "if" => KeywordKind::If,
            "import" => KeywordKind::Import,
            "in" => KeywordKind::In,
            "is" => KeywordKind::Is,
            "lambda" => KeywordKind::Lambda,
            "nonlocal" => KeywordKind::Nonlocal,
            "not" => KeywordKind::Not,
            "or" => KeywordKind::Or,
            "pass" => KeywordKind::Pass,
            "raise" => KeywordKind::Raise,
            "return" => KeywordKind::Return,
            "try" => KeywordKind::Try,
            "while" => KeywordKind::While,
            "with" => KeywordKind::With,
            "yield" => KeywordKind::Yield,
            "__debug__" => KeywordKind::Debug,
            _ => return Option::None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OperatorKind {
    Add,
    AddEqual,
    Assign,
    BitwiseAnd,
    BitwiseAndEqual,
    BitwiseInvert,
    BitwiseOr,
    BitwiseOrEqual,
    BitwiseXor,
    BitwiseXorEqual,
    Divide,
    DivideEqual,
    Equals,
    FloorDivide,
    FloorDivideEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LeftShift,
    LeftShiftEqual,
    LessThan,
    LessThanOrEqual,
    /// `@`: matrix multiplication, also the decorator marker.
    MatrixMultiply,
    MatrixMultiplyEqual,
    Mod,
    ModEqual,
    Multiply,
    MultiplyEqual,
    NotEquals,
    Power,
    PowerEqual,
    RightShift,
    RightShiftEqual,
    Subtract,
    SubtractEqual,
    /// `:=`.
    Walrus,
}

impl OperatorKind {
    /// Comparison operators: `< <= > >= == !=`.
    ///
    /// The keyword comparisons (`in`, `not in`, `is`, `is not`) are keyword
    /// tokens; the parser recognizes those through its own lookahead.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            OperatorKind::LessThan
                | OperatorKind::LessThanOrEqual
                | OperatorKind::GreaterThan
                | OperatorKind::GreaterThanOrEqual
                | OperatorKind::Equals
                | OperatorKind::NotEquals
        )
    }

    /// Assignment operators: `=` and every augmented assignment.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            OperatorKind::Assign
                | OperatorKind::AddEqual
                | OperatorKind::SubtractEqual
                | OperatorKind::MultiplyEqual
                | OperatorKind::DivideEqual
                | OperatorKind::FloorDivideEqual
                | OperatorKind::ModEqual
                | OperatorKind::PowerEqual
                | OperatorKind::LeftShiftEqual
                | OperatorKind::RightShiftEqual
                | OperatorKind::BitwiseAndEqual
                | OperatorKind::BitwiseOrEqual
                | OperatorKind::BitwiseXorEqual
                | OperatorKind::MatrixMultiplyEqual
        )
    }
}

bitflags! {
    /// Properties of a scanned string literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StringTokenFlags: u8 {
        const SINGLE_QUOTE = 1 << 0;
        const DOUBLE_QUOTE = 1 << 1;
        /// Opened (and, unless unterminated, closed) by three quotes.
        const TRIPLICATE = 1 << 2;
        const RAW = 1 << 3;
        const UNICODE = 1 << 4;
        const BYTES = 1 << 5;
        const FORMAT = 1 << 6;
        const UNTERMINATED = 1 << 7;
    }
}

impl Serialize for StringTokenFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for StringTokenFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(StringTokenFlags::from_bits_retain(u8::deserialize(
            deserializer,
        )?))
    }
}

/// Payload of a string literal token.
///
/// `escaped_value` is the raw inner text between the quote markers (or from
/// the opening marker to the line end / end of input when unterminated),
/// entirely undecoded. Decoding happens lazily in [`Self::unescaped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringToken {
    pub flags: StringTokenFlags,
    /// Bytes of prefix letters (`r`, `b`, `f`, `u` combinations) before the
    /// opening quote.
    pub prefix_length: u32,
    /// 1 for `'`/`"`, 3 for triple quotes.
    pub quote_mark_length: u32,
    pub escaped_value: Box<str>,
}

/// Numeric literal value: floats are host doubles, integers are exact at any
/// width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumberValue {
    Int(BigInt),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberToken {
    pub value: NumberValue,
    /// `j`/`J` suffix.
    pub is_imaginary: bool,
}

impl NumberToken {
    /// True iff the literal had no decimal point, exponent, or imaginary
    /// suffix.
    pub fn is_integer(&self) -> bool {
        matches!(self.value, NumberValue::Int(_)) && !self.is_imaginary
    }
}

/// A `#` comment, recorded as a range so the text stays borrowed from the
/// source. Comments are never standalone tokens; they ride on the next
/// emitted token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub range: TextRange,
}

impl Comment {
    /// The comment text including the leading `#`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start as usize..self.range.end as usize]
    }

    /// The comment text after the leading `#`.
    pub fn value<'a>(&self, source: &'a str) -> &'a str {
        self.text(source).trim_start_matches('#')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    NewLine(NewLineKind),
    Indent {
        /// Column width of the indentation after tab expansion (tab stops of 8).
        amount: u32,
        /// Tabs and spaces are mixed such that tab-1 and tab-8 measures
        /// disagree about the ordering versus the enclosing level.
        is_ambiguous: bool,
    },
    Dedent {
        amount: u32,
        /// The new indentation exactly matches a previously pushed level.
        matches_indent: bool,
    },
    Identifier,
    Keyword(KeywordKind),
    Number(NumberToken),
    Operator(OperatorKind),
    String(Box<StringToken>),
    Dot,
    Ellipsis,
    Colon,
    Semicolon,
    Comma,
    /// `->`.
    Arrow,
    OpenParenthesis,
    CloseParenthesis,
    OpenBracket,
    CloseBracket,
    OpenCurlyBrace,
    CloseCurlyBrace,
    Invalid,
    EndOfStream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    /// Comments lexically preceding this token. Usually empty.
    pub comments: Vec<Comment>,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            comments: Vec::new(),
        }
    }

    /// The exact source slice this token covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start as usize..self.range.end as usize]
    }

    pub fn is_new_line(&self) -> bool {
        matches!(self.kind, TokenKind::NewLine(_))
    }

    pub fn as_string(&self) -> Option<&StringToken> {
        match &self.kind {
            TokenKind::String(tok) => Some(tok),
            _ => Option::None,
        }
    }
}

impl Ranged for Token {
    #[inline]
    fn range(&self) -> TextRange {
        self.range
    }
}
