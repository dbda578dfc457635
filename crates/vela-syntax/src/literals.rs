//! Lazy decoding of scanned string literals.
//!
//! The scanner records only the raw text between the quote markers
//! ([`StringToken::escaped_value`]). Decoding escape sequences, splitting
//! f-string bodies into literal/expression segments, and the related error
//! reporting all happen here, on demand, so the hot scanning path never pays
//! for them.
//!
//! Also hosts the numeric value conversion used by the scanner: underscore
//! separators are stripped and the digits parsed through the host float
//! parser or the arbitrary-width integer parser.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::token::{StringToken, StringTokenFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum UnescapeErrorKind {
    /// Malformed or unrecognized escape sequence; the characters are kept
    /// verbatim in the cooked value.
    InvalidEscapeSequence,
    /// A backslash inside an f-string expression segment.
    EscapeWithinFormatExpression,
    /// A bare `}` in f-string literal text (must be doubled).
    SingleCloseBraceWithinFormatLiteral,
    /// An f-string expression that never saw its closing `}`.
    UnterminatedFormatExpression,
}

impl fmt::Display for UnescapeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnescapeErrorKind::InvalidEscapeSequence => "invalid escape sequence",
            UnescapeErrorKind::EscapeWithinFormatExpression => {
                "escape sequence within format expression"
            }
            UnescapeErrorKind::SingleCloseBraceWithinFormatLiteral => {
                "single close brace within format string literal"
            }
            UnescapeErrorKind::UnterminatedFormatExpression => "unterminated format expression",
        };
        f.write_str(text)
    }
}

/// A decoding problem, positioned relative to the token's `escaped_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error, Serialize, Deserialize)]
#[error("{kind} at offset {offset}")]
pub struct UnescapeError {
    pub offset: u32,
    pub length: u32,
    pub kind: UnescapeErrorKind,
}

/// One piece of an f-string body: literal text or an embedded expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatStringSegment {
    /// Byte offset of the segment within `escaped_value`.
    pub offset: u32,
    /// Byte length of the segment's source span within `escaped_value`.
    pub length: u32,
    /// Cooked text for literal segments; verbatim inner text for expressions.
    pub value: String,
    pub is_expression: bool,
}

/// Result of decoding a string token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnescapedString {
    pub value: String,
    pub errors: Vec<UnescapeError>,
    /// Non-empty only for format strings; preserves input order.
    pub format_segments: Vec<FormatStringSegment>,
    /// A bytes literal whose cooked value contains a code point >= 0x80.
    pub non_ascii_in_bytes: bool,
}

/// Resolves `\N{NAME}` escapes.
///
/// The Unicode name table lives outside this crate; the tokenizer only needs
/// the seam. A well-formed name the resolver does not know is kept verbatim
/// without an error.
pub trait UnicodeNameResolver {
    fn resolve(&self, name: &str) -> Option<char>;
}

/// The default resolver: knows no names.
pub struct NoNamedCharacters;

impl UnicodeNameResolver for NoNamedCharacters {
    fn resolve(&self, _name: &str) -> Option<char> {
        None
    }
}

impl StringToken {
    /// Decode the literal without a Unicode name table; `\N{...}` escapes
    /// with well-formed names are kept verbatim.
    pub fn unescaped(&self) -> UnescapedString {
        self.unescaped_with_names(&NoNamedCharacters)
    }

    pub fn unescaped_with_names(&self, names: &dyn UnicodeNameResolver) -> UnescapedString {
        let mut decoder = Decoder {
            text: &self.escaped_value,
            bytes: self.escaped_value.as_bytes(),
            raw: self.flags.contains(StringTokenFlags::RAW),
            names,
            errors: Vec::new(),
        };

        let (value, format_segments) = if self.flags.contains(StringTokenFlags::FORMAT) {
            let segments = decoder.split_format();
            let value = segments.iter().map(|seg| seg.value.as_str()).collect();
            (value, segments)
        } else if decoder.raw {
            (self.escaped_value.to_string(), Vec::new())
        } else {
            (decoder.decode_all(), Vec::new())
        };

        let non_ascii_in_bytes = self.flags.contains(StringTokenFlags::BYTES)
            && value.chars().any(|ch| ch as u32 >= 0x80);

        UnescapedString {
            value,
            errors: decoder.errors,
            format_segments,
            non_ascii_in_bytes,
        }
    }
}

struct Decoder<'a> {
    text: &'a str,
    bytes: &'a [u8],
    raw: bool,
    names: &'a dyn UnicodeNameResolver,
    errors: Vec<UnescapeError>,
}

impl<'a> Decoder<'a> {
    fn error(&mut self, kind: UnescapeErrorKind, offset: usize, length: usize) {
        self.errors.push(UnescapeError {
            offset: offset as u32,
            length: length as u32,
            kind,
        });
    }

    /// Decode a plain (non-format) string body.
    fn decode_all(&mut self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut idx = 0;
        while idx < self.bytes.len() {
            match self.bytes[idx..].iter().position(|&b| b == b'\\') {
                Some(0) => idx = self.decode_escape(idx, &mut out),
                Some(run) => {
                    out.push_str(&self.text[idx..idx + run]);
                    idx += run;
                }
                None => {
                    out.push_str(&self.text[idx..]);
                    break;
                }
            }
        }
        out
    }

    /// Decode one escape sequence starting at `idx` (which holds `\`),
    /// appending the cooked characters to `out`. Returns the index just past
    /// the sequence.
    fn decode_escape(&mut self, idx: usize, out: &mut String) -> usize {
        debug_assert_eq!(self.bytes[idx], b'\\');
        let Some(&next) = self.bytes.get(idx + 1) else {
            // Backslash at the very end of the (unterminated) literal.
            self.error(UnescapeErrorKind::InvalidEscapeSequence, idx, 1);
            out.push('\\');
            return idx + 1;
        };

        match next {
            b'\\' | b'\'' | b'"' => {
                out.push(next as char);
                idx + 2
            }
            b'a' => {
                out.push('\u{0007}');
                idx + 2
            }
            b'b' => {
                out.push('\u{0008}');
                idx + 2
            }
            b'f' => {
                out.push('\u{000C}');
                idx + 2
            }
            b'n' => {
                out.push('\n');
                idx + 2
            }
            b'r' => {
                out.push('\r');
                idx + 2
            }
            b't' => {
                out.push('\t');
                idx + 2
            }
            b'v' => {
                out.push('\u{000B}');
                idx + 2
            }
            // Backslash-newline is a line continuation: both vanish.
            b'\n' => idx + 2,
            b'\r' => {
                if self.bytes.get(idx + 2) == Some(&b'\n') {
                    idx + 3
                } else {
                    idx + 2
                }
            }
            b'0'..=b'7' => {
                let mut value = 0u32;
                let mut j = idx + 1;
                while j < self.bytes.len() && j < idx + 4 {
                    match self.bytes[j] {
                        b @ b'0'..=b'7' => {
                            value = value * 8 + u32::from(b - b'0');
                            j += 1;
                        }
                        _ => break,
                    }
                }
                match char::from_u32(value) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&self.text[idx..j]),
                }
                j
            }
            b'x' => self.decode_hex_escape(idx, 2, out),
            b'u' => self.decode_hex_escape(idx, 4, out),
            b'U' => self.decode_hex_escape(idx, 8, out),
            b'N' => self.decode_named_escape(idx, out),
            _ => {
                // Unrecognized escape (letters, space, punctuation, or any
                // other character): keep both characters, flag the sequence.
                self.error(UnescapeErrorKind::InvalidEscapeSequence, idx, 2);
                out.push('\\');
                let ch = self.char_at(idx + 1);
                out.push(ch);
                idx + 1 + ch.len_utf8()
            }
        }
    }

    /// `\xHH`, `\uHHHH`, `\UHHHHHHHH` with an exact digit count.
    fn decode_hex_escape(&mut self, idx: usize, digits: usize, out: &mut String) -> usize {
        let start = idx + 2;
        if start + digits <= self.bytes.len()
            && self.bytes[start..start + digits]
                .iter()
                .all(u8::is_ascii_hexdigit)
        {
            let mut value = 0u32;
            for &b in &self.bytes[start..start + digits] {
                value = (value << 4) | u32::from(hex_digit(b));
            }
            if let Some(ch) = char::from_u32(value) {
                out.push(ch);
                return start + digits;
            }
        }

        // Too few digits, a non-hex digit, or not a scalar value: flag the
        // backslash plus the escape letter and keep the text verbatim.
        self.error(UnescapeErrorKind::InvalidEscapeSequence, idx, 2);
        out.push('\\');
        out.push(self.bytes[idx + 1] as char);
        idx + 2
    }

    /// `\N{NAME}` where NAME is a non-space run closed by `}`.
    fn decode_named_escape(&mut self, idx: usize, out: &mut String) -> usize {
        let brace = idx + 2;
        if self.bytes.get(brace) == Some(&b'{') {
            let mut j = brace + 1;
            while j < self.bytes.len() {
                match self.bytes[j] {
                    b'}' => {
                        if j == brace + 1 {
                            break;
                        }
                        let name = &self.text[brace + 1..j];
                        match self.names.resolve(name) {
                            Some(ch) => out.push(ch),
                            // The name table lives outside this crate; an
                            // unknown well-formed name stays verbatim.
                            None => out.push_str(&self.text[idx..=j]),
                        }
                        return j + 1;
                    }
                    b' ' | b'\t' | b'\n' | b'\r' => break,
                    _ => j += 1,
                }
            }
        }

        self.error(UnescapeErrorKind::InvalidEscapeSequence, idx, 2);
        out.push_str("\\N");
        idx + 2
    }

    /// Split a format string body into literal and expression segments.
    fn split_format(&mut self) -> Vec<FormatStringSegment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut literal_start = 0usize;
        let mut idx = 0usize;

        while idx < self.bytes.len() {
            match self.bytes[idx] {
                b'{' => {
                    if self.bytes.get(idx + 1) == Some(&b'{') {
                        literal.push('{');
                        idx += 2;
                        continue;
                    }
                    flush_literal(&mut segments, &mut literal, literal_start, idx);
                    idx = self.scan_expression(idx, &mut segments);
                    literal_start = idx;
                }
                b'}' => {
                    if self.bytes.get(idx + 1) == Some(&b'}') {
                        literal.push('}');
                        idx += 2;
                        continue;
                    }
                    // A lone close brace ends the literal segment just
                    // before it; the brace itself is dropped.
                    flush_literal(&mut segments, &mut literal, literal_start, idx);
                    self.error(
                        UnescapeErrorKind::SingleCloseBraceWithinFormatLiteral,
                        idx,
                        1,
                    );
                    idx += 1;
                    literal_start = idx;
                }
                b'\\' if !self.raw => idx = self.decode_escape(idx, &mut literal),
                _ => {
                    let run = self.bytes[idx..]
                        .iter()
                        .position(|&b| matches!(b, b'{' | b'}' | b'\\'))
                        .map(|n| if n == 0 { 1 } else { n })
                        .unwrap_or(self.bytes.len() - idx);
                    // A raw backslash is ordinary literal text.
                    literal.push_str(&self.text[idx..idx + run]);
                    idx += run;
                }
            }
        }
        flush_literal(&mut segments, &mut literal, literal_start, self.bytes.len());
        segments
    }

    /// Scan an expression segment opened by the `{` at `open_idx`. Returns
    /// the index just past the closing `}` (or end of text if unterminated).
    fn scan_expression(&mut self, open_idx: usize, segments: &mut Vec<FormatStringSegment>) -> usize {
        let start = open_idx + 1;
        let mut idx = start;
        let mut in_single = false;
        let mut in_double = false;
        let mut depth = 0u32;

        while idx < self.bytes.len() {
            let b = self.bytes[idx];
            match b {
                b'\'' if !in_double => in_single = !in_single,
                b'"' if !in_single => in_double = !in_double,
                b'(' | b'[' | b'{' if !in_single && !in_double => depth += 1,
                b')' | b']' if !in_single && !in_double => depth = depth.saturating_sub(1),
                b'}' if !in_single && !in_double => {
                    if depth == 0 {
                        segments.push(FormatStringSegment {
                            offset: start as u32,
                            length: (idx - start) as u32,
                            value: self.text[start..idx].to_string(),
                            is_expression: true,
                        });
                        return idx + 1;
                    }
                    depth -= 1;
                }
                b'\\' => {
                    self.error(UnescapeErrorKind::EscapeWithinFormatExpression, idx, 1);
                }
                _ => {}
            }
            idx += utf8_len(b);
        }

        self.error(UnescapeErrorKind::UnterminatedFormatExpression, open_idx, 1);
        segments.push(FormatStringSegment {
            offset: start as u32,
            length: (self.bytes.len() - start) as u32,
            value: self.text[start..].to_string(),
            is_expression: true,
        });
        self.bytes.len()
    }

    fn char_at(&self, idx: usize) -> char {
        self.text[idx..].chars().next().unwrap_or('\u{FFFD}')
    }
}

fn flush_literal(
    segments: &mut Vec<FormatStringSegment>,
    literal: &mut String,
    start: usize,
    end: usize,
) {
    if literal.is_empty() {
        return;
    }
    segments.push(FormatStringSegment {
        offset: start as u32,
        length: (end - start) as u32,
        value: std::mem::take(literal),
        is_expression: false,
    });
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

#[inline]
fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Integer literal conversion: strip separators, parse in `radix`. `None`
/// when the run has no real digits (separators only).
pub(crate) fn integer_value(digits: &str, radix: u32) -> Option<BigInt> {
    let clean: String = digits.chars().filter(|&ch| ch != '_').collect();
    if clean.is_empty() {
        return None;
    }
    BigInt::from_str_radix(&clean, radix).ok()
}

/// Float literal conversion via the host double parser.
pub(crate) fn float_value(text: &str) -> f64 {
    let clean: String = text.chars().filter(|&ch| ch != '_').collect();
    clean.parse::<f64>().unwrap_or_default()
}
