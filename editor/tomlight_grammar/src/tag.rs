//! Raw token kinds at the grammar's native granularity.
//!
//! The tokenizer emits exactly one [`RawToken`] per call. Inside string
//! bodies the granularity is deliberately fine: one `StringChar` per
//! character, with `EscapeSequence` tokens interleaved, so downstream
//! consumers can distinguish escapes without re-scanning. Date-times are
//! likewise emitted component by component (`DateDigits`, `Dash`,
//! `Colon`, ...) rather than as a single token.

/// A raw token kind as produced by [`TomlTokenizer`](crate::TomlTokenizer).
///
/// Error conditions are encoded as the `Error` variant, never as a
/// `Result::Err`; the tokenizer is total over arbitrary input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TomlTag {
    // Keys and structure
    UnquotedKey,
    Dot,
    Equals,
    Comma,
    TableKeyStart,
    TableKeyEnd,
    ArrayTableKeyStart,
    ArrayTableKeyEnd,
    ArrayStart,
    ArrayEnd,
    InlineTableStart,
    InlineTableEnd,

    // String delimiters and content
    QuotationMark,
    TripleQuotationMark,
    Apostrophe,
    TripleApostrophe,
    /// A single character of string body content (one token per character).
    StringChar,
    /// A backslash escape, including `\uXXXX` and `\UXXXXXXXX` forms.
    EscapeSequence,

    // Scalar values
    DecimalInteger,
    HexInteger,
    OctalInteger,
    BinaryInteger,
    Float,
    FloatInf,
    FloatNan,
    BoolTrue,
    BoolFalse,

    // Date-time components
    DateDigits,
    Dash,
    Plus,
    Colon,
    /// The `T`/`t` separating a date from a time.
    TimeDelimiter,
    /// The `Z`/`z` UTC offset designator.
    Zulu,

    // Trivia
    Comment,
    Ws,
    NewLine,

    /// Input the grammar does not recognize, covering exactly the
    /// offending bytes.
    Error,

    /// End of input. Zero-length; repeated calls keep returning it.
    Eof,
}

/// A raw token: a kind plus the half-open byte span it covers.
///
/// Offsets are relative to the start of the source region the tokenizer
/// was constructed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: TomlTag,
    pub start: u32,
    pub end: u32,
}

impl RawToken {
    /// Byte length of the span this token covers.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// `true` only for the zero-length `Eof` token.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_is_span_width() {
        let tok = RawToken {
            tag: TomlTag::UnquotedKey,
            start: 3,
            end: 8,
        };
        assert_eq!(tok.len(), 5);
        assert!(!tok.is_empty());
    }

    #[test]
    fn eof_is_empty() {
        let tok = RawToken {
            tag: TomlTag::Eof,
            start: 10,
            end: 10,
        };
        assert_eq!(tok.len(), 0);
        assert!(tok.is_empty());
    }
}
