//! Mode-stack TOML tokenizer producing grammar-granularity raw tokens.
//!
//! The tokenizer is a hand-written automaton over a [`Cursor`]. Each
//! call to [`TomlTokenizer::next_token`] dispatches on the current mode
//! and the current byte, advances the cursor, and returns one
//! [`RawToken`]. Error conditions are encoded as `TomlTag::Error`, not
//! as `Result::Err`; the scanner is total over arbitrary input.
//!
//! # Granularity
//!
//! String bodies are emitted one `StringChar` per character so escape
//! sequences interleave at full resolution, and date-times are emitted
//! component by component. Consumers that want coarser units (such as
//! the editor adapter) coalesce runs themselves.
//!
//! # Externalized state
//!
//! Everything the automaton carries between tokens is reachable through
//! accessors: scanner state bits, the current mode, the mode stack, the
//! inline-table depth stack, and the cursor offset. A consumer can copy
//! all of it out, construct a fresh tokenizer over the same region
//! later, write it all back, seek, and continue as if never stopped.

use crate::cursor::Cursor;
use crate::mode::Mode;
use crate::tag::{RawToken, TomlTag};

/// Scanner state bit: a date or time is being scanned, so digit runs
/// keep classifying as `DateDigits`.
const STATE_DATE_CONTEXT: u32 = 1;

/// Grammar-level TOML tokenizer.
///
/// One instance scans one contiguous source region, forward-only except
/// for explicit [`seek`](Self::seek) repositioning.
#[derive(Debug)]
pub struct TomlTokenizer<'src> {
    cursor: Cursor<'src>,
    mode: Mode,
    /// Modes suspended by `push_mode`, innermost last.
    mode_stack: Vec<Mode>,
    /// Bracket nesting depth of the array currently being scanned.
    array_depth: u32,
    /// Array depths suspended on inline-table entry, innermost last.
    depth_stack: Vec<u32>,
    date_context: bool,
}

impl<'src> TomlTokenizer<'src> {
    /// Create a tokenizer at the start of `source`, in key mode with
    /// empty stacks.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            mode: Mode::Key,
            mode_stack: Vec::new(),
            array_depth: 0,
            depth_stack: Vec::new(),
            date_context: false,
        }
    }

    /// Produce the next raw token.
    ///
    /// Returns `TomlTag::Eof` with a zero-length span when the region is
    /// exhausted. Subsequent calls after EOF continue to return `Eof`.
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        match self.mode {
            Mode::Key | Mode::TableKey | Mode::ArrayTableKey => self.next_key(start),
            Mode::Value => self.next_value(start),
            Mode::BasicString => self.next_basic_string(start, false),
            Mode::MlBasicString => self.next_basic_string(start, true),
            Mode::LiteralString => self.next_literal_string(start, false),
            Mode::MlLiteralString => self.next_literal_string(start, true),
        }
    }

    // ─── State accessors ─────────────────────────────────────────────

    /// Current byte offset in the source region.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.cursor.pos()
    }

    /// Reposition the input stream to an absolute offset.
    ///
    /// Only the stream moves; mode, stacks, and state bits are
    /// untouched.
    #[inline]
    pub fn seek(&mut self, offset: u32) {
        self.cursor.seek(offset);
    }

    /// Opaque scanner state bits (currently the date-context flag).
    #[inline]
    pub fn state(&self) -> u32 {
        u32::from(self.date_context)
    }

    /// Restore state bits captured from [`state`](Self::state).
    #[inline]
    pub fn set_state(&mut self, state: u32) {
        self.date_context = state & STATE_DATE_CONTEXT != 0;
    }

    /// The mode the next token will be scanned in.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Overwrite the current mode.
    #[inline]
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Suspended modes, innermost last.
    #[inline]
    pub fn mode_stack(&self) -> &[Mode] {
        &self.mode_stack
    }

    /// Append previously captured entries onto the mode stack.
    pub fn extend_mode_stack(&mut self, modes: impl IntoIterator<Item = Mode>) {
        self.mode_stack.extend(modes);
    }

    /// Bracket nesting depth of the array currently being scanned.
    #[inline]
    pub fn array_depth(&self) -> u32 {
        self.array_depth
    }

    /// Overwrite the current array depth.
    #[inline]
    pub fn set_array_depth(&mut self, depth: u32) {
        self.array_depth = depth;
    }

    /// Array depths suspended on inline-table entry, innermost last.
    #[inline]
    pub fn depth_stack(&self) -> &[u32] {
        &self.depth_stack
    }

    /// Append previously captured entries onto the depth stack.
    pub fn extend_depth_stack(&mut self, depths: impl IntoIterator<Item = u32>) {
        self.depth_stack.extend(depths);
    }

    // ─── Mode plumbing ───────────────────────────────────────────────

    fn push_mode(&mut self, mode: Mode) {
        self.mode_stack.push(self.mode);
        self.mode = mode;
    }

    fn pop_mode(&mut self) {
        self.mode = self.mode_stack.pop().unwrap_or(Mode::Key);
    }

    fn close_inline_table(&mut self) {
        self.pop_mode();
        self.array_depth = self.depth_stack.pop().unwrap_or(0);
    }

    /// Table headers cannot continue past their line.
    fn leave_header(&mut self) {
        if matches!(self.mode, Mode::TableKey | Mode::ArrayTableKey) {
            self.pop_mode();
        }
    }

    /// A newline ends value context, unless the value is an array still
    /// open across lines or we are inside an inline table.
    fn end_value_line(&mut self) {
        self.date_context = false;
        if self.array_depth == 0 && self.mode_stack.is_empty() {
            self.mode = Mode::Key;
        }
    }

    // ─── Key / table-key modes ───────────────────────────────────────

    fn next_key(&mut self, start: u32) -> RawToken {
        match self.cursor.current() {
            0 if self.cursor.is_eof() => self.token(TomlTag::Eof, start),
            b' ' | b'\t' => {
                self.cursor.eat_whitespace();
                self.token(TomlTag::Ws, start)
            }
            b'\n' => {
                self.cursor.advance();
                self.leave_header();
                self.token(TomlTag::NewLine, start)
            }
            b'\r' => {
                self.cursor.advance();
                if self.cursor.current() == b'\n' {
                    self.cursor.advance();
                    self.leave_header();
                    self.token(TomlTag::NewLine, start)
                } else {
                    self.token(TomlTag::Ws, start)
                }
            }
            b'#' => self.comment(start),
            b'"' => self.quotation(start),
            b'\'' => self.apostrophe(start),
            b'=' => {
                self.cursor.advance();
                if self.mode == Mode::Key {
                    self.mode = Mode::Value;
                }
                self.token(TomlTag::Equals, start)
            }
            b'.' => self.single(TomlTag::Dot, start),
            b',' => self.single(TomlTag::Comma, start),
            b'[' if self.mode == Mode::Key => {
                if self.cursor.peek() == b'[' {
                    self.cursor.advance_n(2);
                    self.push_mode(Mode::ArrayTableKey);
                    self.token(TomlTag::ArrayTableKeyStart, start)
                } else {
                    self.cursor.advance();
                    self.push_mode(Mode::TableKey);
                    self.token(TomlTag::TableKeyStart, start)
                }
            }
            b']' if self.mode == Mode::TableKey => {
                self.cursor.advance();
                self.pop_mode();
                self.token(TomlTag::TableKeyEnd, start)
            }
            b']' if self.mode == Mode::ArrayTableKey => {
                if self.cursor.peek() == b']' {
                    self.cursor.advance_n(2);
                    self.pop_mode();
                    self.token(TomlTag::ArrayTableKeyEnd, start)
                } else {
                    self.cursor.advance();
                    self.token(TomlTag::Error, start)
                }
            }
            b'}' if self.mode == Mode::Key && !self.mode_stack.is_empty() => {
                self.cursor.advance();
                self.close_inline_table();
                self.token(TomlTag::InlineTableEnd, start)
            }
            b if is_bare_key_byte(b) => {
                self.cursor.eat_while(is_bare_key_byte);
                self.token(TomlTag::UnquotedKey, start)
            }
            _ => self.error_run(start),
        }
    }

    // ─── Value mode ──────────────────────────────────────────────────

    fn next_value(&mut self, start: u32) -> RawToken {
        match self.cursor.current() {
            0 if self.cursor.is_eof() => self.token(TomlTag::Eof, start),
            b' ' | b'\t' => {
                self.cursor.eat_whitespace();
                self.date_context = false;
                self.token(TomlTag::Ws, start)
            }
            b'\n' => {
                self.cursor.advance();
                self.end_value_line();
                self.token(TomlTag::NewLine, start)
            }
            b'\r' => {
                self.cursor.advance();
                if self.cursor.current() == b'\n' {
                    self.cursor.advance();
                    self.end_value_line();
                    self.token(TomlTag::NewLine, start)
                } else {
                    self.date_context = false;
                    self.token(TomlTag::Ws, start)
                }
            }
            b'#' => self.comment(start),
            b'"' => self.quotation(start),
            b'\'' => self.apostrophe(start),
            b'[' => {
                self.cursor.advance();
                self.array_depth += 1;
                self.date_context = false;
                self.token(TomlTag::ArrayStart, start)
            }
            b']' => {
                self.cursor.advance();
                self.array_depth = self.array_depth.saturating_sub(1);
                self.date_context = false;
                self.token(TomlTag::ArrayEnd, start)
            }
            b'{' => {
                self.cursor.advance();
                self.depth_stack.push(self.array_depth);
                self.array_depth = 0;
                self.push_mode(Mode::Key);
                self.date_context = false;
                self.token(TomlTag::InlineTableStart, start)
            }
            b'}' if !self.mode_stack.is_empty() => {
                self.cursor.advance();
                self.close_inline_table();
                self.date_context = false;
                self.token(TomlTag::InlineTableEnd, start)
            }
            b',' => {
                self.cursor.advance();
                self.date_context = false;
                if self.array_depth == 0 && !self.mode_stack.is_empty() {
                    // next inline-table entry starts with a key
                    self.mode = Mode::Key;
                }
                self.token(TomlTag::Comma, start)
            }
            b'=' => self.single(TomlTag::Equals, start),
            b'.' => self.single(TomlTag::Dot, start),
            b'-' => self.single(TomlTag::Dash, start),
            b'+' => self.single(TomlTag::Plus, start),
            b':' => self.single(TomlTag::Colon, start),
            b'0'..=b'9' => self.number_or_date(start),
            b'A'..=b'Z' | b'a'..=b'z' => self.word(start),
            _ => self.error_run(start),
        }
    }

    // ─── String modes ────────────────────────────────────────────────

    fn quotation(&mut self, start: u32) -> RawToken {
        if self.cursor.peek() == b'"' && self.cursor.peek2() == b'"' {
            self.cursor.advance_n(3);
            self.push_mode(Mode::MlBasicString);
            self.token(TomlTag::TripleQuotationMark, start)
        } else {
            self.cursor.advance();
            self.push_mode(Mode::BasicString);
            self.token(TomlTag::QuotationMark, start)
        }
    }

    fn apostrophe(&mut self, start: u32) -> RawToken {
        if self.cursor.peek() == b'\'' && self.cursor.peek2() == b'\'' {
            self.cursor.advance_n(3);
            self.push_mode(Mode::MlLiteralString);
            self.token(TomlTag::TripleApostrophe, start)
        } else {
            self.cursor.advance();
            self.push_mode(Mode::LiteralString);
            self.token(TomlTag::Apostrophe, start)
        }
    }

    fn next_basic_string(&mut self, start: u32, multiline: bool) -> RawToken {
        match self.cursor.current() {
            0 if self.cursor.is_eof() => self.token(TomlTag::Eof, start),
            b'"' => {
                if multiline {
                    if self.cursor.peek() == b'"' && self.cursor.peek2() == b'"' {
                        self.cursor.advance_n(3);
                        self.pop_mode();
                        self.token(TomlTag::TripleQuotationMark, start)
                    } else {
                        self.cursor.advance();
                        self.token(TomlTag::StringChar, start)
                    }
                } else {
                    self.cursor.advance();
                    self.pop_mode();
                    self.token(TomlTag::QuotationMark, start)
                }
            }
            b'\\' => self.escape_sequence(start, multiline),
            b'\n' | b'\r' => self.string_newline(start, multiline),
            _ => {
                self.cursor.advance_char();
                self.token(TomlTag::StringChar, start)
            }
        }
    }

    fn next_literal_string(&mut self, start: u32, multiline: bool) -> RawToken {
        match self.cursor.current() {
            0 if self.cursor.is_eof() => self.token(TomlTag::Eof, start),
            b'\'' => {
                if multiline {
                    if self.cursor.peek() == b'\'' && self.cursor.peek2() == b'\'' {
                        self.cursor.advance_n(3);
                        self.pop_mode();
                        self.token(TomlTag::TripleApostrophe, start)
                    } else {
                        self.cursor.advance();
                        self.token(TomlTag::StringChar, start)
                    }
                } else {
                    self.cursor.advance();
                    self.pop_mode();
                    self.token(TomlTag::Apostrophe, start)
                }
            }
            b'\n' | b'\r' => self.string_newline(start, multiline),
            _ => {
                self.cursor.advance_char();
                self.token(TomlTag::StringChar, start)
            }
        }
    }

    fn string_newline(&mut self, start: u32, multiline: bool) -> RawToken {
        if self.cursor.current() == b'\r' && self.cursor.peek() == b'\n' {
            self.cursor.advance_n(2);
        } else {
            self.cursor.advance();
        }
        if multiline {
            self.token(TomlTag::StringChar, start)
        } else {
            // single-line strings cannot contain a newline; resume
            // scanning the rest of the document at line granularity
            self.pop_mode();
            match self.mode {
                Mode::Value => self.end_value_line(),
                Mode::TableKey | Mode::ArrayTableKey => self.leave_header(),
                _ => {}
            }
            self.token(TomlTag::Error, start)
        }
    }

    fn escape_sequence(&mut self, start: u32, multiline: bool) -> RawToken {
        self.cursor.advance(); // consume '\'
        match self.cursor.current() {
            b'u' => {
                self.cursor.advance();
                self.eat_hex_digits(4);
            }
            b'U' => {
                self.cursor.advance();
                self.eat_hex_digits(8);
            }
            // leave the newline for the unterminated-string path
            b'\n' | b'\r' if !multiline => {}
            // line-ending backslash in multi-line strings
            b'\r' if self.cursor.peek() == b'\n' => self.cursor.advance_n(2),
            b'\n' => self.cursor.advance(),
            0 if self.cursor.is_eof() => {}
            _ => self.cursor.advance_char(),
        }
        self.token(TomlTag::EscapeSequence, start)
    }

    fn eat_hex_digits(&mut self, max: u32) {
        let mut eaten = 0;
        while eaten < max && self.cursor.current().is_ascii_hexdigit() {
            self.cursor.advance();
            eaten += 1;
        }
    }

    // ─── Scalars ─────────────────────────────────────────────────────

    fn number_or_date(&mut self, start: u32) -> RawToken {
        if !self.date_context && self.cursor.current() == b'0' {
            match self.cursor.peek() {
                b'x' | b'X' if self.cursor.peek2().is_ascii_hexdigit() => {
                    self.cursor.advance_n(2);
                    self.cursor.eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
                    return self.token(TomlTag::HexInteger, start);
                }
                b'o' | b'O' if matches!(self.cursor.peek2(), b'0'..=b'7') => {
                    self.cursor.advance_n(2);
                    self.cursor.eat_while(|b| matches!(b, b'0'..=b'7' | b'_'));
                    return self.token(TomlTag::OctalInteger, start);
                }
                b'b' | b'B' if matches!(self.cursor.peek2(), b'0' | b'1') => {
                    self.cursor.advance_n(2);
                    self.cursor.eat_while(|b| matches!(b, b'0' | b'1' | b'_'));
                    return self.token(TomlTag::BinaryInteger, start);
                }
                _ => {}
            }
        }
        self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
        if self.date_context {
            return self.token(TomlTag::DateDigits, start);
        }
        let digits = self.cursor.pos() - start;
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
            self.eat_exponent();
            return self.token(TomlTag::Float, start);
        }
        if matches!(self.cursor.current(), b'e' | b'E') && self.exponent_follows() {
            self.eat_exponent();
            return self.token(TomlTag::Float, start);
        }
        // `1979-` opens a date, `07:` opens a time
        let date_start = (digits == 4 && self.cursor.current() == b'-')
            || (digits == 2 && self.cursor.current() == b':');
        if date_start && self.cursor.peek().is_ascii_digit() {
            self.date_context = true;
            return self.token(TomlTag::DateDigits, start);
        }
        self.token(TomlTag::DecimalInteger, start)
    }

    fn exponent_follows(&self) -> bool {
        self.cursor.peek().is_ascii_digit()
            || (matches!(self.cursor.peek(), b'+' | b'-') && self.cursor.peek2().is_ascii_digit())
    }

    fn eat_exponent(&mut self) {
        if matches!(self.cursor.current(), b'e' | b'E') && self.exponent_follows() {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
        }
    }

    fn word(&mut self, start: u32) -> RawToken {
        self.cursor.eat_while(|b| b.is_ascii_alphabetic());
        let text = self.cursor.bytes(start, self.cursor.pos());
        if self.date_context && text.len() == 1 {
            match text[0] {
                b'T' | b't' => return self.token(TomlTag::TimeDelimiter, start),
                b'Z' | b'z' => return self.token(TomlTag::Zulu, start),
                _ => {}
            }
        }
        match text {
            b"true" => self.token(TomlTag::BoolTrue, start),
            b"false" => self.token(TomlTag::BoolFalse, start),
            b"inf" => self.token(TomlTag::FloatInf, start),
            b"nan" => self.token(TomlTag::FloatNan, start),
            _ => self.token(TomlTag::Error, start),
        }
    }

    // ─── Trivia & errors ─────────────────────────────────────────────

    fn comment(&mut self, start: u32) -> RawToken {
        self.cursor.eat_until_newline_or_eof();
        self.token(TomlTag::Comment, start)
    }

    /// Consume a run of unrecognized input as one error token, stopping
    /// at the next byte some dispatch arm understands.
    fn error_run(&mut self, start: u32) -> RawToken {
        loop {
            self.cursor.advance_char();
            if self.cursor.is_eof() || is_resync_byte(self.cursor.current()) {
                break;
            }
        }
        self.token(TomlTag::Error, start)
    }

    fn single(&mut self, tag: TomlTag, start: u32) -> RawToken {
        self.cursor.advance();
        self.token(tag, start)
    }

    fn token(&self, tag: TomlTag, start: u32) -> RawToken {
        RawToken {
            tag,
            start,
            end: self.cursor.pos(),
        }
    }
}

impl Iterator for TomlTokenizer<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        let tok = self.next_token();
        if tok.tag == TomlTag::Eof {
            None
        } else {
            Some(tok)
        }
    }
}

/// Bytes allowed in bare keys: ASCII letters, digits, `_`, `-`.
#[inline]
fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Bytes that some dispatch arm understands, ending an error run.
fn is_resync_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b' ' | b'\t'
                | b'\n'
                | b'\r'
                | b'#'
                | b'"'
                | b'\''
                | b'='
                | b'.'
                | b','
                | b'['
                | b']'
                | b'{'
                | b'}'
                | b'-'
                | b'+'
                | b':'
                | b'_'
        )
}

/// Convenience function: tokenize a source string and collect all raw
/// tokens, excluding the final `Eof`.
pub fn tokenize(source: &str) -> Vec<RawToken> {
    TomlTokenizer::new(source).collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: scan a source string and return tags only.
    fn scan_tags(source: &str) -> Vec<TomlTag> {
        tokenize(source).iter().map(|t| t.tag).collect()
    }

    /// Helper: scan and return `(tag, len)` pairs.
    fn scan_lens(source: &str) -> Vec<(TomlTag, u32)> {
        tokenize(source).iter().map(|t| (t.tag, t.len())).collect()
    }

    // ─── Coverage properties ─────────────────────────────────────────

    #[test]
    fn total_len_equals_source_len() {
        let sources = [
            "",
            "x",
            "a = 1",
            "title = \"hello world\"\n",
            "[table]\nkey = true\n",
            "[[servers]]\nhost = 'alpha'\n",
            "point = { x = 1, y = 2 }",
            "list = [1, 2, 3]\n",
            "odt = 1979-05-27T07:32:00Z\n",
            "big = \"\"\"\nmulti\nline\n\"\"\"",
            "# just a comment\n",
            "  \t\r\n  \r",
            "bad = @@@\n",
            "\u{e9}\u{1F600} = 1",
        ];
        for source in sources {
            let tokens = tokenize(source);
            let total: u32 = tokens.iter().map(RawToken::len).sum();
            assert_eq!(
                total,
                u32::try_from(source.len()).unwrap(),
                "span coverage mismatch for {source:?}",
            );
        }
    }

    #[test]
    fn spans_are_contiguous() {
        let source = "a = \"h\\ni\"\n[t]\nb = [1, 1979-05-27]\n";
        let mut expected_start = 0;
        for tok in tokenize(source) {
            assert_eq!(tok.start, expected_start, "gap before {tok:?}");
            expected_start = tok.end;
        }
        assert_eq!(expected_start, u32::try_from(source.len()).unwrap());
    }

    #[test]
    fn every_token_has_positive_length() {
        let sources = ["a = 1", "x = \"y\"", "[[t]]", "  \n\r\n", "k = @!?"];
        for source in sources {
            for tok in tokenize(source) {
                assert!(tok.len() > 0, "zero-length token {tok:?} in {source:?}");
            }
        }
    }

    #[test]
    fn repeated_eof_returns_eof() {
        let mut tokenizer = TomlTokenizer::new("");
        for _ in 0..5 {
            let tok = tokenizer.next_token();
            assert_eq!(tok.tag, TomlTag::Eof);
            assert!(tok.is_empty());
        }
    }

    // ─── Keys and assignment ─────────────────────────────────────────

    #[test]
    fn bare_key_assignment() {
        assert_eq!(
            scan_tags("a = 1"),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    #[test]
    fn bare_keys_allow_digits_dashes_underscores() {
        assert_eq!(scan_tags("site-name_2"), vec![TomlTag::UnquotedKey]);
        assert_eq!(scan_tags("1234"), vec![TomlTag::UnquotedKey]);
    }

    #[test]
    fn dotted_key() {
        assert_eq!(
            scan_tags("a.b = 1"),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Dot,
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    #[test]
    fn equals_switches_to_value_mode() {
        let mut tokenizer = TomlTokenizer::new("a = b");
        assert_eq!(tokenizer.next_token().tag, TomlTag::UnquotedKey);
        assert_eq!(tokenizer.mode(), Mode::Key);
        tokenizer.next_token(); // ws
        assert_eq!(tokenizer.next_token().tag, TomlTag::Equals);
        assert_eq!(tokenizer.mode(), Mode::Value);
    }

    #[test]
    fn newline_returns_to_key_mode() {
        let mut tokenizer = TomlTokenizer::new("a = 1\nb = 2");
        for _ in 0..5 {
            tokenizer.next_token();
        }
        assert_eq!(tokenizer.mode(), Mode::Value);
        assert_eq!(tokenizer.next_token().tag, TomlTag::NewLine);
        assert_eq!(tokenizer.mode(), Mode::Key);
        assert_eq!(tokenizer.next_token().tag, TomlTag::UnquotedKey);
    }

    // ─── Table headers ───────────────────────────────────────────────

    #[test]
    fn table_header() {
        assert_eq!(
            scan_tags("[table]"),
            vec![
                TomlTag::TableKeyStart,
                TomlTag::UnquotedKey,
                TomlTag::TableKeyEnd,
            ]
        );
    }

    #[test]
    fn dotted_table_header() {
        assert_eq!(
            scan_tags("[a.b]"),
            vec![
                TomlTag::TableKeyStart,
                TomlTag::UnquotedKey,
                TomlTag::Dot,
                TomlTag::UnquotedKey,
                TomlTag::TableKeyEnd,
            ]
        );
    }

    #[test]
    fn array_table_header() {
        assert_eq!(
            scan_lens("[[x]]"),
            vec![
                (TomlTag::ArrayTableKeyStart, 2),
                (TomlTag::UnquotedKey, 1),
                (TomlTag::ArrayTableKeyEnd, 2),
            ]
        );
    }

    #[test]
    fn single_bracket_close_in_array_table_is_error() {
        assert_eq!(
            scan_tags("[[x]"),
            vec![
                TomlTag::ArrayTableKeyStart,
                TomlTag::UnquotedKey,
                TomlTag::Error,
            ]
        );
    }

    #[test]
    fn unterminated_header_recovers_at_newline() {
        assert_eq!(
            scan_tags("[table\na = 1"),
            vec![
                TomlTag::TableKeyStart,
                TomlTag::UnquotedKey,
                TomlTag::NewLine,
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    // ─── Strings ─────────────────────────────────────────────────────

    #[test]
    fn basic_string_is_one_token_per_char() {
        assert_eq!(
            scan_tags("a = \"hi\""),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::QuotationMark,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::QuotationMark,
            ]
        );
    }

    #[test]
    fn multibyte_string_char_is_one_token() {
        let tags = scan_lens("a = \"\u{e9}\"");
        assert_eq!(
            tags,
            vec![
                (TomlTag::UnquotedKey, 1),
                (TomlTag::Ws, 1),
                (TomlTag::Equals, 1),
                (TomlTag::Ws, 1),
                (TomlTag::QuotationMark, 1),
                (TomlTag::StringChar, 2),
                (TomlTag::QuotationMark, 1),
            ]
        );
    }

    #[test]
    fn escape_sequence_interrupts_string_chars() {
        assert_eq!(
            scan_tags("a = \"x\\ny\""),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::QuotationMark,
                TomlTag::StringChar,
                TomlTag::EscapeSequence,
                TomlTag::StringChar,
                TomlTag::QuotationMark,
            ]
        );
    }

    #[test]
    fn unicode_escapes_cover_their_digits() {
        let tokens = tokenize("a = \"\\u0041\\U0001F600\"");
        let escapes: Vec<u32> = tokens
            .iter()
            .filter(|t| t.tag == TomlTag::EscapeSequence)
            .map(RawToken::len)
            .collect();
        assert_eq!(escapes, vec![6, 10]);
    }

    #[test]
    fn quoted_key_goes_through_string_mode() {
        assert_eq!(
            scan_tags("\"a b\" = 1"),
            vec![
                TomlTag::QuotationMark,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::QuotationMark,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    #[test]
    fn literal_string_has_no_escapes() {
        assert_eq!(
            scan_tags("a = 'x\\n'"),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::Apostrophe,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::Apostrophe,
            ]
        );
    }

    #[test]
    fn multiline_basic_string() {
        assert_eq!(
            scan_lens("a = \"\"\"x\ny\"\"\""),
            vec![
                (TomlTag::UnquotedKey, 1),
                (TomlTag::Ws, 1),
                (TomlTag::Equals, 1),
                (TomlTag::Ws, 1),
                (TomlTag::TripleQuotationMark, 3),
                (TomlTag::StringChar, 1),
                (TomlTag::StringChar, 1),
                (TomlTag::StringChar, 1),
                (TomlTag::TripleQuotationMark, 3),
            ]
        );
    }

    #[test]
    fn multiline_literal_string() {
        assert_eq!(
            scan_tags("a = '''x'''"),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::TripleApostrophe,
                TomlTag::StringChar,
                TomlTag::TripleApostrophe,
            ]
        );
    }

    #[test]
    fn lone_quote_inside_multiline_is_content() {
        assert_eq!(
            scan_tags("a = \"\"\"x\"y\"\"\""),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::TripleQuotationMark,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::TripleQuotationMark,
            ]
        );
    }

    #[test]
    fn newline_in_single_line_string_is_error_and_recovers() {
        assert_eq!(
            scan_tags("a = \"oops\nb = 1"),
            vec![
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::QuotationMark,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::StringChar,
                TomlTag::Error,
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    #[test]
    fn line_ending_backslash_is_escape() {
        let tokens = tokenize("a = \"\"\"x\\\ny\"\"\"");
        let tags: Vec<TomlTag> = tokens.iter().map(|t| t.tag).collect();
        assert!(tags.contains(&TomlTag::EscapeSequence));
    }

    // ─── Numbers and booleans ────────────────────────────────────────

    #[test]
    fn integer_literals() {
        assert_eq!(scan_tags("a = 42")[4], TomlTag::DecimalInteger);
        assert_eq!(scan_tags("a = 1_000")[4], TomlTag::DecimalInteger);
        assert_eq!(scan_tags("a = 0xDEAD_beef")[4], TomlTag::HexInteger);
        assert_eq!(scan_tags("a = 0o755")[4], TomlTag::OctalInteger);
        assert_eq!(scan_tags("a = 0b1010")[4], TomlTag::BinaryInteger);
    }

    #[test]
    fn float_literals() {
        assert_eq!(scan_tags("a = 3.14")[4], TomlTag::Float);
        assert_eq!(scan_tags("a = 1e6")[4], TomlTag::Float);
        assert_eq!(scan_tags("a = 6.02e+23")[4], TomlTag::Float);
        assert_eq!(scan_tags("a = 1.5E-3")[4], TomlTag::Float);
    }

    #[test]
    fn signed_values_emit_discrete_sign_tokens() {
        assert_eq!(
            scan_tags("a = -1")[4..],
            [TomlTag::Dash, TomlTag::DecimalInteger]
        );
        assert_eq!(
            scan_tags("a = +inf")[4..],
            [TomlTag::Plus, TomlTag::FloatInf]
        );
        assert_eq!(scan_tags("a = nan")[4], TomlTag::FloatNan);
    }

    #[test]
    fn boolean_literals() {
        assert_eq!(scan_tags("a = true")[4], TomlTag::BoolTrue);
        assert_eq!(scan_tags("a = false")[4], TomlTag::BoolFalse);
    }

    #[test]
    fn bare_word_value_is_error() {
        assert_eq!(scan_tags("a = yes")[4], TomlTag::Error);
    }

    // ─── Dates and times ─────────────────────────────────────────────

    #[test]
    fn offset_datetime_components() {
        assert_eq!(
            scan_tags("odt = 1979-05-27T07:32:00Z")[4..],
            [
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::TimeDelimiter,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Zulu,
            ]
        );
    }

    #[test]
    fn local_time_components() {
        assert_eq!(
            scan_tags("t = 07:32:00")[4..],
            [
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
            ]
        );
    }

    #[test]
    fn fractional_seconds_keep_date_context() {
        assert_eq!(
            scan_tags("t = 07:32:00.999")[4..],
            [
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Dot,
                TomlTag::DateDigits,
            ]
        );
    }

    #[test]
    fn negative_utc_offset_stays_in_date_context() {
        assert_eq!(
            scan_tags("odt = 1979-05-27T00:32:00-07:00")[4..],
            [
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::TimeDelimiter,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::Colon,
                TomlTag::DateDigits,
            ]
        );
    }

    #[test]
    fn date_context_ends_at_whitespace() {
        // the second value on the line is an ordinary integer again
        assert_eq!(
            scan_tags("a = 1979-05-27 1234")[4..],
            [
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::Dash,
                TomlTag::DateDigits,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
            ]
        );
    }

    // ─── Arrays and inline tables ────────────────────────────────────

    #[test]
    fn array_tokens_and_depth() {
        let mut tokenizer = TomlTokenizer::new("a = [1, 2]");
        let mut tags = Vec::new();
        loop {
            let tok = tokenizer.next_token();
            if tok.tag == TomlTag::Eof {
                break;
            }
            if tok.tag == TomlTag::ArrayStart {
                assert_eq!(tokenizer.array_depth(), 1);
            }
            tags.push(tok.tag);
        }
        assert_eq!(tokenizer.array_depth(), 0);
        assert_eq!(
            tags[4..],
            [
                TomlTag::ArrayStart,
                TomlTag::DecimalInteger,
                TomlTag::Comma,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
                TomlTag::ArrayEnd,
            ]
        );
    }

    #[test]
    fn array_spans_lines_without_leaving_value_mode() {
        assert_eq!(
            scan_tags("a = [1,\n2]")[4..],
            [
                TomlTag::ArrayStart,
                TomlTag::DecimalInteger,
                TomlTag::Comma,
                TomlTag::NewLine,
                TomlTag::DecimalInteger,
                TomlTag::ArrayEnd,
            ]
        );
    }

    #[test]
    fn inline_table_tokens() {
        assert_eq!(
            scan_tags("p = { x = 1, y = 2 }")[4..],
            [
                TomlTag::InlineTableStart,
                TomlTag::Ws,
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
                TomlTag::Comma,
                TomlTag::Ws,
                TomlTag::UnquotedKey,
                TomlTag::Ws,
                TomlTag::Equals,
                TomlTag::Ws,
                TomlTag::DecimalInteger,
                TomlTag::Ws,
                TomlTag::InlineTableEnd,
            ]
        );
    }

    #[test]
    fn inline_table_suspends_array_depth() {
        let mut tokenizer = TomlTokenizer::new("a = [{ b = [1] }]");
        let mut saw_inner_array = false;
        loop {
            let tok = tokenizer.next_token();
            match tok.tag {
                TomlTag::InlineTableStart => {
                    assert_eq!(tokenizer.depth_stack(), &[1]);
                    assert_eq!(tokenizer.array_depth(), 0);
                }
                TomlTag::InlineTableEnd => {
                    assert_eq!(tokenizer.depth_stack(), &[] as &[u32]);
                    assert_eq!(tokenizer.array_depth(), 1);
                }
                TomlTag::ArrayStart if !tokenizer.depth_stack().is_empty() => {
                    saw_inner_array = true;
                }
                TomlTag::Eof => break,
                _ => {}
            }
        }
        assert!(saw_inner_array);
        assert_eq!(tokenizer.array_depth(), 0);
    }

    #[test]
    fn nested_inline_tables_restore_modes() {
        let tags = scan_tags("t = {a = {b = 1}}");
        assert_eq!(
            tags.iter()
                .filter(|t| **t == TomlTag::InlineTableEnd)
                .count(),
            2
        );
        let mut tokenizer = TomlTokenizer::new("t = {a = {b = 1}}");
        loop {
            if tokenizer.next_token().tag == TomlTag::Eof {
                break;
            }
        }
        assert_eq!(tokenizer.mode(), Mode::Value);
        assert!(tokenizer.mode_stack().is_empty());
    }

    #[test]
    fn empty_inline_table() {
        assert_eq!(
            scan_tags("t = {}")[4..],
            [TomlTag::InlineTableStart, TomlTag::InlineTableEnd]
        );
    }

    #[test]
    fn stray_close_brace_is_error() {
        assert_eq!(scan_tags("a = }")[4], TomlTag::Error);
    }

    // ─── Comments and trivia ─────────────────────────────────────────

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            scan_tags("# hello\na = 1")[..2],
            [TomlTag::Comment, TomlTag::NewLine]
        );
    }

    #[test]
    fn trailing_comment_after_value() {
        assert_eq!(
            scan_tags("a = 1 # note")[4..],
            [TomlTag::DecimalInteger, TomlTag::Ws, TomlTag::Comment]
        );
    }

    #[test]
    fn crlf_is_one_newline_token() {
        assert_eq!(scan_lens("\r\n"), vec![(TomlTag::NewLine, 2)]);
    }

    #[test]
    fn lone_cr_is_whitespace() {
        assert_eq!(scan_lens("\r"), vec![(TomlTag::Ws, 1)]);
    }

    // ─── Errors ──────────────────────────────────────────────────────

    #[test]
    fn non_ascii_in_key_is_single_error_run() {
        assert_eq!(
            scan_lens("ab\u{e9}\u{e8}cd = 1")[..3],
            [
                (TomlTag::UnquotedKey, 2),
                (TomlTag::Error, 4),
                (TomlTag::UnquotedKey, 2),
            ]
        );
    }

    #[test]
    fn lexing_continues_after_error() {
        let tags = scan_tags("@@ = 1\nb = 2");
        assert_eq!(tags[0], TomlTag::Error);
        assert!(tags.contains(&TomlTag::UnquotedKey));
        assert_eq!(*tags.last().unwrap(), TomlTag::DecimalInteger);
    }

    #[test]
    fn interior_null_is_error_not_eof() {
        let tags = scan_tags("a\0b");
        assert_eq!(
            tags,
            vec![TomlTag::UnquotedKey, TomlTag::Error, TomlTag::UnquotedKey]
        );
    }

    // ─── Seek and state restore ──────────────────────────────────────

    #[test]
    fn seek_back_rescans_same_token() {
        let mut tokenizer = TomlTokenizer::new("key = 1");
        let first = tokenizer.next_token();
        tokenizer.seek(first.start);
        let again = tokenizer.next_token();
        assert_eq!(first, again);
    }

    #[test]
    fn seek_past_buffered_region_is_clamped() {
        let mut tokenizer = TomlTokenizer::new("ab");
        tokenizer.seek(100);
        assert_eq!(tokenizer.next_token().tag, TomlTag::Eof);
    }

    #[test]
    fn copied_state_resumes_identically() {
        let source = "a = \"h\\ni\"\n[t]\nb = [1, {c = 2}]\nd = 1979-05-27\n";
        let full = tokenize(source);
        let mut reference = TomlTokenizer::new(source);

        // stop the reference tokenizer after every token in turn and
        // check that a fresh tokenizer with the copied state continues
        // with exactly the uninterrupted output
        for consumed in 0..full.len() {
            assert_eq!(reference.next_token(), full[consumed]);

            let mut restored = TomlTokenizer::new(source);
            restored.set_state(reference.state());
            restored.extend_mode_stack(reference.mode_stack().to_vec());
            restored.set_mode(reference.mode());
            restored.set_array_depth(reference.array_depth());
            restored.extend_depth_stack(reference.depth_stack().to_vec());
            restored.seek(reference.offset());

            for expected in &full[consumed + 1..] {
                assert_eq!(
                    restored.next_token(),
                    *expected,
                    "divergence after token {consumed}",
                );
            }
            assert_eq!(restored.next_token().tag, TomlTag::Eof);
        }
    }

    // ─── Property tests ──────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spans_cover_arbitrary_input(source in any::<String>()) {
                let tokens = tokenize(&source);
                let total: u64 = tokens.iter().map(|t| u64::from(t.len())).sum();
                prop_assert_eq!(total, source.len() as u64);
                for tok in &tokens {
                    prop_assert!(tok.len() > 0, "zero-length {:?}", tok);
                }
            }

            #[test]
            fn spans_cover_toml_shaped_input(
                lines in proptest::collection::vec(
                    prop_oneof![
                        "[a-z]{1,6} = [0-9]{1,5}",
                        "[a-z]{1,4} = \"[ -~]{0,10}\"",
                        "\\[[a-z]{1,6}\\]",
                        "# [ -~]{0,12}",
                        "[a-z]{1,4} = \\[1, 2\\]",
                    ],
                    0..8,
                )
            ) {
                let source = lines.join("\n");
                let tokens = tokenize(&source);
                let total: u64 = tokens.iter().map(|t| u64::from(t.len())).sum();
                prop_assert_eq!(total, source.len() as u64);
            }
        }
    }
}
