//! Byte cursor over a borrowed source region.
//!
//! The cursor advances through the region byte-by-byte. Reads past the
//! end return `0x00`, so per-byte dispatch never needs an explicit
//! bounds check; EOF is `pos >= len`. Interior null bytes also read as
//! `0x00`; callers distinguish them from EOF via [`Cursor::is_eof`].
//!
//! Unlike a one-shot scanner cursor, this one supports [`Cursor::seek`]:
//! the editor adapter repositions the stream to un-consume lookahead
//! tokens and to skip re-scanning already-buffered ones.

/// Cursor over a borrowed byte region.
///
/// The cursor is [`Copy`], enabling cheap position checkpoints.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'src> {
    buf: &'src [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Region length. Cached as `u32` so span arithmetic stays in the
    /// offset domain.
    len: u32,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at position 0 over `source`.
    ///
    /// # Panics
    ///
    /// Panics if the region exceeds `u32::MAX` bytes. The editor
    /// adapter checks this before constructing a tokenizer and turns it
    /// into a session error.
    pub fn new(source: &'src str) -> Self {
        let len = u32::try_from(source.len())
            .unwrap_or_else(|_| panic!("source region exceeds {} bytes", u32::MAX));
        Self {
            buf: source.as_bytes(),
            pos: 0,
            len,
        }
    }

    /// Returns the byte at the current position, or `0x00` at or past EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    /// Returns the byte one position ahead, or `0x00` past the region.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    /// Returns the byte two positions ahead, or `0x00` past the region.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.buf.get(pos as usize).copied().unwrap_or(0)
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.advance_n(1);
    }

    /// Advance the cursor by `n` bytes, clamped to the region end.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = (self.pos + n).min(self.len);
    }

    /// `true` once the cursor has consumed the whole region.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.len
    }

    /// Current byte offset in the region.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Region length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// `true` for a zero-length region.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reposition the cursor to an absolute offset, clamped to the
    /// region end.
    ///
    /// Repositioning affects only the stream: mode and depth state of
    /// the owning tokenizer are untouched, matching the stream-level
    /// seek of the grammar runtime the adapter was written against.
    #[inline]
    pub fn seek(&mut self, offset: u32) {
        self.pos = offset.min(self.len);
    }

    /// Raw bytes of the half-open range `start..end`.
    #[inline]
    pub fn bytes(&self, start: u32, end: u32) -> &'src [u8] {
        &self.buf[start as usize..end as usize]
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the loop terminates at EOF;
    /// this holds for every byte-class predicate the scanner uses.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace (spaces and tabs).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| b == b' ' || b == b'\t');
    }

    /// Advance to the next `\n` byte or EOF using an accelerated search.
    ///
    /// Used by the comment scanner to skip comment bodies. If no
    /// newline is found, the cursor lands on EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.len as usize];
        match memchr::memchr(b'\n', remaining) {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "offset is within a region already bounded by u32"
            )]
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.len,
        }
    }

    /// Returns the number of bytes in the UTF-8 character starting with
    /// `byte`: 1 for ASCII, continuation, and invalid bytes.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance the cursor past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn current_returns_first_byte() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn advance_moves_forward() {
        let mut cursor = Cursor::new("abc");
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn peek_does_not_move() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), b'c');
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn peek_past_end_returns_zero() {
        let mut cursor = Cursor::new("ab");
        cursor.advance();
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.peek2(), 0);
    }

    #[test]
    fn is_eof_after_region() {
        let mut cursor = Cursor::new("x");
        assert!(!cursor.is_eof());
        cursor.advance();
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn empty_region_starts_at_eof() {
        let cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert!(cursor.is_empty());
    }

    #[test]
    fn interior_null_is_not_eof() {
        let mut cursor = Cursor::new("a\0b");
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn advance_n_clamps_to_region_end() {
        let mut cursor = Cursor::new("ab");
        cursor.advance_n(10);
        assert_eq!(cursor.pos(), 2);
        assert!(cursor.is_eof());
    }

    #[test]
    fn seek_repositions_backwards_and_forwards() {
        let mut cursor = Cursor::new("abcdef");
        cursor.advance_n(4);
        cursor.seek(1);
        assert_eq!(cursor.current(), b'b');
        cursor.seek(5);
        assert_eq!(cursor.current(), b'f');
    }

    #[test]
    fn seek_clamps_to_region_end() {
        let mut cursor = Cursor::new("abc");
        cursor.seek(100);
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_while_consumes_matching_bytes() {
        let mut cursor = Cursor::new("aaabbb");
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn eat_while_stops_at_eof() {
        let mut cursor = Cursor::new("aaa");
        cursor.eat_while(|b| b == b'a');
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_whitespace_mixed_spaces_and_tabs() {
        let mut cursor = Cursor::new("  \t x");
        cursor.eat_whitespace();
        assert_eq!(cursor.pos(), 4);
        assert_eq!(cursor.current(), b'x');
    }

    #[test]
    fn eat_whitespace_stops_at_newline() {
        let mut cursor = Cursor::new("  \nx");
        cursor.eat_whitespace();
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_finds_lf() {
        let mut cursor = Cursor::new("hello\nworld");
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_stops_at_eof() {
        let mut cursor = Cursor::new("no newline");
        cursor.eat_until_newline_or_eof();
        assert!(cursor.is_eof());
    }

    #[test]
    fn bytes_returns_range() {
        let cursor = Cursor::new("hello world");
        assert_eq!(cursor.bytes(0, 5), b"hello");
        assert_eq!(cursor.bytes(6, 11), b"world");
    }

    #[test]
    fn advance_char_skips_multibyte() {
        let mut cursor = Cursor::new("é!");
        cursor.advance_char();
        assert_eq!(cursor.current(), b'!');
    }

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let mut cursor = Cursor::new("abcdef");
        cursor.advance_n(2);
        let saved = cursor;
        cursor.advance_n(3);
        assert_eq!(cursor.pos(), 5);
        assert_eq!(saved.pos(), 2);
    }
}
