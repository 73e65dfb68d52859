//! The lexing session: one tokenizer, one buffer region, pull-based.
//!
//! # Architecture
//!
//! The session sits between the editor and the grammar tokenizer:
//!
//! ```text
//! editor → next_token() → [lookahead slot | tokenizer] → classify
//!        ← HighlightToken { category, len }             ← collate
//! ```
//!
//! Each call pulls exactly one raw token (or reuses the collator's
//! buffered one), maps its kind to a presentation category, coalesces
//! literal string runs, and derives the span from the input cursor's
//! mark and the tokenizer's position. The editor drives everything;
//! nothing here blocks, retries, or performs I/O.
//!
//! # Resumption
//!
//! A session over a sub-range of the document is constructed with the
//! snapshot the editor captured at that range's start. The snapshot is
//! applied to the fresh tokenizer before the first pull, so token
//! output continues exactly as if the original session had never
//! stopped. Construction is the only fallible operation: a snapshot
//! that cannot be restored means the session state would be garbage,
//! so the fault is logged and propagated instead of producing a
//! half-alive session.

use tomlight_grammar::{TomlTag, TomlTokenizer};

use crate::classify::classify;
use crate::collator::Collator;
use crate::error::SessionError;
use crate::input::InputCursor;
use crate::snapshot::LexerSnapshot;
use crate::token::HighlightToken;
use crate::token_source::TokenSource;

/// The host-facing lexer contract.
///
/// One implementor is constructed per lexing session; the editor calls
/// [`next_token`](Self::next_token) until it returns `None`, may call
/// [`snapshot`](Self::snapshot) between any two pulls, and calls
/// [`release`](Self::release) when tearing the session down.
pub trait IncrementalLexer {
    /// Produce the next presentation token, or `None` at end of input.
    fn next_token(&mut self) -> Option<HighlightToken>;

    /// Capture the tokenizer state needed to resume after the last
    /// returned token.
    fn snapshot(&self) -> LexerSnapshot;

    /// Lifecycle hook for session teardown. The session owns no
    /// resources beyond memory, so the default does nothing.
    fn release(&mut self) {}
}

/// A lexing session over one contiguous buffer region.
///
/// Generic over [`TokenSource`] so the adapter logic can be driven by a
/// scripted fake; production sessions use [`TomlTokenizer`] via
/// [`LexSession::new`].
#[derive(Debug)]
pub struct LexSession<S> {
    source: S,
    cursor: InputCursor,
    collator: Collator,
}

impl<'src> LexSession<TomlTokenizer<'src>> {
    /// Start a session over `text`, optionally resuming from a
    /// previously captured snapshot.
    ///
    /// Offsets in the emitted tokens are relative to `text`, which is
    /// whatever sub-range of the document the editor re-lexes.
    pub fn new(text: &'src str, restart: Option<&LexerSnapshot>) -> Result<Self, SessionError> {
        if u32::try_from(text.len()).is_err() {
            tracing::error!(bytes = text.len(), "source region too large for lexing");
            return Err(SessionError::SourceTooLarge(text.len()));
        }
        Self::from_source(TomlTokenizer::new(text), restart)
    }
}

impl<S: TokenSource> LexSession<S> {
    /// Start a session over an already-constructed token source.
    pub fn from_source(mut source: S, restart: Option<&LexerSnapshot>) -> Result<Self, SessionError> {
        if let Some(snapshot) = restart {
            snapshot.apply(&mut source).map_err(|err| {
                tracing::error!(mode = err.id, "snapshot restore failed");
                err
            })?;
        }
        let mut cursor = InputCursor::new();
        cursor.mark(source.offset());
        tracing::debug!(resumed = restart.is_some(), "lex session started");
        Ok(Self {
            source,
            cursor,
            collator: Collator::new(),
        })
    }

    /// Produce the next presentation token, or `None` at end of input.
    ///
    /// Exactly one presentation token is emitted per call, and the
    /// emitted spans tile the region: every input byte belongs to
    /// exactly one token.
    pub fn next_token(&mut self) -> Option<HighlightToken> {
        let raw = match self.collator.take_buffered() {
            Some(token) => {
                // already scanned during collation; skip re-scanning
                self.source.seek(token.end);
                token
            }
            None => self.source.next_token(),
        };

        if raw.tag == TomlTag::Eof {
            return None;
        }

        let category = classify(raw.tag);
        if raw.tag == TomlTag::StringChar {
            self.collator.collate(&mut self.source, raw.tag);
        }
        Some(self.finish(category))
    }

    /// Close out the token being assembled: measure its span from the
    /// marked start to the tokenizer's position and re-mark for the
    /// next one.
    fn finish(&mut self, category: crate::token::TokenCategory) -> HighlightToken {
        let end = self.source.offset();
        let len = self.cursor.span_to(end);
        self.cursor.mark(end);
        HighlightToken { category, len }
    }

    /// Capture the state needed to resume lexing after the last token
    /// this session returned.
    ///
    /// While the collator holds a buffered token, the returned snapshot
    /// is the checkpoint from before that token was speculatively
    /// scanned; otherwise it is the live tokenizer state. Either way,
    /// applying it to a fresh session positioned at the next token's
    /// offset reproduces the uninterrupted output.
    pub fn snapshot(&self) -> LexerSnapshot {
        self.collator
            .checkpoint()
            .cloned()
            .unwrap_or_else(|| LexerSnapshot::capture(&self.source))
    }

    /// Lifecycle hook for session teardown.
    pub fn release(&mut self) {}
}

impl<S: TokenSource> IncrementalLexer for LexSession<S> {
    fn next_token(&mut self) -> Option<HighlightToken> {
        LexSession::next_token(self)
    }

    fn snapshot(&self) -> LexerSnapshot {
        LexSession::snapshot(self)
    }

    fn release(&mut self) {
        LexSession::release(self);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;
    use crate::token::TokenCategory;
    use pretty_assertions::assert_eq;

    fn lex_all(text: &str) -> Vec<HighlightToken> {
        let mut session = LexSession::new(text, None).unwrap();
        let mut tokens = Vec::new();
        while let Some(token) = session.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn cats(text: &str) -> Vec<(TokenCategory, u32)> {
        lex_all(text)
            .iter()
            .map(|t| (t.category, t.len))
            .collect()
    }

    // ─── Concrete scenarios ──────────────────────────────────────────

    #[test]
    fn key_equals_string_scenario() {
        assert_eq!(
            cats("a = \"hi\""),
            vec![
                (TokenCategory::Key, 1),
                (TokenCategory::Whitespace, 1),
                (TokenCategory::Equals, 1),
                (TokenCategory::Whitespace, 1),
                (TokenCategory::StringQuote, 1),
                (TokenCategory::String, 2),
                (TokenCategory::StringQuote, 1),
            ]
        );
    }

    #[test]
    fn array_table_scenario() {
        assert_eq!(
            cats("[[x]]"),
            vec![
                (TokenCategory::TableMark, 2),
                (TokenCategory::Key, 1),
                (TokenCategory::TableMark, 2),
            ]
        );
    }

    #[test]
    fn invalid_bytes_in_key_become_one_error_token() {
        assert_eq!(
            cats("ab\u{e9}\u{e8}cd = 1"),
            vec![
                (TokenCategory::Key, 2),
                (TokenCategory::Error, 4),
                (TokenCategory::Key, 2),
                (TokenCategory::Whitespace, 1),
                (TokenCategory::Equals, 1),
                (TokenCategory::Whitespace, 1),
                (TokenCategory::Number, 1),
            ]
        );
    }

    #[test]
    fn date_components_present_as_date() {
        assert_eq!(
            cats("d = 1979-05-27T07:32:00Z")[4..],
            [
                (TokenCategory::Date, 4),
                (TokenCategory::Date, 1),
                (TokenCategory::Date, 2),
                (TokenCategory::Date, 1),
                (TokenCategory::Date, 2),
                (TokenCategory::Date, 1),
                (TokenCategory::Date, 2),
                (TokenCategory::Date, 1),
                (TokenCategory::Date, 2),
                (TokenCategory::Date, 1),
                (TokenCategory::Date, 2),
                (TokenCategory::Date, 1),
            ]
        );
    }

    #[test]
    fn inline_table_punctuation_presents_as_dot() {
        let tokens = cats("p = { x = 1 }");
        assert_eq!(tokens[4], (TokenCategory::Dot, 1)); // `{`
        assert_eq!(*tokens.last().unwrap(), (TokenCategory::Dot, 1)); // `}`
    }

    // ─── Collation ───────────────────────────────────────────────────

    #[test]
    fn string_run_collates_to_one_token() {
        assert_eq!(
            cats("a = \"hello\"")[5],
            (TokenCategory::String, 5),
        );
    }

    #[test]
    fn escape_splits_string_runs() {
        assert_eq!(
            cats("a = \"x\\ny\"")[4..],
            [
                (TokenCategory::StringQuote, 1),
                (TokenCategory::String, 1),
                (TokenCategory::EscapeSequence, 2),
                (TokenCategory::String, 1),
                (TokenCategory::StringQuote, 1),
            ]
        );
    }

    #[test]
    fn multiline_string_collates_across_newlines() {
        assert_eq!(
            cats("a = \"\"\"xy\nz\"\"\"")[4..],
            [
                (TokenCategory::StringQuote, 3),
                (TokenCategory::String, 4),
                (TokenCategory::StringQuote, 3),
            ]
        );
    }

    #[test]
    fn empty_string_has_no_string_token() {
        assert_eq!(
            cats("a = \"\"")[4..],
            [(TokenCategory::StringQuote, 1), (TokenCategory::StringQuote, 1)]
        );
    }

    #[test]
    fn unterminated_string_at_eof_still_emits_the_run() {
        assert_eq!(
            cats("a = \"abc")[4..],
            [(TokenCategory::StringQuote, 1), (TokenCategory::String, 3)]
        );
    }

    // ─── Coverage ────────────────────────────────────────────────────

    #[test]
    fn spans_tile_the_input() {
        let docs = [
            "",
            "a = 1",
            "a = \"hi\"\nb = 2\n",
            "[t]\nx = [1, { y = 'z' }]\n# done\n",
            "odt = 1979-05-27T07:32:00-07:00\n",
            "bad = \"oops\nnext = true\n",
            "\u{1F600} = \"\u{e9}\"",
        ];
        for doc in docs {
            let total: u32 = lex_all(doc).iter().map(|t| t.len).sum();
            assert_eq!(total as usize, doc.len(), "coverage mismatch for {doc:?}");
        }
    }

    #[test]
    fn empty_input_terminates_immediately() {
        let mut session = LexSession::new("", None).unwrap();
        assert_eq!(session.next_token(), None);
        assert_eq!(session.next_token(), None);
    }

    // ─── Snapshots ───────────────────────────────────────────────────

    /// Lex `text` to completion, then check that stopping after every
    /// token boundary and resuming from the snapshot reproduces the
    /// uninterrupted tail exactly.
    fn assert_resumable(text: &str) {
        let full = lex_all(text);
        for cut in 0..=full.len() {
            let mut prefix = LexSession::new(text, None).unwrap();
            let mut consumed = 0usize;
            for _ in 0..cut {
                consumed += prefix.next_token().unwrap().len as usize;
            }
            let snapshot = prefix.snapshot();

            let mut resumed = LexSession::new(&text[consumed..], Some(&snapshot)).unwrap();
            let mut tail = Vec::new();
            while let Some(token) = resumed.next_token() {
                tail.push(token);
            }
            assert_eq!(
                tail.as_slice(),
                &full[cut..],
                "divergence resuming {text:?} after token {cut}",
            );
        }
    }

    #[test]
    fn resumes_at_every_boundary_of_simple_document() {
        assert_resumable("a = \"hi\"\nb = 2\n");
    }

    #[test]
    fn resumes_at_every_boundary_with_tables_and_dates() {
        assert_resumable("[table]\nx = 1979-05-27T07:32:00Z\ny = [1,\n2]\n");
    }

    #[test]
    fn resumes_at_every_boundary_with_nested_values() {
        assert_resumable("p = { x = [1, 2], y = \"s\\te\" }\nq = '''lit'''\n");
    }

    #[test]
    fn resumes_at_every_boundary_of_malformed_input() {
        assert_resumable("bad = \"unterminated\nnext = true\n@@@\n");
    }

    #[test]
    fn resumes_at_every_boundary_of_multiline_string() {
        assert_resumable("k = \"\"\"m\nl\"\"\"\nrest = 1\n");
    }

    #[test]
    fn resumes_when_input_ends_inside_a_string() {
        assert_resumable("k = \"abc");
    }

    #[test]
    fn snapshot_during_pending_lookahead_resumes_cleanly() {
        let text = "a = \"hi\"\nb = 2\n";
        let full = lex_all(text);

        let mut prefix = LexSession::new(text, None).unwrap();
        let mut consumed = 0usize;
        // pull through the collated STRING token, leaving the closing
        // quote buffered in the lookahead slot
        for _ in 0..6 {
            consumed += prefix.next_token().unwrap().len as usize;
        }
        let snapshot = prefix.snapshot();

        let mut resumed = LexSession::new(&text[consumed..], Some(&snapshot)).unwrap();
        let mut tail = Vec::new();
        while let Some(token) = resumed.next_token() {
            tail.push(token);
        }
        assert_eq!(tail.as_slice(), &full[6..]);
    }

    #[test]
    fn snapshot_application_is_idempotent() {
        let text = "a = \"hi\"\nb = 2\n";
        let mut prefix = LexSession::new(text, None).unwrap();
        let mut consumed = 0usize;
        for _ in 0..3 {
            consumed += prefix.next_token().unwrap().len as usize;
        }
        let snapshot = prefix.snapshot();

        let rest = &text[consumed..];
        let mut first = LexSession::new(rest, Some(&snapshot)).unwrap();
        let mut second = LexSession::new(rest, Some(&snapshot)).unwrap();
        loop {
            let a = first.next_token();
            let b = second.next_token();
            assert_eq!(a, b);
            if a.is_none() {
                break;
            }
        }
    }

    #[test]
    fn snapshot_is_unaffected_by_later_lexing() {
        let text = "a = \"hi\"\nb = 2\n";
        let mut session = LexSession::new(text, None).unwrap();
        session.next_token();
        let snapshot = session.snapshot();
        let copy = snapshot.clone();
        while session.next_token().is_some() {}
        assert_eq!(snapshot, copy);
    }

    // ─── Construction faults ─────────────────────────────────────────

    #[test]
    fn foreign_snapshot_fails_construction() {
        let mut foreign = FakeSource::from_tags(&[]);
        foreign.set_state(0);
        let _ = TokenSource::set_mode(&mut foreign, 99);
        let snapshot = LexerSnapshot::capture(&foreign);

        let err = LexSession::new("a = 1", Some(&snapshot)).unwrap_err();
        assert_eq!(
            err,
            SessionError::Restore(crate::error::UnknownMode { id: 99 })
        );
    }

    // ─── Host contract ───────────────────────────────────────────────

    fn drive(lexer: &mut dyn IncrementalLexer) -> Vec<HighlightToken> {
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        lexer.release();
        tokens
    }

    #[test]
    fn host_contract_is_object_safe() {
        let mut session = LexSession::new("a = 1", None).unwrap();
        let tokens = drive(&mut session);
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn works_against_a_scripted_source() {
        use tomlight_grammar::TomlTag;
        let source = FakeSource::from_tags(&[
            (TomlTag::QuotationMark, 1),
            (TomlTag::StringChar, 1),
            (TomlTag::StringChar, 1),
            (TomlTag::StringChar, 1),
            (TomlTag::QuotationMark, 1),
        ]);
        let mut session = LexSession::from_source(source, None).unwrap();
        let mut tokens = Vec::new();
        while let Some(token) = session.next_token() {
            tokens.push(token);
        }
        assert_eq!(
            tokens,
            vec![
                HighlightToken { category: TokenCategory::StringQuote, len: 1 },
                HighlightToken { category: TokenCategory::String, len: 3 },
                HighlightToken { category: TokenCategory::StringQuote, len: 1 },
            ]
        );
    }

    // ─── Property tests ──────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spans_tile_arbitrary_input(text in any::<String>()) {
                let total: u64 = lex_all(&text).iter().map(|t| u64::from(t.len)).sum();
                prop_assert_eq!(total, text.len() as u64);
            }

            #[test]
            fn resumes_from_generated_documents(
                lines in proptest::collection::vec(
                    prop_oneof![
                        "[a-z]{1,5} = [0-9]{1,4}",
                        "[a-z]{1,4} = \"[a-z ]{0,8}\"",
                        "[a-z]{1,4} = \"[a-z]{0,3}\\\\n[a-z]{0,3}\"",
                        "\\[[a-z]{1,5}\\]",
                        "[a-z]{1,4} = 1979-05-27",
                        "[a-z]{1,4} = \\{ x = 1 \\}",
                    ],
                    1..5,
                ),
                cut_seed in any::<u16>(),
            ) {
                let text = lines.join("\n");
                let full = {
                    let mut session = LexSession::new(&text, None).unwrap();
                    let mut tokens = Vec::new();
                    while let Some(token) = session.next_token() {
                        tokens.push(token);
                    }
                    tokens
                };
                prop_assume!(!full.is_empty());
                let cut = usize::from(cut_seed) % (full.len() + 1);

                let mut prefix = LexSession::new(&text, None).unwrap();
                let mut consumed = 0usize;
                for _ in 0..cut {
                    consumed += prefix.next_token().unwrap().len as usize;
                }
                let snapshot = prefix.snapshot();

                let mut resumed =
                    LexSession::new(&text[consumed..], Some(&snapshot)).unwrap();
                let mut tail = Vec::new();
                while let Some(token) = resumed.next_token() {
                    tail.push(token);
                }
                prop_assert_eq!(tail.as_slice(), &full[cut..]);
            }
        }
    }
}
