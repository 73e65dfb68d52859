//! Run collation with single-token lookahead.

use tomlight_grammar::{RawToken, TomlTag};

use crate::snapshot::LexerSnapshot;
use crate::token_source::TokenSource;

/// Merges runs of same-kind raw tokens into one presentation span.
///
/// The grammar emits one raw token per literal string character; the
/// editor wants one token per contiguous run. The collator pulls ahead
/// until the run ends, keeps the first non-matching token in its
/// one-slot lookahead buffer, and rewinds the stream to that token's
/// start so span arithmetic sees the run's true end.
///
/// The slot is the only lookahead in the system: it is empty except
/// between a collation decision and the next `next_token` call, which
/// consumes it instead of pulling from the tokenizer.
#[derive(Debug, Default)]
pub(crate) struct Collator {
    slot: Option<RawToken>,
    /// Automaton state from just before the retained token was scanned.
    ///
    /// Scanning the retained token may have mutated the automaton (a
    /// closing quote pops the string mode), and that mutation must not
    /// leak into a snapshot taken while the token is still buffered,
    /// or a resumed session would re-scan it from the wrong state.
    checkpoint: Option<LexerSnapshot>,
}

impl Collator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Take the buffered token, if any. Emptying the slot also
    /// invalidates the checkpoint.
    pub(crate) fn take_buffered(&mut self) -> Option<RawToken> {
        let token = self.slot.take();
        if token.is_some() {
            self.checkpoint = None;
        }
        token
    }

    /// The pre-lookahead state checkpoint, while the slot is full.
    pub(crate) fn checkpoint(&self) -> Option<&LexerSnapshot> {
        self.checkpoint.as_ref()
    }

    /// Absorb the run of raw tokens whose kind equals `run`, leaving the
    /// first non-matching token buffered and the stream rewound to its
    /// start.
    ///
    /// The caller has already consumed one raw token of kind `run`; a
    /// run of length one is therefore the normal no-coalescing path:
    /// the first pulled token already differs and goes straight into
    /// the slot.
    pub(crate) fn collate<S: TokenSource>(&mut self, source: &mut S, run: TomlTag) {
        debug_assert!(self.slot.is_none(), "collation started with a full slot");
        let mut checkpoint = LexerSnapshot::capture(source);
        let mut ahead = source.next_token();
        while ahead.tag == run {
            checkpoint = LexerSnapshot::capture(source);
            ahead = source.next_token();
        }
        source.seek(ahead.start);
        self.slot = Some(ahead);
        self.checkpoint = Some(checkpoint);
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
    use pretty_assertions::assert_eq;

    #[test]
    fn collate_absorbs_the_whole_run() {
        let mut source = FakeSource::from_tags(&[
            (TomlTag::StringChar, 1),
            (TomlTag::StringChar, 1),
            (TomlTag::StringChar, 1),
            (TomlTag::QuotationMark, 1),
        ]);
        let mut collator = Collator::new();

        let first = source.next_token();
        assert_eq!(first.tag, TomlTag::StringChar);
        collator.collate(&mut source, TomlTag::StringChar);

        // stream rewound to the quote, quote buffered
        assert_eq!(source.offset(), 3);
        let buffered = collator.take_buffered().unwrap();
        assert_eq!(buffered.tag, TomlTag::QuotationMark);
        assert_eq!(buffered.start, 3);
    }

    #[test]
    fn run_of_one_buffers_the_next_token() {
        let mut source = FakeSource::from_tags(&[
            (TomlTag::StringChar, 1),
            (TomlTag::EscapeSequence, 2),
        ]);
        let mut collator = Collator::new();

        source.next_token();
        collator.collate(&mut source, TomlTag::StringChar);

        assert_eq!(source.offset(), 1);
        let buffered = collator.take_buffered().unwrap();
        assert_eq!(buffered.tag, TomlTag::EscapeSequence);
    }

    #[test]
    fn slot_is_empty_after_take() {
        let mut source =
            FakeSource::from_tags(&[(TomlTag::StringChar, 1), (TomlTag::QuotationMark, 1)]);
        let mut collator = Collator::new();

        source.next_token();
        collator.collate(&mut source, TomlTag::StringChar);
        assert!(collator.checkpoint().is_some());

        assert!(collator.take_buffered().is_some());
        assert!(collator.take_buffered().is_none());
        assert!(collator.checkpoint().is_none());
    }

    #[test]
    fn collation_runs_into_eof() {
        let mut source = FakeSource::from_tags(&[
            (TomlTag::StringChar, 1),
            (TomlTag::StringChar, 1),
        ]);
        let mut collator = Collator::new();

        source.next_token();
        collator.collate(&mut source, TomlTag::StringChar);

        assert_eq!(source.offset(), 2);
        let buffered = collator.take_buffered().unwrap();
        assert_eq!(buffered.tag, TomlTag::Eof);
        assert_eq!(buffered.start, 2);
    }

    #[test]
    fn checkpoint_predates_the_retained_token() {
        let mut source = FakeSource::from_tags(&[
            (TomlTag::StringChar, 1),
            (TomlTag::QuotationMark, 1),
        ]);
        // scanning the quote will bump the fake's state counter
        source.bump_state_on(TomlTag::QuotationMark);
        let mut collator = Collator::new();

        source.next_token();
        let before = LexerSnapshot::capture(&source);
        collator.collate(&mut source, TomlTag::StringChar);

        assert_eq!(collator.checkpoint(), Some(&before));
        assert_ne!(Some(&LexerSnapshot::capture(&source)), collator.checkpoint());
    }
}
