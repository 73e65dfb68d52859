//! The narrow interface the adapter requires from a grammar tokenizer.
//!
//! Keeping the tokenizer behind this trait is what lets the collation
//! and snapshot machinery be exercised against a scripted fake in tests
//! while production sessions run over [`TomlTokenizer`].

use smallvec::SmallVec;
use tomlight_grammar::{Mode, RawToken, TomlTokenizer};

use crate::error::UnknownMode;

/// Stack copy handed across the tokenizer seam.
///
/// Mode and depth stacks are shallow in practice (strings nest at most
/// a few modes deep), so captures normally stay off the heap.
pub type StackBuf = SmallVec<[u32; 8]>;

/// A resumable grammar tokenizer, as the adapter sees it.
///
/// Offsets are byte positions relative to the lexed region. The
/// accessor pairs exist solely for the snapshot protocol: everything
/// the automaton carries between tokens must be readable, and writable
/// into a freshly constructed instance.
pub trait TokenSource {
    /// Produce the next raw token. Total: never fails, returns
    /// `TomlTag::Eof` forever once the region is exhausted.
    fn next_token(&mut self) -> RawToken;

    /// Current byte offset of the input stream.
    fn offset(&self) -> u32;

    /// Reposition the input stream without touching automaton state.
    fn seek(&mut self, offset: u32);

    /// Opaque scanner state bits.
    fn state(&self) -> u32;
    fn set_state(&mut self, state: u32);

    /// Current mode id.
    fn mode(&self) -> u32;
    /// Overwrite the current mode. Fails on ids this tokenizer does not
    /// have, signalling a foreign or corrupted snapshot.
    fn set_mode(&mut self, mode: u32) -> Result<(), UnknownMode>;

    /// Copy of the suspended-mode stack, innermost last.
    fn mode_stack(&self) -> StackBuf;
    /// Append captured entries onto the mode stack.
    fn extend_mode_stack(&mut self, modes: &[u32]) -> Result<(), UnknownMode>;

    /// Current nested-array depth.
    fn array_depth(&self) -> u32;
    fn set_array_depth(&mut self, depth: u32);

    /// Copy of the suspended-depth stack, innermost last.
    fn depth_stack(&self) -> StackBuf;
    /// Append captured entries onto the depth stack.
    fn extend_depth_stack(&mut self, depths: &[u32]);
}

impl TokenSource for TomlTokenizer<'_> {
    fn next_token(&mut self) -> RawToken {
        TomlTokenizer::next_token(self)
    }

    fn offset(&self) -> u32 {
        TomlTokenizer::offset(self)
    }

    fn seek(&mut self, offset: u32) {
        TomlTokenizer::seek(self, offset);
    }

    fn state(&self) -> u32 {
        TomlTokenizer::state(self)
    }

    fn set_state(&mut self, state: u32) {
        TomlTokenizer::set_state(self, state);
    }

    fn mode(&self) -> u32 {
        TomlTokenizer::mode(self).id()
    }

    fn set_mode(&mut self, mode: u32) -> Result<(), UnknownMode> {
        let mode = Mode::from_id(mode).ok_or(UnknownMode { id: mode })?;
        TomlTokenizer::set_mode(self, mode);
        Ok(())
    }

    fn mode_stack(&self) -> StackBuf {
        TomlTokenizer::mode_stack(self)
            .iter()
            .map(|m| m.id())
            .collect()
    }

    fn extend_mode_stack(&mut self, modes: &[u32]) -> Result<(), UnknownMode> {
        let mut entries = Vec::with_capacity(modes.len());
        for &id in modes {
            entries.push(Mode::from_id(id).ok_or(UnknownMode { id })?);
        }
        TomlTokenizer::extend_mode_stack(self, entries);
        Ok(())
    }

    fn array_depth(&self) -> u32 {
        TomlTokenizer::array_depth(self)
    }

    fn set_array_depth(&mut self, depth: u32) {
        TomlTokenizer::set_array_depth(self, depth);
    }

    fn depth_stack(&self) -> StackBuf {
        TomlTokenizer::depth_stack(self).iter().copied().collect()
    }

    fn extend_depth_stack(&mut self, depths: &[u32]) {
        TomlTokenizer::extend_depth_stack(self, depths.iter().copied());
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tomlight_grammar::TomlTag;

    #[test]
    fn real_tokenizer_rejects_unknown_mode() {
        let mut source = TomlTokenizer::new("a = 1");
        assert_eq!(
            TokenSource::set_mode(&mut source, 42),
            Err(UnknownMode { id: 42 })
        );
        assert_eq!(
            TokenSource::extend_mode_stack(&mut source, &[0, 42]),
            Err(UnknownMode { id: 42 })
        );
    }

    #[test]
    fn stack_copies_round_trip_through_ids() {
        let mut source = TomlTokenizer::new("a = \"x");
        // consume up to the string body so the mode stack is non-empty
        while TokenSource::next_token(&mut source).tag != TomlTag::QuotationMark {}
        let modes = TokenSource::mode_stack(&source);
        assert!(!modes.is_empty());

        let mut fresh = TomlTokenizer::new("a = \"x");
        TokenSource::extend_mode_stack(&mut fresh, &modes).unwrap();
        assert_eq!(TokenSource::mode_stack(&fresh), modes);
    }
}
