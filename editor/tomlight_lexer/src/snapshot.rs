//! Opaque automaton state snapshots.

use crate::error::UnknownMode;
use crate::token_source::{StackBuf, TokenSource};

/// An immutable capture of a tokenizer's automaton state.
///
/// The editor requests one at a re-lex checkpoint, retains it for as
/// long as it likes, and hands it back when constructing a session that
/// resumes at that checkpoint. The stacks are copied out of the live
/// tokenizer, never aliased, so later lexing cannot retroactively
/// change a snapshot.
///
/// A snapshot carries no offsets: the editor decides where the resumed
/// region starts, the snapshot only reproduces the automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerSnapshot {
    state: u32,
    mode: u32,
    mode_stack: StackBuf,
    array_depth: u32,
    depth_stack: StackBuf,
}

impl LexerSnapshot {
    /// Capture the full automaton state of a live tokenizer.
    pub fn capture<S: TokenSource>(source: &S) -> Self {
        Self {
            state: source.state(),
            mode: source.mode(),
            mode_stack: source.mode_stack(),
            array_depth: source.array_depth(),
            depth_stack: source.depth_stack(),
        }
    }

    /// Write this snapshot into a freshly constructed tokenizer.
    ///
    /// Stack entries are appended, matching the tokenizer's
    /// stack-append restore protocol; on a fresh instance the stacks
    /// are empty, so the result is an exact reproduction. Fails only
    /// when the snapshot names a mode the tokenizer does not have.
    pub fn apply<S: TokenSource>(&self, source: &mut S) -> Result<(), UnknownMode> {
        source.set_state(self.state);
        source.extend_mode_stack(&self.mode_stack)?;
        source.set_mode(self.mode)?;
        source.set_array_depth(self.array_depth);
        source.extend_depth_stack(&self.depth_stack);
        Ok(())
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
    use tomlight_grammar::TomlTag;

    #[test]
    fn capture_copies_stacks_instead_of_aliasing() {
        let mut source = FakeSource::from_tags(&[(TomlTag::UnquotedKey, 3)]);
        source.push_fake_mode(4);
        let snapshot = LexerSnapshot::capture(&source);

        source.push_fake_mode(6);
        let later = LexerSnapshot::capture(&source);

        assert_ne!(snapshot, later);
    }

    #[test]
    fn apply_appends_to_existing_stacks() {
        let mut captured_from = FakeSource::from_tags(&[]);
        captured_from.push_fake_mode(4);
        captured_from.push_fake_depth(2);
        let snapshot = LexerSnapshot::capture(&captured_from);

        let mut target = FakeSource::from_tags(&[]);
        target.push_fake_mode(1);
        snapshot.apply(&mut target).unwrap();

        assert_eq!(target.mode_stack().as_slice(), &[1, 4]);
        assert_eq!(target.depth_stack().as_slice(), &[2]);
    }

    #[test]
    fn apply_restores_state_mode_and_depth() {
        let mut captured_from = FakeSource::from_tags(&[]);
        captured_from.set_state(1);
        captured_from.set_mode(5).unwrap();
        captured_from.set_array_depth(3);
        let snapshot = LexerSnapshot::capture(&captured_from);

        let mut target = FakeSource::from_tags(&[]);
        snapshot.apply(&mut target).unwrap();
        assert_eq!(target.state(), 1);
        assert_eq!(target.mode(), 5);
        assert_eq!(target.array_depth(), 3);
    }
}
