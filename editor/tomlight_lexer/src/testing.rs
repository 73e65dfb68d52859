//! Scripted token source for exercising the adapter without a grammar.

use tomlight_grammar::{RawToken, TomlTag};

use crate::error::UnknownMode;
use crate::token_source::{StackBuf, TokenSource};

/// A [`TokenSource`] that replays a fixed token script.
///
/// Tokens are laid out contiguously from offset 0. `next_token` returns
/// the first scripted token at or after the stream position, so seeking
/// back re-delivers tokens exactly like the real tokenizer. The state
/// accessors are plain fields with no behavior, which makes snapshot
/// protocol tests direct: whatever was written can be read back.
#[derive(Debug)]
pub(crate) struct FakeSource {
    tokens: Vec<RawToken>,
    total_len: u32,
    cursor: u32,
    state: u32,
    mode: u32,
    mode_stack: Vec<u32>,
    array_depth: u32,
    depth_stack: Vec<u32>,
    /// Tag whose scan increments `state`, for checkpoint tests.
    bump_on: Option<TomlTag>,
}

impl FakeSource {
    /// Build a source replaying `(tag, len)` tokens laid out back to back.
    pub(crate) fn from_tags(specs: &[(TomlTag, u32)]) -> Self {
        let mut tokens = Vec::with_capacity(specs.len());
        let mut offset = 0;
        for &(tag, len) in specs {
            tokens.push(RawToken {
                tag,
                start: offset,
                end: offset + len,
            });
            offset += len;
        }
        Self {
            tokens,
            total_len: offset,
            cursor: 0,
            state: 0,
            mode: 0,
            mode_stack: Vec::new(),
            array_depth: 0,
            depth_stack: Vec::new(),
            bump_on: None,
        }
    }

    pub(crate) fn push_fake_mode(&mut self, id: u32) {
        self.mode_stack.push(id);
    }

    pub(crate) fn push_fake_depth(&mut self, depth: u32) {
        self.depth_stack.push(depth);
    }

    /// Make scanning a token of `tag` mutate the fake automaton state,
    /// imitating a mode-changing token like a closing quote.
    pub(crate) fn bump_state_on(&mut self, tag: TomlTag) {
        self.bump_on = Some(tag);
    }
}

impl TokenSource for FakeSource {
    fn next_token(&mut self) -> RawToken {
        let next = self
            .tokens
            .iter()
            .find(|tok| tok.start >= self.cursor)
            .copied();
        match next {
            Some(tok) => {
                self.cursor = tok.end;
                if self.bump_on == Some(tok.tag) {
                    self.state += 1;
                }
                tok
            }
            None => RawToken {
                tag: TomlTag::Eof,
                start: self.total_len,
                end: self.total_len,
            },
        }
    }

    fn offset(&self) -> u32 {
        self.cursor
    }

    fn seek(&mut self, offset: u32) {
        self.cursor = offset.min(self.total_len);
    }

    fn state(&self) -> u32 {
        self.state
    }

    fn set_state(&mut self, state: u32) {
        self.state = state;
    }

    fn mode(&self) -> u32 {
        self.mode
    }

    fn set_mode(&mut self, mode: u32) -> Result<(), UnknownMode> {
        self.mode = mode;
        Ok(())
    }

    fn mode_stack(&self) -> StackBuf {
        self.mode_stack.iter().copied().collect()
    }

    fn extend_mode_stack(&mut self, modes: &[u32]) -> Result<(), UnknownMode> {
        self.mode_stack.extend_from_slice(modes);
        Ok(())
    }

    fn array_depth(&self) -> u32 {
        self.array_depth
    }

    fn set_array_depth(&mut self, depth: u32) {
        self.array_depth = depth;
    }

    fn depth_stack(&self) -> StackBuf {
        self.depth_stack.iter().copied().collect()
    }

    fn extend_depth_stack(&mut self, depths: &[u32]) {
        self.depth_stack.extend_from_slice(depths);
    }
}
