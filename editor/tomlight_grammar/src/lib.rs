//! Grammar-level TOML tokenizer.
//!
//! Produces raw tokens at the grammar's native granularity: one token
//! per string character, discrete escape sequences, and component-level
//! date-time tokens. The automaton state (mode, mode stack, inline-table
//! depth stack, state bits) is fully externalized through accessors so a
//! consumer can suspend lexing and resume it later in a fresh tokenizer
//! without re-scanning from the start of the document.
//!
//! This crate is standalone: the editor adapter builds on it, but
//! nothing here depends on the rest of the workspace.

mod cursor;
mod mode;
mod scanner;
mod tag;

pub use cursor::Cursor;
pub use mode::Mode;
pub use scanner::{tokenize, TomlTokenizer};
pub use tag::{RawToken, TomlTag};
