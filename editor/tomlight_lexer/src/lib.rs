//! Incremental editor lexer for TOML.
//!
//! Bridges the grammar-level tokenizer from [`tomlight_grammar`] to an
//! editor's pull-based, resumable lexing interface. The grammar scans
//! forward-only at fine granularity; editors re-lex arbitrary
//! sub-ranges of a mutable buffer after every keystroke. This crate
//! closes that gap:
//!
//! - **classification** collapses the grammar's raw token kinds into
//!   the small presentation taxonomy editors color by;
//! - **collation** merges each run of literal string characters into a
//!   single presentation token via a one-token lookahead;
//! - **snapshots** capture the tokenizer's automaton state so a later
//!   session can resume mid-document without re-scanning from the top.
//!
//! ```
//! use tomlight_lexer::{LexSession, TokenCategory};
//!
//! let mut session = LexSession::new("a = \"hi\"", None)?;
//! let key = session.next_token().ok_or("empty")?;
//! assert_eq!(key.category, TokenCategory::Key);
//!
//! // checkpoint between any two tokens, resume later
//! let snapshot = session.snapshot();
//! let _resumed = LexSession::new(" = \"hi\"", Some(&snapshot))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod classify;
mod collator;
mod error;
mod input;
mod session;
mod snapshot;
mod token;
mod token_source;

#[cfg(test)]
mod testing;

pub use classify::classify;
pub use error::{SessionError, UnknownMode};
pub use session::{IncrementalLexer, LexSession};
pub use snapshot::LexerSnapshot;
pub use token::{HighlightToken, TokenCategory};
pub use token_source::{StackBuf, TokenSource};

pub use tomlight_grammar::{RawToken, TomlTag, TomlTokenizer};
