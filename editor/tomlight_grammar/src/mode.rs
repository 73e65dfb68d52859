//! Lexer modes.
//!
//! The tokenizer is a mode-stack automaton: delimiters push and pop
//! modes, and each mode has its own byte dispatch. Modes carry stable
//! integer ids so automaton state can be externalized into an opaque
//! snapshot and restored into a fresh tokenizer.

/// A tokenizer mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    /// Key context: start of line, dotted keys, and inline-table keys.
    Key = 0,
    /// Value context, entered after `=`.
    Value = 1,
    /// Inside a `[table]` header.
    TableKey = 2,
    /// Inside an `[[array.of.tables]]` header.
    ArrayTableKey = 3,
    /// Inside a `"..."` string.
    BasicString = 4,
    /// Inside a `"""..."""` string.
    MlBasicString = 5,
    /// Inside a `'...'` string.
    LiteralString = 6,
    /// Inside a `'''...'''` string.
    MlLiteralString = 7,
}

impl Mode {
    /// Stable integer id of this mode, as stored in snapshots.
    #[inline]
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Inverse of [`id`](Self::id). Returns `None` for ids no mode has,
    /// which signals an inconsistent (foreign or corrupted) snapshot.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Mode::Key),
            1 => Some(Mode::Value),
            2 => Some(Mode::TableKey),
            3 => Some(Mode::ArrayTableKey),
            4 => Some(Mode::BasicString),
            5 => Some(Mode::MlBasicString),
            6 => Some(Mode::LiteralString),
            7 => Some(Mode::MlLiteralString),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips() {
        for id in 0..8 {
            let mode = Mode::from_id(id).unwrap();
            assert_eq!(mode.id(), id);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(Mode::from_id(8), None);
        assert_eq!(Mode::from_id(u32::MAX), None);
    }
}
