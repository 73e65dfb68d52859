//! Session construction errors.
//!
//! The adapter degrades malformed *input* to `Error` presentation
//! tokens and never fails mid-stream; the only fatal conditions are
//! construction-time faults, which indicate an inconsistent restored
//! snapshot or a source region the offset arithmetic cannot address.

/// A snapshot named a mode id the tokenizer does not have.
///
/// This can only happen when a snapshot captured from one tokenizer
/// implementation is applied to another, or when the snapshot value was
/// corrupted. There is no recovery: the session is never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("snapshot names unknown tokenizer mode {id}")]
pub struct UnknownMode {
    pub id: u32,
}

/// Why a lexing session could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The source region does not fit the `u32` offset domain.
    #[error("source region of {0} bytes exceeds the u32 offset range")]
    SourceTooLarge(usize),

    /// The provided snapshot could not be restored.
    #[error("snapshot cannot be restored: {0}")]
    Restore(#[from] UnknownMode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_fault() {
        let err = SessionError::from(UnknownMode { id: 99 });
        assert_eq!(
            err.to_string(),
            "snapshot cannot be restored: snapshot names unknown tokenizer mode 99"
        );
        assert_eq!(
            SessionError::SourceTooLarge(5).to_string(),
            "source region of 5 bytes exceeds the u32 offset range"
        );
    }
}
