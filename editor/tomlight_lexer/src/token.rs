//! Presentation tokens handed to the editor.

/// Presentation category of a highlight token.
///
/// A closed taxonomy, deliberately coarser than the grammar's raw token
/// kinds: the editor colors text, it does not parse it. Several raw
/// kinds collapse into one category (all quote kinds into
/// `StringQuote`, all numeric kinds into `Number`, every date-time
/// component into `Date`, and so on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// A run of literal string-body characters.
    String,
    /// A string delimiter: `"`, `'`, `"""`, or `'''`.
    StringQuote,
    /// Punctuation: dots, commas, array and inline-table delimiters.
    Dot,
    Equals,
    /// Table header delimiters: `[`, `]`, `[[`, `]]`.
    TableMark,
    Key,
    Comment,
    Whitespace,
    /// Input the grammar did not recognize.
    Error,
    Number,
    Boolean,
    EscapeSequence,
    /// Any component of a date or time value, including its separators.
    Date,
}

/// One presentation token: a category plus the byte length it covers.
///
/// Tokens tile the input exactly: the spans of consecutive tokens are
/// adjacent, with no gaps and no overlaps. The editor reconstructs
/// absolute positions by accumulating lengths from the start of the
/// lexed region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightToken {
    pub category: TokenCategory,
    pub len: u32,
}
