//! Raw-kind to presentation-category mapping.

use tomlight_grammar::TomlTag;

use crate::token::TokenCategory;

/// Map a raw grammar token kind to its presentation category.
///
/// The match is exhaustive over `TomlTag`, so a new raw kind upstream is
/// a compile error here rather than a silently dropped token. The
/// mapping is deliberately many-to-one: the editor distinguishes far
/// fewer colors than the grammar distinguishes kinds.
pub fn classify(tag: TomlTag) -> TokenCategory {
    match tag {
        TomlTag::StringChar => TokenCategory::String,

        TomlTag::QuotationMark
        | TomlTag::TripleQuotationMark
        | TomlTag::Apostrophe
        | TomlTag::TripleApostrophe => TokenCategory::StringQuote,

        TomlTag::Comma
        | TomlTag::ArrayStart
        | TomlTag::ArrayEnd
        | TomlTag::InlineTableStart
        | TomlTag::InlineTableEnd
        | TomlTag::Dot => TokenCategory::Dot,

        TomlTag::Equals => TokenCategory::Equals,

        TomlTag::TableKeyStart
        | TomlTag::TableKeyEnd
        | TomlTag::ArrayTableKeyStart
        | TomlTag::ArrayTableKeyEnd => TokenCategory::TableMark,

        TomlTag::UnquotedKey => TokenCategory::Key,

        TomlTag::Comment => TokenCategory::Comment,

        TomlTag::Ws | TomlTag::NewLine => TokenCategory::Whitespace,

        TomlTag::DecimalInteger
        | TomlTag::HexInteger
        | TomlTag::OctalInteger
        | TomlTag::BinaryInteger
        | TomlTag::Float
        | TomlTag::FloatInf
        | TomlTag::FloatNan => TokenCategory::Number,

        TomlTag::BoolTrue | TomlTag::BoolFalse => TokenCategory::Boolean,

        TomlTag::EscapeSequence => TokenCategory::EscapeSequence,

        TomlTag::Dash
        | TomlTag::Plus
        | TomlTag::Colon
        | TomlTag::Zulu
        | TomlTag::TimeDelimiter
        | TomlTag::DateDigits => TokenCategory::Date,

        // Eof never reaches classification in a live session; both it
        // and the grammar's own error kind degrade to the error color.
        TomlTag::Error | TomlTag::Eof => TokenCategory::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn punctuation_collapses_into_dot() {
        for tag in [
            TomlTag::Comma,
            TomlTag::ArrayStart,
            TomlTag::ArrayEnd,
            TomlTag::InlineTableStart,
            TomlTag::InlineTableEnd,
            TomlTag::Dot,
        ] {
            assert_eq!(classify(tag), TokenCategory::Dot);
        }
    }

    #[test]
    fn all_quote_kinds_are_string_quote() {
        for tag in [
            TomlTag::QuotationMark,
            TomlTag::TripleQuotationMark,
            TomlTag::Apostrophe,
            TomlTag::TripleApostrophe,
        ] {
            assert_eq!(classify(tag), TokenCategory::StringQuote);
        }
    }

    #[test]
    fn date_components_collapse_into_date() {
        for tag in [
            TomlTag::DateDigits,
            TomlTag::Dash,
            TomlTag::Plus,
            TomlTag::Colon,
            TomlTag::TimeDelimiter,
            TomlTag::Zulu,
        ] {
            assert_eq!(classify(tag), TokenCategory::Date);
        }
    }

    #[test]
    fn numeric_kinds_collapse_into_number() {
        for tag in [
            TomlTag::DecimalInteger,
            TomlTag::HexInteger,
            TomlTag::OctalInteger,
            TomlTag::BinaryInteger,
            TomlTag::Float,
            TomlTag::FloatInf,
            TomlTag::FloatNan,
        ] {
            assert_eq!(classify(tag), TokenCategory::Number);
        }
    }

    #[test]
    fn grammar_error_degrades_to_error_category() {
        assert_eq!(classify(TomlTag::Error), TokenCategory::Error);
    }
}
