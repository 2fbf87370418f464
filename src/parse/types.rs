//! Types produced by the assignment scanner and consumed by value resolution.

use std::ops::Range;

/// Quoting style wrapping a captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `'...'`: verbatim, no escapes, no substitution
    Single,
    /// `"..."`: `\n`/`\r` translation, unescaping, substitution
    Double,
    /// bare value: unescaping and substitution
    None,
}

impl Quote {
    /// The quote character, if any.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Quote::Single => Some('\''),
            Quote::Double => Some('"'),
            Quote::None => None,
        }
    }
}

/// One `KEY=value` match inside a content buffer.
///
/// `value` is the raw capture, still quoted and possibly padded with
/// whitespace. `span` covers the whole match (including leading blank lines
/// and a trailing comment) so it can be cut out before export validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub span: Range<usize>,
}

/// A bare `export NAME` declaration found in leftover text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareExport<'a> {
    /// The matched declaration, trimmed. May span more than one line.
    pub line: &'a str,
    pub name: &'a str,
}
