//! Address tokens and ranges — the data an ex range is made of.
//!
//! An ex command like `:'<,'>s/a/b/` or `:.;/end/-1d` starts with a range:
//! a start address, an optional separator, and an end address. Each address
//! is a short sequence of tokens evaluated left to right. Every token except
//! [`AddressToken::Offset`] replaces the running line; offsets adjust it.
//!
//! | Text      | Token                         | Meaning                         |
//! |-----------|-------------------------------|---------------------------------|
//! | `12`      | `Digits(12)`                  | line 12 (1-indexed)             |
//! | `.`       | `CurrentLine`                 | the current line                |
//! | `$`       | `LastLine`                    | the last line                   |
//! | `%`       | `WholeBuffer`                 | every line (`1,$`)              |
//! | `'<` `'>` | `Mark('<')` `Mark('>')`       | start / end of the selection    |
//! | `/pat/`   | `SearchForward("pat")`        | next line matching `pat`        |
//! | `?pat?`   | `SearchBackward("pat")`       | previous line matching `pat`    |
//! | `+2-1`    | `Offset(vec![2, -1])`         | running line + 1                |
//!
//! Nothing is validated here. Unsupported marks, failed searches and
//! degenerate lines are all reported when the range is resolved.

use std::fmt;

// ---------------------------------------------------------------------------
// AddressToken
// ---------------------------------------------------------------------------

/// One element of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressToken {
    /// An explicit 1-based line number. `0` and negative numbers address the
    /// position before the first line.
    Digits(i64),

    /// `.` — the current line.
    CurrentLine,

    /// `$` — the last line.
    LastLine,

    /// `%` — the whole buffer. Only meaningful as the sole start token; used
    /// anywhere else it addresses the last line.
    WholeBuffer,

    /// `'c` — a named mark. Only `<` and `>` are supported.
    Mark(char),

    /// `/pattern/` — the next line containing `pattern`.
    SearchForward(String),

    /// `?pattern?` — the previous line containing `pattern`.
    SearchBackward(String),

    /// `+n` / `-n` chain — relative adjustments, summed.
    Offset(Vec<i64>),
}

impl AddressToken {
    /// True for the two pattern-search tokens.
    #[inline]
    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::SearchForward(_) | Self::SearchBackward(_))
    }
}

impl fmt::Display for AddressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digits(n) => write!(f, "{n}"),
            Self::CurrentLine => f.write_str("."),
            Self::LastLine => f.write_str("$"),
            Self::WholeBuffer => f.write_str("%"),
            Self::Mark(name) => write!(f, "'{name}"),
            Self::SearchForward(pat) => write!(f, "/{}/", escape_delim(pat, '/')),
            Self::SearchBackward(pat) => write!(f, "?{}?", escape_delim(pat, '?')),
            Self::Offset(deltas) => {
                for delta in deltas {
                    write!(f, "{delta:+}")?;
                }
                Ok(())
            }
        }
    }
}

/// Escape unescaped occurrences of `delim` so the pattern survives a
/// render/parse round trip.
fn escape_delim(pattern: &str, delim: char) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for ch in pattern.chars() {
        if ch == delim && !escaped {
            out.push('\\');
        }
        escaped = ch == '\\' && !escaped;
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// How the end address of a range is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `,` — the end address is relative to the original current line.
    Comma,

    /// `;` — the current line is first set to the start address, and the end
    /// address is relative to that.
    Semicolon,
}

impl Separator {
    /// The separator character.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A line range: start address, optional separator, end address.
///
/// An empty range (no tokens on either side) means "the current line".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Tokens of the start address.
    pub start: Vec<AddressToken>,
    /// Tokens of the end address. Empty for a single-address range.
    pub end: Vec<AddressToken>,
    /// The separator between the two addresses, if one was written.
    pub separator: Option<Separator>,
}

impl Range {
    /// Create a range from its parts.
    #[must_use]
    pub const fn new(
        start: Vec<AddressToken>,
        end: Vec<AddressToken>,
        separator: Option<Separator>,
    ) -> Self {
        Self {
            start,
            end,
            separator,
        }
    }

    /// A single-address range.
    #[must_use]
    pub const fn single(start: Vec<AddressToken>) -> Self {
        Self {
            start,
            end: Vec::new(),
            separator: None,
        }
    }

    /// `%` — the whole buffer.
    #[must_use]
    pub fn whole_buffer() -> Self {
        Self::single(vec![AddressToken::WholeBuffer])
    }

    /// True when neither side has any tokens.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }

    /// True when the range is exactly `%`.
    #[inline]
    #[must_use]
    pub fn is_whole_buffer(&self) -> bool {
        matches!(self.start.as_slice(), [AddressToken::WholeBuffer])
    }
}

/// Renders the range in the syntax [`parse_range`](crate::parse::parse_range)
/// reads.
///
/// A number that directly follows another number or an offset is preceded
/// by a blank (`1 2`, `+1 5`) so the digits stay apart. Two token shapes
/// have no written form and do not parse back to themselves:
///
/// - `Digits(n)` with `n < 0` renders as `-n`, which reads as an offset.
/// - A pattern ending in a lone `\` escapes its own closing delimiter.
impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.start)?;
        if let Some(sep) = self.separator {
            write!(f, "{sep}")?;
        }
        write_side(f, &self.end)
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, side: &[AddressToken]) -> fmt::Result {
    let mut prev: Option<&AddressToken> = None;
    for token in side {
        let glued = matches!(
            (prev, token),
            (
                Some(AddressToken::Digits(_) | AddressToken::Offset(_)),
                AddressToken::Digits(_)
            )
        );
        if glued {
            f.write_str(" ")?;
        }
        write!(f, "{token}")?;
        prev = Some(token);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
