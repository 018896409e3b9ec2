//! Word boundaries — the word touching a point.
//!
//! A **word** is a run of word characters (letters, digits, underscore) or a
//! run of other non-blank characters (punctuation). Boundaries exist between
//! classes: `hello.world` contains three words (`hello`, `.`, `world`).
//! Whitespace and line endings never belong to a word.

use ropey::Rope;

use crate::region::Region;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
    /// Line ending (`\n`, `\r`).
    Newline,
}

impl CharClass {
    /// True for the classes a word can be made of.
    const fn is_wordy(self) -> bool {
        matches!(self, Self::Word | Self::Punctuation)
    }
}

/// Classify a character.
pub(crate) fn classify(ch: char) -> CharClass {
    if ch == '\n' || ch == '\r' {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

// ---------------------------------------------------------------------------
// Word lookup
// ---------------------------------------------------------------------------

/// The word touching `pt`.
///
/// The char at `pt` wins; when it is blank (or `pt` is at the end of the
/// text) the char just before `pt` is tried, so a cursor sitting right after
/// a word still finds it. Returns an empty region at `pt` when neither side
/// is part of a word.
pub(crate) fn word_at(rope: &Rope, pt: usize) -> Region {
    let len = rope.len_chars();
    let pt = pt.min(len);

    let class_at = |idx: usize| classify(rope.char(idx));

    let anchor = if pt < len && class_at(pt).is_wordy() {
        pt
    } else if pt > 0 && class_at(pt - 1).is_wordy() {
        pt - 1
    } else {
        return Region::point(pt);
    };
    let cls = class_at(anchor);

    let mut start = anchor;
    while start > 0 && class_at(start - 1) == cls {
        start -= 1;
    }

    let mut end = anchor + 1;
    while end < len && class_at(end) == cls {
        end += 1;
    }

    Region::new(start, end)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
