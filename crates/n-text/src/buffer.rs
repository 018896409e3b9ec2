//! Text buffer — a rope plus the selections made in it.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and implements [`View`], the read-only
//! interface address resolution is written against.
//!
//! # Design choices
//!
//! - **ropey** provides O(log n) line indexing and char/byte conversion. The
//!   row and line-boundary queries that line bisection performs on every step
//!   are cheap because of it.
//!
//! - **Offsets are char offsets**, not byte offsets. Byte offsets only appear
//!   inside [`find`](View::find), where the regex engine needs them, and never
//!   leak into the public API.
//!
//! - **The final line is real.** A buffer ending in `\n` has an empty final
//!   line starting at `size()`, exactly as editors display it. `$` resolves to
//!   that line.
//!
//! - **Patterns are compiled per call.** Nothing is cached, so a buffer edited
//!   between two searches can never serve a stale result.

use std::borrow::Cow;
use std::fmt;

use regex::RegexBuilder;
use ropey::{Rope, RopeSlice};

use crate::region::{Region, Selection};
use crate::view::{PatternError, SearchFlags, View};
use crate::word;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope, with the selections of its active view.
///
/// # Coordinate system
///
/// All points are char offsets. Rows are 0-indexed; an empty buffer has one
/// (empty) row.
pub struct Buffer {
    rope: Rope,
    selections: Vec<Selection>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with a cursor at offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            selections: vec![Selection::cursor(0)],
        }
    }

    /// Create a buffer from a string, with a cursor at offset 0.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selections: vec![Selection::cursor(0)],
        }
    }

    // -- Text access --------------------------------------------------------

    /// Total number of lines. An empty buffer has 1 line (the empty line).
    /// A buffer ending with `\n` has a trailing empty line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line by row, including its trailing line ending.
    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        if row < self.rope.len_lines() {
            Some(self.rope.line(row))
        } else {
            None
        }
    }

    /// The text covered by `region`, clamped to the buffer.
    #[must_use]
    pub fn slice(&self, region: Region) -> RopeSlice<'_> {
        let len = self.rope.len_chars();
        self.rope.slice(region.start.min(len)..region.end.min(len))
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole text. Selections are clamped to the new size.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let len = self.rope.len_chars();
        for sel in &mut self.selections {
            *sel = Selection::new(sel.anchor.min(len), sel.head.min(len));
        }
    }

    // -- Selections -----------------------------------------------------------

    /// Replace all selections with a single cursor at `pt` (clamped).
    pub fn select_point(&mut self, pt: usize) {
        let pt = pt.min(self.rope.len_chars());
        self.selections = vec![Selection::cursor(pt)];
    }

    /// Replace all selections with the given ones (clamped, sorted by start).
    pub fn set_selections(&mut self, selections: impl IntoIterator<Item = Selection>) {
        let len = self.rope.len_chars();
        let mut sels: Vec<Selection> = selections
            .into_iter()
            .map(|s| Selection::new(s.anchor.min(len), s.head.min(len)))
            .collect();
        sels.sort_by_key(|s| s.begin());
        self.selections = sels;
    }

    /// Remove every selection.
    pub fn clear_selections(&mut self) {
        self.selections.clear();
    }

    // -- Pattern search -----------------------------------------------------

    /// The whole text as one `&str`, borrowing when the rope is a single chunk.
    fn text(&self) -> Cow<'_, str> {
        self.rope
            .slice(..)
            .as_str()
            .map_or_else(|| Cow::Owned(self.rope.to_string()), Cow::Borrowed)
    }
}

impl View for Buffer {
    #[inline]
    fn size(&self) -> usize {
        self.rope.len_chars()
    }

    fn full_line(&self, pt: usize) -> Region {
        let row = self.row_of(pt);
        let start = self.rope.line_to_char(row);
        Region::new(start, start + self.rope.line(row).len_chars())
    }

    #[inline]
    fn row_of(&self, pt: usize) -> usize {
        self.rope.char_to_line(pt.min(self.rope.len_chars()))
    }

    fn text_point(&self, row: usize, col: usize) -> usize {
        let row = row.min(self.rope.len_lines() - 1);
        let start = self.rope.line_to_char(row);
        start + col.min(self.rope.line(row).len_chars())
    }

    fn find(
        &self,
        pattern: &str,
        from: usize,
        flags: SearchFlags,
    ) -> Result<Option<Region>, PatternError> {
        let source: Cow<'_, str> = if flags.contains(SearchFlags::LITERAL) {
            Cow::Owned(regex::escape(pattern))
        } else {
            Cow::Borrowed(pattern)
        };
        let re = RegexBuilder::new(&source)
            .case_insensitive(flags.contains(SearchFlags::IGNORECASE))
            .multi_line(true)
            .build()
            .map_err(|e| PatternError {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        let from = from.min(self.rope.len_chars());
        let text = self.text();
        let found = re.find_at(&text, self.rope.char_to_byte(from)).map(|m| {
            Region::new(
                self.rope.byte_to_char(m.start()),
                self.rope.byte_to_char(m.end()),
            )
        });
        Ok(found)
    }

    #[inline]
    fn selections(&self) -> &[Selection] {
        &self.selections
    }

    #[inline]
    fn word(&self, pt: usize) -> Region {
        word::word_at(&self.rope, pt)
    }

    fn substr(&self, region: Region) -> String {
        self.slice(region).to_string()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.rope.len_chars())
            .field("selections", &self.selections)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
