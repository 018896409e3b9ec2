//! Resolving a [`Range`] to a region of the buffer, and checking it against
//! the command it belongs to.
//!
//! ```text
//!  :2,4d         start = row 1, end = row 3   → [start of row 1, end of row 3)
//!  :.;+1         end is relative to the start → two lines from the cursor
//!  :%            the whole buffer             → [0, size)
//!  :0            above the first line         → Span::BeforeFirst
//! ```

use std::fmt;

use log::debug;
use n_text::{Region, View};

use crate::address::{resolve_side, LineNr};
use crate::error::AddressError;
use crate::options::SearchOptions;
use crate::token::{Range, Separator};

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// What a range resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Span {
    /// A side of the range addressed the position above line 1 (`:0`,
    /// `:1-3`). Commands like `:put` and `:read` treat this as "insert at the
    /// top"; others reject it.
    BeforeFirst,

    /// Whole lines, including the final line's terminator.
    Region(Region),
}

impl Span {
    /// The region, unless the span is `BeforeFirst`.
    #[inline]
    #[must_use]
    pub const fn region(self) -> Option<Region> {
        match self {
            Self::BeforeFirst => None,
            Self::Region(region) => Some(region),
        }
    }
}

// ---------------------------------------------------------------------------
// Range resolution
// ---------------------------------------------------------------------------

impl Range {
    /// Resolve against `view` with `current_line` (0-based) as `.`, using
    /// default search options.
    ///
    /// # Errors
    ///
    /// See [`Range::resolve_with`].
    pub fn resolve<V: View + ?Sized>(
        &self,
        view: &V,
        current_line: usize,
    ) -> Result<Span, AddressError> {
        self.resolve_with(view, current_line, &SearchOptions::default())
    }

    /// Resolve against `view` with the cursor's line as `.`.
    ///
    /// The cursor is the head of the first selection; without a selection
    /// `.` is the first line.
    ///
    /// # Errors
    ///
    /// See [`Range::resolve_with`].
    pub fn resolve_at_cursor<V: View + ?Sized>(&self, view: &V) -> Result<Span, AddressError> {
        let current = view
            .selections()
            .first()
            .map_or(0, |sel| view.row_of(sel.head));
        self.resolve(view, current)
    }

    /// Resolve against `view` with `current_line` (0-based) as `.`.
    ///
    /// - An empty range is the current line.
    /// - `%` alone is the whole buffer.
    /// - A single address is that line.
    /// - Two addresses span from the start of the first line to the end of
    ///   the second. After `;` the second address is relative to the first,
    ///   after `,` to `current_line`. A backwards range is swapped.
    ///
    /// Rows past the end of the buffer are clamped to the last line.
    ///
    /// # Errors
    ///
    /// The first error from either side: an unsupported or unset mark, a
    /// search that found nothing, or a malformed pattern. No partial result
    /// is returned.
    pub fn resolve_with<V: View + ?Sized>(
        &self,
        view: &V,
        current_line: usize,
        opts: &SearchOptions,
    ) -> Result<Span, AddressError> {
        let span = self.resolve_span(view, current_line, opts);
        match &span {
            Ok(span) => debug!("range {self:?} at line {current_line}: {span:?}"),
            Err(err) => debug!("range {self:?} at line {current_line}: {err}"),
        }
        span
    }

    fn resolve_span<V: View + ?Sized>(
        &self,
        view: &V,
        current_line: usize,
        opts: &SearchOptions,
    ) -> Result<Span, AddressError> {
        let full_line = |row: usize| view.full_line(view.text_point(row, 0));

        if self.is_empty() {
            return Ok(Span::Region(full_line(current_line)));
        }

        let current = LineNr::Line(current_line);
        let LineNr::Line(start) = resolve_side(view, &self.start, current, opts)? else {
            return Ok(Span::BeforeFirst);
        };

        if self.is_whole_buffer() {
            return Ok(Span::Region(Region::new(0, view.size())));
        }

        if self.end.is_empty() {
            return Ok(Span::Region(full_line(start)));
        }

        let base = match self.separator {
            Some(Separator::Semicolon) => LineNr::Line(start),
            Some(Separator::Comma) | None => current,
        };
        let LineNr::Line(end) = resolve_side(view, &self.end, base, opts)? else {
            return Ok(Span::BeforeFirst);
        };

        let (first, last) = if start <= end { (start, end) } else { (end, start) };
        Ok(Span::Region(Region::new(
            full_line(first).start,
            full_line(last).end,
        )))
    }

    /// Check that this range may be given to `command`.
    ///
    /// # Errors
    ///
    /// [`AddressError::NoRangeAllowed`] when the range is not empty and the
    /// command does not take one.
    pub fn validate(&self, command: &dyn Addressable) -> Result<(), AddressError> {
        if self.is_empty() || command.is_addressable() {
            Ok(())
        } else {
            Err(AddressError::NoRangeAllowed)
        }
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// A command that may or may not accept a range.
pub trait Addressable {
    /// True if the command takes a line range (`:d`, `:s`), false if a range
    /// is an error (`:help`, `:set`).
    fn is_addressable(&self) -> bool;
}

/// A parsed command line: the range and the command after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLineNode<C> {
    /// The address prefix. Empty when none was written.
    pub range: Range,
    /// The command, if one was given (`:5` alone just moves the cursor).
    pub command: Option<C>,
}

impl<C: Addressable> CommandLineNode<C> {
    /// Pair a range with a command.
    #[must_use]
    pub const fn new(range: Range, command: Option<C>) -> Self {
        Self { range, command }
    }

    /// Check that the command accepts the range.
    ///
    /// A command line without a command is always valid.
    ///
    /// # Errors
    ///
    /// [`AddressError::NoRangeAllowed`] from [`Range::validate`].
    pub fn validate(&self) -> Result<(), AddressError> {
        self.command
            .as_ref()
            .map_or(Ok(()), |command| self.range.validate(command))
    }
}

impl<C: fmt::Display> fmt::Display for CommandLineNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.range)?;
        if let Some(command) = &self.command {
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
