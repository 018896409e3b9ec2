//! Character regions and selections.
//!
//! All coordinates are **char offsets** into the buffer, 0-indexed. A point
//! equal to the buffer size is valid: it is the position just past the last
//! character (the empty final line of a buffer ending in a newline).
//!
//! Rows are 0-indexed too. Converting to Vim's 1-indexed line numbers is the
//! job of the address layer and the display, never of this module.

use std::fmt;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A half-open span of characters: `[start, end)`.
///
/// `start` is inclusive, `end` is exclusive. An empty region has
/// `start == end` and marks a point (a zero-length match, or the empty final
/// line). Regions are always normalized so that `start <= end`. Use
/// [`Region::new`] which enforces this, or [`Region::ordered`] on untrusted
/// input.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    /// A zero-width region at offset 0.
    pub const ZERO: Self = Self { start: 0, end: 0 };

    /// Create a region. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Region::new requires start <= end");
        Self { start, end }
    }

    /// Create a region from two arbitrary offsets, swapping if needed so that
    /// `start <= end`.
    #[inline]
    #[must_use]
    pub const fn ordered(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width region at `pt`.
    #[inline]
    #[must_use]
    pub const fn point(pt: usize) -> Self {
        Self { start: pt, end: pt }
    }

    /// True when the region spans zero characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Number of characters covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True when `pt` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, pt: usize) -> bool {
        pt >= self.start && pt < self.end
    }

    /// The smallest region covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({}..{})", self.start, self.end)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Region {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::ordered(r.start, r.end)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A selection: the `anchor` where it started and the `head` where the
/// cursor currently sits.
///
/// The head may be before the anchor when the user selected backwards. An
/// empty selection (`anchor == head`) is a plain cursor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    /// Create a selection from anchor to head.
    #[inline]
    #[must_use]
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A cursor (empty selection) at `pt`.
    #[inline]
    #[must_use]
    pub const fn cursor(pt: usize) -> Self {
        Self {
            anchor: pt,
            head: pt,
        }
    }

    /// The lower bound, regardless of direction.
    #[inline]
    #[must_use]
    pub const fn begin(self) -> usize {
        if self.anchor <= self.head {
            self.anchor
        } else {
            self.head
        }
    }

    /// The upper bound, regardless of direction.
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        if self.anchor <= self.head {
            self.head
        } else {
            self.anchor
        }
    }

    /// True when the selection is a bare cursor.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.anchor == self.head
    }

    /// The selected span as an ordered region.
    #[inline]
    #[must_use]
    pub const fn region(self) -> Region {
        Region::ordered(self.anchor, self.head)
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sel({}->{})", self.anchor, self.head)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
