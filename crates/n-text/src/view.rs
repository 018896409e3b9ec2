//! The read-only view of a buffer that address resolution is written against.
//!
//! The address layer never touches a rope or a regex directly. It asks a
//! [`View`] for line arithmetic, the current selections, the word under a
//! point, substrings, and a single forward pattern search. Everything else (backward
//! search, wrapping, range resolution) is built on top of these primitives.
//!
//! [`Buffer`](crate::buffer::Buffer) is the rope-backed implementation. A host
//! editor with its own text store implements [`View`] for that store instead.

use crate::region::{Region, Selection};

bitflags::bitflags! {
    /// How [`View::find`] interprets a pattern.
    ///
    /// ```
    /// use n_text::SearchFlags;
    ///
    /// let flags = SearchFlags::LITERAL | SearchFlags::IGNORECASE;
    /// assert!(flags.contains(SearchFlags::LITERAL));
    /// assert!(!SearchFlags::empty().contains(SearchFlags::IGNORECASE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct SearchFlags: u8 {
        /// Match the pattern as plain text, not as a regular expression.
        const LITERAL    = 1 << 0;
        /// Case-insensitive matching.
        const IGNORECASE = 1 << 1;
    }
}

/// A pattern the search engine could not compile.
///
/// "No match" is never an error, it is `Ok(None)`. This is only returned
/// when the pattern itself is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("E383: Invalid search pattern: {pattern}: {message}")]
pub struct PatternError {
    /// The pattern as given by the caller.
    pub pattern: String,
    /// The engine's description of what is wrong with it.
    pub message: String,
}

/// Line arithmetic and forward search over a text snapshot.
///
/// All offsets are char offsets. Implementations clamp out-of-range input
/// instead of panicking: a point past the end behaves like [`size`](Self::size),
/// a row past the end behaves like the last row.
pub trait View {
    /// Total number of chars. The exclusive upper bound of every offset.
    fn size(&self) -> usize;

    /// The full line containing `pt`, including its line terminator.
    ///
    /// At `size()` this is the final line, which is empty when the buffer
    /// ends in a newline.
    fn full_line(&self, pt: usize) -> Region;

    /// Zero-based row of the line containing `pt`.
    fn row_of(&self, pt: usize) -> usize;

    /// Offset of (`row`, `col`), clamped to the buffer.
    fn text_point(&self, row: usize, col: usize) -> usize;

    /// The first match of `pattern` starting at or after `from`.
    ///
    /// Zero-length matches are returned like any other match.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern cannot be compiled.
    fn find(&self, pattern: &str, from: usize, flags: SearchFlags)
    -> Result<Option<Region>, PatternError>;

    /// The current selections, in document order. May be empty.
    fn selections(&self) -> &[Selection];

    /// The word touching `pt`. Empty at `pt` when there is none.
    fn word(&self, pt: usize) -> Region;

    /// The text covered by `region`.
    fn substr(&self, region: Region) -> String;
}
