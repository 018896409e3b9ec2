//! Errors raised while parsing or resolving an address.
//!
//! Vim error numbers are kept in the messages so a command layer can show
//! them to the user unchanged.

use n_text::PatternError;

/// Why an address or range could not be turned into a region.
///
/// A degenerate address (`0`, a negative line) is **not** an error. It
/// resolves to [`LineNr::BeforeFirst`](crate::address::LineNr::BeforeFirst)
/// and the caller decides what that means.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// A mark other than the visual-selection marks `<` and `>`.
    #[error("E20: Mark not supported: '{0}")]
    UnsupportedMark(char),

    /// A visual mark was used while the view has no selection.
    #[error("E20: Mark not set")]
    NoSelection,

    /// A `/pattern/` or `?pattern?` address found nothing.
    #[error("E486: Pattern not found: {0}")]
    PatternNotFound(String),

    /// A range was given to a command that does not accept one.
    #[error("E481: No range allowed")]
    NoRangeAllowed,

    /// The pattern of a search address is malformed.
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// The address text could not be parsed.
    #[error("E14: Invalid address at {offset}: {reason}")]
    Parse {
        /// Byte offset into the parsed text.
        offset: usize,
        /// What was expected there.
        reason: &'static str,
    },
}
