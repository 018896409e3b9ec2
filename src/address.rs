//! Turning address tokens into line numbers.
//!
//! An address is folded left to right over a *running line*, starting from
//! the current line. Each token either replaces the running line (`12`, `$`,
//! `'<`, `/pat/`) or adjusts it (`+2`). The result is a 0-based row, or
//! [`LineNr::BeforeFirst`] for the position above line 1 (`:0`, `:1-5`).
//!
//! Rows are not clamped here. `:99` in a ten-line buffer resolves to row 98;
//! mapping it to characters clamps it later.

use std::fmt;

use log::debug;
use n_text::{Region, Selection, View};

use crate::error::AddressError;
use crate::options::SearchOptions;
use crate::search::{find_backward, find_in_range};
use crate::token::AddressToken;

// ---------------------------------------------------------------------------
// LineNr
// ---------------------------------------------------------------------------

/// A resolved line: a 0-based row, or the position before the first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineNr {
    /// Above line 1. Vim's line 0.
    BeforeFirst,
    /// A 0-based row.
    Line(usize),
}

impl LineNr {
    /// Row `n`, or `BeforeFirst` when `n` is negative.
    #[must_use]
    pub fn from_signed(n: i64) -> Self {
        usize::try_from(n).map_or(Self::BeforeFirst, Self::Line)
    }

    /// The row as a signed number; `BeforeFirst` is `-1`.
    #[must_use]
    pub fn to_signed(self) -> i64 {
        match self {
            Self::BeforeFirst => -1,
            Self::Line(row) => i64::try_from(row).unwrap_or(i64::MAX),
        }
    }

    /// Move by `delta` rows. Going above row 0 gives `BeforeFirst`.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        Self::from_signed(self.to_signed().saturating_add(delta))
    }

    /// The row searches start from: `BeforeFirst` searches from row 0.
    #[inline]
    #[must_use]
    pub const fn search_row(self) -> usize {
        match self {
            Self::BeforeFirst => 0,
            Self::Line(row) => row,
        }
    }
}

impl From<usize> for LineNr {
    fn from(row: usize) -> Self {
        Self::Line(row)
    }
}

impl fmt::Display for LineNr {
    /// Vim's 1-based numbering: `BeforeFirst` is `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeFirst => f.write_str("0"),
            Self::Line(row) => write!(f, "{}", row + 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve one token against the running line `current`.
///
/// # Errors
///
/// - [`AddressError::UnsupportedMark`] for a mark other than `<` or `>`
/// - [`AddressError::NoSelection`] for `<` or `>` without a selection
/// - [`AddressError::PatternNotFound`] when a search address finds nothing
/// - [`AddressError::InvalidPattern`] when a search pattern is malformed
pub fn resolve_line<V: View + ?Sized>(
    view: &V,
    token: &AddressToken,
    current: LineNr,
    opts: &SearchOptions,
) -> Result<LineNr, AddressError> {
    let last_row = || view.row_of(view.size());

    let line = match token {
        AddressToken::Digits(n) => LineNr::from_signed(n.saturating_sub(1)),
        AddressToken::CurrentLine => current.min(LineNr::Line(last_row())),
        AddressToken::LastLine | AddressToken::WholeBuffer => LineNr::Line(last_row()),
        AddressToken::Mark(name) => LineNr::Line(resolve_mark(view, *name)?),
        AddressToken::Offset(deltas) => {
            current.offset(deltas.iter().fold(0, |acc: i64, d| acc.saturating_add(*d)))
        }
        AddressToken::SearchForward(pattern) => {
            let from = view.text_point(current.search_row(), 0);
            let found = find_in_range(view, pattern, from, view.size(), opts.flags_for(pattern))?;
            LineNr::Line(found_row(view, found, pattern)?)
        }
        AddressToken::SearchBackward(pattern) => {
            let to = view.text_point(current.search_row(), 0);
            let found = find_backward(view, pattern, 0, to, opts.flags_for(pattern))?;
            LineNr::Line(found_row(view, found, pattern)?)
        }
    };
    Ok(line)
}

/// Fold an address side over `current`.
///
/// An empty side resolves to `current`. Two forward searches in a row move
/// one line down before the second search, so `/a//a/` finds the second
/// line containing `a` rather than the first one again.
///
/// # Errors
///
/// The first error from [`resolve_line`].
pub fn resolve_side<V: View + ?Sized>(
    view: &V,
    side: &[AddressToken],
    current: LineNr,
    opts: &SearchOptions,
) -> Result<LineNr, AddressError> {
    let mut running = current;
    let mut prev: Option<&AddressToken> = None;

    for token in side {
        if matches!(
            (prev, token),
            (
                Some(AddressToken::SearchForward(_)),
                AddressToken::SearchForward(_)
            )
        ) {
            running = running.offset(1);
        }
        running = resolve_line(view, token, running, opts)?;
        prev = Some(token);
    }

    Ok(running)
}

fn found_row<V: View + ?Sized>(
    view: &V,
    found: Option<Region>,
    pattern: &str,
) -> Result<usize, AddressError> {
    found.map_or_else(
        || {
            debug!("address search {pattern:?}: no match");
            Err(AddressError::PatternNotFound(pattern.to_string()))
        },
        |m| Ok(view.row_of(m.start)),
    )
}

/// The row of mark `<` (first selected line) or `>` (last selected line),
/// taken from the union of every selection.
fn resolve_mark<V: View + ?Sized>(view: &V, name: char) -> Result<usize, AddressError> {
    if name != '<' && name != '>' {
        return Err(AddressError::UnsupportedMark(name));
    }

    let union = view
        .selections()
        .iter()
        .copied()
        .map(Selection::region)
        .reduce(Region::cover)
        .ok_or(AddressError::NoSelection)?;

    // An empty union is a cursor. `<` looks at the char before it and `>` at
    // the char under it, so a cursor at the end of the buffer spans the last
    // two rows.
    let pt = match (name, union.is_empty()) {
        ('<', true) => union.start.saturating_sub(1),
        ('<', false) => union.start,
        (_, true) => union.end,
        (_, false) => union.end - 1,
    };
    Ok(view.row_of(pt))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use n_text::Buffer;
    use pretty_assertions::assert_eq;
    use AddressToken::{
        CurrentLine, Digits, LastLine, Mark, Offset, SearchBackward, SearchForward, WholeBuffer,
    };
    use LineNr::{BeforeFirst, Line};

    fn resolve(buf: &Buffer, token: &AddressToken, current: usize) -> Result<LineNr, AddressError> {
        resolve_line(buf, token, Line(current), &SearchOptions::default())
    }

    fn line(buf: &Buffer, token: &AddressToken, current: usize) -> LineNr {
        resolve(buf, token, current).unwrap()
    }

    fn selected(text: &str, anchor: usize, head: usize) -> Buffer {
        let mut buf = Buffer::from_text(text);
        buf.set_selections([Selection::new(anchor, head)]);
        buf
    }

    // -- LineNr ---------------------------------------------------------------

    #[test]
    fn line_nr_from_signed() {
        assert_eq!(LineNr::from_signed(3), Line(3));
        assert_eq!(LineNr::from_signed(0), Line(0));
        assert_eq!(LineNr::from_signed(-1), BeforeFirst);
        assert_eq!(LineNr::from_signed(i64::MIN), BeforeFirst);
    }

    #[test]
    fn line_nr_offset() {
        assert_eq!(Line(0).offset(-1), BeforeFirst);
        assert_eq!(BeforeFirst.offset(1), Line(0));
        assert_eq!(BeforeFirst.offset(-3), BeforeFirst);
        assert_eq!(Line(5).offset(-5), Line(0));
    }

    #[test]
    fn line_nr_orders_before_first_lowest() {
        assert!(BeforeFirst < Line(0));
        assert_eq!(Line(7).min(Line(3)), Line(3));
    }

    #[test]
    fn line_nr_display_is_one_based() {
        assert_eq!(BeforeFirst.to_string(), "0");
        assert_eq!(Line(0).to_string(), "1");
        assert_eq!(Line(9).to_string(), "10");
    }

    // -- Digits ---------------------------------------------------------------

    #[test]
    fn digits() {
        let buf = Buffer::new();
        assert_eq!(line(&buf, &Digits(11), 0), Line(10));
        assert_eq!(line(&buf, &Digits(3), 0), Line(2));
        assert_eq!(line(&buf, &Digits(2), 0), Line(1));
        assert_eq!(line(&buf, &Digits(1), 0), Line(0));
        assert_eq!(line(&buf, &Digits(0), 0), BeforeFirst);
        assert_eq!(line(&buf, &Digits(-1), 0), BeforeFirst);
        assert_eq!(line(&buf, &Digits(-2), 0), BeforeFirst);
    }

    // -- $ and % --------------------------------------------------------------

    #[test]
    fn last_line() {
        for (text, row) in [
            ("", 0),
            ("1", 0),
            ("1\n", 1),
            ("1\n2", 1),
            ("1\n2\n", 2),
            ("1\n2\n3\n", 3),
        ] {
            let buf = Buffer::from_text(text);
            assert_eq!(line(&buf, &LastLine, 0), Line(row), "$ in {text:?}");
            assert_eq!(line(&buf, &WholeBuffer, 0), Line(row), "% in {text:?}");
        }
    }

    // -- . --------------------------------------------------------------------

    #[test]
    fn current_line() {
        let buf = Buffer::from_text("111\n222\n333\n");
        assert_eq!(line(&buf, &CurrentLine, 0), Line(0));
        assert_eq!(line(&buf, &CurrentLine, 1), Line(1));
        assert_eq!(line(&buf, &CurrentLine, 2), Line(2));
        // Bounded by the last line of the buffer.
        assert_eq!(line(&buf, &CurrentLine, 10), Line(3));
    }

    // -- Marks ----------------------------------------------------------------

    const MARKS: &str = "11\n222\n3\n44\n55\n";

    fn marks(buf: &Buffer) -> (LineNr, LineNr) {
        (line(buf, &Mark('<'), 0), line(buf, &Mark('>'), 0))
    }

    #[test]
    fn unsupported_mark() {
        let buf = Buffer::from_text(MARKS);
        assert_eq!(resolve(&buf, &Mark('a'), 0), Err(AddressError::UnsupportedMark('a')));
    }

    #[test]
    fn mark_without_selection() {
        let mut buf = Buffer::from_text(MARKS);
        buf.clear_selections();
        assert_eq!(resolve(&buf, &Mark('<'), 0), Err(AddressError::NoSelection));
    }

    #[test]
    fn marks_of_cursor() {
        assert_eq!(marks(&selected(MARKS, 0, 0)), (Line(0), Line(0)));
        assert_eq!(marks(&selected(MARKS, 1, 1)), (Line(0), Line(0)));
        assert_eq!(marks(&selected(MARKS, 4, 4)), (Line(1), Line(1)));
        assert_eq!(marks(&selected(MARKS, 10, 10)), (Line(3), Line(3)));
        // At the end of the buffer, after the trailing newline.
        assert_eq!(marks(&selected(MARKS, 15, 15)), (Line(4), Line(5)));
    }

    #[test]
    fn marks_of_selection() {
        assert_eq!(marks(&selected(MARKS, 0, 1)), (Line(0), Line(0)));
        assert_eq!(marks(&selected(MARKS, 4, 5)), (Line(1), Line(1)));
        assert_eq!(marks(&selected(MARKS, 10, 11)), (Line(3), Line(3)));
        assert_eq!(marks(&selected(MARKS, 0, 15)), (Line(0), Line(4)));
        assert_eq!(marks(&selected(MARKS, 5, 11)), (Line(1), Line(3)));
        // Direction does not matter.
        assert_eq!(marks(&selected(MARKS, 11, 5)), (Line(1), Line(3)));
    }

    #[test]
    fn marks_cover_all_selections() {
        let mut buf = Buffer::from_text(MARKS);
        buf.set_selections([Selection::new(4, 5), Selection::new(10, 11)]);
        assert_eq!(marks(&buf), (Line(1), Line(3)));
    }

    // -- Offsets --------------------------------------------------------------

    #[test]
    fn offsets() {
        let buf = Buffer::new();
        assert_eq!(line(&buf, &Offset(vec![0]), 0), Line(0));
        assert_eq!(line(&buf, &Offset(vec![0]), 5), Line(5));
        assert_eq!(line(&buf, &Offset(vec![1]), 0), Line(1));
        assert_eq!(line(&buf, &Offset(vec![1]), 1), Line(2));
        assert_eq!(line(&buf, &Offset(vec![1]), 9), Line(10));
        assert_eq!(line(&buf, &Offset(vec![1, 2]), 0), Line(3));
        assert_eq!(line(&buf, &Offset(vec![1, 2]), 7), Line(10));
        assert_eq!(line(&buf, &Offset(vec![-1]), 0), BeforeFirst);
        assert_eq!(line(&buf, &Offset(vec![-1]), 1), Line(0));
        assert_eq!(line(&buf, &Offset(vec![-1]), 6), Line(5));
        assert_eq!(line(&buf, &Offset(vec![-1, -4]), 15), Line(10));
    }

    #[test]
    fn offset_from_before_first() {
        let buf = Buffer::new();
        let opts = SearchOptions::default();
        assert_eq!(
            resolve_line(&buf, &Offset(vec![2]), BeforeFirst, &opts).unwrap(),
            Line(1)
        );
    }

    // -- Searches -------------------------------------------------------------

    const SEARCH: &str = "ab\ncd\nx\nabcd\ny\nz\n";

    fn not_found(pattern: &str) -> Result<LineNr, AddressError> {
        Err(AddressError::PatternNotFound(pattern.into()))
    }

    #[test]
    fn search_forward() {
        let buf = Buffer::from_text(SEARCH);
        let fwd = |p: &str| SearchForward(p.into());

        assert_eq!(resolve(&buf, &fwd("foobar"), 0), not_found("foobar"));
        assert_eq!(resolve(&buf, &fwd("foobar"), 100), not_found("foobar"));

        assert_eq!(line(&buf, &fwd("a"), 0), Line(0));
        assert_eq!(line(&buf, &fwd("a"), 1), Line(3));
        assert_eq!(line(&buf, &fwd("a"), 2), Line(3));
        assert_eq!(line(&buf, &fwd("a"), 3), Line(3));
        assert_eq!(resolve(&buf, &fwd("a"), 4), not_found("a"));

        assert_eq!(line(&buf, &fwd("cd"), 0), Line(1));
        assert_eq!(line(&buf, &fwd("cd"), 1), Line(1));
        assert_eq!(line(&buf, &fwd("cd"), 2), Line(3));
        assert_eq!(line(&buf, &fwd("cd"), 3), Line(3));
        assert_eq!(resolve(&buf, &fwd("cd"), 4), not_found("cd"));
    }

    #[test]
    fn search_backward() {
        let buf = Buffer::from_text(SEARCH);
        let bwd = |p: &str| SearchBackward(p.into());

        assert_eq!(resolve(&buf, &bwd("foobar"), 0), not_found("foobar"));
        assert_eq!(resolve(&buf, &bwd("foobar"), 100), not_found("foobar"));

        assert_eq!(line(&buf, &bwd("a"), 100), Line(3));
        assert_eq!(line(&buf, &bwd("a"), 5), Line(3));
        assert_eq!(line(&buf, &bwd("a"), 4), Line(3));
        assert_eq!(line(&buf, &bwd("a"), 3), Line(0));
        assert_eq!(line(&buf, &bwd("a"), 2), Line(0));
        assert_eq!(line(&buf, &bwd("a"), 1), Line(0));
        assert_eq!(resolve(&buf, &bwd("a"), 0), not_found("a"));

        assert_eq!(line(&buf, &bwd("bc"), 5), Line(3));
        assert_eq!(line(&buf, &bwd("bc"), 4), Line(3));
        assert_eq!(resolve(&buf, &bwd("bc"), 3), not_found("bc"));
    }

    #[test]
    fn search_from_before_first_starts_at_top() {
        let buf = Buffer::from_text(SEARCH);
        let opts = SearchOptions::default();
        assert_eq!(
            resolve_line(&buf, &SearchForward("a".into()), BeforeFirst, &opts).unwrap(),
            Line(0)
        );
    }

    #[test]
    fn search_invalid_pattern() {
        let buf = Buffer::from_text(SEARCH);
        let err = resolve(&buf, &SearchForward("(a|".into()), 0).unwrap_err();
        assert!(matches!(err, AddressError::InvalidPattern(_)));
    }

    #[test]
    fn search_uses_options() {
        let buf = Buffer::from_text("one\nTWO\nthree\n");
        let ic = SearchOptions {
            ignorecase: true,
            ..SearchOptions::default()
        };
        let token = SearchForward("two".into());
        assert_eq!(resolve(&buf, &token, 0), not_found("two"));
        assert_eq!(resolve_line(&buf, &token, Line(0), &ic).unwrap(), Line(1));
    }

    // -- Sides ----------------------------------------------------------------

    #[test]
    fn empty_side_is_current() {
        let buf = Buffer::from_text(SEARCH);
        let opts = SearchOptions::default();
        assert_eq!(resolve_side(&buf, &[], Line(4), &opts).unwrap(), Line(4));
    }

    #[test]
    fn side_folds_left_to_right() {
        let buf = Buffer::from_text(SEARCH);
        let opts = SearchOptions::default();
        let side = [Digits(2), Offset(vec![2]), Offset(vec![-1])];
        assert_eq!(resolve_side(&buf, &side, Line(0), &opts).unwrap(), Line(2));

        // A later absolute token replaces the running line.
        let side = [Digits(5), LastLine];
        assert_eq!(resolve_side(&buf, &side, Line(0), &opts).unwrap(), Line(6));
    }

    #[test]
    fn consecutive_forward_searches_advance() {
        let buf = Buffer::from_text("aaa aaa\nbbb bbb\nccc cat\nddd ddd\neee eee\nfff cat\n");
        let opts = SearchOptions::default();
        let side = [SearchForward("cat".into()), SearchForward("cat".into())];
        assert_eq!(resolve_side(&buf, &side, Line(0), &opts).unwrap(), Line(5));
    }

    #[test]
    fn consecutive_backward_searches() {
        let buf = Buffer::from_text("aaa aaa\nbbb bbb\nccc cat\nddd cat\neee eee\nfff fff\n");
        let opts = SearchOptions::default();
        let side = [SearchBackward("cat".into()), SearchBackward("cat".into())];
        assert_eq!(resolve_side(&buf, &side, Line(6), &opts).unwrap(), Line(2));
    }

    #[test]
    fn side_stops_at_first_error() {
        let buf = Buffer::from_text(SEARCH);
        let opts = SearchOptions::default();
        let side = [SearchForward("nope".into()), Mark('x')];
        assert_eq!(
            resolve_side(&buf, &side, Line(0), &opts),
            not_found("nope")
        );
    }
}
