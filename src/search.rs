//! Pattern search over a [`View`] — forward, backward, and wrapping.
//!
//! The view only knows how to find the first match after a point. Everything
//! else is derived from that:
//!
//! - **Range-bounded search** — a match counts only if it *ends* inside the
//!   range. A match that starts inside but runs past the end is rejected.
//! - **Backward search** — bisection over whole lines. Each step asks "is
//!   there a match in the upper half?" with one forward search. When the
//!   bounds collapse to one line, the last match on that line wins.
//! - **Wrapping search** — when the forward (or backward) search falls off
//!   the end, it restarts from the other end of the buffer and stops at the
//!   word under the first selection.
//!
//! Every function returns `Ok(None)` for "no match". `Err` only carries a
//! pattern the view could not compile.

use log::trace;
use n_text::{PatternError, Region, SearchFlags, View};

// ---------------------------------------------------------------------------
// Range-bounded forward search
// ---------------------------------------------------------------------------

/// The first match at or after `start` whose end is at most `end`.
///
/// Zero-length matches count.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_in_range<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
) -> Result<Option<Region>, PatternError> {
    let found = view.find(pattern, start, flags)?;
    Ok(found.filter(|m| m.end <= end))
}

/// Every match in `[start, end]`, in order.
///
/// After a zero-length match the scan resumes one char later so it always
/// makes progress. An `end` past the buffer is treated as the buffer end.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_all_in_range<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
) -> Result<Vec<Region>, PatternError> {
    let end = end.min(view.size());
    let mut matches = Vec::new();
    let mut from = start;
    while from <= end {
        let Some(m) = find_in_range(view, pattern, from, end, flags)? else {
            break;
        };
        from = next_from(m);
        matches.push(m);
    }
    Ok(matches)
}

/// The last match in `[start, end]`. An `end` past the buffer is treated as
/// the buffer end.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_last_in_range<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
) -> Result<Option<Region>, PatternError> {
    let end = end.min(view.size());
    let mut last = None;
    let mut from = start;
    while from <= end {
        let Some(m) = find_in_range(view, pattern, from, end, flags)? else {
            break;
        };
        last = Some(m);
        from = next_from(m);
    }
    Ok(last)
}

/// Where to resume after `m`: its end, or one past it for an empty match.
#[inline]
const fn next_from(m: Region) -> usize {
    if m.is_empty() { m.end + 1 } else { m.end }
}

// ---------------------------------------------------------------------------
// Backward search (line bisection)
// ---------------------------------------------------------------------------

/// How much of the final line a backward search considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grain {
    /// Only the part of the line inside `[start, end]`.
    Char,
    /// From the start of the line, even if `start` is later on it.
    Line,
}

/// The last match in `[start, end]`, found by bisecting whole lines.
///
/// Returns `None` when `end` is past the end of the buffer.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_backward<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
) -> Result<Option<Region>, PatternError> {
    bisect(view, pattern, start, end, flags, Grain::Char)
}

/// Like [`find_backward`], but once the search has narrowed to one line the
/// whole start of that line is searched, not just the part after `start`.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_backward_linewise<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
) -> Result<Option<Region>, PatternError> {
    bisect(view, pattern, start, end, flags, Grain::Line)
}

fn bisect<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    start: usize,
    end: usize,
    flags: SearchFlags,
    grain: Grain,
) -> Result<Option<Region>, PatternError> {
    if end > view.size() {
        return Ok(None);
    }

    let line = |row: usize| view.full_line(view.text_point(row, 0));

    let mut lo_row = view.row_of(start);
    let mut hi_row = view.row_of(end);

    while lo_row < hi_row {
        let lo = line(lo_row);
        let hi = line(hi_row);
        let mid_row = lo_row + (hi_row - lo_row) / 2;
        let mid = line(mid_row);
        trace!("bisect {pattern:?}: rows {lo_row}..={hi_row}, probing around {mid_row}");

        if find_in_range(view, pattern, mid.end, hi.end.min(end), flags)?.is_some() {
            lo_row = mid_row + 1;
        } else if find_in_range(view, pattern, lo.start, mid.end, flags)?.is_some() {
            hi_row = mid_row;
        } else {
            trace!("bisect {pattern:?}: no match in rows {lo_row}..={hi_row}");
            return Ok(None);
        }
    }

    let last = line(hi_row);
    let from = match grain {
        Grain::Char => last.start.max(start),
        Grain::Line => last.start,
    };
    find_last_in_range(view, pattern, from, last.end.min(end), flags)
}

// ---------------------------------------------------------------------------
// Wrapping search
// ---------------------------------------------------------------------------

/// Search forward `times` times, wrapping to the top of the buffer once the
/// search runs past `end`.
///
/// After wrapping, the search stops at the end of the word under the first
/// selection's anchor. Each repeat starts where the previous match ended.
/// Returns `None` when the view has no selection.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn find_wrapping<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    mut start: usize,
    mut end: usize,
    flags: SearchFlags,
    times: usize,
) -> Result<Option<Region>, PatternError> {
    let Some(sel) = view.selections().first().copied() else {
        return Ok(None);
    };

    let mut found = None;
    for _ in 0..times {
        let m = match find_in_range(view, pattern, start, end, flags)? {
            Some(m) => m,
            None => {
                start = 0;
                end = view.word(sel.anchor).end;
                trace!("find_wrapping {pattern:?}: wrapped to [0, {end}]");
                match find_in_range(view, pattern, start, end, flags)? {
                    Some(m) => m,
                    None => return Ok(None),
                }
            }
        };
        start = m.end;
        found = Some(m);
    }
    Ok(found)
}

/// Search backward `times` times, wrapping to the bottom of the buffer once
/// the search runs out of text.
///
/// Wrapping only happens while `start` is at or before the first
/// selection's head. The wrapped search covers from the start of the word
/// under the head to the end of the buffer. Each repeat ends where the
/// previous match started.
///
/// # Errors
///
/// Returns [`PatternError`] if the view cannot compile `pattern`.
pub fn reverse_find_wrapping<V: View + ?Sized>(
    view: &V,
    pattern: &str,
    mut start: usize,
    mut end: usize,
    flags: SearchFlags,
    times: usize,
) -> Result<Option<Region>, PatternError> {
    let Some(sel) = view.selections().first().copied() else {
        return Ok(None);
    };

    let mut found = None;
    for _ in 0..times {
        let m = match find_backward_linewise(view, pattern, start, end, flags)? {
            Some(m) => m,
            None if start <= sel.head => {
                start = view.word(sel.head).start;
                end = view.size();
                trace!("reverse_find_wrapping {pattern:?}: wrapped to [{start}, {end}]");
                match find_backward_linewise(view, pattern, start, end, flags)? {
                    Some(m) => m,
                    None => return Ok(None),
                }
            }
            None => return Ok(None),
        };
        end = m.start;
        found = Some(m);
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Word patterns
// ---------------------------------------------------------------------------

/// A regex matching `word` as a whole word: `\bword\b`, with the word's
/// metacharacters escaped.
#[must_use]
pub fn exact_word_pattern(word: &str) -> String {
    format!(r"\b{}\b", regex::escape(word))
}

/// The exact-word pattern for the word touching `pt`, or `None` when there
/// is no word there.
#[must_use]
pub fn word_pattern_at<V: View + ?Sized>(view: &V, pt: usize) -> Option<String> {
    let word = view.word(pt);
    if word.is_empty() {
        return None;
    }
    Some(exact_word_pattern(&view.substr(word)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
