//! Parsing the range prefix of an ex command line.
//!
//! [`parse_range`] consumes as much address syntax as it can from the start
//! of the input and returns the [`Range`] together with the unparsed rest
//! (normally the command name and its arguments). `Range`'s [`FromStr`]
//! implementation parses a range that must span the whole input.
//!
//! # Syntax
//!
//! ```text
//! range   := side [ (',' | ';') side ]
//! side    := token*
//! token   := digits | '.' | '$' | '%' | "'" char
//!          | '/' pattern ['/'] | '?' pattern ['?']
//!          | ('+' | '-') [digits]
//! ```
//!
//! A bare `+` or `-` means one line. Consecutive offsets fold into a single
//! [`AddressToken::Offset`]. A search pattern without its closing delimiter
//! runs to the end of the input, and `\/` (or `\?`) inside it is an escaped
//! delimiter.

use std::str::FromStr;

use crate::error::AddressError;
use crate::token::{AddressToken, Range, Separator};

/// Parse the range at the start of `input`.
///
/// Returns the range and the rest of the input after it. An input without
/// any address syntax yields an empty range and the whole input as rest.
///
/// # Errors
///
/// Returns [`AddressError::Parse`] for a `'` without a mark name or a line
/// number that does not fit in an `i64`.
///
/// # Examples
///
/// ```
/// use n_ex::parse::parse_range;
///
/// let (range, rest) = parse_range("'<,'>s/a/b/").unwrap();
/// assert_eq!(range.to_string(), "'<,'>");
/// assert_eq!(rest, "s/a/b/");
/// ```
pub fn parse_range(input: &str) -> Result<(Range, &str), AddressError> {
    let mut scanner = Scanner::new(input);
    scanner.skip_blanks();

    let start = scanner.side()?;
    let before_blanks = scanner.pos;
    scanner.skip_blanks();
    let separator = match scanner.peek() {
        Some(',') => Some(Separator::Comma),
        Some(';') => Some(Separator::Semicolon),
        _ => {
            scanner.pos = before_blanks;
            None
        }
    };
    let end = if separator.is_some() {
        scanner.bump();
        scanner.side()?
    } else {
        Vec::new()
    };

    Ok((Range::new(start, end, separator), scanner.rest()))
}

impl FromStr for Range {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (range, rest) = parse_range(s)?;
        if rest.trim().is_empty() {
            Ok(range)
        } else {
            Err(AddressError::Parse {
                offset: s.len() - rest.len(),
                reason: "unexpected text after range",
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// A byte cursor over the input.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    const fn error(&self, reason: &'static str) -> AddressError {
        AddressError::Parse {
            offset: self.pos,
            reason,
        }
    }

    /// Parse tokens until something that is not address syntax.
    fn side(&mut self) -> Result<Vec<AddressToken>, AddressError> {
        let mut tokens: Vec<AddressToken> = Vec::new();

        loop {
            // Blanks may separate tokens (`1 2`, `/a/ +1`) but are left in
            // the rest when no token follows.
            let before_blanks = self.pos;
            self.skip_blanks();
            let Some(ch) = self.peek() else {
                self.pos = before_blanks;
                break;
            };
            let token = match ch {
                '0'..='9' => AddressToken::Digits(self.number()?),
                '.' => {
                    self.bump();
                    AddressToken::CurrentLine
                }
                '$' => {
                    self.bump();
                    AddressToken::LastLine
                }
                '%' => {
                    self.bump();
                    AddressToken::WholeBuffer
                }
                '\'' => {
                    self.bump();
                    let name = self.bump().ok_or_else(|| self.error("expected mark name"))?;
                    AddressToken::Mark(name)
                }
                '/' | '?' => {
                    self.bump();
                    let pattern = self.pattern(ch);
                    if ch == '/' {
                        AddressToken::SearchForward(pattern)
                    } else {
                        AddressToken::SearchBackward(pattern)
                    }
                }
                '+' | '-' => {
                    self.bump();
                    let magnitude = if matches!(self.peek(), Some('0'..='9')) {
                        self.number()?
                    } else {
                        1
                    };
                    let delta = if ch == '-' { -magnitude } else { magnitude };
                    // Fold into a directly preceding offset chain.
                    if let Some(AddressToken::Offset(deltas)) = tokens.last_mut() {
                        deltas.push(delta);
                        continue;
                    }
                    AddressToken::Offset(vec![delta])
                }
                _ => {
                    self.pos = before_blanks;
                    break;
                }
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Parse a run of ASCII digits.
    fn number(&mut self) -> Result<i64, AddressError> {
        let start = self.pos;
        let len = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        let digits = &self.input[start..start + len];
        let value = digits
            .parse::<i64>()
            .map_err(|_| self.error("line number too large"))?;
        self.pos += len;
        Ok(value)
    }

    /// Parse a search pattern up to the closing `delim` (consumed) or the end
    /// of the input.
    fn pattern(&mut self, delim: char) -> String {
        let rest = self.rest();
        let (raw, consumed) = split_at_unescaped(rest, delim)
            .map_or((rest, rest.len()), |(pat, after)| {
                (pat, rest.len() - after.len())
            });
        self.pos += consumed;
        unescape_delim(raw, delim)
    }
}

/// Split `s` at the first unescaped occurrence of `delim`.
///
/// Returns `(before, after)` where neither includes the delimiter itself,
/// or `None` if no unescaped delimiter is found.
fn split_at_unescaped(s: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == delim {
            return Some((&s[..byte_idx], &s[byte_idx + ch.len_utf8()..]));
        }
    }
    None
}

/// `\<delim>` → `<delim>`; every other `\X` passes through for the regex
/// engine.
fn unescape_delim(s: &str, delim: char) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&delim) {
            result.push(delim);
            chars.next();
            continue;
        }
        result.push(ch);
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use AddressToken::{
        CurrentLine, Digits, LastLine, Mark, Offset, SearchBackward, SearchForward,
    };

    fn parse(input: &str) -> (Range, &str) {
        parse_range(input).unwrap()
    }

    // -- Single addresses -----------------------------------------------------

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), (Range::default(), ""));
    }

    #[test]
    fn no_range_before_command() {
        assert_eq!(parse("write"), (Range::default(), "write"));
    }

    #[test]
    fn digits() {
        assert_eq!(parse("12d"), (Range::single(vec![Digits(12)]), "d"));
        assert_eq!(parse("0"), (Range::single(vec![Digits(0)]), ""));
    }

    #[test]
    fn symbols() {
        assert_eq!(parse(".").0, Range::single(vec![CurrentLine]));
        assert_eq!(parse("$").0, Range::single(vec![LastLine]));
        assert_eq!(parse("%s/a/b/"), (Range::whole_buffer(), "s/a/b/"));
    }

    #[test]
    fn marks() {
        assert_eq!(parse("'<").0, Range::single(vec![Mark('<')]));
        assert_eq!(parse("'a").0, Range::single(vec![Mark('a')]));
    }

    #[test]
    fn mark_without_name_is_an_error() {
        assert_eq!(
            parse_range("'"),
            Err(AddressError::Parse {
                offset: 1,
                reason: "expected mark name"
            })
        );
    }

    #[test]
    fn huge_number_is_an_error() {
        assert!(matches!(
            parse_range("99999999999999999999999"),
            Err(AddressError::Parse { offset: 0, .. })
        ));
    }

    // -- Searches -------------------------------------------------------------

    #[test]
    fn search_forward() {
        assert_eq!(
            parse("/cat/d"),
            (Range::single(vec![SearchForward("cat".into())]), "d")
        );
    }

    #[test]
    fn search_backward() {
        assert_eq!(
            parse("?cat?"),
            (Range::single(vec![SearchBackward("cat".into())]), "")
        );
    }

    #[test]
    fn search_unterminated_runs_to_end() {
        assert_eq!(
            parse("/cat"),
            (Range::single(vec![SearchForward("cat".into())]), "")
        );
    }

    #[test]
    fn search_escaped_delimiter() {
        assert_eq!(
            parse(r"/a\/b/").0,
            Range::single(vec![SearchForward("a/b".into())])
        );
        // Other escapes are kept for the regex engine.
        assert_eq!(
            parse(r"/a\d/").0,
            Range::single(vec![SearchForward(r"a\d".into())])
        );
    }

    #[test]
    fn chained_searches() {
        assert_eq!(
            parse("/cat//dog/").0,
            Range::single(vec![SearchForward("cat".into()), SearchForward("dog".into())])
        );
    }

    // -- Offsets --------------------------------------------------------------

    #[test]
    fn offsets_fold_into_one_token() {
        assert_eq!(parse("+3-1").0, Range::single(vec![Offset(vec![3, -1])]));
        assert_eq!(parse("++").0, Range::single(vec![Offset(vec![1, 1])]));
        assert_eq!(parse("-").0, Range::single(vec![Offset(vec![-1])]));
    }

    #[test]
    fn offset_after_address() {
        assert_eq!(
            parse("2+2").0,
            Range::single(vec![Digits(2), Offset(vec![2])])
        );
        assert_eq!(
            parse("/cat/+1").0,
            Range::single(vec![SearchForward("cat".into()), Offset(vec![1])])
        );
    }

    // -- Separators -----------------------------------------------------------

    #[test]
    fn comma_range() {
        assert_eq!(
            parse("1,$d"),
            (
                Range::new(vec![Digits(1)], vec![LastLine], Some(Separator::Comma)),
                "d"
            )
        );
    }

    #[test]
    fn semicolon_range() {
        assert_eq!(
            parse(".;/end/-1").0,
            Range::new(
                vec![CurrentLine],
                vec![SearchForward("end".into()), Offset(vec![-1])],
                Some(Separator::Semicolon)
            )
        );
    }

    #[test]
    fn visual_range() {
        assert_eq!(
            parse("'<,'>s/x/y/"),
            (
                Range::new(vec![Mark('<')], vec![Mark('>')], Some(Separator::Comma)),
                "s/x/y/"
            )
        );
    }

    #[test]
    fn separator_with_empty_sides() {
        assert_eq!(
            parse(",5").0,
            Range::new(vec![], vec![Digits(5)], Some(Separator::Comma))
        );
        assert_eq!(
            parse("3;").0,
            Range::new(vec![Digits(3)], vec![], Some(Separator::Semicolon))
        );
    }

    #[test]
    fn leading_blanks_skipped() {
        assert_eq!(parse("  4d"), (Range::single(vec![Digits(4)]), "d"));
    }

    // -- FromStr --------------------------------------------------------------

    #[test]
    fn from_str_whole_input() {
        let range: Range = "1,10".parse().unwrap();
        assert_eq!(
            range,
            Range::new(vec![Digits(1)], vec![Digits(10)], Some(Separator::Comma))
        );
    }

    #[test]
    fn from_str_rejects_trailing_text() {
        assert_eq!(
            "1,10d".parse::<Range>(),
            Err(AddressError::Parse {
                offset: 4,
                reason: "unexpected text after range"
            })
        );
    }

    #[test]
    fn render_parse_round_trip() {
        for text in ["1,10", ".;/end/-1", "'<,'>", "%", "?a?+2-3", ",5", "$", "", "1 2", "3+1 5"] {
            let range: Range = text.parse().unwrap();
            assert_eq!(range.to_string(), text, "round trip of {text:?}");
        }
    }

    #[test]
    fn adjacent_numbers_survive_rendering() {
        let range = Range::new(
            vec![Digits(1), Digits(2)],
            vec![Offset(vec![1]), Digits(4)],
            Some(Separator::Comma),
        );
        assert_eq!(range.to_string().parse::<Range>().unwrap(), range);
    }

    #[test]
    fn unwritable_tokens_do_not_round_trip() {
        // No syntax for a negative line number: it reads back as an offset.
        let negative = Range::single(vec![Digits(-1)]);
        assert_eq!(negative.to_string(), "-1");
        assert_eq!(parse("-1").0, Range::single(vec![Offset(vec![-1])]));

        // A trailing backslash escapes the closing delimiter, so the pattern
        // runs on to the end of the input.
        let trailing = Range::single(vec![SearchForward(r"a\".into())]);
        assert_eq!(trailing.to_string(), r"/a\/");
        assert_eq!(parse(r"/a\/").0, Range::single(vec![SearchForward("a/".into())]));
    }

    #[test]
    fn blanks_around_separator() {
        assert_eq!(
            parse("1 , 3d"),
            (
                Range::new(vec![Digits(1)], vec![Digits(3)], Some(Separator::Comma)),
                "d"
            )
        );
    }

    #[test]
    fn blanks_between_tokens() {
        assert_eq!(
            parse("1 2 d"),
            (Range::single(vec![Digits(1), Digits(2)]), " d")
        );
        assert_eq!(
            parse("/a/ +1,$"),
            (
                Range::new(
                    vec![SearchForward("a".into()), Offset(vec![1])],
                    vec![LastLine],
                    Some(Separator::Comma)
                ),
                ""
            )
        );
    }
}
