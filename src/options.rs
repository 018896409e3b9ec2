//! Search options — the `:set` switches that shape address searches.
//!
//! Address patterns (`/pat/`, `?pat?`) are handed to the buffer with a set
//! of [`SearchFlags`]. Which flags is decided here, from three options:
//!
//! | Full name    | Abbrev | Default | Effect                                       |
//! |--------------|--------|---------|----------------------------------------------|
//! | `ignorecase` | `ic`   | false   | case-insensitive matching                    |
//! | `smartcase`  | `scs`  | false   | with `ignorecase`: uppercase → case-sensitive |
//! | `magic`      | —      | true    | simple patterns are matched literally        |
//!
//! Options are plain data passed to
//! [`Range::resolve_with`](crate::token::Range::resolve_with). Nothing here
//! is global.
//!
//! # Supported `:set` syntax
//!
//! | Syntax            | Effect          |
//! |-------------------|-----------------|
//! | `:set option`     | Enable          |
//! | `:set nooption`   | Disable         |
//! | `:set option!`    | Toggle          |
//! | `:set option?`    | Query the value |

use n_text::SearchFlags;

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// A parsed `:set` argument for a search option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option` — enable.
    On(String),

    /// `:set nooption` — disable.
    Off(String),

    /// `:set option!` — toggle.
    Toggle(String),

    /// `:set option?` — query.
    Query(String),

    /// `:set option=value` — not valid for boolean options, kept so the
    /// error can name it.
    Assign(String, String),
}

/// Errors from applying a `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// The option name is not a search option.
    #[error("E518: Unknown option: {0}")]
    Unknown(String),

    /// A value was assigned to a boolean option.
    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Returns `true` if `name` is a search option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(
        name,
        "ignorecase" | "ic" | "smartcase" | "scs" | "magic"
    )
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Negation only when the remainder is a known option, so a future option
    // starting with "no" is not mis-parsed.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display: `"name"` or `"noname"`.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// SearchOptions
// ---------------------------------------------------------------------------

/// Options that decide how address patterns are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match case-insensitively.
    pub ignorecase: bool,
    /// With `ignorecase`, a pattern containing an uppercase letter is matched
    /// case-sensitively.
    pub smartcase: bool,
    /// Treat simple patterns (word characters, unpaired brackets) literally.
    /// When off, every pattern is literal.
    pub magic: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            ignorecase: false,
            smartcase: false,
            magic: true,
        }
    }
}

impl SearchOptions {
    /// Apply space-separated `:set` arguments in order.
    ///
    /// Returns the display text of any queried options, one per query.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown option or invalid argument. Arguments
    /// before it stay applied, as in Vim.
    pub fn set(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut shown = Vec::new();
        for arg in args.split_whitespace() {
            if let Some(text) = self.apply(&parse_set_arg(arg))? {
                shown.push(text);
            }
        }
        Ok(shown)
    }

    /// Apply one directive. Queries return the option's display text.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for a name that is not a search option,
    /// [`OptionError::InvalidArgument`] for an assignment.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => *self.slot(name)? = true,
            SetDirective::Off(name) => *self.slot(name)? = false,
            SetDirective::Toggle(name) => {
                let slot = self.slot(name)?;
                *slot = !*slot;
            }
            SetDirective::Query(name) => {
                let value = *self.slot(name)?;
                return Ok(Some(format_bool(canonical_name(name), value)));
            }
            SetDirective::Assign(name, value) => {
                self.slot(name)?;
                return Err(OptionError::InvalidArgument(format!("{name}={value}")));
            }
        }
        Ok(None)
    }

    /// The flags to search `pattern` with.
    ///
    /// With `magic` on, a pattern made only of word characters and brackets
    /// is literal unless its brackets pair up into a class (`[0-9]` needs
    /// `-`, so `[ab]` counts) or a group. With `magic` off every pattern is
    /// literal.
    #[must_use]
    pub fn flags_for(&self, pattern: &str) -> SearchFlags {
        let mut flags = SearchFlags::empty();

        if !self.magic || is_simple(pattern) {
            flags |= SearchFlags::LITERAL;
        }

        if self.ignorecase && !(self.smartcase && pattern.chars().any(char::is_uppercase)) {
            flags |= SearchFlags::IGNORECASE;
        }

        flags
    }

    fn slot(&mut self, name: &str) -> Result<&mut bool, OptionError> {
        match canonical_name(name) {
            "ignorecase" => Ok(&mut self.ignorecase),
            "smartcase" => Ok(&mut self.smartcase),
            "magic" => Ok(&mut self.magic),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }
}

/// Expand an abbreviation to the full option name. Unknown names pass
/// through unchanged.
fn canonical_name(name: &str) -> &str {
    match name {
        "ic" => "ignorecase",
        "scs" => "smartcase",
        other => other,
    }
}

/// True when `pattern` should be matched literally under `magic`: it is made
/// of word characters plus brackets, and the brackets do not pair up.
fn is_simple(pattern: &str) -> bool {
    let word_or = |extra: [char; 2]| {
        !pattern.is_empty()
            && pattern
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || extra.contains(&c))
    };

    if word_or(['[', ']']) {
        return !(pattern.contains('[') && pattern.contains(']'));
    }
    if word_or(['(', ')']) {
        return !(pattern.contains('(') && pattern.contains(')'));
    }
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
