//! # n-ex — Ex addresses and ranges for n-nvim
//!
//! Turns the range prefix of an ex command (`:1,$`, `:'<,'>`, `:.;/end/-1`,
//! `:%`) into a region of the buffer:
//!
//! - **[`token`]** — `AddressToken`, `Separator`, `Range`, and their rendering
//! - **[`parse`]** — range text → `Range`, leaving the command for the caller
//! - **[`address`]** — tokens → `LineNr` (a row, or before the first line)
//! - **[`range`]** — `Range` → `Span`, plus `Addressable` / `CommandLineNode`
//! - **[`search`]** — forward, backward (line bisection), and wrapping search
//! - **[`options`]** — `ignorecase` / `smartcase` / `magic` for address searches
//! - **[`error`]** — `AddressError`
//!
//! Everything works against the [`n_text::View`] trait, so any text store
//! can be addressed. `n_text::Buffer` is the rope-backed implementation.
//!
//! ```
//! use n_ex::{Range, Span};
//! use n_text::{Buffer, Region};
//!
//! let buf = Buffer::from_text("a\nb\nc\nd\n");
//! let range: Range = "2,$".parse().unwrap();
//! assert_eq!(range.resolve(&buf, 0), Ok(Span::Region(Region::new(2, 8))));
//! ```

pub mod address;
pub mod error;
pub mod options;
pub mod parse;
pub mod range;
pub mod search;
pub mod token;

pub use address::LineNr;
pub use error::AddressError;
pub use options::{OptionError, SearchOptions};
pub use parse::parse_range;
pub use range::{Addressable, CommandLineNode, Span};
pub use token::{AddressToken, Range, Separator};
