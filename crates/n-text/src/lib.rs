//! # n-text — Text storage for n-ex
//!
//! The buffer side of address resolution:
//!
//! - **[`region`]** — `Region` (half-open char span) and `Selection`
//! - **[`view`]** — the `View` trait: line arithmetic, selections, word
//!   lookup, and one forward pattern search
//! - **[`buffer`]** — `Buffer`, a rope-backed `View` with regex search
//!
//! Word boundaries live in a private `word` module used by `Buffer`.

pub mod buffer;
pub mod region;
pub mod view;
mod word;

pub use buffer::Buffer;
pub use region::{Region, Selection};
pub use view::{PatternError, SearchFlags, View};
