//! Signed millisecond duration value type.
//!
//! This crate exposes [`TimeSpan`], an immutable span of time stored as
//! a single signed millisecond count, together with unit and compound
//! factories, wrapped and total component views, pure arithmetic, the
//! canonical `[-]HH:MM:SS` text form, polymorphic parsing and serde
//! support.
//!
//! ```
//! use timespan::TimeSpan;
//!
//! let span = TimeSpan::parse("02:15:30").unwrap().unwrap();
//! assert_eq!(span.hours(), 2);
//! assert_eq!(span.to_string(), "02:15:30");
//! ```

pub mod errors;
pub mod logging;
pub mod parse;
pub mod serde_utils;
pub mod span;

pub use errors::{Result, TimeSpanError};
pub use parse::{TimeComponents, TimeSpanLike};
pub use span::TimeSpan;

pub mod prelude {
    pub use crate::errors::TimeSpanError;
    pub use crate::parse::{TimeComponents, TimeSpanLike};
    pub use crate::span::TimeSpan;
}
