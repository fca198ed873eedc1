//! # Text Coordinates
//!
//! Every anchor and annotation in the workshop is a `[start, end)` range of
//! **character** offsets into the manuscript's plain-text content.
//!
//! - **`span`**: `CharSpan`, the half-open range type and its validity check
//! - **`index`**: `CharIndex`, char-to-byte lookup for slicing `&str` content

pub mod index;
pub mod span;

pub use index::{CharIndex, char_len};
pub use span::CharSpan;
