//! # Overlay Rendering
//!
//! Derives the display of a manuscript from its content and the current
//! annotation set. The output is a left-to-right partition of the content
//! into plain and highlighted runs: no two runs overlap and together they
//! cover every character exactly once.
//!
//! The renderer borrows its inputs for one pass and never mutates them. It is
//! re-run whenever the content, the annotation set or the active comment
//! changes.
//!
//! ## Modules
//!
//! - **`render`**: `render_segments()`, the sort-and-sweep partitioner
//! - **`segment`**: `Segment` and `HighlightSegment` output types
//! - **`presentation`**: draft/selected/resolved priority and class names
//! - **`html`**: `render_html()` for web hosts

pub mod html;
pub mod presentation;
pub mod render;
pub mod segment;

pub use html::render_html;
pub use presentation::{Presentation, class_list};
pub use render::render_segments;
pub use segment::{HighlightSegment, Segment, SegmentTarget, segments_text};
