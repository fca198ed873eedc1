//! # Offset Anchoring
//!
//! Turns a live text selection into a stable `[start, end)` character range
//! over the manuscript content.
//!
//! Character offsets are the only span representation that survives
//! re-rendering: once an annotation is saved its text gets wrapped in
//! highlight markup and the node structure changes. Anchoring therefore reads
//! the *live* selection, walking text nodes in the same pre-order used to
//! build the rendered content, so the computed offsets index directly into
//! the full content string.
//!
//! ## Modules
//!
//! - **`tree`**: `TextTree`, an arena of element and text nodes, and `Boundary`
//! - **`range`**: `SelectionRange`, a pair of boundaries plus bounding geometry
//! - **`rect`**: `Rect` and translation into a container's coordinates
//!
//! Invalid or ambiguous selections produce no anchor; they are never errors.

pub mod range;
pub mod rect;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::text::{CharSpan, char_len};

pub use range::SelectionRange;
pub use rect::Rect;
pub use tree::{Boundary, NodeId, TextTree};

/// A validated selection: the trimmed text for display, the character range it
/// covers, and where the selection sits relative to the root container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionAnchor {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
}

impl SelectionAnchor {
    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.start, self.end)
    }
}

/// Compute the anchor for the current selection, if it is a usable one.
///
/// `root` is the container whose text defines the offset space and
/// `full_content` the plain-text manuscript it was rendered from. The offsets
/// use the raw selected text's length so `start..end` addresses exactly the
/// selected substring of `full_content`; the trimmed text is only used for the
/// emptiness check and for display.
pub fn compute_selection_anchor(
    range: Option<&SelectionRange>,
    tree: &TextTree,
    root: NodeId,
    full_content: &str,
) -> Option<SelectionAnchor> {
    let range = range?;

    let ancestor = range.common_ancestor(tree)?;
    if !tree.contains(root, ancestor) {
        log::trace!("selection outside manuscript root");
        return None;
    }

    let raw = range.to_text(tree);
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let start = tree.text_offset(root, range.start)?;
    let end = start + char_len(&raw);
    if end <= start || end > char_len(full_content) {
        log::trace!("selection {start}..{end} outside content bounds");
        return None;
    }

    Some(SelectionAnchor {
        text: text.to_string(),
        start,
        end,
        rect: range.rect.relative_to(tree.rect(root)),
    })
}
