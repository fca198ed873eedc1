use std::collections::HashSet;

use super::rect::Rect;
use super::tree::{Boundary, NodeId, TextTree};
use crate::text::{CharIndex, CharSpan};

/// A live text selection as reported by the host: two boundary points plus
/// the selection's bounding geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRange {
    pub start: Boundary,
    pub end: Boundary,
    /// Bounding rectangle of the selection in host coordinates.
    pub rect: Rect,
}

impl SelectionRange {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self {
            start,
            end,
            rect: Rect::default(),
        }
    }

    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Deepest node containing both boundary points.
    pub fn common_ancestor(&self, tree: &TextTree) -> Option<NodeId> {
        let start_chain: HashSet<NodeId> = tree.ancestors(self.start.node).collect();
        tree.ancestors(self.end.node)
            .find(|node| start_chain.contains(node))
    }

    /// The raw selected text, untrimmed. Empty for collapsed or inverted ranges.
    pub fn to_text(&self, tree: &TextTree) -> String {
        let root = tree.root();
        let (Some(start), Some(end)) = (
            tree.text_offset(root, self.start),
            tree.text_offset(root, self.end),
        ) else {
            return String::new();
        };
        if end <= start {
            return String::new();
        }

        let content = tree.text_content(root);
        CharIndex::new(&content)
            .slice(CharSpan::new(start, end))
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_across_elements() {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        let p = tree.append_element(root, "p");
        let first = tree.append_text(p, "hello ");
        let em = tree.append_element(root, "em");
        let second = tree.append_text(em, "world");

        let range = SelectionRange::new(Boundary::new(first, 2), Boundary::new(second, 3));

        assert_eq!(range.to_text(&tree), "llo wor");
        assert_eq!(range.common_ancestor(&tree), Some(root));
    }

    #[test]
    fn range_within_one_text_node() {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        let text = tree.append_text(root, "hello");

        let range = SelectionRange::new(Boundary::new(text, 1), Boundary::new(text, 4));

        assert_eq!(range.to_text(&tree), "ell");
        assert_eq!(range.common_ancestor(&tree), Some(text));
    }

    #[test]
    fn collapsed_range_has_no_text() {
        let mut tree = TextTree::new("div");
        let text = tree.append_text(tree.root(), "hello");

        let range = SelectionRange::new(Boundary::new(text, 2), Boundary::new(text, 2));

        assert_eq!(range.to_text(&tree), "");
    }
}
