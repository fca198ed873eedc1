//! Keyboard selection over the manuscript pane.
//!
//! The terminal has no DOM selection, so the pane is mirrored into a
//! `TextTree` with one text node per rendered segment, the same shape a web
//! host produces. A caret/mark pair then becomes a `SelectionRange` over that
//! tree and goes through the regular anchoring path.

use margin_workshop_engine::anchoring::{
    Boundary, NodeId, Rect, SelectionAnchor, SelectionRange, TextTree, compute_selection_anchor,
};
use margin_workshop_engine::overlay::Segment;
use margin_workshop_engine::text::CharSpan;

/// Zero-based (line, column) of a char offset.
pub fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for ch in content.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Char offset of `(line, col)`, clamped to the end of that line.
pub fn offset_at(content: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (i, text) in content.split('\n').enumerate() {
        let len = text.chars().count();
        if i == line {
            return offset + col.min(len);
        }
        offset += len + 1;
    }
    offset.saturating_sub(1)
}

/// Rendered segments laid out as a tree, content coordinates in cells.
pub struct PaneLayout {
    tree: TextTree,
    texts: Vec<(CharSpan, NodeId)>,
}

impl PaneLayout {
    pub fn from_segments(segments: &[Segment<'_>]) -> Self {
        let mut tree = TextTree::new("pane");
        let root = tree.root();
        let texts = segments
            .iter()
            .map(|segment| {
                let node = if segment.is_highlight() {
                    let mark = tree.append_element(root, "mark");
                    tree.append_text(mark, segment.text())
                } else {
                    tree.append_text(root, segment.text())
                };
                (segment.span(), node)
            })
            .collect();
        Self { tree, texts }
    }

    pub fn tree(&self) -> &TextTree {
        &self.tree
    }

    /// Boundary for a char offset. End boundaries prefer the run the offset
    /// closes, so a selection ending at a highlight edge stays out of it.
    fn boundary(&self, offset: usize, is_end: bool) -> Option<Boundary> {
        self.texts
            .iter()
            .find(|(span, _)| {
                if is_end {
                    span.start < offset && offset <= span.end
                } else {
                    span.start <= offset && offset < span.end
                }
            })
            .map(|(span, node)| Boundary::new(*node, offset - span.start))
    }

    pub fn range(&self, content: &str, span: CharSpan) -> Option<SelectionRange> {
        let start = self.boundary(span.start, false)?;
        let end = self.boundary(span.end, true)?;
        Some(SelectionRange::new(start, end).with_rect(selection_rect(content, span)))
    }
}

/// Cell rectangle of a selection: its first line, from the start column.
fn selection_rect(content: &str, span: CharSpan) -> Rect {
    let (start_line, start_col) = line_col(content, span.start);
    let (end_line, end_col) = line_col(content, span.end);
    let width = if end_line == start_line {
        end_col - start_col
    } else {
        content
            .split('\n')
            .nth(start_line)
            .map_or(0, |line| line.chars().count() - start_col)
    };
    Rect::new(
        start_line as f32,
        start_col as f32,
        width as f32,
        (end_line - start_line + 1) as f32,
    )
}

/// Anchor the text between caret and mark, in either order.
pub fn anchor_selection(
    content: &str,
    segments: &[Segment<'_>],
    caret: usize,
    mark: usize,
) -> Option<SelectionAnchor> {
    let span = CharSpan::new(caret.min(mark), caret.max(mark));
    if span.is_empty() {
        return None;
    }
    let layout = PaneLayout::from_segments(segments);
    let range = layout.range(content, span);
    compute_selection_anchor(range.as_ref(), layout.tree(), layout.tree().root(), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_workshop_engine::annotations::{Annotation, AnnotationKind};
    use margin_workshop_engine::overlay::render_segments;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const TEXT: &str = "The quick brown fox\njumps over\nthe dog";

    #[rstest]
    #[case(0, (0, 0))]
    #[case(4, (0, 4))]
    #[case(19, (0, 19))]
    #[case(20, (1, 0))]
    #[case(32, (2, 1))]
    fn line_and_column(#[case] offset: usize, #[case] expected: (usize, usize)) {
        assert_eq!(line_col(TEXT, offset), expected);
    }

    #[test]
    fn offset_clamps_to_line_end() {
        assert_eq!(offset_at(TEXT, 1, 3), 23);
        assert_eq!(offset_at(TEXT, 1, 50), 30);
        assert_eq!(offset_at(TEXT, 9, 0), TEXT.chars().count());
    }

    #[test]
    fn selection_across_a_highlight() {
        let annotations = [Annotation::new(
            "c1",
            CharSpan::new(4, 9),
            AnnotationKind::Highlight,
        )];
        let segments = render_segments(TEXT, &annotations, None, None);

        let anchor = anchor_selection(TEXT, &segments, 15, 2).unwrap();

        assert_eq!((anchor.start, anchor.end), (2, 15));
        assert_eq!(anchor.text, "e quick brown");
        assert_eq!(anchor.rect, Rect::new(0.0, 2.0, 13.0, 1.0));
    }

    #[test]
    fn selection_ending_at_highlight_edge() {
        let annotations = [Annotation::new(
            "c1",
            CharSpan::new(4, 9),
            AnnotationKind::Highlight,
        )];
        let segments = render_segments(TEXT, &annotations, None, None);

        let anchor = anchor_selection(TEXT, &segments, 0, 4).unwrap();

        assert_eq!(anchor.text, "The");
        assert_eq!((anchor.start, anchor.end), (0, 4));
    }

    #[test]
    fn multi_line_selection_rect() {
        let segments = render_segments(TEXT, &[], None, None);

        let anchor = anchor_selection(TEXT, &segments, 16, 25).unwrap();

        assert_eq!(anchor.text, "fox\njumps");
        assert_eq!(anchor.rect, Rect::new(0.0, 16.0, 3.0, 2.0));
    }

    #[test]
    fn whitespace_only_or_empty_selection_has_no_anchor() {
        let segments = render_segments(TEXT, &[], None, None);

        assert_eq!(anchor_selection(TEXT, &segments, 3, 4), None);
        assert_eq!(anchor_selection(TEXT, &segments, 5, 5), None);
    }
}
