use crate::annotations::{Annotation, AnnotationId};
use crate::text::{CharIndex, CharSpan};

use super::segment::{HighlightSegment, Segment, SegmentTarget};

/// Partition `content` into plain and highlighted runs.
///
/// # Arguments
/// - `annotations`: saved annotations, in any order, duplicate-free by id
/// - `active_id`: the comment currently focused by the caller, if any
/// - `draft`: the in-progress selection awaiting a comment, if any. This is
///   the only draft: entries of `annotations` flagged `is_draft` are ignored.
///
/// # Overlap policy
/// Spans are swept in `(start, end)` order: earliest start wins, and on a tie
/// the shorter span wins. Any span starting before the end of an already
/// emitted highlight is dropped from the overlay entirely. Spans that fail
/// the validity check (`start >= end` or past the end of content) are
/// discarded before sorting.
///
/// # Returns
/// Runs in increasing offset order whose texts concatenate to `content`.
pub fn render_segments<'a>(
    content: &'a str,
    annotations: &[Annotation],
    active_id: Option<&AnnotationId>,
    draft: Option<&Annotation>,
) -> Vec<Segment<'a>> {
    let index = CharIndex::new(content);
    let content_len = index.char_len();

    let mut working: Vec<(&Annotation, bool)> = annotations
        .iter()
        .filter(|a| {
            if a.is_draft {
                log::trace!("ignoring draft-flagged annotation {} in the saved list", a.id);
            }
            !a.is_draft
        })
        .map(|a| (a, false))
        .chain(draft.map(|d| (d, true)))
        .filter(|(a, _)| {
            let valid = a.span.is_valid_for(content_len);
            if !valid {
                log::trace!(
                    "discarding annotation {} with span {}..{} (content length {content_len})",
                    a.id,
                    a.span.start,
                    a.span.end
                );
            }
            valid
        })
        .collect();

    // Stable: equal spans keep input order, the draft last.
    working.sort_by_key(|(a, _)| (a.span.start, a.span.end));

    let mut segments = Vec::with_capacity(working.len() * 2 + 1);
    let mut cursor = 0;

    // Helper to emit the gap before a highlight as a plain run
    fn push_plain<'a>(out: &mut Vec<Segment<'a>>, index: &CharIndex<'a>, span: CharSpan) {
        if span.is_empty() {
            return;
        }
        if let Some(text) = index.slice(span) {
            out.push(Segment::Plain { text, span });
        }
    }

    for (annotation, is_draft) in working {
        let span = annotation.span;
        if span.start < cursor {
            log::trace!(
                "annotation {} at {}..{} overlaps an earlier highlight, dropped from overlay",
                annotation.id,
                span.start,
                span.end
            );
            continue;
        }

        push_plain(&mut segments, &index, CharSpan::new(cursor, span.start));

        let target = if is_draft {
            SegmentTarget::Draft
        } else {
            SegmentTarget::Annotation(annotation.id.clone())
        };
        segments.push(Segment::Highlight(HighlightSegment {
            text: index.slice(span).unwrap_or_default(),
            span,
            is_selected: !is_draft && active_id == Some(&annotation.id),
            target,
            kind: annotation.kind,
            is_resolved: annotation.is_resolved,
        }));
        cursor = span.end;
    }

    push_plain(&mut segments, &index, CharSpan::new(cursor, content_len));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationKind;
    use crate::overlay::segments_text;
    use pretty_assertions::assert_eq;

    fn highlight(id: &str, start: usize, end: usize) -> Annotation {
        Annotation::new(id, CharSpan::new(start, end), AnnotationKind::Highlight)
    }

    fn draft(start: usize, end: usize) -> Annotation {
        let mut d = highlight(AnnotationId::DRAFT, start, end);
        d.is_draft = true;
        d
    }

    /// Compact rendering: plain runs as-is, saved highlights in `[]`, drafts in `{}`.
    fn describe(segments: &[Segment<'_>]) -> String {
        segments
            .iter()
            .map(|s| match s {
                Segment::Plain { text, .. } => text.to_string(),
                Segment::Highlight(h) if h.is_draft() => format!("{{{}}}", h.text),
                Segment::Highlight(h) => format!("[{}]", h.text),
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    #[test]
    fn single_highlight_in_the_middle() {
        let content = "The quick brown fox";
        let segments = render_segments(content, &[highlight("c1", 4, 9)], None, None);
        insta::assert_snapshot!(describe(&segments), @"The |[quick]| brown fox");
    }

    #[test]
    fn overlapping_later_span_is_dropped() {
        let annotations = [highlight("a", 0, 4), highlight("b", 2, 6)];
        let segments = render_segments("abcdef", &annotations, None, None);
        assert_eq!(describe(&segments), "[abcd]|ef");
    }

    #[test]
    fn adjacent_spans_both_render() {
        let annotations = [highlight("a", 0, 4), highlight("b", 4, 6)];
        let segments = render_segments("abcdef", &annotations, None, None);
        assert_eq!(describe(&segments), "[abcd]|[ef]");
    }

    #[test]
    fn empty_annotation_list_is_one_plain_run() {
        let segments = render_segments("just prose", &[], None, None);
        assert_eq!(
            segments,
            vec![Segment::Plain {
                text: "just prose",
                span: CharSpan::new(0, 10)
            }]
        );
    }

    #[test]
    fn empty_content_renders_nothing() {
        let segments = render_segments("", &[highlight("a", 0, 1)], None, None);
        assert!(segments.is_empty());
    }

    #[test]
    fn draft_alone() {
        let d = draft(2, 5);
        let segments = render_segments("abcdefgh", &[], None, Some(&d));
        insta::assert_snapshot!(describe(&segments), @"ab|{cde}|fgh");
        assert_eq!(segments[1].click_target(), None);
    }

    #[test]
    fn shorter_span_wins_tie_at_same_start() {
        let annotations = [highlight("long", 5, 10), highlight("short", 5, 8)];
        let segments = render_segments("0123456789ABC", &annotations, None, None);

        assert_eq!(describe(&segments), "01234|[567]|89ABC");
        assert_eq!(
            segments[1].click_target(),
            Some(&AnnotationId::new("short"))
        );
    }

    #[test]
    fn span_starting_at_consumed_offset_renders_after_tie() {
        let annotations = [
            highlight("long", 5, 10),
            highlight("short", 5, 8),
            highlight("rest", 8, 10),
        ];
        let segments = render_segments("0123456789ABC", &annotations, None, None);
        assert_eq!(describe(&segments), "01234|[567]|[89]|ABC");
    }

    #[test]
    fn invalid_spans_never_render() {
        let annotations = [
            highlight("inverted", 4, 2),
            highlight("empty", 3, 3),
            highlight("past-end", 4, 99),
            highlight("ok", 1, 2),
        ];
        let segments = render_segments("abcdef", &annotations, None, None);

        assert_eq!(describe(&segments), "a|[b]|cdef");
    }

    #[test]
    fn invalid_draft_is_discarded() {
        let d = draft(3, 30);
        let segments = render_segments("abcdef", &[highlight("a", 0, 2)], None, Some(&d));
        assert_eq!(describe(&segments), "[ab]|cdef");
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let forward = [highlight("a", 0, 2), highlight("b", 3, 5), highlight("c", 6, 8)];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            render_segments("abcdefghij", &forward, None, None),
            render_segments("abcdefghij", &backward, None, None)
        );
    }

    #[test]
    fn exactly_one_draft_segment_alongside_saved() {
        let d = draft(6, 9);
        let annotations = [highlight("a", 0, 3), highlight("b", 10, 12)];
        let segments = render_segments("abcdefghijklmn", &annotations, None, Some(&d));

        let drafts: Vec<_> = segments
            .iter()
            .filter_map(Segment::as_highlight)
            .filter(|h| h.is_draft())
            .collect();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].text, "ghi");
        assert_eq!(drafts[0].click_target(), None);
        assert_eq!(describe(&segments), "[abc]|def|{ghi}|j|[kl]|mn");
    }

    #[test]
    fn draft_flag_in_saved_list_is_ignored() {
        let d = draft(6, 9);
        let annotations = [draft(0, 3), highlight("b", 10, 12)];
        let segments = render_segments("abcdefghijklmn", &annotations, None, Some(&d));

        let drafts = segments
            .iter()
            .filter_map(Segment::as_highlight)
            .filter(|h| h.is_draft())
            .count();
        assert_eq!(drafts, 1);
        assert_eq!(describe(&segments), "abcdef|{ghi}|j|[kl]|mn");
    }

    #[test]
    fn active_id_marks_selected_segment() {
        let annotations = [
            highlight("a", 0, 2),
            highlight("b", 3, 5).resolved(true),
        ];
        let active = AnnotationId::new("b");
        let segments = render_segments("abcdef", &annotations, Some(&active), None);

        let highlights: Vec<_> = segments.iter().filter_map(Segment::as_highlight).collect();
        assert!(!highlights[0].is_selected);
        assert!(highlights[1].is_selected);
        assert!(highlights[1].is_resolved);
    }

    #[test]
    fn multibyte_content_is_split_by_characters() {
        let content = "héllo wörld";
        let segments = render_segments(content, &[highlight("a", 6, 11)], None, None);
        assert_eq!(describe(&segments), "héllo |[wörld]");
        assert_eq!(segments_text(&segments), content);
    }

    #[test]
    fn coverage_and_ordering_hold_for_dense_overlaps() {
        let content = "The workshop met every Thursday evening.";
        let len = content.chars().count();
        let mut annotations = Vec::new();
        for start in (0..len).step_by(3) {
            for width in [1, 4, 7] {
                annotations.push(highlight(
                    &format!("{start}-{width}"),
                    start,
                    (start + width).min(len + 2),
                ));
            }
        }

        let segments = render_segments(content, &annotations, None, None);

        assert_eq!(segments_text(&segments), content);
        let mut last_end = 0;
        for segment in &segments {
            let span = segment.span();
            assert_eq!(span.start, last_end, "segments must tile the content");
            assert!(span.end > span.start);
            last_end = span.end;
        }
        assert_eq!(last_end, len);
    }
}
