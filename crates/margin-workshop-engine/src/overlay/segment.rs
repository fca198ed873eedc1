use crate::annotations::{AnnotationId, AnnotationKind};
use crate::text::CharSpan;

use super::presentation::Presentation;

/// What a highlighted run points back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTarget {
    /// The unsaved selection; not addressable until it is persisted.
    Draft,
    /// A saved annotation, addressable by its comment id.
    Annotation(AnnotationId),
}

/// A highlighted run of manuscript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSegment<'a> {
    pub text: &'a str,
    pub span: CharSpan,
    pub target: SegmentTarget,
    pub kind: AnnotationKind,
    pub is_resolved: bool,
    pub is_selected: bool,
}

impl HighlightSegment<'_> {
    pub fn is_draft(&self) -> bool {
        matches!(self.target, SegmentTarget::Draft)
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::of(self.is_draft(), self.is_selected, self.is_resolved)
    }

    /// The id a click on this run activates. Drafts are never clickable.
    pub fn click_target(&self) -> Option<&AnnotationId> {
        match &self.target {
            SegmentTarget::Draft => None,
            SegmentTarget::Annotation(id) => Some(id),
        }
    }
}

/// One contiguous run of renderer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain { text: &'a str, span: CharSpan },
    Highlight(HighlightSegment<'a>),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain { text, .. } => text,
            Segment::Highlight(h) => h.text,
        }
    }

    pub fn span(&self) -> CharSpan {
        match self {
            Segment::Plain { span, .. } => *span,
            Segment::Highlight(h) => h.span,
        }
    }

    pub fn as_highlight(&self) -> Option<&HighlightSegment<'a>> {
        match self {
            Segment::Plain { .. } => None,
            Segment::Highlight(h) => Some(h),
        }
    }

    pub fn is_highlight(&self) -> bool {
        self.as_highlight().is_some()
    }

    pub fn click_target(&self) -> Option<&AnnotationId> {
        self.as_highlight().and_then(HighlightSegment::click_target)
    }
}

/// Concatenate segment texts; for renderer output this reproduces the content.
pub fn segments_text(segments: &[Segment<'_>]) -> String {
    segments.iter().map(Segment::text).collect()
}
