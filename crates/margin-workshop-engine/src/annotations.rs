use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::anchoring::SelectionAnchor;
use crate::text::CharSpan;

/// Identifier of a saved comment and the annotation bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub String);

impl AnnotationId {
    /// Reserved id carried by the in-progress, unsaved annotation.
    pub const DRAFT: &'static str = "draft";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn draft() -> Self {
        Self(Self::DRAFT.to_string())
    }

    pub fn is_draft_sentinel(&self) -> bool {
        self.0 == Self::DRAFT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How an annotated span is marked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum AnnotationKind {
    #[default]
    Highlight,
    Strikethrough,
}

impl AnnotationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Strikethrough => "strikethrough",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown annotation kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for AnnotationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highlight" => Ok(AnnotationKind::Highlight),
            "strikethrough" | "strike" => Ok(AnnotationKind::Strikethrough),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// One highlight or strikethrough span bound to a comment.
///
/// `text` is the substring the annotation was made against, cached when it
/// was created. If the manuscript is edited later the cache can drift from
/// the content; that staleness is accepted and never corrected silently.
///
/// Whether an annotation is *selected* is not stored: it is derived on every
/// render from the caller's active comment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub span: CharSpan,
    pub kind: AnnotationKind,
    pub text: String,
    pub is_draft: bool,
    pub is_resolved: bool,
}

impl Annotation {
    /// A saved annotation.
    pub fn new(id: impl Into<String>, span: CharSpan, kind: AnnotationKind) -> Self {
        Self {
            id: AnnotationId::new(id),
            span,
            kind,
            text: String::new(),
            is_draft: false,
            is_resolved: false,
        }
    }

    /// The in-progress annotation for a selection that has no comment yet.
    pub fn draft(anchor: &SelectionAnchor, kind: AnnotationKind) -> Self {
        Self {
            id: AnnotationId::draft(),
            span: anchor.span(),
            kind,
            text: anchor.text.clone(),
            is_draft: true,
            is_resolved: false,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn resolved(mut self, is_resolved: bool) -> Self {
        self.is_resolved = is_resolved;
        self
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn is_selected(&self, active_id: Option<&AnnotationId>) -> bool {
        !self.is_draft && active_id == Some(&self.id)
    }
}
