//! # Data-Layer Records
//!
//! Comment rows arrive from the managed backend in a shape that still carries
//! a migration: a structured `selection_json` object alongside legacy flat
//! fields (`selected_text`, `position_start`, ...), and comment text in either
//! `content` or `comment_text`. This module normalizes every row into a
//! single [`Comment`] at the boundary so nothing downstream sees the legacy
//! shape.

use serde::{Deserialize, Serialize};

use crate::annotations::{Annotation, AnnotationId, AnnotationKind};
use crate::text::CharSpan;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Malformed comment records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Comment record has an empty id")]
    MissingId,
}

/// The structured selection attached to a comment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionJson {
    #[serde(default)]
    pub text: String,
    pub start: i64,
    pub end: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A comment row exactly as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    #[serde(default)]
    pub piece_id: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub comment_text: Option<String>,
    #[serde(default)]
    pub selection_json: Option<SelectionJson>,
    #[serde(default)]
    pub selected_text: Option<String>,
    #[serde(default)]
    pub position_start: Option<i64>,
    #[serde(default)]
    pub position_end: Option<i64>,
    #[serde(default)]
    pub comment_type: Option<String>,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A normalized comment: one shape regardless of which columns the row used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: AnnotationId,
    pub piece_id: Option<String>,
    pub version_id: Option<String>,
    pub author_id: Option<String>,
    pub content: String,
    /// Substring the comment was made against, as cached at creation.
    pub selected_text: String,
    /// `None` for replies and for rows whose stored offsets are unusable.
    pub span: Option<CharSpan>,
    pub kind: AnnotationKind,
    pub parent_id: Option<AnnotationId>,
    pub is_resolved: bool,
    pub created_at: Option<String>,
}

impl Comment {
    pub fn from_record(record: CommentRecord) -> Result<Self, RecordError> {
        if record.id.trim().is_empty() {
            return Err(RecordError::MissingId);
        }

        let (selected_text, start, end, kind) = match record.selection_json {
            Some(sel) => (sel.text, Some(sel.start), Some(sel.end), sel.kind),
            None => (
                record.selected_text.unwrap_or_default(),
                record.position_start,
                record.position_end,
                record.comment_type,
            ),
        };

        let span = match (start, end) {
            (Some(start), Some(end)) if start >= 0 && end > start => {
                Some(CharSpan::new(start as usize, end as usize))
            }
            (None, None) => None,
            (start, end) => {
                log::debug!(
                    "comment {} has unusable offsets {start:?}..{end:?}, keeping it unanchored",
                    record.id
                );
                None
            }
        };

        let kind = match kind.as_deref() {
            None | Some("") => AnnotationKind::default(),
            Some(raw) => raw.parse::<AnnotationKind>().unwrap_or_else(|e| {
                log::debug!("comment {}: {e}, treating as highlight", record.id);
                AnnotationKind::default()
            }),
        };

        Ok(Self {
            id: AnnotationId::new(record.id),
            piece_id: record.piece_id,
            version_id: record.version_id,
            author_id: record.author_id,
            content: record.content.or(record.comment_text).unwrap_or_default(),
            selected_text,
            span,
            kind,
            parent_id: record.parent_comment_id.map(AnnotationId::new),
            is_resolved: record.is_resolved,
            created_at: record.created_at,
        })
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// The overlay annotation for this comment. Replies never anchor text.
    pub fn annotation(&self) -> Option<Annotation> {
        if self.is_reply() {
            return None;
        }
        let span = self.span?;
        Some(Annotation {
            id: self.id.clone(),
            span,
            kind: self.kind,
            text: self.selected_text.clone(),
            is_draft: false,
            is_resolved: self.is_resolved,
        })
    }

    /// Convert back into a row. Anchored comments use the structured selection
    /// shape; unanchored ones keep their cached text and kind in the flat
    /// fields, with no offsets.
    pub fn to_record(&self) -> CommentRecord {
        let unanchored = self.span.is_none() && !self.is_reply();
        CommentRecord {
            id: self.id.to_string(),
            piece_id: self.piece_id.clone(),
            version_id: self.version_id.clone(),
            author_id: self.author_id.clone(),
            content: Some(self.content.clone()),
            selection_json: self.span.map(|span| SelectionJson {
                text: self.selected_text.clone(),
                start: span.start as i64,
                end: span.end as i64,
                kind: Some(self.kind.to_string()),
            }),
            selected_text: (unanchored && !self.selected_text.is_empty())
                .then(|| self.selected_text.clone()),
            comment_type: unanchored.then(|| self.kind.to_string()),
            parent_comment_id: self.parent_id.as_ref().map(ToString::to_string),
            is_resolved: self.is_resolved,
            created_at: self.created_at.clone(),
            ..CommentRecord::default()
        }
    }
}

/// Persistence request for a new comment or reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub piece_id: String,
    pub version_id: Option<String>,
    pub content: String,
    pub parent_comment_id: Option<String>,
    pub selection_json: Option<SelectionJson>,
}

impl NewComment {
    /// Materialize the request as a saved row, as the backend would on insert.
    pub fn into_record(
        self,
        id: impl Into<String>,
        author_id: Option<String>,
        created_at: Option<String>,
    ) -> CommentRecord {
        CommentRecord {
            id: id.into(),
            piece_id: Some(self.piece_id),
            version_id: self.version_id,
            author_id,
            content: Some(self.content),
            selection_json: self.selection_json,
            parent_comment_id: self.parent_comment_id,
            is_resolved: false,
            created_at,
            ..CommentRecord::default()
        }
    }
}

/// Parse a JSON array of comment rows.
pub fn parse_records(json: &str) -> Result<Vec<CommentRecord>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and normalize a JSON array of comment rows, skipping rows without an id.
pub fn parse_comments(json: &str) -> Result<Vec<Comment>, RecordError> {
    let records = parse_records(json)?;
    Ok(records
        .into_iter()
        .filter_map(|record| match Comment::from_record(record) {
            Ok(comment) => Some(comment),
            Err(e) => {
                log::warn!("skipping comment record: {e}");
                None
            }
        })
        .collect())
}
