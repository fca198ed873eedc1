//! # Workshop State
//!
//! The caller-owned state a workshop page keeps between render passes: the
//! comment list, the active comment, the live selection and the single draft
//! annotation. The overlay renderer stays stateless; this type owns every
//! mutation and hands borrowed snapshots to it.
//!
//! Comments can arrive twice, once from the initial fetch or the local save
//! and once from the realtime push. Both insertion paths deduplicate by id,
//! since the renderer assumes a duplicate-free list.

pub mod participation;

use crate::anchoring::SelectionAnchor;
use crate::annotations::{Annotation, AnnotationId, AnnotationKind};
use crate::overlay::{Segment, SegmentTarget, render_segments};
use crate::records::{Comment, NewComment, SelectionJson};

pub use participation::Participation;

#[derive(Debug, Clone, Default)]
pub struct WorkshopState {
    comments: Vec<Comment>,
    active_id: Option<AnnotationId>,
    selection: Option<SelectionAnchor>,
    draft: Option<Annotation>,
    participation: Participation,
}

impl WorkshopState {
    pub fn new(comments: Vec<Comment>, participation: Participation) -> Self {
        let mut state = Self {
            participation,
            ..Self::default()
        };
        for comment in comments {
            state.insert_local(comment);
        }
        state
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment(&self, id: &AnnotationId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    pub fn participation(&self) -> Participation {
        self.participation
    }

    /// Update permissions; losing highlight tools discards the selection and draft.
    pub fn apply_participation(&mut self, participation: Participation) {
        self.participation = participation;
        if !participation.can_use_highlight_tools() {
            self.selection = None;
            self.draft = None;
        }
    }

    // ============ Selection and draft ============

    pub fn selection(&self) -> Option<&SelectionAnchor> {
        self.selection.as_ref()
    }

    /// Record the latest selection. Ignored while highlight tools are closed.
    pub fn set_selection(&mut self, selection: Option<SelectionAnchor>) {
        if selection.is_some() && !self.participation.can_use_highlight_tools() {
            return;
        }
        self.selection = selection;
    }

    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref()
    }

    /// Turn the current selection into the draft annotation, replacing any
    /// earlier draft. Returns false when there is nothing to draft from.
    pub fn begin_draft(&mut self, kind: AnnotationKind) -> bool {
        if !self.participation.can_use_highlight_tools() {
            return false;
        }
        match &self.selection {
            Some(anchor) => {
                self.draft = Some(Annotation::draft(anchor, kind));
                true
            }
            None => false,
        }
    }

    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Build the persistence request for the draft and clear the draft and
    /// selection. `None` without a draft or with blank comment text.
    pub fn finalize_draft(
        &mut self,
        piece_id: &str,
        version_id: Option<&str>,
        content: &str,
    ) -> Option<NewComment> {
        let content = content.trim();
        if content.is_empty() || !self.participation.can_use_highlight_tools() {
            return None;
        }
        let draft = self.draft.take()?;
        self.selection = None;

        Some(NewComment {
            piece_id: piece_id.to_string(),
            version_id: version_id.map(str::to_string),
            content: content.to_string(),
            parent_comment_id: None,
            selection_json: Some(SelectionJson {
                text: draft.text,
                start: draft.span.start as i64,
                end: draft.span.end as i64,
                kind: Some(draft.kind.to_string()),
            }),
        })
    }

    /// Build a reply request to an open top-level thread.
    pub fn reply(&self, parent_id: &AnnotationId, piece_id: &str, content: &str) -> Option<NewComment> {
        let content = content.trim();
        if content.is_empty() || !self.participation.can_reply() {
            return None;
        }
        let parent = self.comment(parent_id)?;
        if parent.is_reply() || parent.is_resolved {
            return None;
        }
        Some(NewComment {
            piece_id: piece_id.to_string(),
            version_id: parent.version_id.clone(),
            content: content.to_string(),
            parent_comment_id: Some(parent_id.to_string()),
            selection_json: None,
        })
    }

    // ============ Comment set ============

    /// Add a comment saved by this client. Returns false for a duplicate id.
    pub fn insert_local(&mut self, comment: Comment) -> bool {
        if self.comment(&comment.id).is_some() {
            return false;
        }
        self.comments.push(comment);
        true
    }

    /// Merge a comment delivered by the realtime feed. The same row may already
    /// be present from the initial fetch or the local save; duplicates are
    /// ignored.
    pub fn merge_pushed(&mut self, comment: Comment) -> bool {
        let id = comment.id.clone();
        let inserted = self.insert_local(comment);
        if !inserted {
            log::debug!("ignoring pushed comment {id}, already present");
        }
        inserted
    }

    /// Delete a comment and its replies.
    pub fn remove(&mut self, id: &AnnotationId) -> bool {
        let before = self.comments.len();
        self.comments
            .retain(|c| &c.id != id && c.parent_id.as_ref() != Some(id));
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        self.comments.len() != before
    }

    pub fn set_resolved(&mut self, id: &AnnotationId, is_resolved: bool) -> bool {
        match self.comments.iter_mut().find(|c| &c.id == id) {
            Some(comment) => {
                comment.is_resolved = is_resolved;
                true
            }
            None => false,
        }
    }

    /// Flip a thread's resolved flag, returning the new value.
    pub fn toggle_resolved(&mut self, id: &AnnotationId) -> Option<bool> {
        let comment = self.comments.iter_mut().find(|c| &c.id == id)?;
        comment.is_resolved = !comment.is_resolved;
        Some(comment.is_resolved)
    }

    // ============ Active comment ============

    pub fn active_id(&self) -> Option<&AnnotationId> {
        self.active_id.as_ref()
    }

    pub fn set_active(&mut self, id: Option<AnnotationId>) {
        self.active_id = id;
    }

    /// Click on a highlighted run. Drafts are not addressable yet.
    pub fn activate(&mut self, target: &SegmentTarget) {
        if let SegmentTarget::Annotation(id) = target {
            self.active_id = Some(id.clone());
        }
    }

    /// Move the active comment to the next (or previous) anchored thread in
    /// document order, wrapping around.
    pub fn step_active(&mut self, forward: bool) -> Option<&AnnotationId> {
        let mut anchored = self.annotations();
        if anchored.is_empty() {
            return None;
        }
        anchored.sort_by_key(|a| (a.span.start, a.span.end));

        let current = self
            .active_id
            .as_ref()
            .and_then(|id| anchored.iter().position(|a| &a.id == id));
        let len = anchored.len();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.active_id = Some(anchored.swap_remove(next).id);
        self.active_id.as_ref()
    }

    // ============ Rendering ============

    /// Annotations for every anchored top-level comment.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.comments.iter().filter_map(Comment::annotation).collect()
    }

    pub fn render<'a>(&self, content: &'a str) -> Vec<Segment<'a>> {
        render_segments(
            content,
            &self.annotations(),
            self.active_id.as_ref(),
            self.draft.as_ref(),
        )
    }
}
