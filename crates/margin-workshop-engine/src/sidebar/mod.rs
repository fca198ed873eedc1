//! Comment threads and the sidebar's search, type and reviewer filters.
//!
//! The overlay only shows non-overlapping highlights; the sidebar lists every
//! thread, so comments dropped from the overlay stay reachable here.

use std::collections::HashSet;

use crate::annotations::{AnnotationId, AnnotationKind};
use crate::records::Comment;

/// A top-level comment with its replies, both in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread<'a> {
    pub root: &'a Comment,
    pub replies: Vec<&'a Comment>,
}

impl Thread<'_> {
    pub fn id(&self) -> &AnnotationId {
        &self.root.id
    }
}

/// Group comments into threads ordered by `created_at`. Comments without a
/// timestamp sort first; ties keep input order.
pub fn threads(comments: &[Comment]) -> Vec<Thread<'_>> {
    let mut ordered: Vec<&Comment> = comments.iter().collect();
    // ISO-8601 timestamps sort lexically
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut out: Vec<Thread<'_>> = ordered
        .iter()
        .filter(|c| !c.is_reply())
        .map(|&root| Thread {
            root,
            replies: Vec::new(),
        })
        .collect();

    for &reply in ordered.iter().filter(|c| c.is_reply()) {
        if let Some(thread) = out
            .iter_mut()
            .find(|t| reply.parent_id.as_ref() == Some(&t.root.id))
        {
            thread.replies.push(reply);
        } else {
            log::debug!("reply {} has no parent thread", reply.id);
        }
    }
    out
}

/// Which annotation kinds the sidebar lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(AnnotationKind),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFilter {
    /// Case-insensitive match against comment text and the selected text.
    pub query: String,
    pub kind: KindFilter,
    /// Reviewers whose comments are toggled off.
    pub hidden_authors: HashSet<String>,
}

impl CommentFilter {
    pub fn matches(&self, comment: &Comment) -> bool {
        if comment.is_reply() {
            return false;
        }

        if let Some(author) = &comment.author_id
            && self.hidden_authors.contains(author)
        {
            return false;
        }

        let query = self.query.trim();
        if !query.is_empty() {
            let query = query.to_lowercase();
            let in_content = comment.content.to_lowercase().contains(&query);
            let in_selection = comment.selected_text.to_lowercase().contains(&query);
            if !in_content && !in_selection {
                return false;
            }
        }

        match self.kind {
            KindFilter::All => true,
            KindFilter::Only(kind) => comment.kind == kind,
        }
    }

    /// Toggle a reviewer's visibility, returning whether they are now visible.
    pub fn toggle_author(&mut self, author_id: &str) -> bool {
        if self.hidden_authors.remove(author_id) {
            true
        } else {
            self.hidden_authors.insert(author_id.to_string());
            false
        }
    }

    /// Threads whose root passes the filter.
    pub fn apply<'a>(&self, threads: Vec<Thread<'a>>) -> Vec<Thread<'a>> {
        threads.into_iter().filter(|t| self.matches(t.root)).collect()
    }
}

/// Unique comment authors, in first-seen order.
pub fn commenters(comments: &[Comment]) -> Vec<&str> {
    let mut seen = HashSet::new();
    comments
        .iter()
        .filter_map(|c| c.author_id.as_deref())
        .filter(|author| seen.insert(*author))
        .collect()
}
