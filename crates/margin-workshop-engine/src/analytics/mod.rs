//! Review statistics for a manuscript: engagement, feedback themes and
//! revision numbering.

mod revision;
mod themes;

pub use revision::{Revision, VersionError, next_version_number, word_count, word_count_change};
pub use themes::{ThemeCount, feedback_themes, themes_csv};

use std::collections::HashSet;

use crate::records::Comment;

/// Comment activity on one manuscript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    /// Top-level comments.
    pub comments: usize,
    pub replies: usize,
    /// Distinct authors across comments and replies.
    pub commenters: usize,
    /// Top-level comments marked resolved.
    pub resolved: usize,
    pub total: usize,
}

impl Engagement {
    /// Share of top-level comments resolved, as a whole percent.
    pub fn resolved_percentage(&self) -> u32 {
        if self.comments == 0 {
            return 0;
        }
        ((self.resolved as f64 / self.comments as f64) * 100.0).round() as u32
    }
}

pub fn engagement(comments: &[Comment]) -> Engagement {
    let (replies, top_level): (Vec<&Comment>, Vec<&Comment>) =
        comments.iter().partition(|c| c.is_reply());
    let commenters: HashSet<&str> = comments
        .iter()
        .filter_map(|c| c.author_id.as_deref())
        .collect();

    Engagement {
        comments: top_level.len(),
        replies: replies.len(),
        commenters: commenters.len(),
        resolved: top_level.iter().filter(|c| c.is_resolved).count(),
        total: comments.len(),
    }
}
