use serde::{Deserialize, Serialize};

/// A character range `[start, end)` into manuscript content.
///
/// Offsets count Unicode scalar values, never bytes, so spans computed from a
/// selection compare directly against spans stored with a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharSpan {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in characters. Uses saturating subtraction.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when the span is non-empty and lies within content of `content_len` chars.
    #[must_use]
    pub fn is_valid_for(self, content_len: usize) -> bool {
        self.start < self.end && self.end <= content_len
    }

    /// True when the two spans share at least one offset.
    #[must_use]
    pub fn overlaps(self, other: CharSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}
