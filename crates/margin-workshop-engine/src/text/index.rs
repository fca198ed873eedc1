use super::span::CharSpan;

/// Maps character offsets to byte offsets within a borrowed string.
///
/// Built once per render pass in O(len); every lookup afterwards is O(1).
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every char boundary, including the end of the string.
    boundaries: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Number of characters in the indexed text.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Byte offset of the given char position, `None` past the end.
    pub fn byte_offset(&self, char_pos: usize) -> Option<usize> {
        self.boundaries.get(char_pos).copied()
    }

    /// Slice the text by a char span. `None` if the span falls outside the text
    /// or is inverted.
    pub fn slice(&self, span: CharSpan) -> Option<&'a str> {
        if span.start > span.end {
            return None;
        }
        let start = self.byte_offset(span.start)?;
        let end = self.byte_offset(span.end)?;
        Some(&self.text[start..end])
    }

    /// Everything from `from` to the end, empty when `from` is past the end.
    pub fn tail(&self, from: usize) -> &'a str {
        match self.byte_offset(from) {
            Some(start) => &self.text[start..],
            None => "",
        }
    }
}

/// Character length of a string, the unit every span is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
