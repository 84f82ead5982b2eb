use std::ops::Range;

use memchr::memchr_iter;

/// Byte offset <-> line number mapping for a text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset where each line starts. Always holds at least line 0.
    line_starts: Vec<usize>,
    len: usize,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new("")
    }
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr_iter(b'\n', text.as_bytes()).map(|offset| offset + 1));

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines. A trailing newline starts a final empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert_pos) => insert_pos.saturating_sub(1),
        }
    }

    /// Start of `line`, or the end of the text for lines past the last one.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Byte range of `line` including its newline.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        self.line_start(line)..self.line_start(line + 1)
    }

    pub fn text_len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_at_offset(0), 0);
        assert_eq!(index.line_start(0), 0);
        assert_eq!(index.line_start(3), 0);
    }

    #[test]
    fn maps_offsets_to_lines() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);

        assert_eq!(index.line_at_offset(0), 0);
        assert_eq!(index.line_at_offset(2), 0);
        assert_eq!(index.line_at_offset(3), 1);
        assert_eq!(index.line_at_offset(6), 2);
        assert_eq!(index.line_at_offset(7), 3);
        assert_eq!(index.line_at_offset(100), 3);

        assert_eq!(index.line_start(1), 3);
        assert_eq!(index.line_range(1), 3..6);
        assert_eq!(index.line_range(3), 7..9);
    }

    #[test]
    fn trailing_newline_opens_an_empty_line() {
        let index = LineIndex::new("one\ntwo\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_range(2), 8..8);
    }
}
