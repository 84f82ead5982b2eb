use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use glance_render::{DocumentModel, FoldRegion};
use glance_syntax::Language;

use crate::folds::{FoldError, FoldModel};
use crate::line_index::LineIndex;

/// Text of one file together with its line index and fold state.
#[derive(Debug, Clone, Default)]
pub struct Document {
    path: Option<PathBuf>,
    text: String,
    language: Language,
    lines: LineIndex,
    folds: FoldModel,
}

impl Document {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        let text = text.into();
        let lines = LineIndex::new(&text);
        Self {
            path: None,
            text,
            language,
            lines,
            folds: FoldModel::new(),
        }
    }

    /// Load a file, replacing invalid UTF-8 sequences.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        let mut document = Self::new(text, Language::from_path(path));
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(scratch)".to_string())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Lines left on screen once collapsed regions are hidden.
    pub fn visible_line_count(&self) -> usize {
        self.line_count() - self.folds.hidden_line_count(&self.lines)
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn folds(&self) -> &FoldModel {
        &self.folds
    }

    /// Replace the whole text. Folds that no longer fit are dropped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.lines = LineIndex::new(&self.text);
        self.folds.retain_within(self.text.len());
    }

    pub fn collapse(&mut self, range: Range<usize>) -> Result<(), FoldError> {
        self.folds.collapse(range, self.text.len())
    }

    /// Collapse whole lines `first..=last`, keeping `first` on screen.
    pub fn collapse_lines(&mut self, first: usize, last: usize) -> Result<(), FoldError> {
        let start = self.lines.line_range(first).end.saturating_sub(1);
        let last = self.lines.line_range(last);
        // The final line has no newline to leave behind.
        let end = if last.end == self.text.len() && !self.text.ends_with('\n') {
            last.end
        } else {
            last.end.saturating_sub(1)
        };
        self.collapse(start..end)
    }

    pub fn expand(&mut self, start: usize) -> bool {
        self.folds.expand(start)
    }
}

impl DocumentModel for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        self.lines.line_at_offset(offset)
    }

    fn line_start(&self, line: usize) -> usize {
        self.lines.line_start(line)
    }

    fn collapsed_region_at(&self, offset: usize) -> Option<FoldRegion> {
        self.folds.region_at(offset, &self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_path_detects_language_and_reads_text() {
        let mut file = tempfile::Builder::new().suffix(".rs").tempfile().unwrap();
        writeln!(file, "fn main() {{}}").unwrap();

        let document = Document::from_path(file.path()).unwrap();
        assert_eq!(document.language(), Language::Rust);
        assert_eq!(document.text(), "fn main() {}\n");
        assert_eq!(document.line_count(), 2);
        assert!(document.display_name().ends_with(".rs"));
    }

    #[test]
    fn from_path_tolerates_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ok\xff\n").unwrap();

        let document = Document::from_path(file.path()).unwrap();
        assert_eq!(document.text(), "ok\u{FFFD}\n");
        assert_eq!(document.language(), Language::PlainText);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::from_path(dir.path().join("nope.rs")).is_err());
    }

    #[test]
    fn collapse_lines_hides_the_following_lines() {
        let mut document = Document::new("a {\n  b\n  c\n}\nd\n", Language::PlainText);
        document.collapse_lines(0, 2).unwrap();

        assert_eq!(document.visible_line_count(), document.line_count() - 2);
        let region = document.collapsed_region_at(5).unwrap();
        assert_eq!((region.start, region.end), (3, 11));
        assert_eq!(region.hidden_lines, 2);
        assert!(document.collapsed_region_at(11).is_none());
    }

    #[test]
    fn collapse_lines_covers_an_unterminated_last_line() {
        let mut document = Document::new("a\nb\nc", Language::PlainText);
        document.collapse_lines(0, 2).unwrap();

        let region = document.collapsed_region_at(4).unwrap();
        assert_eq!((region.start, region.end), (1, 5));
        assert_eq!(region.hidden_lines, 2);
        assert_eq!(document.visible_line_count(), 1);
        assert!(document.collapsed_region_at(0).is_none());
    }

    #[test]
    fn set_text_drops_folds_past_the_end() {
        let mut document = Document::new("one\ntwo\nthree\n", Language::PlainText);
        document.collapse(3..7).unwrap();
        document.collapse(8..13).unwrap();

        document.set_text("one\ntwo\n");
        assert_eq!(document.folds().len(), 1);
        assert_eq!(document.line_at_offset(5), 1);
    }
}
