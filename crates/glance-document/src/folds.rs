use std::cmp::Reverse;
use std::ops::Range;

use glance_render::FoldRegion;
use thiserror::Error;

use crate::line_index::LineIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FoldError {
    #[error("cannot fold empty range {start}..{end}")]
    Empty { start: usize, end: usize },
    #[error("fold {start}..{end} extends past the end of the document ({len} bytes)")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("fold {start}..{end} partially overlaps an existing fold")]
    Overlap { start: usize, end: usize },
    #[error("{start}..{end} is already folded")]
    Duplicate { start: usize, end: usize },
}

/// Collapsed regions of a document.
///
/// Regions may nest but never partially overlap. Lookups report the
/// outermost region, since everything inside it is hidden anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldModel {
    /// Sorted by start, then by descending end so outer regions come first.
    regions: Vec<Range<usize>>,
}

impl FoldModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn regions(&self) -> impl Iterator<Item = &Range<usize>> {
        self.regions.iter()
    }

    pub fn collapse(&mut self, range: Range<usize>, text_len: usize) -> Result<(), FoldError> {
        let Range { start, end } = range;
        if start >= end {
            return Err(FoldError::Empty { start, end });
        }
        if end > text_len {
            return Err(FoldError::OutOfBounds {
                start,
                end,
                len: text_len,
            });
        }

        for existing in &self.regions {
            if existing.start == start && existing.end == end {
                return Err(FoldError::Duplicate { start, end });
            }
            let disjoint = end <= existing.start || existing.end <= start;
            let nested = (existing.start <= start && end <= existing.end)
                || (start <= existing.start && existing.end <= end);
            if !disjoint && !nested {
                return Err(FoldError::Overlap { start, end });
            }
        }

        let key = (start, Reverse(end));
        let position = self
            .regions
            .partition_point(|existing| (existing.start, Reverse(existing.end)) < key);
        self.regions.insert(position, start..end);
        tracing::debug!("collapsed {}..{}", start, end);
        Ok(())
    }

    /// Expand the outermost region starting at `start`.
    pub fn expand(&mut self, start: usize) -> bool {
        match self.regions.iter().position(|region| region.start == start) {
            Some(index) => {
                self.regions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Drop regions that no longer fit a text of `text_len` bytes.
    pub fn retain_within(&mut self, text_len: usize) {
        self.regions.retain(|region| region.end <= text_len);
    }

    /// Outermost collapsed region containing `offset`.
    pub fn region_at(&self, offset: usize, lines: &LineIndex) -> Option<FoldRegion> {
        self.outermost()
            .find(|region| region.start <= offset && offset < region.end)
            .map(|region| FoldRegion {
                start: region.start,
                end: region.end,
                hidden_lines: hidden_lines(region, lines),
            })
    }

    /// Total number of lines hidden by all folds.
    pub fn hidden_line_count(&self, lines: &LineIndex) -> usize {
        self.outermost().map(|region| hidden_lines(region, lines)).sum()
    }

    fn outermost(&self) -> impl Iterator<Item = &Range<usize>> {
        let mut covered_until = 0usize;
        self.regions.iter().filter(move |region| {
            if region.start < covered_until {
                return false;
            }
            covered_until = region.end;
            true
        })
    }
}

fn hidden_lines(region: &Range<usize>, lines: &LineIndex) -> usize {
    lines.line_at_offset(region.end) - lines.line_at_offset(region.start)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "fn a() {\n    one();\n    two();\n}\nfn b() {}\n";

    fn lines() -> LineIndex {
        LineIndex::new(TEXT)
    }

    #[test]
    fn rejects_invalid_ranges() {
        let mut folds = FoldModel::new();
        assert_eq!(folds.collapse(4..4, 10), Err(FoldError::Empty { start: 4, end: 4 }));
        assert_eq!(
            folds.collapse(2..20, 10),
            Err(FoldError::OutOfBounds {
                start: 2,
                end: 20,
                len: 10
            })
        );

        folds.collapse(2..8, 10).unwrap();
        assert_eq!(folds.collapse(2..8, 10), Err(FoldError::Duplicate { start: 2, end: 8 }));
        assert_eq!(folds.collapse(5..9, 10), Err(FoldError::Overlap { start: 5, end: 9 }));
        assert_eq!(folds.collapse(0..3, 10), Err(FoldError::Overlap { start: 0, end: 3 }));
        assert_eq!(folds.len(), 1);
    }

    #[test]
    fn nested_lookup_reports_outermost() {
        let mut folds = FoldModel::new();
        // Body of `a` and, inside it, the line with `two();`.
        folds.collapse(19..30, TEXT.len()).unwrap();
        folds.collapse(8..31, TEXT.len()).unwrap();

        let region = folds.region_at(20, &lines()).unwrap();
        assert_eq!((region.start, region.end), (8, 31));
        assert_eq!(region.hidden_lines, 3);
        assert_eq!(folds.hidden_line_count(&lines()), 3);

        assert!(folds.region_at(7, &lines()).is_none());
        assert!(folds.region_at(31, &lines()).is_none());
    }

    #[test]
    fn expand_removes_outer_region_first() {
        let mut folds = FoldModel::new();
        folds.collapse(8..19, TEXT.len()).unwrap();
        folds.collapse(8..31, TEXT.len()).unwrap();

        assert!(folds.expand(8));
        assert_eq!(folds.regions().cloned().collect::<Vec<_>>(), vec![8..19]);
        assert_eq!(folds.hidden_line_count(&lines()), 1);
        assert!(!folds.expand(9));
    }

    #[test]
    fn disjoint_regions_add_up() {
        let mut folds = FoldModel::new();
        folds.collapse(40..42, TEXT.len()).unwrap();
        folds.collapse(8..31, TEXT.len()).unwrap();
        assert_eq!(folds.hidden_line_count(&lines()), 3);

        folds.retain_within(40);
        assert_eq!(folds.len(), 1);
    }
}
