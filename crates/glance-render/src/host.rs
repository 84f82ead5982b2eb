//! Interfaces the minimap expects from the editor hosting it.

use std::sync::atomic::{AtomicBool, Ordering};

/// A collapsed fold covering `start..end` (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    pub start: usize,
    pub end: usize,
    /// Number of document lines hidden by the fold, i.e. the line of `end`
    /// minus the line of `start`.
    pub hidden_lines: usize,
}

/// Read access to the text, line structure and fold state of a document.
pub trait DocumentModel {
    fn text(&self) -> &str;

    /// Zero based line containing `offset`. Offsets past the end map to the
    /// last line.
    fn line_at_offset(&self, offset: usize) -> usize;

    /// Byte offset where `line` starts.
    fn line_start(&self, line: usize) -> usize;

    /// The collapsed region containing `offset`, if any.
    fn collapsed_region_at(&self, offset: usize) -> Option<FoldRegion>;
}

/// Pixel measurements of the editor the minimap mirrors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorMetrics {
    /// Height of one text line in editor pixels.
    pub line_height: f32,
    /// Height of the whole (folded) document content in editor pixels.
    pub content_height: f32,
}

/// The part of the document currently on screen, in editor pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleArea {
    pub y: i32,
    pub height: i32,
}

/// Commands the overlay issues back to the editor.
pub trait ScrollHost {
    fn scroll_vertically(&mut self, y: i32);
    fn set_scroll_animation(&mut self, enabled: bool);
    /// Let the editor handle a wheel event that landed on the minimap.
    fn forward_wheel(&mut self, delta: f32);
}

/// Cooperative cancellation checked between token spans.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Cancellation for bool {
    fn is_cancelled(&self) -> bool {
        *self
    }
}
