use glance_render::{EditorMetrics, ScrollHost, VisibleArea};

use crate::document::Document;

/// Lines scrolled per wheel notch.
const WHEEL_LINES: f32 = 3.0;

/// Headless stand-in for an editor viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    line_height: f32,
    viewport_height: i32,
    scroll_y: i32,
    content_height: f32,
    animated: bool,
}

impl EditorView {
    pub fn new(line_height: f32, viewport_height: i32) -> Self {
        debug_assert!(line_height > 0.0);
        Self {
            line_height,
            viewport_height: viewport_height.max(0),
            scroll_y: 0,
            content_height: 0.0,
            animated: true,
        }
    }

    /// A view already sized to `document`.
    pub fn for_document(document: &Document, line_height: f32, viewport_height: i32) -> Self {
        let mut view = Self::new(line_height, viewport_height);
        view.sync_content(document);
        view
    }

    /// Refresh the content height after the text or its folds changed.
    pub fn sync_content(&mut self, document: &Document) {
        self.content_height = document.visible_line_count() as f32 * self.line_height;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: i32) {
        self.viewport_height = height.max(0);
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height as i32 - self.viewport_height).max(0)
    }

    pub fn metrics(&self) -> EditorMetrics {
        EditorMetrics {
            line_height: self.line_height,
            content_height: self.content_height,
        }
    }

    pub fn visible_area(&self) -> VisibleArea {
        VisibleArea {
            y: self.scroll_y,
            height: self.viewport_height,
        }
    }
}

impl ScrollHost for EditorView {
    fn scroll_vertically(&mut self, y: i32) {
        self.scroll_y = y.clamp(0, self.max_scroll());
    }

    fn set_scroll_animation(&mut self, enabled: bool) {
        self.animated = enabled;
    }

    fn forward_wheel(&mut self, delta: f32) {
        let step = (delta * WHEEL_LINES * self.line_height).round() as i32;
        self.scroll_vertically(self.scroll_y + step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_syntax::Language;

    fn document(lines: usize) -> Document {
        Document::new("x\n".repeat(lines - 1) + "x", Language::PlainText)
    }

    #[test]
    fn content_height_follows_visible_lines() {
        let mut document = document(100);
        let mut view = EditorView::for_document(&document, 20.0, 400);
        assert_eq!(view.content_height(), 2000.0);
        assert_eq!(view.metrics().line_height, 20.0);

        document.collapse_lines(10, 19).unwrap();
        view.sync_content(&document);
        assert_eq!(view.content_height(), 1820.0);
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut view = EditorView::for_document(&document(100), 20.0, 400);
        view.scroll_vertically(-50);
        assert_eq!(view.scroll_y(), 0);
        view.scroll_vertically(5000);
        assert_eq!(view.scroll_y(), 1600);
        assert_eq!(view.visible_area(), VisibleArea { y: 1600, height: 400 });

        view.set_viewport_height(800);
        assert_eq!(view.scroll_y(), 1200);
    }

    #[test]
    fn wheel_scrolls_by_lines() {
        let mut view = EditorView::for_document(&document(100), 20.0, 400);
        view.forward_wheel(2.0);
        assert_eq!(view.scroll_y(), 120);
        view.forward_wheel(-1.0);
        assert_eq!(view.scroll_y(), 60);
    }

    #[test]
    fn animation_toggle() {
        let mut view = EditorView::new(16.0, 300);
        assert!(view.is_animated());
        view.set_scroll_animation(false);
        assert!(!view.is_animated());
    }
}
