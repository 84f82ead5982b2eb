use glance_config::MinimapConfig;

use crate::host::{EditorMetrics, VisibleArea};

/// Geometry linking editor pixels to minimap pixels.
///
/// The minimap image may be taller than the panel. In that case only a
/// window of it is drawn, starting at `visible_start`, and that window slides
/// in proportion to how far the editor is scrolled. The viewport indicator is
/// drawn at `v_offset()` inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    scale: f32,
    line_height: f32,
    pixels_per_line: u32,
    document_width: i32,
    document_height: i32,
    visible_start: i32,
    visible_end: i32,
    visible_height: i32,
    draw_height: i32,
    viewport_start: i32,
    viewport_height: i32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the document size after the content, the font or the
    /// configuration changed.
    pub fn compute_dimensions(&mut self, metrics: &EditorMetrics, config: &MinimapConfig) {
        self.line_height = metrics.line_height;
        self.pixels_per_line = config.pixels_per_line;
        self.scale = config.pixels_per_line as f32 / metrics.line_height;
        debug_assert!(
            self.scale > 0.0 && self.scale.is_finite(),
            "bad minimap scale {}",
            self.scale
        );

        self.document_width = config.width as i32;
        self.document_height = (metrics.content_height * self.scale).round() as i32;
    }

    /// Recompute which part of the image is drawn for the editor's visible area.
    pub fn recompute_visible(&mut self, area: VisibleArea) {
        self.visible_height = area.height;
        self.viewport_start = (area.y as f32 * self.scale) as i32;
        self.viewport_height = (area.height as f32 * self.scale) as i32;
        self.draw_height = self.visible_height.min(self.document_height);

        let denominator = self.document_height - self.viewport_height + 1;
        self.visible_start = if self.document_height <= self.visible_height || denominator <= 0 {
            0
        } else {
            let progress = self.viewport_start as f32 / denominator as f32;
            let travel = (self.document_height - self.visible_height + 1) as f32;
            ((progress * travel) as i32).max(0)
        };
        self.visible_end = self.visible_start + self.draw_height;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn document_width(&self) -> i32 {
        self.document_width
    }

    pub fn document_height(&self) -> i32 {
        self.document_height
    }

    pub fn visible_start(&self) -> i32 {
        self.visible_start
    }

    pub fn visible_end(&self) -> i32 {
        self.visible_end
    }

    pub fn visible_height(&self) -> i32 {
        self.visible_height
    }

    pub fn draw_height(&self) -> i32 {
        self.draw_height
    }

    pub fn viewport_start(&self) -> i32 {
        self.viewport_start
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    /// Top of the viewport indicator in panel coordinates.
    pub fn v_offset(&self) -> i32 {
        self.viewport_start - self.visible_start
    }

    /// Whether panel row `y` falls on the viewport indicator.
    pub fn indicator_contains(&self, y: i32) -> bool {
        let top = self.v_offset();
        y >= top && y < top + self.viewport_height
    }

    /// Editor scroll position that centers the viewport on panel row `y`.
    pub fn jump_target(&self, y: i32) -> i32 {
        let pixels_per_line = self.pixels_per_line.max(1) as i32;
        let line = (y + self.visible_start) / pixels_per_line;
        let half_viewport = self.viewport_height / pixels_per_line / 2;
        ((line - half_viewport).max(0) as f32 * self.line_height) as i32
    }

    /// Editor scroll position for an indicator dragged to panel row `delta`.
    ///
    /// Inverse of the sliding window in [`ScrollState::recompute_visible`]:
    /// when the whole document fits in the panel the indicator moves one to
    /// one with the document, otherwise it has to cover the full document
    /// height while only travelling the panel height.
    pub fn drag_target(&self, delta: i32) -> i32 {
        let travel = self.visible_height - self.viewport_height;
        let position = if self.document_height < self.visible_height || travel <= 0 {
            delta as f32
        } else {
            delta as f32 * (self.document_height - self.viewport_height + 1) as f32 / travel as f32
        };
        (position / self.scale).round() as i32
    }
}
