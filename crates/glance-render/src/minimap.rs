use std::borrow::Borrow;

use glance_config::MinimapConfig;

use crate::bitmap::BitmapBuffer;
use crate::color::{Rgba, TokenSpan};
use crate::glyph;
use crate::host::{Cancellation, DocumentModel, EditorMetrics, FoldRegion};

const TAB_COLUMNS: usize = 4;

/// How a call to [`Minimap::update`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Complete,
    /// A span or fold referenced text past the end of the document. Everything
    /// before `offset` was drawn.
    Truncated { offset: usize },
    Cancelled,
}

/// Per-row alpha for one character, indexed by sub-row inside the line band.
/// `None` leaves the pixel untouched.
pub type SubRows = [Option<f32>; 4];

/// A rendered minimap of a document.
#[derive(Debug, Default)]
pub struct Minimap {
    image: BitmapBuffer,
    document_height: u32,
}

#[derive(Debug, Clone, Copy)]
struct Pen {
    x: usize,
    y: usize,
}

impl Minimap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> &BitmapBuffer {
        &self.image
    }

    /// Height of the whole document in minimap pixels, as of the last update.
    pub fn document_height(&self) -> u32 {
        self.document_height
    }

    /// Work out how tall the document is in minimap pixels and grow the image
    /// if it cannot hold it.
    fn update_dimensions(&mut self, metrics: &EditorMetrics, config: &MinimapConfig) -> u32 {
        debug_assert!(metrics.line_height > 0.0, "line height must be positive");
        let scale = config.pixels_per_line as f32 / metrics.line_height;
        let height = (metrics.content_height * scale).round().max(0.0) as u32;
        self.image
            .ensure_capacity(config.width, height, config.pixels_per_line);
        self.document_height = height;
        height
    }

    /// Repaint the whole image from `spans`.
    ///
    /// `cancel` is polled before every span. Spans or folds that point past
    /// the end of the text stop the pass early; whatever was drawn so far is
    /// kept.
    pub fn update<D, I, C>(
        &mut self,
        document: &D,
        spans: I,
        metrics: &EditorMetrics,
        config: &MinimapConfig,
        cancel: &C,
    ) -> RenderOutcome
    where
        D: DocumentModel + ?Sized,
        I: IntoIterator,
        I::Item: Borrow<TokenSpan>,
        C: Cancellation + ?Sized,
    {
        tracing::debug!("Updating file image.");
        self.update_dimensions(metrics, config);
        self.image.clear();

        let pixels_per_line = config.pixels_per_line as usize;
        debug_assert!((1..=4).contains(&pixels_per_line));
        let width = (config.width.min(self.image.width())) as usize;
        let height = self.image.height() as usize;
        let text = document.text();

        let mut folded_lines = 0usize;
        let mut cursor = 0usize;
        let mut pen: Option<Pen> = None;

        for span in spans {
            if cancel.is_cancelled() {
                tracing::trace!("minimap render cancelled at offset {}", cursor);
                return RenderOutcome::Cancelled;
            }

            let span: &TokenSpan = span.borrow();
            // Spans swallowed by a fold we already jumped over.
            if span.end() <= cursor {
                continue;
            }

            let start = span.start().max(cursor);
            let line = document.line_at_offset(start);
            let row = line.saturating_sub(folded_lines) * pixels_per_line;

            let Pen { mut x, mut y } = match pen {
                Some(pen) if pen.y == row && start == cursor => pen,
                _ => Pen {
                    x: column_at(document, line, start, width),
                    y: row,
                },
            };

            let mut offset = start;
            while offset < span.end() {
                if let Some(region) = document.collapsed_region_at(offset) {
                    (offset, folded_lines) = skip_fold(region, offset, folded_lines);
                    if offset > text.len() {
                        tracing::warn!(
                            "fold ends at {} past the document end {}",
                            offset,
                            text.len()
                        );
                        return RenderOutcome::Truncated { offset: text.len() };
                    }
                    continue;
                }

                // Watch out for spans that extend past the document; some
                // highlighters produce them.
                if offset >= text.len() {
                    tracing::warn!(
                        "token span {:?} extends past the document end {}",
                        span.range,
                        text.len()
                    );
                    return RenderOutcome::Truncated { offset };
                }

                let Some(ch) = char_at(text, offset) else {
                    // Not on a char boundary, step over the continuation byte.
                    offset += 1;
                    continue;
                };

                if x < width && y + pixels_per_line < height {
                    self.paint(x as u32, y as u32, ch, span.color, config);
                }

                match ch {
                    '\n' => {
                        x = 0;
                        y += pixels_per_line;
                    }
                    '\t' => x += TAB_COLUMNS,
                    _ => x += 1,
                }
                offset += ch.len_utf8();
            }

            cursor = offset;
            pen = Some(Pen { x, y });
        }

        RenderOutcome::Complete
    }

    fn paint(&mut self, x: u32, y: u32, ch: char, color: Rgba, config: &MinimapConfig) {
        let rows = if config.clean {
            clean_sub_rows(ch, config.pixels_per_line)
        } else {
            accurate_sub_rows(ch, config.pixels_per_line)
        };

        for (dy, alpha) in rows.iter().enumerate() {
            if let Some(alpha) = alpha {
                self.image
                    .set_pixel(x, y + dy as u32, color.to_bytes_with_alpha(*alpha));
            }
        }
    }
}

/// Flat weights by character class. The top row stays lighter than the rest
/// so that lines appear separated.
pub fn clean_sub_rows(ch: char, pixels_per_line: u32) -> SubRows {
    let weight = glyph::clean_weight(ch);
    if weight == 0.0 {
        return [None; 4];
    }

    match pixels_per_line {
        1 => [Some(weight * 0.6), None, None, None],
        2 => [Some(weight * 0.3), Some(weight * 0.6), None, None],
        3 => [Some(weight * 0.1), Some(weight * 0.6), Some(weight * 0.6), None],
        _ => [None, Some(weight * 0.6), Some(weight * 0.6), Some(weight * 0.6)],
    }
}

/// Weights from the glyph table, split between the upper and lower half of
/// the character.
pub fn accurate_sub_rows(ch: char, pixels_per_line: u32) -> SubRows {
    let (top, bottom) = glyph::glyph_weights(ch);
    if top == 0.0 && bottom == 0.0 {
        return [None; 4];
    }
    let average = (top + bottom) / 2.0;

    match pixels_per_line {
        1 => [Some(average), None, None, None],
        2 => [Some(top * 0.5), Some(bottom), None, None],
        3 => [Some(top * 0.3), Some(average), Some(bottom * 0.7), None],
        _ => [Some(top), Some(average), Some(average), Some(bottom)],
    }
}

/// Jump over a collapsed region, adding the lines it hides to `folded_lines`.
/// Always makes progress, even for a region that does not end after `offset`.
fn skip_fold(region: FoldRegion, offset: usize, folded_lines: usize) -> (usize, usize) {
    (region.end.max(offset + 1), folded_lines + region.hidden_lines)
}

/// Column of `offset` within `line`, counting tabs as four columns and
/// skipping collapsed regions. Stops counting once past `width`.
fn column_at<D>(document: &D, line: usize, offset: usize, width: usize) -> usize
where
    D: DocumentModel + ?Sized,
{
    let text = document.text();
    let mut column = 0usize;
    let mut cursor = document.line_start(line);

    while cursor < offset && cursor < text.len() {
        if let Some(region) = document.collapsed_region_at(cursor) {
            cursor = region.end.max(cursor + 1);
            continue;
        }

        let Some(ch) = char_at(text, cursor) else {
            cursor += 1;
            continue;
        };
        column += if ch == '\t' { TAB_COLUMNS } else { 1 };
        cursor += ch.len_utf8();

        if column > width {
            break;
        }
    }

    column
}

fn char_at(text: &str, offset: usize) -> Option<char> {
    text.get(offset..).and_then(|rest| rest.chars().next())
}
