use std::ops::Range;

use glance_application::Indicator;
use glance_render::BitmapBuffer;

const SHADES: &[u8] = b" .:-=+*#%@";

/// Minimap pixels folded into one terminal cell, horizontally and vertically.
pub const CELL_WIDTH: u32 = 2;
pub const CELL_HEIGHT: u32 = 2;

/// Turn `rows` of the image into text, one character per cell, shading by
/// average alpha. Rows covered by the viewport indicator get a `>` marker.
pub fn shade(image: &BitmapBuffer, rows: Range<i32>, width: u32, indicator: &Indicator) -> Vec<String> {
    let width = width.min(image.width());
    let start = rows.start.max(0) as u32;
    let end = (rows.end.max(0) as u32).min(image.height());

    let mut lines = Vec::new();
    let mut y = start;
    while y < end {
        let panel_row = (y - start) as i32;
        let marked = panel_row < indicator.y + indicator.height
            && panel_row + CELL_HEIGHT as i32 > indicator.y;

        let mut line = String::with_capacity((width / CELL_WIDTH) as usize + 2);
        line.push(if marked { '>' } else { ' ' });
        line.push('|');

        let mut x = 0;
        while x < width {
            line.push(cell_shade(image, x, y, width, end));
            x += CELL_WIDTH;
        }
        lines.push(line);
        y += CELL_HEIGHT;
    }
    lines
}

fn cell_shade(image: &BitmapBuffer, x: u32, y: u32, width: u32, end: u32) -> char {
    let mut total = 0u32;
    let mut count = 0u32;
    for py in y..(y + CELL_HEIGHT).min(end) {
        for px in x..(x + CELL_WIDTH).min(width) {
            if let Some(rgba) = image.pixel(px, py) {
                total += u32::from(rgba[3]);
                count += 1;
            }
        }
    }
    if count == 0 {
        return ' ';
    }

    let average = total / count;
    let index = (average as usize * (SHADES.len() - 1) + 127) / 255;
    SHADES[index.min(SHADES.len() - 1)] as char
}
