/// Extra rows, per pixel of line height, allocated on top of what the
/// document needs so that a growing file does not reallocate on every edit.
pub const SLACK_LINES: u32 = 100;

/// Row-major RGBA8 surface backing the minimap.
///
/// The surface only ever grows. Reallocation throws the old pixels away; the
/// caller repaints everything after asking for capacity anyway.
#[derive(Debug, Clone, Default)]
pub struct BitmapBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl BitmapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Make sure the surface is at least `width` x `height`.
    ///
    /// Returns `true` when a new surface was allocated. The new surface is
    /// exactly `width` wide and `height + SLACK_LINES * pixels_per_line` tall.
    pub fn ensure_capacity(&mut self, width: u32, height: u32, pixels_per_line: u32) -> bool {
        if !self.pixels.is_empty() && self.width >= width && self.height >= height {
            return false;
        }

        let new_height = height + SLACK_LINES * pixels_per_line;
        *self = Self::with_size(width, new_height);
        tracing::debug!("Created new minimap image {}x{}", width, new_height);
        true
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Overwrite the pixel at `(x, y)`. Writes outside the surface are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index..index + 4].copy_from_slice(&rgba);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|index| {
            let mut rgba = [0; 4];
            rgba.copy_from_slice(&self.pixels[index..index + 4]);
            rgba
        })
    }

    /// One row of pixels, `width * 4` bytes long.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        Some(&self.pixels[start..start + stride])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}
